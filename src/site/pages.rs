use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::dom::{Document, ElementId, I18N_ATTR, I18N_TARGET_ATTR};
use crate::i18n::Language;
use crate::site::motion::{COUNT_ATTR, COUNT_SUFFIX_ATTR, PARALLAX_ATTR, REVEAL_ATTR};
use crate::site::router::PageKind;
use crate::site::{LocalizedSection, Translator};

pub const STYLESHEET_HREF: &str = "/static/css/site.css";
pub const CONTACT_EMAIL: &str = "info@vientianebuild.la";

/// Build the static markup of `kind` into an empty document.
pub fn skeleton(doc: &mut Document, kind: PageKind) {
    head(doc, kind);
    let class = format!("page-{}", kind.slug());
    let main = doc.append_element(doc.body(), "main", &[("id", "main"), ("class", class.as_str())]);
    match kind {
        PageKind::Home => home(doc, main),
        PageKind::About => about(doc, main),
        PageKind::Projects => projects(doc, main),
        PageKind::Contact => contact(doc, main),
    }
}

fn head(doc: &mut Document, kind: PageKind) {
    let head = doc.head();
    let title_key = format!("meta.{}.title", kind.slug());
    let description_key = format!("meta.{}.description", kind.slug());

    doc.append_element(head, "meta", &[("charset", "utf-8")]);
    doc.append_element(
        head,
        "meta",
        &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
    );
    doc.append_element(head, "title", &[(I18N_ATTR, title_key.as_str())]);
    doc.append_element(
        head,
        "meta",
        &[
            ("name", "description"),
            (I18N_ATTR, description_key.as_str()),
            (I18N_TARGET_ATTR, "content"),
        ],
    );
    doc.append_element(
        head,
        "meta",
        &[("property", "og:title"), (I18N_ATTR, title_key.as_str()), (I18N_TARGET_ATTR, "content")],
    );
    doc.append_element(head, "meta", &[("property", "og:locale"), ("content", "")]);
    doc.append_element(head, "meta", &[("http-equiv", "content-language"), ("content", "")]);
    doc.append_element(head, "link", &[("rel", "canonical"), ("href", "")]);
    for language in Language::all() {
        doc.append_element(
            head,
            "link",
            &[("rel", "alternate"), ("hreflang", language.code()), ("href", "")],
        );
    }
    doc.append_element(head, "link", &[("rel", "alternate"), ("hreflang", "x-default"), ("href", "")]);
    doc.append_element(head, "link", &[("rel", "stylesheet"), ("href", STYLESHEET_HREF)]);
}

fn text(doc: &mut Document, parent: ElementId, tag: &str, key: &str) -> ElementId {
    doc.append_element(parent, tag, &[(I18N_ATTR, key)])
}

fn home(doc: &mut Document, main: ElementId) {
    let hero = doc.append_element(main, "section", &[("class", "hero"), (REVEAL_ATTR, "")]);
    text(doc, hero, "h1", "home.hero.title");
    text(doc, hero, "p", "home.hero.subtitle");
    let actions = doc.append_element(hero, "div", &[("class", "hero-actions")]);
    doc.append_element(
        actions,
        "a",
        &[("class", "button"), ("href", "/contact"), (I18N_ATTR, "home.hero.cta")],
    );
    doc.append_element(
        actions,
        "a",
        &[("class", "button secondary"), ("href", "/projects"), (I18N_ATTR, "home.hero.projects")],
    );

    let services = doc.append_element(main, "section", &[("class", "services"), (REVEAL_ATTR, "")]);
    text(doc, services, "h2", "home.services.title");
    doc.append_element(services, "div", &[("id", "services-list"), ("class", "service-grid")]);

    let stats = doc.append_element(main, "section", &[("class", "stats"), (REVEAL_ATTR, "")]);
    for (target, suffix, key) in [
        ("120", "+", "home.stats.projects"),
        ("15", "", "home.stats.years"),
        ("40", "+", "home.stats.engineers"),
    ] {
        let stat = doc.append_element(stats, "div", &[("class", "stat")]);
        doc.append_element(
            stat,
            "span",
            &[("class", "stat-value"), (COUNT_ATTR, target), (COUNT_SUFFIX_ATTR, suffix)],
        );
        text(doc, stat, "p", key);
    }

    let banner = doc.append_element(
        main,
        "section",
        &[("class", "parallax-banner"), (PARALLAX_ATTR, "0.3")],
    );
    text(doc, banner, "p", "home.banner.text");
}

fn about(doc: &mut Document, main: ElementId) {
    let intro = doc.append_element(main, "section", &[("class", "intro"), (REVEAL_ATTR, "")]);
    text(doc, intro, "h1", "about.title");
    text(doc, intro, "p", "about.intro");

    let values = doc.append_element(main, "section", &[("class", "values"), (REVEAL_ATTR, "")]);
    text(doc, values, "h2", "about.values.title");
    let list = doc.append_element(values, "ul", &[("class", "value-list")]);
    for value in ["quality", "safety", "integrity"] {
        let item = doc.append_element(list, "li", &[]);
        text(doc, item, "h3", &format!("about.values.{value}.title"));
        text(doc, item, "p", &format!("about.values.{value}.description"));
    }

    let timeline = doc.append_element(main, "section", &[("class", "timeline"), (REVEAL_ATTR, "")]);
    text(doc, timeline, "h2", "about.timeline.title");
    doc.append_element(timeline, "ol", &[("id", "timeline-list")]);
}

fn projects(doc: &mut Document, main: ElementId) {
    let header = doc.append_element(main, "section", &[("class", "projects-header"), (REVEAL_ATTR, "")]);
    text(doc, header, "h1", "projects.title");
    text(doc, header, "p", "projects.intro");

    let tabs = doc.append_element(main, "div", &[("id", "project-tabs"), ("role", "tablist")]);
    for status in ["ongoing", "completed"] {
        let key = format!("projects.tabs.{status}");
        let href = format!("/projects?tab={status}");
        doc.append_element(
            tabs,
            "a",
            &[
                ("role", "tab"),
                ("href", href.as_str()),
                ("data-tab", status),
                (I18N_ATTR, key.as_str()),
            ],
        );
    }

    doc.append_element(
        main,
        "div",
        &[("id", "project-status"), ("class", "project-status"), ("aria-live", "polite"), ("hidden", "")],
    );
    doc.append_element(main, "div", &[("id", "project-grid"), ("class", "project-grid")]);
    doc.append_element(
        main,
        "section",
        &[("id", "project-detail"), ("class", "project-detail"), ("hidden", "")],
    );
}

fn contact(doc: &mut Document, main: ElementId) {
    let intro = doc.append_element(main, "section", &[("class", "contact-intro"), (REVEAL_ATTR, "")]);
    text(doc, intro, "h1", "contact.title");
    text(doc, intro, "p", "contact.intro");

    let info = doc.append_element(main, "section", &[("class", "contact-info"), (REVEAL_ATTR, "")]);
    for block in ["address", "phone", "hours"] {
        let item = doc.append_element(info, "div", &[("class", "contact-block")]);
        text(doc, item, "h3", &format!("contact.{block}.label"));
        text(doc, item, "p", &format!("contact.{block}.value"));
    }
    let email = doc.append_element(info, "div", &[("class", "contact-block")]);
    text(doc, email, "h3", "contact.email.label");
    let mailto = format!("mailto:{CONTACT_EMAIL}");
    let link = doc.append_element(email, "a", &[("href", mailto.as_str())]);
    doc.set_text(link, CONTACT_EMAIL);

    let form = doc.append_element(
        main,
        "form",
        &[
            ("class", "contact-form"),
            ("action", mailto.as_str()),
            ("method", "post"),
            ("enctype", "text/plain"),
        ],
    );
    for (field, tag, kind) in [("name", "input", "text"), ("email", "input", "email"), ("message", "textarea", "")] {
        let id = format!("contact-{field}");
        let label_key = format!("contact.form.{field}");
        doc.append_element(form, "label", &[("for", id.as_str()), (I18N_ATTR, label_key.as_str())]);
        let placeholder_key = format!("contact.form.{field}_placeholder");
        let input = doc.append_element(
            form,
            tag,
            &[
                ("id", id.as_str()),
                ("name", field),
                ("required", ""),
                (I18N_ATTR, placeholder_key.as_str()),
                (I18N_TARGET_ATTR, "placeholder"),
            ],
        );
        if !kind.is_empty() {
            doc.set_attr(input, "type", kind);
        }
    }
    doc.append_element(
        form,
        "button",
        &[("type", "submit"), ("class", "button"), (I18N_ATTR, "contact.form.submit")],
    );
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceItem {
    pub title: String,
    pub description: String,
}

/// Home page service cards, built from `home.services.items`.
#[derive(Debug, Clone)]
pub struct ServicesSection {
    list: ElementId,
}

impl ServicesSection {
    pub const ITEMS_KEY: &'static str = "home.services.items";

    pub fn mount(doc: &Document) -> anyhow::Result<Self> {
        let list = doc.find_by_id("services-list").context("#services-list mount point missing")?;
        Ok(Self { list })
    }

    pub fn render(&self, doc: &mut Document, tr: &Translator<'_>) -> usize {
        doc.clear_children(self.list);
        let items: Vec<ServiceItem> = tr.items(Self::ITEMS_KEY);
        if items.is_empty() {
            debug!(key = Self::ITEMS_KEY, "No services to render");
        }
        for item in &items {
            let card = doc.append_element(self.list, "article", &[("class", "service-card")]);
            let title = doc.append_element(card, "h3", &[]);
            doc.set_text(title, &item.title);
            let description = doc.append_element(card, "p", &[]);
            doc.set_text(description, &item.description);
        }
        items.len()
    }
}

impl LocalizedSection for ServicesSection {
    fn rerender(&mut self, doc: &mut Document, tr: &Translator<'_>) {
        self.render(doc, tr);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineStep {
    pub year: String,
    pub title: String,
    pub description: String,
}

/// About page company history, built from `about.timeline.steps`.
#[derive(Debug, Clone)]
pub struct TimelineSection {
    list: ElementId,
}

impl TimelineSection {
    pub const STEPS_KEY: &'static str = "about.timeline.steps";

    pub fn mount(doc: &Document) -> anyhow::Result<Self> {
        let list = doc.find_by_id("timeline-list").context("#timeline-list mount point missing")?;
        Ok(Self { list })
    }

    pub fn render(&self, doc: &mut Document, tr: &Translator<'_>) -> usize {
        doc.clear_children(self.list);
        let steps: Vec<TimelineStep> = tr.items(Self::STEPS_KEY);
        for step in &steps {
            let item = doc.append_element(self.list, "li", &[("class", "timeline-step")]);
            let year = doc.append_element(item, "span", &[("class", "timeline-year")]);
            doc.set_text(year, &step.year);
            let title = doc.append_element(item, "h3", &[]);
            doc.set_text(title, &step.title);
            let description = doc.append_element(item, "p", &[]);
            doc.set_text(description, &step.description);
        }
        steps.len()
    }
}

impl LocalizedSection for TimelineSection {
    fn rerender(&mut self, doc: &mut Document, tr: &Translator<'_>) {
        self.render(doc, tr);
    }
}
