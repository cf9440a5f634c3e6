use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::dom::{Binder, Document, ElementId};
use crate::i18n::{Language, LanguagePreference, Localizer, UnsupportedLanguage};
use crate::site::banner::{ErrorBanner, ERROR_BANNER_KEY};
use crate::site::motion::{MotionController, MotionEnvironment};
use crate::site::pages::{self, ServicesSection, TimelineSection};
use crate::site::projects::{ProjectCatalog, ProjectStatus, ProjectsView};
use crate::site::resources::{AssetProbe, ResourceKind, ResourceMonitor};
use crate::site::router::{Location, PageKind};
use crate::site::shell::Shell;
use crate::site::{LocalizedSection, Translator};

type Sections = Vec<Box<dyn LocalizedSection + Send + Sync>>;

/// Everything a page needs from its surroundings at load time.
pub struct PageContext<'a> {
    pub localizer: &'a Localizer,
    pub preference: LanguagePreference,
    pub language: Language,
    pub location: Location,
    pub catalog: &'a ProjectCatalog,
    pub tab: ProjectStatus,
    pub base_url: &'a str,
    pub motion: MotionEnvironment,
    pub banner_dismiss: Duration,
    pub probe: Option<&'a dyn AssetProbe>,
}

/// A loaded page: the document plus the components that keep it in sync
/// with the current language and user interaction.
pub struct Page<'a> {
    kind: PageKind,
    doc: Document,
    localizer: &'a Localizer,
    preference: LanguagePreference,
    language: Language,
    location: Location,
    base_url: String,
    binder: Binder,
    shell: Shell,
    motion: MotionController,
    banner: ErrorBanner,
    resources: ResourceMonitor,
    sections: Sections,
    projects: Option<ProjectsView>,
}

impl<'a> Page<'a> {
    /// Skeleton, shell, binder, page initializer, motion, in that order.
    pub fn build(kind: PageKind, ctx: PageContext<'a>) -> Self {
        let mut doc = Document::new();
        pages::skeleton(&mut doc, kind);
        Self::assemble(kind, doc, ctx)
    }

    fn assemble(kind: PageKind, mut doc: Document, ctx: PageContext<'a>) -> Self {
        let shell = Shell::inject(&mut doc, kind);
        let mut binder = Binder::index(&doc);
        binder.apply(&mut doc, ctx.localizer, ctx.language);

        let tr = Translator::new(ctx.localizer, ctx.language);
        let mut location = ctx.location;
        let mut banner = ErrorBanner::new(ctx.banner_dismiss);
        let (sections, projects) =
            match initialize(kind, &mut doc, &tr, ctx.catalog, ctx.tab, &mut location) {
                Ok(parts) => parts,
                Err(e) => {
                    error!(page = kind.slug(), "Page initializer failed: {:#}", e);
                    banner.show_once(&mut doc, &tr.t(ERROR_BANNER_KEY));
                    binder.reindex(&doc);
                    (Vec::new(), None)
                }
            };

        let motion = MotionController::init(&mut doc, ctx.motion);
        let mut resources = ResourceMonitor::new();
        if let Some(probe) = ctx.probe {
            let broken = resources.scan(&mut doc, probe);
            if broken > 0 {
                warn!(page = kind.slug(), broken, "Page references missing assets");
            }
        }

        let mut page = Self {
            kind,
            doc,
            localizer: ctx.localizer,
            preference: ctx.preference,
            language: ctx.language,
            location,
            base_url: ctx.base_url.trim_end_matches('/').to_string(),
            binder,
            shell,
            motion,
            banner,
            resources,
            sections,
            projects,
        };
        page.apply_head();
        page.shell.mark_language(&mut page.doc, page.language);
        debug!(page = kind.slug(), language = %page.language, "Page built");
        page
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn resources(&self) -> &ResourceMonitor {
        &self.resources
    }

    pub fn projects(&self) -> Option<&ProjectsView> {
        self.projects.as_ref()
    }

    /// Switch to the language named by `code`. Unknown codes leave the page
    /// and the stored preference untouched.
    pub fn switch_language(&mut self, code: &str) -> Result<Language, UnsupportedLanguage> {
        let language: Language = code.parse().map_err(|e: UnsupportedLanguage| {
            warn!("Rejected language switch: {}", e);
            e
        })?;
        if let Err(e) = self.preference.store(language) {
            warn!("Failed to persist language preference: {}", e);
        }
        self.apply_language(language);
        info!(language = %language, "Language switched");
        Ok(language)
    }

    fn apply_language(&mut self, language: Language) {
        self.language = language;
        let updated = self.binder.apply(&mut self.doc, self.localizer, language);
        self.apply_head();
        self.shell.mark_language(&mut self.doc, language);

        let tr = Translator::new(self.localizer, language);
        for section in &mut self.sections {
            section.rerender(&mut self.doc, &tr);
        }
        if let Some(view) = &mut self.projects {
            view.rerender(&mut self.doc, &tr);
        }
        debug!(updated, language = %language, "Applied translations");
    }

    /// Language attribute, locale meta tags, alternate and canonical links.
    fn apply_head(&mut self) {
        let language = self.language;
        let html = self.doc.html();
        self.doc.set_attr(html, "lang", language.code());

        for meta in self.doc.find_by_tag("meta") {
            if self.doc.attr(meta, "property") == Some("og:locale") {
                self.doc.set_attr(meta, "content", language.locale());
            } else if self.doc.attr(meta, "http-equiv") == Some("content-language") {
                self.doc.set_attr(meta, "content", language.code());
            }
        }

        let page_url = format!("{}{}", self.base_url, self.location.path);
        for link in self.doc.find_by_tag("link") {
            let rel = self.doc.attr(link, "rel").map(str::to_string);
            let href = match rel.as_deref() {
                Some("canonical") => format!("{}?lang={}", page_url, language.code()),
                Some("alternate") => match self.doc.attr(link, "hreflang") {
                    Some("x-default") => page_url.clone(),
                    Some(code) => format!("{}?lang={}", page_url, code),
                    None => continue,
                },
                _ => continue,
            };
            self.doc.set_attr(link, "href", &href);
        }
    }

    pub fn select_tab(&mut self, tab: ProjectStatus) {
        let tr = Translator::new(self.localizer, self.language);
        if let Some(view) = &mut self.projects {
            view.select_tab(&mut self.doc, &tr, tab);
        }
    }

    pub fn show_detail(&mut self, slug: &str) -> bool {
        let tr = Translator::new(self.localizer, self.language);
        match &mut self.projects {
            Some(view) => view.show_detail(&mut self.doc, &tr, &mut self.location, slug),
            None => false,
        }
    }

    pub fn hide_detail(&mut self) {
        if let Some(view) = &mut self.projects {
            view.hide_detail(&mut self.doc, &mut self.location);
        }
    }

    /// The URL fragment changed outside the page (back/forward, edited URL).
    pub fn on_hash_change(&mut self, hash: Option<&str>) {
        match hash {
            Some(hash) => self.location.set_hash(hash),
            None => self.location.clear_hash(),
        }
        let tr = Translator::new(self.localizer, self.language);
        if let Some(view) = &mut self.projects {
            view.on_hash_change(&mut self.doc, &tr, &mut self.location);
        }
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.shell.toggle_menu(&mut self.doc)
    }

    pub fn close_menu(&mut self) {
        self.shell.close_menu(&mut self.doc);
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.motion.set_reduced_motion(&mut self.doc, reduced);
    }

    /// A resource referenced by `element` failed to load.
    pub fn report_resource_failure(&mut self, element: ElementId, kind: ResourceKind, url: &str) {
        match kind {
            ResourceKind::AnimationLibrary => {
                warn!(url, "Animation library failed to load");
                self.motion.on_library_failed(&mut self.doc);
            }
            _ => self.resources.report(&mut self.doc, element, kind, url),
        }
    }

    pub fn head_html(&self) -> String {
        self.doc.inner_html(self.doc.head())
    }

    pub fn body_html(&self) -> String {
        self.doc.inner_html(self.doc.body())
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }
}

fn initialize(
    kind: PageKind,
    doc: &mut Document,
    tr: &Translator<'_>,
    catalog: &ProjectCatalog,
    tab: ProjectStatus,
    location: &mut Location,
) -> anyhow::Result<(Sections, Option<ProjectsView>)> {
    let mut sections: Sections = Vec::new();
    let mut projects = None;
    match kind {
        PageKind::Home => {
            let services = ServicesSection::mount(doc)?;
            services.render(doc, tr);
            sections.push(Box::new(services));
        }
        PageKind::About => {
            let timeline = TimelineSection::mount(doc)?;
            timeline.render(doc, tr);
            sections.push(Box::new(timeline));
        }
        PageKind::Projects => {
            let mut view = ProjectsView::mount(doc, catalog)?;
            view.select_tab(doc, tr, tab);
            view.open_from_location(doc, tr, location);
            projects = Some(view);
        }
        PageKind::Contact => {}
    }
    Ok((sections, projects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fallback::builtin_dictionary;
    use crate::i18n::preference::LANGUAGE_KEY;
    use crate::i18n::{Dictionary, DictionarySource};
    use crate::site::projects::{ProjectCollection, ProjectRecord};
    use crate::storage::{MemoryStorage, Storage};
    use serde_json::json;
    use std::sync::Arc;

    fn localizer() -> Localizer {
        let mut localizer = Localizer::new(Language::English);
        let mut en = builtin_dictionary(Language::English).as_value().clone();
        en["home"] = json!({"services": {"items": [{"title": "Design", "description": "Plans"}]}});
        en["projects"]["items"] = json!({"bridge-a": "A bridge over the Nam Khan."});
        let mut lo = builtin_dictionary(Language::Lao).as_value().clone();
        lo["home"] = json!({"services": {"items": [{"title": "ອອກແບບ", "description": "ແບບແຜນ"}]}});
        localizer.insert(Language::English, Dictionary::new(en), DictionarySource::Network);
        localizer.insert(Language::Lao, Dictionary::new(lo), DictionarySource::Network);
        localizer
    }

    fn catalog() -> ProjectCatalog {
        let record = |slug: &str, status| ProjectRecord {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            status,
            location: "Vientiane".to_string(),
            scope: "Design".to_string(),
            year: "2024".to_string(),
            cover: format!("/static/{slug}.svg"),
            summary_i18n_key: format!("projects.items.{slug}"),
            gallery: Vec::new(),
        };
        ProjectCatalog::loaded(
            ProjectCollection::new(vec![
                record("bridge-a", ProjectStatus::Ongoing),
                record("road-b", ProjectStatus::Completed),
            ])
            .unwrap(),
        )
    }

    fn context<'a>(
        localizer: &'a Localizer,
        catalog: &'a ProjectCatalog,
        storage: Arc<MemoryStorage>,
        location: Location,
    ) -> PageContext<'a> {
        let preference = LanguagePreference::new(storage);
        let language = preference.load();
        PageContext {
            localizer,
            preference,
            language,
            location,
            catalog,
            tab: ProjectStatus::Ongoing,
            base_url: "https://example.la/",
            motion: MotionEnvironment::default(),
            banner_dismiss: Duration::from_secs(6),
            probe: None,
        }
    }

    #[test]
    fn build_binds_chrome_and_marks_nav() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let page = Page::build(PageKind::About, context(&localizer, &catalog, storage, Location::new("/about")));

        let doc = page.document();
        let brand = doc.find_by_class("brand")[0];
        assert_eq!(doc.text(brand), Some("Vientiane Build Consult"));
        let current = doc.find_all_by_attr("aria-current");
        assert!(current.iter().all(|id| doc.attr(*id, "data-nav") == Some("about")));
        assert!(!page.banner().is_shown());
        assert_eq!(doc.attr(doc.html(), "lang"), Some("en"));
    }

    #[test]
    fn switching_back_restores_the_document_exactly() {
        let localizer = localizer();
        let catalog = catalog();
        for (kind, path) in [(PageKind::Home, "/"), (PageKind::Projects, "/projects")] {
            let storage = Arc::new(MemoryStorage::new());
            let location = Location::new(path).with_hash("bridge-a");
            let mut page = Page::build(kind, context(&localizer, &catalog, storage.clone(), location));
            let original = page.to_html();

            assert_eq!(page.switch_language("lo"), Ok(Language::Lao));
            assert_ne!(page.to_html(), original);
            assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("lo"));

            page.switch_language("en").unwrap();
            assert_eq!(page.to_html(), original);
        }
    }

    #[test]
    fn switch_updates_head_metadata() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let mut page = Page::build(
            PageKind::Contact,
            context(&localizer, &catalog, storage, Location::new("/contact")),
        );
        page.switch_language("lo").unwrap();

        let head = page.head_html();
        assert!(head.contains(r#"content="lo_LA""#));
        assert!(head.contains(r#"<link rel="canonical" href="https://example.la/contact?lang=lo">"#));
        assert!(head.contains(r#"hreflang="x-default" href="https://example.la/contact""#));
        assert_eq!(page.document().attr(page.document().html(), "lang"), Some("lo"));

        let doc = page.document();
        let pressed: Vec<_> = doc
            .find_all_by_attr("aria-pressed")
            .into_iter()
            .filter(|id| doc.attr(*id, "aria-pressed") == Some("true"))
            .map(|id| doc.attr(id, "data-lang").unwrap().to_string())
            .collect();
        assert_eq!(pressed, vec!["lo"]);
    }

    #[test]
    fn unknown_language_is_rejected_without_side_effects() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let mut page = Page::build(
            PageKind::Home,
            context(&localizer, &catalog, storage.clone(), Location::new("/")),
        );
        let before = page.to_html();

        assert!(page.switch_language("fr").is_err());
        assert_eq!(page.to_html(), before);
        assert_eq!(page.language(), Language::English);
        assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn deep_link_opens_detail_on_load() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let location = Location::new("/projects").with_hash("#road-b");
        let mut page = Page::build(PageKind::Projects, context(&localizer, &catalog, storage, location));

        assert_eq!(page.projects().and_then(|view| view.detail()), Some("road-b"));
        assert_eq!(page.projects().map(|view| view.tab()), Some(ProjectStatus::Completed));
        let doc = page.document();
        let cards: Vec<&str> = doc
            .find_by_class("project-card")
            .into_iter()
            .filter_map(|card| doc.attr(card, "data-slug"))
            .collect();
        assert_eq!(cards, vec!["road-b"]);
        page.hide_detail();
        assert_eq!(page.location().hash, None);

        page.on_hash_change(Some("bridge-a"));
        assert_eq!(page.projects().and_then(|view| view.detail()), Some("bridge-a"));
    }

    #[test]
    fn initializer_failure_shows_banner_and_still_renders() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&localizer, &catalog, storage, Location::new("/projects"));
        let page = Page::assemble(PageKind::Projects, Document::new(), ctx);

        assert!(page.banner().is_shown());
        assert!(page.projects().is_none());
        let doc = page.document();
        let banner = doc.find_by_class("error-banner")[0];
        assert_eq!(
            doc.text_content(banner),
            "Some features may not work right now. Please refresh the page."
        );
        assert!(!doc.find_by_tag("header").is_empty());
    }

    #[test]
    fn menu_and_motion_are_reachable_from_the_page() {
        let localizer = localizer();
        let catalog = catalog();
        let storage = Arc::new(MemoryStorage::new());
        let mut ctx = context(&localizer, &catalog, storage, Location::new("/"));
        ctx.motion = MotionEnvironment { library_available: true, reduced_motion: false };
        let mut page = Page::build(PageKind::Home, ctx);

        assert!(!page.motion().effects().is_empty());
        let html = page.document().html();
        page.report_resource_failure(html, ResourceKind::AnimationLibrary, "/static/js/gsap.min.js");
        assert!(page.motion().effects().is_empty());

        assert!(page.toggle_menu());
        page.close_menu();
        assert!(!page.shell().is_menu_open());
    }
}
