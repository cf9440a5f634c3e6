use crate::dom::{Document, ElementId, I18N_ATTR, I18N_TARGET_ATTR};
use crate::i18n::Language;
use crate::site::router::PageKind;

/// Shared header, mobile menu and footer injected into every page.
///
/// Owns the mobile-menu open flag; the DOM mirrors it through `hidden` on
/// the menu and `aria-expanded` on the toggle.
#[derive(Debug, Clone)]
pub struct Shell {
    active: PageKind,
    menu_open: bool,
    menu_toggle: ElementId,
    mobile_menu: ElementId,
    nav_links: Vec<(PageKind, ElementId)>,
    language_links: Vec<(Language, ElementId)>,
}

impl Shell {
    /// Inject the chrome around the existing body content.
    pub fn inject(doc: &mut Document, active: PageKind) -> Self {
        let body = doc.body();
        let mut nav_links = Vec::new();
        let mut language_links = Vec::new();

        let header = doc.create_element("header");
        doc.set_attr(header, "class", "site-header");
        doc.insert_child(body, 0, header);

        doc.append_element(
            header,
            "a",
            &[("class", "brand"), ("href", "/"), (I18N_ATTR, "site.name")],
        );

        let nav = doc.append_element(
            header,
            "nav",
            &[("class", "site-nav"), (I18N_ATTR, "nav.label"), (I18N_TARGET_ATTR, "aria-label")],
        );
        append_nav_list(doc, nav, &mut nav_links);

        let switcher = doc.append_element(header, "div", &[("class", "lang-switch")]);
        for language in Language::all() {
            let href = format!("/lang/{}", language.code());
            let link = doc.append_element(
                switcher,
                "a",
                &[
                    ("href", href.as_str()),
                    ("class", "lang-option"),
                    ("data-lang", language.code()),
                    ("hreflang", language.code()),
                    ("lang", language.code()),
                ],
            );
            doc.set_text(link, language.short_label());
            language_links.push((*language, link));
        }

        let menu_toggle = doc.append_element(
            header,
            "button",
            &[
                ("type", "button"),
                ("class", "menu-toggle"),
                ("aria-controls", "mobile-menu"),
                ("aria-expanded", "false"),
                (I18N_ATTR, "nav.menu"),
                (I18N_TARGET_ATTR, "aria-label"),
            ],
        );
        doc.set_text(menu_toggle, "☰");

        let mobile_menu = doc.create_element("div");
        doc.set_attr(mobile_menu, "id", "mobile-menu");
        doc.set_attr(mobile_menu, "class", "mobile-menu");
        doc.set_attr(mobile_menu, "hidden", "");
        doc.insert_child(body, 1, mobile_menu);
        append_nav_list(doc, mobile_menu, &mut nav_links);

        let footer = doc.append_element(body, "footer", &[("class", "site-footer")]);
        doc.append_element(footer, "p", &[("class", "footer-brand"), (I18N_ATTR, "site.name")]);
        doc.append_element(footer, "p", &[(I18N_ATTR, "footer.tagline")]);
        doc.append_element(footer, "p", &[("class", "copyright"), (I18N_ATTR, "footer.copyright")]);

        let mut shell = Self {
            active,
            menu_open: false,
            menu_toggle,
            mobile_menu,
            nav_links,
            language_links,
        };
        shell.set_active(doc, active);
        shell
    }

    pub fn active(&self) -> PageKind {
        self.active
    }

    /// Mark the nav items for `page` as current.
    pub fn set_active(&mut self, doc: &mut Document, page: PageKind) {
        self.active = page;
        for (kind, link) in &self.nav_links {
            let is_active = *kind == page;
            doc.toggle_class(*link, "active", is_active);
            if is_active {
                doc.set_attr(*link, "aria-current", "page");
            } else {
                doc.remove_attr(*link, "aria-current");
            }
        }
    }

    /// Highlight the switcher control for the current language.
    pub fn mark_language(&self, doc: &mut Document, language: Language) {
        for (candidate, link) in &self.language_links {
            let is_current = *candidate == language;
            doc.toggle_class(*link, "active", is_current);
            doc.set_attr(*link, "aria-pressed", if is_current { "true" } else { "false" });
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self, doc: &mut Document) -> bool {
        self.set_menu(doc, !self.menu_open);
        self.menu_open
    }

    pub fn close_menu(&mut self, doc: &mut Document) {
        self.set_menu(doc, false);
    }

    fn set_menu(&mut self, doc: &mut Document, open: bool) {
        self.menu_open = open;
        doc.set_attr(self.menu_toggle, "aria-expanded", if open { "true" } else { "false" });
        if open {
            doc.remove_attr(self.mobile_menu, "hidden");
            doc.add_class(self.mobile_menu, "is-open");
        } else {
            doc.set_attr(self.mobile_menu, "hidden", "");
            doc.remove_class(self.mobile_menu, "is-open");
        }
    }
}

fn append_nav_list(doc: &mut Document, parent: ElementId, links: &mut Vec<(PageKind, ElementId)>) {
    let list = doc.append_element(parent, "ul", &[]);
    for page in PageKind::all() {
        let item = doc.append_element(list, "li", &[]);
        let key = page.nav_key();
        let link = doc.append_element(
            item,
            "a",
            &[("href", page.path()), ("data-nav", page.slug()), (I18N_ATTR, key.as_str())],
        );
        links.push((*page, link));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_wraps_existing_content() {
        let mut doc = Document::new();
        let main = doc.append_element(doc.body(), "main", &[]);
        Shell::inject(&mut doc, PageKind::About);

        let children = doc.children(doc.body()).to_vec();
        assert_eq!(doc.tag(children[0]), "header");
        assert_eq!(doc.attr(children[1], "id"), Some("mobile-menu"));
        assert_eq!(children[2], main);
        assert_eq!(doc.tag(children[3]), "footer");
    }

    #[test]
    fn active_page_is_marked_in_both_menus() {
        let mut doc = Document::new();
        let mut shell = Shell::inject(&mut doc, PageKind::Projects);

        let current: Vec<_> = doc
            .find_all_by_attr("aria-current")
            .into_iter()
            .map(|id| doc.attr(id, "data-nav").unwrap().to_string())
            .collect();
        assert_eq!(current, vec!["projects", "projects"]);

        shell.set_active(&mut doc, PageKind::Contact);
        assert_eq!(doc.find_all_by_attr("aria-current").len(), 2);
        assert!(doc
            .find_all_by_attr("aria-current")
            .iter()
            .all(|id| doc.attr(*id, "data-nav") == Some("contact")));
    }

    #[test]
    fn menu_toggle_mirrors_state() {
        let mut doc = Document::new();
        let mut shell = Shell::inject(&mut doc, PageKind::Home);
        let menu = doc.find_by_id("mobile-menu").unwrap();
        let toggle = doc.find_by_class("menu-toggle")[0];

        assert!(shell.toggle_menu(&mut doc));
        assert!(!doc.has_attr(menu, "hidden"));
        assert_eq!(doc.attr(toggle, "aria-expanded"), Some("true"));

        shell.close_menu(&mut doc);
        assert!(!shell.is_menu_open());
        assert!(doc.has_attr(menu, "hidden"));
        assert_eq!(doc.attr(toggle, "aria-expanded"), Some("false"));
    }

    #[test]
    fn language_controls_track_current_language() {
        let mut doc = Document::new();
        let shell = Shell::inject(&mut doc, PageKind::Home);
        shell.mark_language(&mut doc, Language::Lao);
        let active: Vec<_> = doc
            .find_all_by_attr("data-lang")
            .into_iter()
            .filter(|id| doc.has_class(*id, "active"))
            .map(|id| doc.attr(id, "data-lang").unwrap().to_string())
            .collect();
        assert_eq!(active, vec!["lo"]);
    }
}
