use serde::Serialize;

/// The four pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Home,
    About,
    Projects,
    Contact,
}

impl PageKind {
    pub fn all() -> &'static [PageKind] {
        &[PageKind::Home, PageKind::About, PageKind::Projects, PageKind::Contact]
    }

    /// Canonical path served for the page.
    pub fn path(&self) -> &'static str {
        match self {
            PageKind::Home => "/",
            PageKind::About => "/about",
            PageKind::Projects => "/projects",
            PageKind::Contact => "/contact",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::About => "about",
            PageKind::Projects => "projects",
            PageKind::Contact => "contact",
        }
    }

    /// Translation key of the page's navigation label.
    pub fn nav_key(&self) -> String {
        format!("nav.{}", self.slug())
    }

    /// Page identity from path segments; anything unrecognised is home.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let segment = segment.trim_end_matches(".html");
            if segment.contains("about") {
                return PageKind::About;
            }
            if segment.contains("projects") {
                return PageKind::Projects;
            }
            if segment.contains("contact") {
                return PageKind::Contact;
            }
        }
        PageKind::Home
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub page: PageKind,
    pub selected_slug: Option<String>,
}

/// Pure routing: `(path, hash)` to the page and the deep-linked project.
pub fn route(path: &str, hash: Option<&str>) -> Route {
    let page = PageKind::from_path(path);
    let selected_slug = match page {
        PageKind::Projects => hash
            .map(|hash| hash.trim_start_matches('#').trim())
            .filter(|slug| !slug.is_empty())
            .map(str::to_string),
        _ => None,
    };
    Route { page, selected_slug }
}

/// The page URL as seen by the running page: path plus fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub hash: Option<String>,
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            hash: None,
        }
    }

    pub fn with_hash(mut self, hash: &str) -> Self {
        self.set_hash(hash);
        self
    }

    /// Replace the fragment without navigating.
    pub fn set_hash(&mut self, hash: &str) {
        let hash = hash.trim_start_matches('#');
        self.hash = (!hash.is_empty()).then(|| hash.to_string());
    }

    pub fn clear_hash(&mut self) {
        self.hash = None;
    }

    pub fn route(&self) -> Route {
        route(&self.path, self.hash.as_deref())
    }

    pub fn href(&self) -> String {
        match &self.hash {
            Some(hash) => format!("{}#{}", self.path, hash),
            None => self.path.clone(),
        }
    }
}
