use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::dom::{Document, ElementId};
use crate::error::FetchError;
use crate::fetch::{fetch_json_with_retry, Fetcher, RetryPolicy};
use crate::site::router::Location;
use crate::site::{LocalizedSection, Translator};

/// Path of the project collection under the content root.
pub const PROJECTS_PATH: &str = "data/projects.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Ongoing,
    Completed,
}

impl ProjectStatus {
    pub fn all() -> &'static [ProjectStatus] {
        &[ProjectStatus::Ongoing, ProjectStatus::Completed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "projects.status.ongoing",
            ProjectStatus::Completed => "projects.status.completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ongoing" => Ok(ProjectStatus::Ongoing),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// One portfolio entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectRecord {
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub status: ProjectStatus,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    #[validate(length(min = 1, message = "scope must not be empty"))]
    pub scope: String,
    #[validate(length(min = 1, message = "year must not be empty"))]
    pub year: String,
    #[validate(length(min = 1, message = "cover must not be empty"))]
    pub cover: String,
    #[validate(length(min = 1, message = "summary_i18n_key must not be empty"))]
    pub summary_i18n_key: String,
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl ProjectRecord {
    /// Lowercase ASCII letters, digits and hyphens only.
    pub fn has_url_safe_slug(&self) -> bool {
        !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid project {slug:?}: {reason}")]
    Invalid { slug: String, reason: String },

    #[error("Duplicate project slug: {0}")]
    DuplicateSlug(String),
}

/// The validated, immutable project list in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectCollection {
    projects: Vec<ProjectRecord>,
}

impl ProjectCollection {
    pub fn new(projects: Vec<ProjectRecord>) -> Result<Self, ProjectLoadError> {
        let mut seen = HashSet::new();
        for project in &projects {
            project.validate().map_err(|e| ProjectLoadError::Invalid {
                slug: project.slug.clone(),
                reason: e.to_string(),
            })?;
            if !project.has_url_safe_slug() {
                return Err(ProjectLoadError::Invalid {
                    slug: project.slug.clone(),
                    reason: "slug must be lowercase letters, digits and hyphens".to_string(),
                });
            }
            if !seen.insert(project.slug.as_str()) {
                return Err(ProjectLoadError::DuplicateSlug(project.slug.clone()));
            }
        }
        Ok(Self { projects })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.projects.iter()
    }

    pub fn find(&self, slug: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|project| project.slug == slug)
    }

    /// Records in one tab, in collection order.
    pub fn filter_by_status(&self, status: ProjectStatus) -> Vec<&ProjectRecord> {
        self.projects
            .iter()
            .filter(|project| project.status == status)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    projects: Vec<ProjectRecord>,
}

/// Fetch and validate the whole collection.
pub async fn load_all(
    fetcher: &dyn Fetcher,
    retry: &RetryPolicy,
) -> Result<ProjectCollection, ProjectLoadError> {
    let file: ProjectFile = fetch_json_with_retry(fetcher, PROJECTS_PATH, retry).await?;
    let collection = ProjectCollection::new(file.projects)?;
    info!(count = collection.len(), "Loaded project collection");
    Ok(collection)
}

/// Outcome of the last load: the collection, or an empty one plus the error.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    collection: Arc<ProjectCollection>,
    error: Option<String>,
}

impl ProjectCatalog {
    pub fn loaded(collection: ProjectCollection) -> Self {
        Self {
            collection: Arc::new(collection),
            error: None,
        }
    }

    pub fn from_result(result: Result<ProjectCollection, ProjectLoadError>) -> Self {
        match result {
            Ok(collection) => Self::loaded(collection),
            Err(e) => {
                warn!("Project collection unavailable: {}", e);
                Self {
                    collection: Arc::new(ProjectCollection::empty()),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn collection(&self) -> &Arc<ProjectCollection> {
        &self.collection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Build one card per record into `grid`, preserving order.
pub fn render_cards(
    doc: &mut Document,
    grid: ElementId,
    projects: &[&ProjectRecord],
    tr: &Translator<'_>,
) -> Vec<ElementId> {
    doc.clear_children(grid);
    projects
        .iter()
        .map(|project| render_card(doc, grid, project, tr))
        .collect()
}

fn render_card(
    doc: &mut Document,
    grid: ElementId,
    project: &ProjectRecord,
    tr: &Translator<'_>,
) -> ElementId {
    let card = doc.append_element(
        grid,
        "article",
        &[
            ("class", "project-card"),
            ("data-slug", project.slug.as_str()),
            ("data-status", project.status.as_str()),
        ],
    );
    doc.append_element(
        card,
        "img",
        &[
            ("class", "project-cover"),
            ("src", project.cover.as_str()),
            ("alt", project.title.as_str()),
            ("loading", "lazy"),
        ],
    );

    let body = doc.append_element(card, "div", &[("class", "project-body")]);
    let title = doc.append_element(body, "h3", &[]);
    doc.set_text(title, &project.title);
    let meta = doc.append_element(body, "p", &[("class", "project-meta")]);
    doc.set_text(meta, &format!("{} · {}", project.location, project.year));
    let scope = doc.append_element(body, "p", &[("class", "project-scope")]);
    doc.set_text(scope, &project.scope);
    let summary = doc.append_element(body, "p", &[("class", "project-summary")]);
    doc.set_text(summary, &tr.t(&project.summary_i18n_key));

    let href = format!("/projects/{}", project.slug);
    let link = doc.append_element(
        body,
        "a",
        &[
            ("class", "project-link"),
            ("href", href.as_str()),
            ("data-action", "show-detail"),
            ("data-slug", project.slug.as_str()),
            ("aria-expanded", "false"),
        ],
    );
    doc.set_text(link, &tr.t("projects.view_details"));
    card
}

/// Fill the expanded detail panel for one record.
pub fn render_detail(
    doc: &mut Document,
    panel: ElementId,
    project: &ProjectRecord,
    tr: &Translator<'_>,
) {
    doc.clear_children(panel);
    doc.remove_attr(panel, "hidden");
    doc.set_attr(panel, "data-slug", &project.slug);
    doc.set_attr(panel, "aria-labelledby", "project-detail-title");

    let close = doc.append_element(
        panel,
        "a",
        &[("class", "detail-close"), ("href", "/projects"), ("data-action", "hide-detail")],
    );
    doc.set_text(close, &tr.t("projects.detail.close"));

    let heading = doc.append_element(panel, "h2", &[("id", "project-detail-title")]);
    doc.set_text(heading, &project.title);

    let badge = doc.append_element(
        panel,
        "span",
        &[("class", "status-badge"), ("data-status", project.status.as_str())],
    );
    doc.set_text(badge, &tr.t(project.status.label_key()));

    let facts = doc.append_element(panel, "dl", &[("class", "project-facts")]);
    for (label_key, value) in [
        ("projects.detail.location", &project.location),
        ("projects.detail.scope", &project.scope),
        ("projects.detail.year", &project.year),
    ] {
        let term = doc.append_element(facts, "dt", &[]);
        doc.set_text(term, &tr.t(label_key));
        let definition = doc.append_element(facts, "dd", &[]);
        doc.set_text(definition, value);
    }

    let summary = doc.append_element(panel, "p", &[("class", "project-summary")]);
    doc.set_text(summary, &tr.t(&project.summary_i18n_key));

    let gallery = doc.append_element(panel, "div", &[("class", "project-gallery")]);
    let images: Vec<&str> = if project.gallery.is_empty() {
        vec![project.cover.as_str()]
    } else {
        project.gallery.iter().map(String::as_str).collect()
    };
    let total = images.len();
    for (index, src) in images.into_iter().enumerate() {
        let alt = format!("{} ({}/{})", project.title, index + 1, total);
        doc.append_element(
            gallery,
            "img",
            &[("src", src), ("alt", alt.as_str()), ("loading", "lazy")],
        );
    }
}

/// Projects page controller: `{tab} × {detail}` state over the mounted DOM.
#[derive(Debug, Clone)]
pub struct ProjectsView {
    collection: Arc<ProjectCollection>,
    load_error: Option<String>,
    tab: ProjectStatus,
    detail: Option<String>,
    tabs: Vec<(ProjectStatus, ElementId)>,
    status: ElementId,
    grid: ElementId,
    panel: ElementId,
}

impl ProjectsView {
    /// Attach to the page's mount points.
    pub fn mount(doc: &Document, catalog: &ProjectCatalog) -> anyhow::Result<Self> {
        let grid = doc.find_by_id("project-grid").context("#project-grid mount point missing")?;
        let panel = doc
            .find_by_id("project-detail")
            .context("#project-detail mount point missing")?;
        let status = doc
            .find_by_id("project-status")
            .context("#project-status mount point missing")?;

        let tabs = doc
            .find_all_by_attr("data-tab")
            .into_iter()
            .filter_map(|button| {
                let status = doc.attr(button, "data-tab")?.parse::<ProjectStatus>().ok()?;
                Some((status, button))
            })
            .collect();

        Ok(Self {
            collection: catalog.collection().clone(),
            load_error: catalog.error().map(str::to_string),
            tab: ProjectStatus::default(),
            detail: None,
            tabs,
            status,
            grid,
            panel,
        })
    }

    pub fn tab(&self) -> ProjectStatus {
        self.tab
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn collection(&self) -> &ProjectCollection {
        &self.collection
    }

    /// Render tabs, status line and cards for the active tab (and the open
    /// detail, if any). Returns the card elements.
    pub fn render(&self, doc: &mut Document, tr: &Translator<'_>) -> Vec<ElementId> {
        for (status, button) in &self.tabs {
            let selected = *status == self.tab;
            doc.set_attr(*button, "aria-selected", if selected { "true" } else { "false" });
            doc.toggle_class(*button, "active", selected);
        }

        let visible = self.collection.filter_by_status(self.tab);
        self.render_status(doc, tr, visible.is_empty());
        let cards = render_cards(doc, self.grid, &visible, tr);

        match self.detail.as_deref().and_then(|slug| self.collection.find(slug)) {
            Some(project) => render_detail(doc, self.panel, project, tr),
            None => self.collapse_panel(doc),
        }
        self.mark_expanded_card(doc);
        cards
    }

    fn render_status(&self, doc: &mut Document, tr: &Translator<'_>, tab_is_empty: bool) {
        doc.clear_children(self.status);
        if self.load_error.is_some() {
            doc.remove_attr(self.status, "hidden");
            doc.set_attr(self.status, "role", "alert");
            let message = doc.append_element(self.status, "p", &[("class", "project-error")]);
            doc.set_text(message, &tr.t("projects.error.load"));
            let retry = doc.append_element(
                self.status,
                "a",
                &[
                    ("class", "retry"),
                    ("href", "/projects?retry=true"),
                    ("data-action", "retry-projects"),
                ],
            );
            doc.set_text(retry, &tr.t("projects.error.retry"));
        } else if tab_is_empty {
            doc.remove_attr(self.status, "hidden");
            doc.remove_attr(self.status, "role");
            let message = doc.append_element(self.status, "p", &[("class", "project-empty")]);
            doc.set_text(message, &tr.t("projects.empty"));
        } else {
            doc.set_attr(self.status, "hidden", "");
            doc.remove_attr(self.status, "role");
        }
    }

    fn collapse_panel(&self, doc: &mut Document) {
        doc.clear_children(self.panel);
        doc.set_attr(self.panel, "hidden", "");
        doc.remove_attr(self.panel, "data-slug");
    }

    fn mark_expanded_card(&self, doc: &mut Document) {
        for link in doc.find_all_by_attr("data-action") {
            if doc.attr(link, "data-action") != Some("show-detail") {
                continue;
            }
            let expanded = self.detail.is_some() && doc.attr(link, "data-slug") == self.detail.as_deref();
            doc.set_attr(link, "aria-expanded", if expanded { "true" } else { "false" });
        }
    }

    /// Switch tabs; the detail view is left as it is.
    pub fn select_tab(&mut self, doc: &mut Document, tr: &Translator<'_>, tab: ProjectStatus) {
        debug!(tab = %tab, "Selecting project tab");
        self.tab = tab;
        self.render(doc, tr);
    }

    /// Expand `slug` and point the URL hash at it. Unknown slugs change nothing.
    pub fn show_detail(
        &mut self,
        doc: &mut Document,
        tr: &Translator<'_>,
        location: &mut Location,
        slug: &str,
    ) -> bool {
        let Some(project) = self.collection.find(slug) else {
            warn!(slug, "No project with this slug");
            return false;
        };
        render_detail(doc, self.panel, project, tr);
        self.detail = Some(project.slug.clone());
        location.set_hash(slug);
        self.mark_expanded_card(doc);
        true
    }

    /// Collapse the detail view and clear the hash.
    pub fn hide_detail(&mut self, doc: &mut Document, location: &mut Location) {
        self.detail = None;
        location.clear_hash();
        self.collapse_panel(doc);
        self.mark_expanded_card(doc);
    }

    /// Browser back/forward changed the hash.
    pub fn on_hash_change(&mut self, doc: &mut Document, tr: &Translator<'_>, location: &mut Location) {
        match location.route().selected_slug {
            Some(slug) if self.detail.as_deref() == Some(slug.as_str()) => {}
            Some(slug) if self.collection.find(&slug).is_some() => {
                self.open_hash_target(doc, tr, location, &slug);
            }
            Some(slug) => {
                warn!(slug = %slug, "Hash does not match any project");
                self.detail = None;
                self.collapse_panel(doc);
                self.mark_expanded_card(doc);
            }
            None => {
                self.detail = None;
                self.collapse_panel(doc);
                self.mark_expanded_card(doc);
            }
        }
    }

    /// Deep link: open the project named by the initial URL hash.
    pub fn open_from_location(
        &mut self,
        doc: &mut Document,
        tr: &Translator<'_>,
        location: &mut Location,
    ) -> bool {
        match location.route().selected_slug {
            Some(slug) => self.open_hash_target(doc, tr, location, &slug),
            None => false,
        }
    }

    /// A hash names the project, so the tab follows its status.
    fn open_hash_target(
        &mut self,
        doc: &mut Document,
        tr: &Translator<'_>,
        location: &mut Location,
        slug: &str,
    ) -> bool {
        if let Some(status) = self.collection.find(slug).map(|project| project.status) {
            if status != self.tab {
                self.select_tab(doc, tr, status);
            }
        }
        self.show_detail(doc, tr, location, slug)
    }
}

impl LocalizedSection for ProjectsView {
    fn rerender(&mut self, doc: &mut Document, tr: &Translator<'_>) {
        self.render(doc, tr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::i18n::{Dictionary, DictionarySource, Language, Localizer};
    use serde_json::json;
    use std::time::Duration;

    fn record(slug: &str, status: ProjectStatus) -> ProjectRecord {
        ProjectRecord {
            slug: slug.to_string(),
            title: format!("Project {slug}"),
            status,
            location: "Vientiane".to_string(),
            scope: "Supervision".to_string(),
            year: "2024".to_string(),
            cover: format!("/static/images/projects/{slug}.svg"),
            summary_i18n_key: format!("projects.items.{slug}"),
            gallery: Vec::new(),
        }
    }

    fn localizer() -> Localizer {
        let mut localizer = Localizer::new(Language::English);
        localizer.insert(
            Language::English,
            Dictionary::new(json!({
                "projects": {
                    "view_details": "View details",
                    "empty": "Nothing here",
                    "error": { "load": "Could not load", "retry": "Retry" },
                    "items": { "bridge-a": "A bridge." }
                }
            })),
            DictionarySource::Network,
        );
        localizer
    }

    fn page() -> Document {
        let mut doc = Document::new();
        let main = doc.append_element(doc.body(), "main", &[]);
        doc.append_element(main, "button", &[("data-tab", "ongoing")]);
        doc.append_element(main, "button", &[("data-tab", "completed")]);
        doc.append_element(main, "div", &[("id", "project-status")]);
        doc.append_element(main, "div", &[("id", "project-grid")]);
        doc.append_element(main, "section", &[("id", "project-detail"), ("hidden", "")]);
        doc
    }

    fn catalog() -> ProjectCatalog {
        ProjectCatalog::loaded(
            ProjectCollection::new(vec![
                record("bridge-a", ProjectStatus::Ongoing),
                record("road-b", ProjectStatus::Completed),
            ])
            .unwrap(),
        )
    }

    fn card_slugs(doc: &Document, cards: &[ElementId]) -> Vec<String> {
        cards
            .iter()
            .map(|card| doc.attr(*card, "data-slug").unwrap().to_string())
            .collect()
    }

    #[test]
    fn completed_tab_renders_only_completed_records() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let mut view = ProjectsView::mount(&doc, &catalog()).unwrap();

        view.select_tab(&mut doc, &tr, ProjectStatus::Completed);
        let cards = doc.find_by_class("project-card");
        assert_eq!(card_slugs(&doc, &cards), vec!["road-b"]);
    }

    #[test]
    fn tabs_partition_the_collection() {
        let records = vec![
            record("a", ProjectStatus::Completed),
            record("b", ProjectStatus::Ongoing),
            record("c", ProjectStatus::Ongoing),
            record("d", ProjectStatus::Completed),
            record("e", ProjectStatus::Ongoing),
        ];
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let catalog = ProjectCatalog::loaded(ProjectCollection::new(records.clone()).unwrap());
        let mut view = ProjectsView::mount(&doc, &catalog).unwrap();

        let ongoing = card_slugs(&doc.clone(), &view.render(&mut doc, &tr));
        view.select_tab(&mut doc, &tr, ProjectStatus::Completed);
        let completed = card_slugs(&doc, &doc.find_by_class("project-card"));

        assert_eq!(ongoing, vec!["b", "c", "e"]);
        assert_eq!(completed, vec!["a", "d"]);
        let mut union: Vec<String> = ongoing.into_iter().chain(completed).collect();
        union.sort();
        let mut expected: Vec<String> = records.iter().map(|r| r.slug.clone()).collect();
        expected.sort();
        assert_eq!(union, expected);
    }

    #[test]
    fn show_and_hide_detail_drive_the_hash() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let mut location = Location::new("/projects");
        let mut view = ProjectsView::mount(&doc, &catalog()).unwrap();
        view.render(&mut doc, &tr);

        assert!(view.show_detail(&mut doc, &tr, &mut location, "road-b"));
        assert_eq!(location.hash.as_deref(), Some("road-b"));
        assert_eq!(view.detail(), Some("road-b"));
        // Showing a completed project does not move the ongoing tab.
        assert_eq!(view.tab(), ProjectStatus::Ongoing);
        let panel = doc.find_by_id("project-detail").unwrap();
        assert!(!doc.has_attr(panel, "hidden"));
        assert_eq!(doc.attr(panel, "data-slug"), Some("road-b"));

        view.hide_detail(&mut doc, &mut location);
        assert_eq!(location.hash, None);
        assert_eq!(view.detail(), None);
        assert!(doc.has_attr(panel, "hidden"));
        assert_eq!(view.tab(), ProjectStatus::Ongoing);
    }

    #[test]
    fn unknown_slug_changes_nothing() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let mut location = Location::new("/projects");
        let mut view = ProjectsView::mount(&doc, &catalog()).unwrap();
        view.render(&mut doc, &tr);

        assert!(!view.show_detail(&mut doc, &tr, &mut location, "nope"));
        assert_eq!(location.hash, None);
        assert_eq!(view.detail(), None);
    }

    #[test]
    fn deep_link_opens_detail_after_load() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let mut location = Location::new("/projects").with_hash("#bridge-a");
        let mut view = ProjectsView::mount(&doc, &catalog()).unwrap();
        view.render(&mut doc, &tr);

        assert!(view.open_from_location(&mut doc, &tr, &mut location));
        assert_eq!(view.detail(), Some("bridge-a"));
        assert_eq!(view.tab(), ProjectStatus::Ongoing);

        let mut missing = Location::new("/projects").with_hash("#gone");
        let mut other = ProjectsView::mount(&doc, &catalog()).unwrap();
        assert!(!other.open_from_location(&mut doc, &tr, &mut missing));
        assert_eq!(other.detail(), None);
    }

    #[test]
    fn hash_change_opens_and_closes() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let mut location = Location::new("/projects");
        let mut view = ProjectsView::mount(&doc, &catalog()).unwrap();
        view.render(&mut doc, &tr);

        location.set_hash("road-b");
        view.on_hash_change(&mut doc, &tr, &mut location);
        assert_eq!(view.detail(), Some("road-b"));
        assert_eq!(view.tab(), ProjectStatus::Completed);
        let cards = doc.find_by_class("project-card");
        assert_eq!(card_slugs(&doc, &cards), vec!["road-b"]);

        view.select_tab(&mut doc, &tr, ProjectStatus::Completed);
        assert_eq!(view.detail(), Some("road-b"));

        location.clear_hash();
        view.on_hash_change(&mut doc, &tr, &mut location);
        assert_eq!(view.detail(), None);
        assert_eq!(view.tab(), ProjectStatus::Completed);
    }

    #[test]
    fn failed_load_renders_retry_message() {
        let localizer = localizer();
        let tr = Translator::new(&localizer, Language::English);
        let mut doc = page();
        let catalog = ProjectCatalog::from_result(Err(ProjectLoadError::DuplicateSlug("x".into())));
        let view = ProjectsView::mount(&doc, &catalog).unwrap();

        assert!(view.render(&mut doc, &tr).is_empty());
        let status = doc.find_by_id("project-status").unwrap();
        assert_eq!(doc.text_content(status), "Could not loadRetry");
        assert_eq!(doc.find_first_by_attr("data-action", "retry-projects").is_some(), true);
    }

    #[test]
    fn collection_rejects_duplicates_and_unsafe_slugs() {
        let duplicate = ProjectCollection::new(vec![
            record("a", ProjectStatus::Ongoing),
            record("a", ProjectStatus::Completed),
        ]);
        assert!(matches!(duplicate, Err(ProjectLoadError::DuplicateSlug(slug)) if slug == "a"));

        let unsafe_slug = ProjectCollection::new(vec![record("Bridge A", ProjectStatus::Ongoing)]);
        assert!(matches!(unsafe_slug, Err(ProjectLoadError::Invalid { .. })));

        let mut blank = record("c", ProjectStatus::Ongoing);
        blank.title.clear();
        assert!(matches!(
            ProjectCollection::new(vec![blank]),
            Err(ProjectLoadError::Invalid { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn load_all_reads_the_collection_file() {
        let fetcher = MemoryFetcher::new().with(
            PROJECTS_PATH,
            json!({
                "projects": [{
                    "slug": "bridge-a", "title": "Bridge A", "status": "ongoing",
                    "location": "Luang Prabang", "scope": "Design", "year": "2025",
                    "cover": "/static/a.svg", "summary_i18n_key": "projects.items.bridge-a",
                    "gallery": ["/static/a1.svg"]
                }]
            })
            .to_string(),
        );
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let collection = load_all(&fetcher, &policy).await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.find("bridge-a").unwrap().gallery, vec!["/static/a1.svg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn load_all_rejects_unknown_status() {
        let fetcher = MemoryFetcher::new().with(
            PROJECTS_PATH,
            r#"{"projects":[{"slug":"x","title":"X","status":"paused","location":"L","scope":"S","year":"2020","cover":"c","summary_i18n_key":"k"}]}"#,
        );
        let result = load_all(&fetcher, &RetryPolicy::default()).await;
        assert!(matches!(result, Err(ProjectLoadError::Fetch(e)) if e.is_parse()));
    }
}
