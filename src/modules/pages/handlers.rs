use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::app_state::AppState;
use crate::i18n::{I18n, Language, LanguagePreference};
use crate::site::{
    Location, MotionEnvironment, Page, PageContext, PageKind, ProjectCatalog, ProjectStatus,
};
use crate::storage::CookieStorage;

pub const REDUCED_MOTION_HINT: &str = "sec-ch-prefers-reduced-motion";

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate {
    lang: String,
    html_class: String,
    body_class: String,
    head: String,
    body: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    lang: String,
    site_name: String,
    title: String,
    message: String,
    home_label: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub tab: Option<String>,
    pub retry: Option<bool>,
}

fn prefers_reduced_motion(headers: &HeaderMap) -> bool {
    headers
        .get(REDUCED_MOTION_HINT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().eq_ignore_ascii_case("reduce"))
        .unwrap_or(false)
}

/// Run the page pipeline and wrap the result in the layout.
fn render_page(
    state: &AppState,
    catalog: &ProjectCatalog,
    kind: PageKind,
    language: Language,
    location: Location,
    tab: ProjectStatus,
    headers: &HeaderMap,
) -> Response {
    let preference = LanguagePreference::new(Arc::new(CookieStorage::from_headers(headers)));
    let ctx = PageContext {
        localizer: &state.localizer,
        preference,
        language,
        location,
        catalog,
        tab,
        base_url: &state.env.app.base_url,
        motion: MotionEnvironment {
            library_available: state.env.ui.motion_library_enabled,
            reduced_motion: prefers_reduced_motion(headers),
        },
        banner_dismiss: state.env.ui.banner_dismiss,
        probe: Some(state.probe.as_ref()),
    };
    let page = Page::build(kind, ctx);
    debug!(page = kind.slug(), language = %language, "Rendering page");

    let doc = page.document();
    let template = LayoutTemplate {
        lang: page.language().code().to_string(),
        html_class: doc.attr(doc.html(), "class").unwrap_or_default().to_string(),
        body_class: doc.attr(doc.body(), "class").unwrap_or_default().to_string(),
        head: page.head_html(),
        body: page.body_html(),
    };
    let mut response = HtmlTemplate(template).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_LANGUAGE, HeaderValue::from_static(language.code()));
    headers.insert(header::VARY, HeaderValue::from_static("Cookie, Accept-Language"));
    response
}

async fn simple_page(state: AppState, i18n: I18n, headers: HeaderMap, kind: PageKind) -> Response {
    let catalog = state.catalog().await;
    render_page(
        &state,
        &catalog,
        kind,
        i18n.language(),
        Location::new(kind.path()),
        ProjectStatus::default(),
        &headers,
    )
}

pub async fn home_page(State(state): State<AppState>, i18n: I18n, headers: HeaderMap) -> Response {
    simple_page(state, i18n, headers, PageKind::Home).await
}

pub async fn about_page(State(state): State<AppState>, i18n: I18n, headers: HeaderMap) -> Response {
    simple_page(state, i18n, headers, PageKind::About).await
}

pub async fn contact_page(State(state): State<AppState>, i18n: I18n, headers: HeaderMap) -> Response {
    simple_page(state, i18n, headers, PageKind::Contact).await
}

pub async fn projects_page(
    State(state): State<AppState>,
    i18n: I18n,
    Query(query): Query<ProjectsQuery>,
    headers: HeaderMap,
) -> Response {
    let mut catalog = state.catalog().await;
    if query.retry.unwrap_or(false) && catalog.is_failed() {
        info!("Retrying project collection load");
        catalog = state.reload_projects().await;
    }
    let tab = query
        .tab
        .as_deref()
        .and_then(|tab| tab.parse::<ProjectStatus>().ok())
        .unwrap_or_default();

    render_page(
        &state,
        &catalog,
        PageKind::Projects,
        i18n.language(),
        Location::new(PageKind::Projects.path()),
        tab,
        &headers,
    )
}

/// Server-side form of the `#slug` deep link: the detail is rendered open.
pub async fn project_detail_page(
    State(state): State<AppState>,
    i18n: I18n,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let catalog = state.catalog().await;
    let tab = catalog
        .collection()
        .find(&slug)
        .map(|project| project.status)
        .unwrap_or_default();
    let location = Location::new(&format!("/projects/{slug}")).with_hash(&slug);

    render_page(&state, &catalog, PageKind::Projects, i18n.language(), location, tab, &headers)
}

pub async fn not_found_page(i18n: I18n) -> impl IntoResponse {
    let template = NotFoundTemplate {
        lang: i18n.language().code().to_string(),
        site_name: i18n.get("site.name"),
        title: i18n.get("errors.not_found.title"),
        message: i18n.get("errors.not_found.message"),
        home_label: i18n.get("nav.home"),
    };
    (StatusCode::NOT_FOUND, HtmlTemplate(template))
}
