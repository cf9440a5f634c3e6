use std::path::{Component, Path, PathBuf};
use tracing::warn;

use crate::dom::{Document, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Stylesheet,
    AnimationLibrary,
}

/// Answers whether a referenced asset can actually be loaded.
pub trait AssetProbe: Send + Sync {
    fn exists(&self, url: &str) -> bool;
}

/// Probes assets served from the static directory.
#[derive(Debug, Clone)]
pub struct StaticDirProbe {
    root: PathBuf,
    prefix: String,
}

impl StaticDirProbe {
    /// `prefix` is the URL path the directory is mounted at, e.g. `/static`.
    pub fn new(root: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl AssetProbe for StaticDirProbe {
    fn exists(&self, url: &str) -> bool {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return true;
        }
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let Some(relative) = path.strip_prefix(&self.prefix) else {
            return false;
        };
        let relative = Path::new(relative.trim_start_matches('/'));
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return false;
        }
        self.root.join(relative).is_file()
    }
}

/// Degrade a single element whose resource failed to load. Animation
/// library failures are the motion controller's concern and are ignored here.
pub fn degrade(doc: &mut Document, element: ElementId, kind: ResourceKind) {
    match kind {
        ResourceKind::Image => {
            doc.set_attr(element, "hidden", "");
            doc.set_attr(element, "data-load-error", "image");
        }
        ResourceKind::Stylesheet => {
            doc.set_attr(element, "data-load-error", "stylesheet");
            let body = doc.body();
            doc.add_class(body, "font-fallback");
        }
        ResourceKind::AnimationLibrary => {}
    }
}

/// Records resource failures seen on a page.
#[derive(Debug, Clone, Default)]
pub struct ResourceMonitor {
    failures: Vec<(ResourceKind, String)>,
}

impl ResourceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[(ResourceKind, String)] {
        &self.failures
    }

    pub fn report(&mut self, doc: &mut Document, element: ElementId, kind: ResourceKind, url: &str) {
        warn!(url, kind = ?kind, "Resource failed to load");
        self.failures.push((kind, url.to_string()));
        degrade(doc, element, kind);
    }

    /// Check every image and stylesheet in the document against `probe`.
    pub fn scan(&mut self, doc: &mut Document, probe: &dyn AssetProbe) -> usize {
        let mut broken = Vec::new();
        for element in doc.all() {
            if doc.has_attr(element, "data-load-error") {
                continue;
            }
            let candidate = match doc.tag(element) {
                "img" => doc.attr(element, "src").map(|src| (ResourceKind::Image, src)),
                "link" if doc.attr(element, "rel") == Some("stylesheet") => doc
                    .attr(element, "href")
                    .map(|href| (ResourceKind::Stylesheet, href)),
                _ => None,
            };
            if let Some((kind, url)) = candidate {
                if !probe.exists(url) {
                    broken.push((element, kind, url.to_string()));
                }
            }
        }

        let count = broken.len();
        for (element, kind, url) in broken {
            self.report(doc, element, kind, &url);
        }
        count
    }
}
