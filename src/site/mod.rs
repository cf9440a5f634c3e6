pub mod banner;
pub mod motion;
pub mod page;
pub mod pages;
pub mod projects;
pub mod resources;
pub mod router;
pub mod shell;

pub use banner::ErrorBanner;
pub use motion::{MotionController, MotionEnvironment, MotionMode, ScrollEffect};
pub use page::{Page, PageContext};
pub use projects::{ProjectCatalog, ProjectCollection, ProjectRecord, ProjectStatus, ProjectsView};
pub use resources::{AssetProbe, ResourceKind, ResourceMonitor, StaticDirProbe};
pub use router::{route, Location, PageKind, Route};
pub use shell::Shell;

use serde::de::DeserializeOwned;

use crate::dom::Document;
use crate::i18n::{Language, Localizer};

/// A localizer pinned to one language, handed to renderers.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    localizer: &'a Localizer,
    language: Language,
}

impl<'a> Translator<'a> {
    pub fn new(localizer: &'a Localizer, language: Language) -> Self {
        Self { localizer, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t(&self, key: &str) -> String {
        self.localizer.resolve(self.language, key, None)
    }

    pub fn items<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.localizer.resolve_items(self.language, key)
    }
}

/// Content rendered from data rather than bound by `data-i18n`; redrawn on
/// every language change.
pub trait LocalizedSection {
    fn rerender(&mut self, doc: &mut Document, tr: &Translator<'_>);
}
