use tracing::debug;

use crate::dom::{Document, ElementId};
use crate::i18n::{Language, Localizer};

/// Attribute carrying the dotted translation key.
pub const I18N_ATTR: &str = "data-i18n";
/// Optional companion attribute naming the attribute to write into.
pub const I18N_TARGET_ATTR: &str = "data-i18n-attr";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    Text,
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element: ElementId,
    pub key: String,
    pub target: BindTarget,
}

/// Index of every translation-marked element in a document.
///
/// Built once per document; [`Binder::apply`] then writes resolved strings
/// without re-scanning the tree.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    bindings: Vec<Binding>,
}

impl Binder {
    pub fn index(doc: &Document) -> Self {
        let bindings = doc
            .find_all_by_attr(I18N_ATTR)
            .into_iter()
            .filter_map(|element| {
                let key = doc.attr(element, I18N_ATTR)?.trim();
                if key.is_empty() {
                    return None;
                }
                let target = match doc.attr(element, I18N_TARGET_ATTR).map(str::trim) {
                    Some(attr) if !attr.is_empty() => BindTarget::Attribute(attr.to_string()),
                    _ => BindTarget::Text,
                };
                Some(Binding {
                    element,
                    key: key.to_string(),
                    target,
                })
            })
            .collect();

        Self { bindings }
    }

    /// Rebuilds the index after markup was added or removed.
    pub fn reindex(&mut self, doc: &Document) {
        *self = Self::index(doc);
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Writes the resolved value of every binding into the document and
    /// returns how many elements were updated.
    pub fn apply(&self, doc: &mut Document, localizer: &Localizer, language: Language) -> usize {
        let mut applied = 0;
        for binding in &self.bindings {
            if !doc.is_attached(binding.element) {
                continue;
            }
            let value = localizer.resolve(language, &binding.key, None);
            match &binding.target {
                BindTarget::Text => doc.set_text(binding.element, &value),
                BindTarget::Attribute(name) => doc.set_attr(binding.element, name, &value),
            }
            applied += 1;
        }
        debug!(applied, language = %language, "Applied translations to document");
        applied
    }
}
