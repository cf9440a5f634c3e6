use std::time::Duration;
use tracing::debug;

use crate::dom::{Document, ElementId, I18N_ATTR};

pub const ERROR_BANNER_KEY: &str = "errors.generic";

/// One-time notice that part of the page failed.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    dismiss_after: Duration,
    shown: Option<ElementId>,
}

impl ErrorBanner {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            shown: None,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown.is_some()
    }

    /// Insert the banner at the top of the body. Later calls do nothing
    /// and return `None`.
    pub fn show_once(&mut self, doc: &mut Document, message: &str) -> Option<ElementId> {
        if self.shown.is_some() {
            debug!("Error banner already shown");
            return None;
        }
        let banner = doc.create_element("div");
        let dismiss_ms = self.dismiss_after.as_millis().to_string();
        doc.set_attr(banner, "class", "error-banner");
        doc.set_attr(banner, "role", "alert");
        doc.set_attr(banner, "data-autodismiss-ms", &dismiss_ms);
        doc.insert_child(doc.body(), 0, banner);

        let text = doc.append_element(banner, "p", &[(I18N_ATTR, ERROR_BANNER_KEY)]);
        doc.set_text(text, message);

        self.shown = Some(banner);
        Some(banner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_shown_only_once() {
        let mut doc = Document::new();
        let mut banner = ErrorBanner::new(Duration::from_secs(6));

        let first = banner.show_once(&mut doc, "Some features may not work.");
        assert!(first.is_some());
        assert!(banner.show_once(&mut doc, "again").is_none());

        let banners = doc.find_by_class("error-banner");
        assert_eq!(banners.len(), 1);
        assert_eq!(doc.attr(banners[0], "data-autodismiss-ms"), Some("6000"));
        assert_eq!(doc.text_content(banners[0]), "Some features may not work.");
    }
}
