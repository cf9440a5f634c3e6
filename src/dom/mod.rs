pub mod binder;
pub mod document;

pub use binder::{BindTarget, Binder, Binding, I18N_ATTR, I18N_TARGET_ATTR};
pub use document::{Document, ElementId};
