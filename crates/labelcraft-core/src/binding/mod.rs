//! Data binding: projecting order records onto element content.

mod path;
mod resolve;

pub use path::{PathExpr, Segment};
pub use resolve::{
    DocumentBindings, ElementBinding, ResolvedContent, ResolvedElement, get_value, map_fields,
    resolve_array_path, resolve_element_content, stringify,
};

use thiserror::Error;

/// Binding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("Malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },
}
