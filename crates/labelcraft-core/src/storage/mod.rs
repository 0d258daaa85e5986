//! Storage abstraction for template persistence.

mod memory;
mod repository;
mod template;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
mod http;

pub use memory::MemoryStorage;
pub use repository::TemplateRepository;
pub use template::{Template, TemplateExport};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpStorage;

use crate::document::DocumentError;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid template: {0}")]
    Validation(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<DocumentError> for StorageError {
    fn from(e: DocumentError) -> Self {
        StorageError::Validation(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
///
/// `Send` on native targets so a server can drive storage from a
/// multi-threaded runtime.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed future for async operations (WASM version without `Send`).
#[cfg(target_arch = "wasm32")]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for template storage backends.
///
/// Implementations can store templates in memory, on the filesystem or
/// behind a remote service. Stored templates always carry an id.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a template under its id, replacing any previous version.
    fn save(&self, template: &Template) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a template.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>>;

    /// Delete a template. Returns whether it existed.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// List all templates, ordered by id.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>>;

    /// Check if a template exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for template storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a template under its id, replacing any previous version.
    fn save(&self, template: &Template) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a template.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>>;

    /// Delete a template. Returns whether it existed.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// List all templates, ordered by id.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>>;

    /// Check if a template exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// The id a template is stored under, or a validation error.
fn stored_id(template: &Template) -> StorageResult<String> {
    template
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| StorageError::Validation("template has no id".to_string()))
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
