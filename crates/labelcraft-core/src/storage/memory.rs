//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult, Template, stored_id};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    templates: RwLock<BTreeMap<String, Template>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        let template = template.clone();
        Box::pin(async move {
            let id = stored_id(&template)?;
            let mut templates = self.templates.write().map_err(Self::lock_error)?;
            templates.insert(id, template);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(Self::lock_error)?;
            templates.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(Self::lock_error)?;
            Ok(templates.remove(&id).is_some())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>> {
        Box::pin(async move {
            let templates = self.templates.read().map_err(Self::lock_error)?;
            Ok(templates.values().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(Self::lock_error)?;
            Ok(templates.contains_key(&id))
        })
    }
}
