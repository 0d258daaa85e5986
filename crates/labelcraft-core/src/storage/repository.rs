//! Remote-first template repository with a local mirror.

use super::{Storage, StorageError, StorageResult, Template, TemplateExport};
use chrono::Utc;
use std::sync::Arc;

/// Template persistence as the designer sees it.
///
/// Reads try the remote store first and fall back to the local one; writes
/// go to both so that later reads succeed offline. An operation only fails
/// with [`StorageError::Unavailable`] when neither store could serve it.
#[derive(Clone)]
pub struct TemplateRepository {
    remote: Option<Arc<dyn Storage>>,
    local: Arc<dyn Storage>,
}

impl TemplateRepository {
    /// Create a repository backed only by local storage.
    pub fn new(local: Arc<dyn Storage>) -> Self {
        Self { remote: None, local }
    }

    /// Create a repository with a remote store and a local mirror.
    pub fn with_remote(remote: Arc<dyn Storage>, local: Arc<dyn Storage>) -> Self {
        Self {
            remote: Some(remote),
            local,
        }
    }

    /// List saved templates.
    pub async fn list(&self) -> StorageResult<Vec<Template>> {
        let remote_error = match &self.remote {
            Some(remote) => match remote.list().await {
                Ok(templates) => return Ok(templates),
                Err(e) => {
                    log::warn!("Remote list failed, using local templates: {}", e);
                    Some(e)
                }
            },
            None => None,
        };
        self.local.list().await.map_err(|e| unavailable("list", remote_error, e))
    }

    /// Get a template by id; `None` if no store has it.
    pub async fn get(&self, id: &str) -> StorageResult<Option<Template>> {
        let mut remote_error = None;
        if let Some(remote) = &self.remote {
            match remote.load(id).await {
                Ok(template) => return Ok(Some(template)),
                Err(StorageError::NotFound(_)) => {}
                Err(e) => {
                    log::warn!("Remote load of {} failed, using local copy: {}", id, e);
                    remote_error = Some(e);
                }
            }
        }
        match self.local.load(id).await {
            Ok(template) => Ok(Some(template)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(unavailable("get", remote_error, e)),
        }
    }

    /// Validate, stamp and store a template. Returns the stored version.
    pub async fn save(&self, mut template: Template) -> StorageResult<Template> {
        template.validate()?;
        template.stamp(Utc::now());

        let remote_result = match &self.remote {
            Some(remote) => Some(remote.save(&template).await),
            None => None,
        };
        let local_result = self.local.save(&template).await;

        match (remote_result, local_result) {
            (Some(Err(remote)), Err(local)) => Err(unavailable("save", Some(remote), local)),
            (None, Err(local)) => Err(unavailable("save", None, local)),
            (Some(Ok(())), Err(local)) => {
                log::warn!("Local mirror of {:?} failed: {}", template.id, local);
                Ok(template)
            }
            (Some(Err(remote)), Ok(())) => {
                log::warn!("Remote save of {:?} failed, kept locally: {}", template.id, remote);
                Ok(template)
            }
            (_, Ok(())) => Ok(template),
        }
    }

    /// Delete a template everywhere. Returns whether any store had it.
    pub async fn delete(&self, id: &str) -> StorageResult<bool> {
        let remote_result = match &self.remote {
            Some(remote) => remote.delete(id).await,
            None => Ok(false),
        };
        let local_result = self.local.delete(id).await;

        match (remote_result, local_result) {
            (Ok(remote), Ok(local)) => Ok(remote || local),
            (Ok(remote), Err(e)) => {
                log::warn!("Local delete of {} failed: {}", id, e);
                Ok(remote)
            }
            (Err(e), Ok(local)) => {
                log::warn!("Remote delete of {} failed: {}", id, e);
                Ok(local)
            }
            (Err(remote), Err(local)) => Err(unavailable("delete", Some(remote), local)),
        }
    }

    /// Serialize a template for download.
    pub fn export(&self, template: &Template) -> StorageResult<TemplateExport> {
        template.export()
    }

    /// Parse an exported file and save it as a new template.
    pub async fn import(&self, content: &str) -> StorageResult<Template> {
        let template = Template::import(content)?;
        self.save(template).await
    }
}

fn unavailable(operation: &str, remote: Option<StorageError>, local: StorageError) -> StorageError {
    match remote {
        Some(remote) => StorageError::Unavailable(format!("{operation}: remote: {remote}; local: {local}")),
        None => StorageError::Unavailable(format!("{operation}: {local}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Configuration, starter_elements};
    use crate::storage::{BoxFuture, MemoryStorage, block_on};

    /// A store that is never reachable.
    struct Offline;

    impl Offline {
        fn fail<T: Send + 'static>() -> BoxFuture<'static, StorageResult<T>> {
            Box::pin(async { Err(StorageError::Io("connection refused".to_string())) })
        }
    }

    impl Storage for Offline {
        fn save(&self, _template: &Template) -> BoxFuture<'_, StorageResult<()>> {
            Self::fail()
        }

        fn load(&self, _id: &str) -> BoxFuture<'_, StorageResult<Template>> {
            Self::fail()
        }

        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Self::fail()
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>> {
            Self::fail()
        }

        fn exists(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Self::fail()
        }
    }

    fn template() -> Template {
        Template::new("Cargo", Configuration::default(), starter_elements())
    }

    #[test]
    fn test_save_assigns_id_and_mirrors() {
        let remote = Arc::new(MemoryStorage::new());
        let local = Arc::new(MemoryStorage::new());
        let repo = TemplateRepository::with_remote(remote.clone(), local.clone());

        let saved = block_on(repo.save(template())).unwrap();
        let id = saved.id.clone().unwrap();
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);
        assert!(block_on(remote.exists(&id)).unwrap());
        assert!(block_on(local.exists(&id)).unwrap());
    }

    #[test]
    fn test_validation_happens_before_io() {
        let local = Arc::new(MemoryStorage::new());
        let repo = TemplateRepository::new(local.clone());
        let mut t = template();
        t.name.clear();

        let result = block_on(repo.save(t));
        assert!(matches!(result, Err(StorageError::Validation(_))));
        assert!(block_on(local.list()).unwrap().is_empty());
    }

    #[test]
    fn test_offline_remote_falls_back() {
        let local = Arc::new(MemoryStorage::new());
        let repo = TemplateRepository::with_remote(Arc::new(Offline), local);

        let saved = block_on(repo.save(template())).unwrap();
        let id = saved.id.clone().unwrap();

        assert_eq!(block_on(repo.list()).unwrap().len(), 1);
        assert_eq!(block_on(repo.get(&id)).unwrap(), Some(saved));
        assert_eq!(block_on(repo.get("missing")).unwrap(), None);
        assert!(block_on(repo.delete(&id)).unwrap());
        assert!(!block_on(repo.delete(&id)).unwrap());
    }

    #[test]
    fn test_both_stores_down_is_unavailable() {
        let repo = TemplateRepository::with_remote(Arc::new(Offline), Arc::new(Offline));
        assert!(matches!(block_on(repo.save(template())), Err(StorageError::Unavailable(_))));
        assert!(matches!(block_on(repo.list()), Err(StorageError::Unavailable(_))));
        assert!(matches!(block_on(repo.get("x")), Err(StorageError::Unavailable(_))));
        assert!(matches!(block_on(repo.delete("x")), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_get_prefers_remote_then_local() {
        let remote = Arc::new(MemoryStorage::new());
        let local = Arc::new(MemoryStorage::new());
        let mut only_local = template();
        only_local.id = Some("local-only".into());
        block_on(local.save(&only_local)).unwrap();

        let repo = TemplateRepository::with_remote(remote, local);
        assert_eq!(block_on(repo.get("local-only")).unwrap(), Some(only_local));
    }

    #[test]
    fn test_import_saves_copy() {
        let repo = TemplateRepository::new(Arc::new(MemoryStorage::new()));
        let original = block_on(repo.save(template())).unwrap();
        let export = repo.export(&original).unwrap();

        let imported = block_on(repo.import(&export.contents)).unwrap();
        assert!(imported.imported);
        assert_ne!(imported.id, original.id);
        assert_eq!(block_on(repo.list()).unwrap().len(), 2);
    }
}
