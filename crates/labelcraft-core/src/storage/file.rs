//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult, Template, stored_id};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Stores each template as a JSON file named after its id.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for template storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/labelcraft/templates/`
    /// On Windows: `%LOCALAPPDATA%\labelcraft\templates\`
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_path()?)
    }

    /// The default template directory.
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("labelcraft").join("templates"))
    }

    /// Get the file path for a template ID.
    fn template_path(&self, id: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_template(path: &Path) -> StorageResult<Template> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&json)
        .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))
}

impl Storage for FileStorage {
    fn save(&self, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        let prepared = stored_id(template).and_then(|id| {
            let json = serde_json::to_string_pretty(template).map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok((self.template_path(&id), json))
        });

        Box::pin(async move {
            let (path, json) = prepared?;
            fs::write(&path, json).map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let path = self.template_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }
            read_template(&path)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.template_path(id);

        Box::pin(async move {
            if !path.exists() {
                return Ok(false);
            }
            fs::remove_file(&path)
                .map_err(|e| StorageError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;
            Ok(true)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries =
                fs::read_dir(&base).map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut templates = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                // Only include .json files
                if path.extension().is_none_or(|e| e != "json") {
                    continue;
                }
                match read_template(&path) {
                    Ok(template) => templates.push(template),
                    Err(e) => log::warn!("Skipping unreadable template: {}", e),
                }
            }
            templates.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(templates)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.template_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Configuration, starter_elements};
    use crate::storage::block_on;
    use tempfile::tempdir;

    fn template(id: &str) -> Template {
        let mut template = Template::new("Test Template", Configuration::default(), starter_elements());
        template.id = Some(id.to_string());
        template
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let t = template("test-doc");
        block_on(storage.save(&t)).unwrap();
        let loaded = block_on(storage.load("test-doc")).unwrap();

        assert_eq!(loaded, t);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save(&template("doc2"))).unwrap();
        block_on(storage.save(&template("doc1"))).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let ids: Vec<String> = block_on(storage.list())
            .unwrap()
            .into_iter()
            .filter_map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["doc1".to_string(), "doc2".to_string()]);
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save(&template("test"))).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        assert!(block_on(storage.delete("test")).unwrap());
        assert!(!block_on(storage.exists("test")).unwrap());
        assert!(!block_on(storage.delete("test")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        // ID with special characters should be sanitized
        let t = template("test/doc:with*special");
        block_on(storage.save(&t)).unwrap();

        // Should still be loadable with the same ID
        let loaded = block_on(storage.load("test/doc:with*special")).unwrap();
        assert_eq!(loaded.id, t.id);
        assert!(dir.path().join("test_doc_with_special.json").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert_eq!(storage.base_path(), nested.as_path());
        assert!(nested.is_dir());
    }
}
