//! Persisted template shape, validation and file import/export.

use super::{StorageError, StorageResult};
use crate::document::{Configuration, Document};
use crate::elements::Element;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Name given to imported files that carry none.
const IMPORTED_NAME: &str = "Imported Template";

/// A saved label document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub config: Configuration,
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set on templates that came in through [`Template::import`].
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub imported: bool,
}

/// A template serialized for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExport {
    /// Suggested file name, e.g. `cargo-label.json`.
    pub file_name: String,
    /// Pretty-printed JSON.
    pub contents: String,
}

impl Template {
    /// Create an unsaved template.
    pub fn new(name: impl Into<String>, config: Configuration, elements: Vec<Element>) -> Self {
        Self {
            id: None,
            name: name.into(),
            config,
            elements,
            created_at: None,
            updated_at: None,
            imported: false,
        }
    }

    /// Capture a document.
    pub fn from_document(name: impl Into<String>, document: &Document) -> Self {
        Self::new(name, document.config.clone(), document.to_elements())
    }

    /// Build a document from this template.
    pub fn to_document(&self) -> Document {
        Document::with_elements(self.config.clone(), self.elements.clone())
    }

    /// Generate a fresh template id.
    pub fn new_id() -> String {
        format!("template_{}", Uuid::new_v4().simple())
    }

    /// Check the template can be saved.
    pub fn validate(&self) -> StorageResult<()> {
        if self.name.trim().is_empty() {
            return Err(StorageError::Validation("name is required".to_string()));
        }
        self.to_document().validate()?;
        Ok(())
    }

    /// Assign an id and creation time if missing, and bump the update time.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        if self.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            self.id = Some(Self::new_id());
        }
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
    }

    /// Serialize for download.
    pub fn export(&self) -> StorageResult<TemplateExport> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(TemplateExport {
            file_name: format!("{}.json", file_stem(&self.name)),
            contents,
        })
    }

    /// Parse an exported file.
    ///
    /// `config` and `elements` are required and element ids must be unique.
    /// The result gets a fresh id and is marked as imported.
    pub fn import(content: &str) -> StorageResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| StorageError::Validation(format!("not a JSON template: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(StorageError::Validation("template must be a JSON object".to_string()));
        };
        for key in ["config", "elements"] {
            if !object.contains_key(key) {
                return Err(StorageError::Validation(format!("missing `{key}`")));
            }
        }

        let mut template: Template =
            serde_json::from_value(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        template.to_document().validate()?;
        template.id = Some(Self::new_id());
        template.imported = true;
        if template.name.trim().is_empty() {
            template.name = IMPORTED_NAME.to_string();
        }
        Ok(template)
    }
}

/// Lowercase, dash-separated file stem for a template name.
fn file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    if stem.is_empty() { "template".to_string() } else { stem.to_string() }
}
