//! Label document: page configuration plus the ordered element list.

use crate::elements::{Element, ElementId, ElementKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Element list as stored in history snapshots.
///
/// Elements are shared between snapshots and copied on write, so a commit
/// costs one pointer per element while every snapshot stays independent.
pub type ElementSnapshot = Vec<Arc<Element>>;

/// Document integrity errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Duplicate element ids: {}", join_ids(.0))]
    DuplicateIds(Vec<ElementId>),
}

fn join_ids(ids: &[ElementId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

/// Named paper presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    A6,
    #[serde(rename = "LETTER")]
    Letter,
    /// Standard 100x150 mm cargo label.
    #[default]
    #[serde(rename = "LABEL_100x150")]
    Label100x150,
    #[serde(rename = "LABEL_100x100")]
    Label100x100,
    #[serde(rename = "LABEL_80x50")]
    Label80x50,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl PaperSize {
    /// Portrait dimensions in millimetres (`None` for custom).
    pub fn dimensions_mm(&self) -> Option<Size> {
        let (w, h) = match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::A6 => (105.0, 148.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Label100x150 => (100.0, 150.0),
            PaperSize::Label100x100 => (100.0, 100.0),
            PaperSize::Label80x50 => (80.0, 50.0),
            PaperSize::Custom => return None,
        };
        Some(Size::new(w, h))
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

/// Fallback sheet size for a custom paper size without dimensions.
const CUSTOM_FALLBACK_MM: Size = Size::new(100.0, 150.0);

/// Page-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    /// Sheet size in millimetres; only read when `paper_size` is custom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dimensions: Option<Size>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: "Shipping Label".to_string(),
            paper_size: PaperSize::default(),
            orientation: Orientation::default(),
            margins: Margins::default(),
            custom_dimensions: None,
        }
    }
}

impl Configuration {
    /// Sheet size in millimetres with orientation applied.
    pub fn page_dimensions(&self) -> Size {
        let portrait = match self.paper_size {
            PaperSize::Custom => self
                .custom_dimensions
                .filter(|s| s.width > 0.0 && s.height > 0.0)
                .unwrap_or(CUSTOM_FALLBACK_MM),
            preset => preset.dimensions_mm().unwrap_or(CUSTOM_FALLBACK_MM),
        };
        match self.orientation {
            Orientation::Portrait => portrait,
            Orientation::Landscape => Size::new(portrait.height, portrait.width),
        }
    }

    /// Size in millimetres of the area inside the margins.
    ///
    /// Element percentages are relative to this area.
    pub fn printable_area(&self) -> Size {
        let page = self.page_dimensions();
        Size::new(
            (page.width - self.margins.left - self.margins.right).max(0.0),
            (page.height - self.margins.top - self.margins.bottom).max(0.0),
        )
    }
}

/// A label document: configuration plus ordered elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub config: Configuration,
    /// Elements in insertion order (the z-stack fallback).
    #[serde(default)]
    elements: ElementSnapshot,
}

impl Document {
    /// Create an empty document.
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            elements: Vec::new(),
        }
    }

    /// Create a document from owned elements.
    pub fn with_elements(config: Configuration, elements: Vec<Element>) -> Self {
        Self {
            config,
            elements: elements.into_iter().map(Arc::new).collect(),
        }
    }

    /// Get elements in list order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().map(|element| element.as_ref())
    }

    /// Clone the elements out of the document.
    pub fn to_elements(&self) -> Vec<Element> {
        self.elements().cloned().collect()
    }

    /// Get elements back to front: by z-index, ties by list order.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements().collect();
        // stable sort keeps insertion order among equal z-indices
        ordered.sort_by_key(|element| element.z_index);
        ordered
    }

    /// Get an element by ID.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements().find(|element| &element.id == id)
    }

    /// Get a mutable reference to an element by ID.
    ///
    /// Copies the element first if a history snapshot still shares it.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|element| &element.id == id)
            .map(Arc::make_mut)
    }

    /// Position of an element in the list.
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|element| &element.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(Arc::new(element));
    }

    /// Remove an element, returning it.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);
        Some(Arc::unwrap_or_clone(element))
    }

    /// Move `active` to the list position of `over`, shifting the rest.
    /// Returns false if either ID is missing.
    pub fn reorder(&mut self, active: &ElementId, over: &ElementId) -> bool {
        let (Some(from), Some(to)) = (self.index_of(active), self.index_of(over)) else {
            return false;
        };
        if from != to {
            let element = self.elements.remove(from);
            self.elements.insert(to, element);
        }
        true
    }

    /// Highest z-index in use (0 when empty).
    pub fn max_z_index(&self) -> u32 {
        self.elements().map(|element| element.z_index).max().unwrap_or(0)
    }

    /// Renumber z-indices 1..=n in paint order.
    ///
    /// Keeps the stacking and frees the top of the `u32` range.
    pub fn compact_z_indices(&mut self) {
        let order: Vec<ElementId> = self.paint_order().into_iter().map(|element| element.id.clone()).collect();
        for (z_index, id) in (1u32..).zip(&order) {
            if self.get(id).is_some_and(|element| element.z_index != z_index) {
                if let Some(element) = self.get_mut(id) {
                    element.z_index = z_index;
                }
            }
        }
    }

    /// IDs that occur more than once.
    pub fn duplicate_ids(&self) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for element in self.elements() {
            if !seen.insert(&element.id) && !duplicates.contains(&element.id) {
                duplicates.push(element.id.clone());
            }
        }
        duplicates
    }

    /// Check that every element id is unique.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let duplicates = self.duplicate_ids();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::DuplicateIds(duplicates))
        }
    }

    /// Snapshot the element list for history.
    pub fn snapshot(&self) -> ElementSnapshot {
        self.elements.clone()
    }

    /// Replace the element list with a snapshot.
    pub fn restore(&mut self, snapshot: &ElementSnapshot) {
        self.elements = snapshot.clone();
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The layout a new, empty document is seeded with.
pub fn starter_elements() -> Vec<Element> {
    [
        (ElementKind::Header, Point::new(5.0, 2.0)),
        (ElementKind::Recipient, Point::new(5.0, 14.0)),
        (ElementKind::OrderSummary, Point::new(5.0, 40.0)),
        (ElementKind::Footer, Point::new(5.0, 90.0)),
    ]
    .into_iter()
    .zip(1..)
    .map(|((kind, position), z_index)| Element::new(kind, position).with_z_index(z_index))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_at(x: f64, y: f64) -> Element {
        Element::new(ElementKind::Text, Point::new(x, y))
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::default();
        assert!(doc.is_empty());
        assert_eq!(doc.max_z_index(), 0);
    }

    #[test]
    fn test_push_and_remove() {
        let mut doc = Document::default();
        let element = text_at(0.0, 0.0);
        let id = element.id.clone();
        doc.push(element);
        assert_eq!(doc.len(), 1);
        assert!(doc.get(&id).is_some());

        let removed = doc.remove(&id);
        assert!(removed.is_some());
        assert!(doc.is_empty());
        assert!(doc.remove(&id).is_none());
    }

    #[test]
    fn test_reorder_splices() {
        let mut doc = Document::default();
        let elements: Vec<Element> = (0..4).map(|i| text_at(i as f64, 0.0)).collect();
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id.clone()).collect();
        for element in elements {
            doc.push(element);
        }

        assert!(doc.reorder(&ids[0], &ids[2]));
        let order: Vec<&ElementId> = doc.elements().map(|e| &e.id).collect();
        assert_eq!(order, vec![&ids[1], &ids[2], &ids[0], &ids[3]]);

        assert!(doc.reorder(&ids[3], &ids[1]));
        let order: Vec<&ElementId> = doc.elements().map(|e| &e.id).collect();
        assert_eq!(order, vec![&ids[3], &ids[1], &ids[2], &ids[0]]);
    }

    #[test]
    fn test_reorder_missing_is_noop() {
        let mut doc = Document::default();
        let element = text_at(0.0, 0.0);
        let id = element.id.clone();
        doc.push(element);
        assert!(!doc.reorder(&id, &ElementId::from("missing")));
        assert!(!doc.reorder(&ElementId::from("missing"), &id));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_paint_order_ties_by_insertion() {
        let mut doc = Document::default();
        let a = text_at(0.0, 0.0).with_z_index(2);
        let b = text_at(0.0, 0.0).with_z_index(1);
        let c = text_at(0.0, 0.0).with_z_index(2);
        let ids = [a.id.clone(), b.id.clone(), c.id.clone()];
        doc.push(a);
        doc.push(b);
        doc.push(c);
        let order: Vec<&ElementId> = doc.paint_order().into_iter().map(|e| &e.id).collect();
        assert_eq!(order, vec![&ids[1], &ids[0], &ids[2]]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut doc = Document::default();
        let element = text_at(10.0, 10.0);
        let id = element.id.clone();
        doc.push(element);

        let snapshot = doc.snapshot();
        doc.get_mut(&id).unwrap().content = "changed".into();

        assert_eq!(snapshot[0].content, "Text");
        doc.restore(&snapshot);
        assert_eq!(doc.get(&id).unwrap().content, "Text");
    }

    #[test]
    fn test_duplicate_ids() {
        let element = text_at(0.0, 0.0);
        let doc = Document::with_elements(
            Configuration::default(),
            vec![element.clone(), element.clone(), text_at(1.0, 1.0)],
        );
        assert_eq!(doc.duplicate_ids(), vec![element.id.clone()]);
        assert_eq!(doc.validate(), Err(DocumentError::DuplicateIds(vec![element.id])));
        assert!(Document::with_elements(Configuration::default(), starter_elements()).validate().is_ok());
    }

    #[test]
    fn test_compact_z_indices_keeps_stacking() {
        let top = text_at(0.0, 0.0).with_z_index(u32::MAX);
        let low = text_at(0.0, 0.0).with_z_index(7);
        let tied = text_at(0.0, 0.0).with_z_index(7);
        let ids = [top.id.clone(), low.id.clone(), tied.id.clone()];
        let mut doc = Document::with_elements(Configuration::default(), vec![top, low, tied]);

        doc.compact_z_indices();
        let order: Vec<(&ElementId, u32)> = doc.paint_order().into_iter().map(|e| (&e.id, e.z_index)).collect();
        assert_eq!(order, vec![(&ids[1], 1), (&ids[2], 2), (&ids[0], 3)]);
        assert_eq!(doc.max_z_index(), 3);
    }

    #[test]
    fn test_page_dimensions() {
        let mut config = Configuration {
            paper_size: PaperSize::A4,
            ..Default::default()
        };
        assert_eq!(config.page_dimensions(), Size::new(210.0, 297.0));
        config.orientation = Orientation::Landscape;
        assert_eq!(config.page_dimensions(), Size::new(297.0, 210.0));

        config.paper_size = PaperSize::Custom;
        config.orientation = Orientation::Portrait;
        assert_eq!(config.page_dimensions(), Size::new(100.0, 150.0));
        config.custom_dimensions = Some(Size::new(60.0, 40.0));
        assert_eq!(config.page_dimensions(), Size::new(60.0, 40.0));
        assert_eq!(config.printable_area(), Size::new(50.0, 30.0));
    }

    #[test]
    fn test_configuration_json() {
        let config: Configuration = serde_json::from_str(
            r#"{ "name": "Cargo", "paperSize": "LABEL_100x150", "orientation": "landscape",
                 "margins": { "top": 2, "bottom": 2, "left": 3, "right": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.paper_size, PaperSize::Label100x150);
        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(config.margins.left, 3.0);
        assert!(config.custom_dimensions.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let doc = Document::with_elements(Configuration::default(), starter_elements());
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_starter_layout() {
        let elements = starter_elements();
        let kinds: Vec<ElementKind> = elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Header, ElementKind::Recipient, ElementKind::OrderSummary, ElementKind::Footer]
        );
        let z: Vec<u32> = elements.iter().map(|e| e.z_index).collect();
        assert_eq!(z, vec![1, 2, 3, 4]);
    }
}
