//! Label elements: positioned, typed content units placed in percent-of-page coordinates.

mod defaults;
mod kind;

pub use defaults::ElementDefaults;
pub use kind::{ElementCategory, ElementKind, UnknownElementKind};

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque presentation attributes, consumed by the render surface.
pub type Style = Map<String, Value>;

/// Sub-field switches of composite elements.
pub type FieldFlags = BTreeMap<String, bool>;

/// Field name -> path expression into the order record.
pub type DataMapping = BTreeMap<String, String>;

/// Unique identifier for elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(format!("element_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn default_z_index() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// A positioned, typed content unit on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Top-left corner, percent of the printable page.
    pub position: Point,
    /// Size, percent of the printable page.
    pub size: Size,
    /// Content; its meaning depends on the kind.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_mapping: Option<DataMapping>,
    /// Paint and selection order (ties broken by list order).
    #[serde(default = "default_z_index")]
    pub z_index: u32,
    /// Rotation in degrees, in [0, 360).
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Element {
    /// Create an element of `kind` at `position` from the kind's defaults.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        let defaults = kind.defaults();
        Self {
            id: ElementId::new(),
            kind,
            position: clamp_point(position),
            size: defaults.size,
            content: defaults.content,
            style: defaults.style,
            fields: defaults.fields,
            data_mapping: defaults.data_mapping,
            z_index: 1,
            rotation: 0.0,
            locked: false,
            visible: true,
            required: false,
            opacity: 1.0,
        }
    }

    /// Set the z-index (builder style).
    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index.max(1);
        self
    }

    /// Check if a sub-field is switched on. Fields without a flag are on.
    pub fn field_enabled(&self, name: &str) -> bool {
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(name))
            .is_none_or(|enabled| *enabled)
    }

    /// Merge a partial update into this element.
    ///
    /// `position`, `size` and `style` merge their own keys; every other
    /// field present in the patch replaces the current value.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(position) = &patch.position {
            if let Some(x) = position.x.filter(|x| x.is_finite()) {
                self.position.x = x.clamp(0.0, 100.0);
            }
            if let Some(y) = position.y.filter(|y| y.is_finite()) {
                self.position.y = y.clamp(0.0, 100.0);
            }
        }
        if let Some(size) = &patch.size {
            if let Some(width) = size.width.filter(|w| w.is_finite() && *w > 0.0) {
                self.size.width = width;
            }
            if let Some(height) = size.height.filter(|h| h.is_finite() && *h > 0.0) {
                self.size.height = height;
            }
        }
        if let Some(style) = &patch.style {
            for (key, value) in style {
                self.style.insert(key.clone(), value.clone());
            }
        }
        if let Some(fields) = &patch.fields {
            self.fields = Some(fields.clone());
        }
        if let Some(mapping) = &patch.data_mapping {
            self.data_mapping = Some(mapping.clone());
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index.max(1);
        }
        if let Some(rotation) = patch.rotation.filter(|r| r.is_finite()) {
            self.rotation = normalize_degrees(rotation);
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(opacity) = patch.opacity.filter(|o| o.is_finite()) {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// Normalize an angle in degrees into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

fn clamp_point(point: Point) -> Point {
    Point::new(point.x.clamp(0.0, 100.0), point.y.clamp(0.0, 100.0))
}

/// Partial position update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Partial size update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// A partial element update, as sent by property panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub position: Option<PositionPatch>,
    pub size: Option<SizePatch>,
    pub style: Option<Style>,
    pub fields: Option<FieldFlags>,
    pub data_mapping: Option<DataMapping>,
    pub z_index: Option<u32>,
    pub rotation: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub required: Option<bool>,
    pub opacity: Option<f64>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(PositionPatch {
            x: Some(position.x),
            y: Some(position.y),
        });
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(SizePatch {
            width: Some(size.width),
            height: Some(size.height),
        });
        self
    }

    /// Set a single style attribute, keeping the rest.
    pub fn style_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.style.get_or_insert_with(Style::new).insert(key.into(), value);
        self
    }

    pub fn data_mapping(mut self, mapping: DataMapping) -> Self {
        self.data_mapping = Some(mapping);
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn z_index(mut self, z_index: u32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Check if the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
