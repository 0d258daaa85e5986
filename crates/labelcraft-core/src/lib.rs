//! Labelcraft Core Library
//!
//! Designer state and transform core for shipping-label templates: the
//! element and document model, bounded undo/redo, pointer geometry and the
//! order-data binding resolver.

pub mod binding;
pub mod designer;
pub mod document;
pub mod elements;
pub mod gesture;
pub mod history;
pub mod settings;
pub mod snap;
pub mod storage;
pub mod transform;

pub use binding::{BindingError, DocumentBindings, PathExpr, ResolvedContent, resolve_element_content};
pub use designer::Designer;
pub use document::{Configuration, Document, DocumentError, Margins, Orientation, PaperSize};
pub use elements::{Element, ElementId, ElementKind, ElementPatch};
pub use gesture::{Gesture, GestureKind};
pub use history::History;
pub use settings::DesignerSettings;
pub use snap::{GRID_SIZE, SnapMode, SnapResult, snap_point, snap_to_grid};
pub use storage::{Storage, StorageError, StorageResult, Template, TemplateRepository};
pub use transform::{
    GestureOrigin, HorizontalAlignment, ResizeHandle, RotationDirection, TransformError, Viewport, drag_delta,
    resize_delta,
};
