//! Pointer gestures in progress.

use crate::elements::{Element, ElementId};
use crate::settings::DesignerSettings;
use crate::transform::{Frame, GestureOrigin, ResizeHandle, TransformResult, Viewport, drag_delta, resize_delta};
use kurbo::{Point, Size};

/// What a gesture does to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Moving the whole element.
    Drag,
    /// Dragging one of the resize handles.
    Resize(ResizeHandle),
}

/// State for a drag or resize between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub struct Gesture {
    /// The element being manipulated.
    pub element_id: ElementId,
    pub kind: GestureKind,
    /// Pointer and geometry at pointer-down.
    pub origin: GestureOrigin,
    /// Latest pointer position seen.
    pub current_pointer: Point,
    /// The element as it was before the gesture, for cancel.
    pub original: Element,
}

impl Gesture {
    /// Start a gesture on `element` with the pointer at `pointer`.
    pub fn new(element: &Element, kind: GestureKind, pointer: Point) -> Self {
        Self {
            element_id: element.id.clone(),
            kind,
            origin: GestureOrigin {
                pointer,
                position: element.position,
                size: element.size,
            },
            current_pointer: pointer,
            original: element.clone(),
        }
    }

    /// Compute the element frame for the pointer at `pointer`.
    pub fn frame_at(&self, pointer: Point, viewport: &Viewport, settings: &DesignerSettings) -> TransformResult<Frame> {
        match self.kind {
            GestureKind::Drag => {
                let position = drag_delta(&self.origin, pointer, viewport, settings.snap, settings.grid_size)?;
                Ok(Frame {
                    position,
                    size: self.origin.size,
                })
            }
            GestureKind::Resize(handle) => resize_delta(
                &self.origin,
                pointer,
                viewport,
                handle,
                Size::new(settings.min_width, settings.min_height),
            ),
        }
    }

    /// Pointer travel since pointer-down, in screen pixels.
    pub fn pointer_delta(&self) -> kurbo::Vec2 {
        self.current_pointer - self.origin.pointer
    }
}
