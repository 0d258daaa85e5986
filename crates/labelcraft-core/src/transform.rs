//! Pointer-driven geometry in percent-of-page coordinates.
//!
//! Everything here is pure: the functions take the geometry captured when a
//! gesture began plus the current pointer, and return the new geometry. They
//! know nothing about documents, history or rendering.

use crate::elements::normalize_degrees;
use crate::snap::{SnapMode, snap_to_grid};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Geometry input errors. These indicate a caller defect and are never coerced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Unknown resize handle: {0:?}")]
    UnknownHandle(String),
    #[error("Invalid viewport: {width}x{height} px at scale {scale}")]
    InvalidViewport { width: f64, height: f64, scale: f64 },
    #[error("Invalid pointer position: ({x}, {y})")]
    InvalidPointer { x: f64, y: f64 },
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// One of the eight resize handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    /// Get all handles.
    pub fn all() -> &'static [ResizeHandle] {
        &[
            ResizeHandle::North,
            ResizeHandle::South,
            ResizeHandle::East,
            ResizeHandle::West,
            ResizeHandle::NorthEast,
            ResizeHandle::NorthWest,
            ResizeHandle::SouthEast,
            ResizeHandle::SouthWest,
        ]
    }

    /// Compass abbreviation (`"n"`, `"se"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::North => "n",
            ResizeHandle::South => "s",
            ResizeHandle::East => "e",
            ResizeHandle::West => "w",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::SouthWest => "sw",
        }
    }

    fn moves_west_edge(self) -> bool {
        matches!(self, ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest)
    }

    fn moves_east_edge(self) -> bool {
        matches!(self, ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast)
    }

    fn moves_north_edge(self) -> bool {
        matches!(self, ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest)
    }

    fn moves_south_edge(self) -> bool {
        matches!(self, ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ResizeHandle::all().iter().find(|handle| handle.as_str() == s) {
            Some(handle) => Ok(*handle),
            None => {
                log::error!("Rejected unknown resize handle {:?}", s);
                Err(TransformError::UnknownHandle(s.to_string()))
            }
        }
    }
}

/// How the page is currently shown on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// On-screen size of the page container, in pixels.
    pub container: Size,
    /// Preview zoom factor (1.0 = unscaled).
    pub pixel_scale: f64,
}

impl Viewport {
    pub fn new(container: Size, pixel_scale: f64) -> Self {
        Self {
            container,
            pixel_scale,
        }
    }

    fn validate(&self) -> TransformResult<()> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.container.width) && usable(self.container.height) && usable(self.pixel_scale) {
            Ok(())
        } else {
            log::error!("Rejected degenerate viewport {:?}", self);
            Err(TransformError::InvalidViewport {
                width: self.container.width,
                height: self.container.height,
                scale: self.pixel_scale,
            })
        }
    }

    /// Convert a pointer delta in screen pixels to percent of the page.
    pub fn pixels_to_percent(&self, delta: Vec2) -> TransformResult<Vec2> {
        self.validate()?;
        // Unscaled page size in pixels; the zoom cancels out of the ratio.
        let page_width = self.container.width / self.pixel_scale;
        let page_height = self.container.height / self.pixel_scale;
        Ok(Vec2::new(
            delta.x / self.pixel_scale * 100.0 / page_width,
            delta.y / self.pixel_scale * 100.0 / page_height,
        ))
    }
}

/// Pointer and element geometry captured when a gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOrigin {
    /// Pointer position in screen pixels.
    pub pointer: Point,
    /// Element position in percent.
    pub position: Point,
    /// Element size in percent.
    pub size: Size,
}

/// Position and size of an element, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Point,
    pub size: Size,
}

/// Pointer travel from `origin` to `pointer` in percent of the page.
fn travel(origin: &GestureOrigin, pointer: Point, viewport: &Viewport) -> TransformResult<Vec2> {
    let delta = viewport.pixels_to_percent(pointer - origin.pointer)?;
    if delta.x.is_finite() && delta.y.is_finite() {
        Ok(delta)
    } else {
        log::error!("Rejected pointer {:?} (gesture began at {:?})", pointer, origin.pointer);
        Err(TransformError::InvalidPointer {
            x: pointer.x,
            y: pointer.y,
        })
    }
}

/// New position for a drag from `origin` to `pointer`.
///
/// With grid snapping each axis is rounded to the nearest grid line. The
/// element always ends up fully on the page.
pub fn drag_delta(
    origin: &GestureOrigin,
    pointer: Point,
    viewport: &Viewport,
    snap: SnapMode,
    grid_size: f64,
) -> TransformResult<Point> {
    let delta = travel(origin, pointer, viewport)?;
    let mut position = origin.position + delta;
    if snap.snaps_to_grid() {
        position = snap_to_grid(position, grid_size).point;
    }
    // Clamp after snapping so rounding can never push the element off the page.
    let max_x = (100.0 - origin.size.width).max(0.0);
    let max_y = (100.0 - origin.size.height).max(0.0);
    Ok(Point::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y)))
}

/// New frame for a resize from `origin` to `pointer` using `handle`.
///
/// West/north handles move that edge and keep the opposite edge fixed;
/// east/south handles only grow or shrink the size. Growth stops at the page
/// edge and neither dimension goes below `min_size`.
pub fn resize_delta(
    origin: &GestureOrigin,
    pointer: Point,
    viewport: &Viewport,
    handle: ResizeHandle,
    min_size: Size,
) -> TransformResult<Frame> {
    let delta = travel(origin, pointer, viewport)?;

    let (x, width) = resize_axis(
        origin.position.x,
        origin.size.width,
        delta.x,
        handle.moves_west_edge(),
        handle.moves_east_edge(),
        min_size.width,
    );
    let (y, height) = resize_axis(
        origin.position.y,
        origin.size.height,
        delta.y,
        handle.moves_north_edge(),
        handle.moves_south_edge(),
        min_size.height,
    );

    Ok(Frame {
        position: Point::new(x, y),
        size: Size::new(width, height),
    })
}

/// Resize one axis. Returns the new (start, extent).
fn resize_axis(start: f64, extent: f64, delta: f64, moves_start: bool, moves_end: bool, min: f64) -> (f64, f64) {
    if moves_start {
        let end = start + extent;
        let new_start = (start + delta).max(0.0);
        let new_extent = (end - new_start).max(min);
        ((end - new_extent).max(0.0), new_extent)
    } else if moves_end {
        let new_extent = (extent + delta).min(100.0 - start).max(min);
        (start, new_extent)
    } else {
        (start, extent)
    }
}

/// Direction of a quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Rotate by a quarter turn, normalized into [0, 360).
pub fn rotate_step(current_degrees: f64, direction: RotationDirection) -> f64 {
    let step = match direction {
        RotationDirection::Clockwise => 90.0,
        RotationDirection::CounterClockwise => -90.0,
    };
    normalize_degrees(current_degrees + step)
}

/// Horizontal alignment presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

/// X position for an element of `width` aligned on the page.
pub fn align_position(alignment: HorizontalAlignment, width: f64) -> f64 {
    let x = match alignment {
        HorizontalAlignment::Left => 5.0,
        HorizontalAlignment::Center => 50.0 - width / 2.0,
        HorizontalAlignment::Right => 95.0 - width,
    };
    x.clamp(0.0, (100.0 - width).max(0.0))
}
