//! Grid snapping in percent-of-page coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Grid size for snapping, in percent of the page.
pub const GRID_SIZE: f64 = 5.0;

/// Snap mode for aligning dragged elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap positions to grid lines.
    Grid,
}

impl SnapMode {
    /// Toggle between the two modes.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        self == SnapMode::Grid
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate moved.
    pub snapped_x: bool,
    /// Whether the Y coordinate moved.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round a single coordinate to the nearest grid line.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    let x = snap_value(point.x, grid_size);
    let y = snap_value(point.y, grid_size);
    SnapResult {
        point: Point::new(x, y),
        snapped_x: x != point.x,
        snapped_y: y != point.y,
    }
}

/// Snap a point according to `mode`.
pub fn snap_point(point: Point, mode: SnapMode, grid_size: f64) -> SnapResult {
    match mode {
        SnapMode::None => SnapResult::none(point),
        SnapMode::Grid => snap_to_grid(point, grid_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(12.4, 17.6), GRID_SIZE);
        assert_eq!(result.point, Point::new(10.0, 20.0));
        assert!(result.is_snapped());
    }

    #[test]
    fn test_already_on_grid() {
        let result = snap_to_grid(Point::new(15.0, 30.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(15.0, 30.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_mode_none() {
        let point = Point::new(12.4, 17.6);
        assert_eq!(snap_point(point, SnapMode::None, GRID_SIZE).point, point);
    }

    #[test]
    fn test_degenerate_grid_is_identity() {
        assert_eq!(snap_value(12.3, 0.0), 12.3);
        assert_eq!(snap_value(12.3, f64::NAN), 12.3);
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);
        assert_eq!(SnapMode::Grid.next(), SnapMode::None);
        assert!(SnapMode::Grid.snaps_to_grid());
    }
}
