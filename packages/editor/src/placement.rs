//! Pointer-to-placement resolution.
//!
//! During a drag the pointer position over the hover target decides
//! where the dragged cell would land: on one of the four edges or
//! nested inside. The mapping is a policy behind [`PlacementPolicy`] so
//! hosts can swap the geometry without touching the engine; the stock
//! [`GridPolicy`] divides the target's bounding box into a fine grid
//! and assigns the outer band to edge placements.

use serde::{Deserialize, Serialize};

/// Where a dragged cell lands relative to the hover target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
    LeftOf,
    RightOf,
    /// Nested as a new row inside the target.
    Inside,
}

/// Pointer position in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of a hover target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pointer position relative to this box, clamped into `0.0..=1.0`.
    fn relative(&self, point: Point) -> (f64, f64) {
        let rx = if self.width > 0.0 {
            ((point.x - self.left) / self.width).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let ry = if self.height > 0.0 {
            ((point.y - self.top) / self.height).clamp(0.0, 1.0)
        } else {
            0.5
        };
        (rx, ry)
    }
}

/// Maps a pointer position over a target to a [`Placement`].
pub trait PlacementPolicy: Send + Sync {
    /// `allow_inline` reflects the target content plugin's
    /// `allow_inline_neighbours` flag: when false, horizontal
    /// placements must not be offered.
    fn resolve(&self, pointer: Point, bounds: Bounds, allow_inline: bool) -> Placement;
}

/// Default placement grid.
///
/// The target box is divided into `rows` × `cols` grid cells. With
/// inline neighbours allowed, a one-cell band along each edge maps to
/// the corresponding edge placement (nearest edge wins in the corners)
/// and everything else nests. Without inline neighbours the grid
/// collapses to a coarser vertical-only mode: a three-cell band at the
/// top and bottom maps to above/below, the middle nests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPolicy {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self { rows: 10, cols: 10 }
    }
}

impl PlacementPolicy for GridPolicy {
    fn resolve(&self, pointer: Point, bounds: Bounds, allow_inline: bool) -> Placement {
        let (rx, ry) = bounds.relative(pointer);

        if !allow_inline {
            let band = 3.0 / self.rows.max(1) as f64;
            return if ry < band {
                Placement::Above
            } else if ry > 1.0 - band {
                Placement::Below
            } else {
                Placement::Inside
            };
        }

        let vertical_band = 1.0 / self.rows.max(1) as f64;
        let horizontal_band = 1.0 / self.cols.max(1) as f64;

        // Distances to each edge, in relative units.
        let top = ry;
        let bottom = 1.0 - ry;
        let left = rx;
        let right = 1.0 - rx;

        let in_vertical_band = top < vertical_band || bottom < vertical_band;
        let in_horizontal_band = left < horizontal_band || right < horizontal_band;

        if !in_vertical_band && !in_horizontal_band {
            return Placement::Inside;
        }

        // Nearest edge wins in the corners.
        let mut nearest = (top, Placement::Above);
        for candidate in [
            (bottom, Placement::Below),
            (left, Placement::LeftOf),
            (right, Placement::RightOf),
        ] {
            if candidate.0 < nearest.0 {
                nearest = candidate;
            }
        }
        nearest.1
    }
}
