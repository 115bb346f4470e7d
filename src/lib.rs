//! Swipe Board - directional tile compaction for a 4x4 board
//!
//! Core modules:
//! - `gesture`: Touch start/end pairing and swipe classification
//! - `sim`: Deterministic board logic (board model, compaction, swaps)
//! - `animation`: Animation backend seam and in-crate backends
//! - `settings`: Data-driven timing and layout

pub mod animation;
pub mod gesture;
pub mod settings;
pub mod sim;

pub use animation::{AnimationBackend, AnimationError, AnimationHandle, AnimationStatus};
pub use gesture::{SwipeTracker, classify};
pub use settings::{BoardLayout, SwipeSettings};
pub use sim::{Board, Direction, SwipeBoard, Tile, TileCategory, TileId};

use glam::Vec2;

/// Board configuration constants
pub mod consts {
    /// Board is always GRID_SIZE x GRID_SIZE
    pub const GRID_SIZE: usize = 4;
    /// Number of cells on the board
    pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

    /// Per-animation duration of the chained swap (seconds)
    pub const DEFAULT_SWAP_DURATION: f32 = 0.03;
    /// Duration used by the earlier parallel-swap revision (seconds)
    pub const LEGACY_SWAP_DURATION: f32 = 0.1;

    /// Default distance between neighbouring cell centers (pixels)
    pub const DEFAULT_CELL_PITCH: f32 = 80.0;
}

/// Normalized angle to (-180, 180] degrees
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Angle of the vector from `start` to `end`, in degrees
#[inline]
pub fn swipe_angle(start: Vec2, end: Vec2) -> f32 {
    let delta = end - start;
    normalize_degrees(delta.y.atan2(delta.x).to_degrees())
}
