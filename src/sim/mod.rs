//! Deterministic board module
//!
//! All tile arrangement logic lives here. This module must stay free of
//! rendering and platform dependencies:
//! - The matrix is the only source of truth for tile arrangement
//! - Lines are scanned in a fixed order
//! - Visual motion is delegated to an `AnimationBackend`

pub mod board;
pub mod compaction;
pub mod controller;
pub mod swap;

pub use board::{Board, BoardError, Cell, SceneGraph, Tile, TileCategory, TileId};
pub use compaction::{Direction, LineScan, SwapPair, compact_immediate, legal_swaps};
pub use controller::{CompactionReport, MoveOutcome, SwipeBoard};
pub use swap::{BusyFlag, SwapOperation, SwapProgress};
