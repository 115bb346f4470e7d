//! Chained swap animations
//!
//! A swap moves the first tile onto the second tile's position, and only
//! once that animation has finished moves the second tile onto the first
//! tile's captured position. The matrix is updated when the second move
//! finishes. A cell without a tile contributes no animation.

use glam::Vec2;

use super::board::{Board, Cell};
use super::compaction::SwapPair;
use super::TileId;
use crate::animation::{AnimationBackend, AnimationError, AnimationHandle, AnimationStatus};

/// Board-wide "compaction in flight" flag
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusyFlag(bool);

impl BusyFlag {
    /// Set the flag; returns true if it was previously clear
    pub fn raise(&mut self) -> bool {
        !std::mem::replace(&mut self.0, true)
    }

    pub fn release(&mut self) {
        self.0 = false;
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0
    }
}

/// Progress of one swap
#[derive(Debug, Clone, PartialEq)]
pub enum SwapProgress {
    /// An animation is still running
    Pending,
    /// Both moves finished and the matrix has been updated
    Resolved,
    /// The swap was abandoned; the matrix is unchanged and both tiles are back
    /// on their captured positions
    Failed(AnimationError),
}

#[derive(Debug, Clone, Copy)]
struct TileMove {
    tile: TileId,
    cell: Cell,
    from: Vec2,
    to: Vec2,
}

/// One pending exchange between two cells
#[derive(Debug, Clone)]
pub struct SwapOperation {
    a: Cell,
    b: Cell,
    position_a: Vec2,
    position_b: Vec2,
    moves: [Option<TileMove>; 2],
    stage: usize,
    current: Option<AnimationHandle>,
    duration: f32,
    timeout: Option<f32>,
    stage_elapsed: f32,
}

impl SwapOperation {
    /// Capture both positions, raise the busy flag and start the first move
    pub fn begin<B: AnimationBackend + ?Sized>(
        board: &Board,
        pair: SwapPair,
        backend: &mut B,
        duration: f32,
        timeout: Option<f32>,
        busy: &mut BusyFlag,
    ) -> Result<Self, AnimationError> {
        let (a, b) = (pair.scanned, pair.neighbor);
        let position_a = board.visual_position(a);
        let position_b = board.visual_position(b);
        let tile_move = |cell: Cell, from: Vec2, to: Vec2| {
            board.tile(cell).map(|t| TileMove {
                tile: t.id,
                cell,
                from,
                to,
            })
        };

        let mut op = Self {
            a,
            b,
            position_a,
            position_b,
            moves: [
                tile_move(a, position_a, position_b),
                tile_move(b, position_b, position_a),
            ],
            stage: 0,
            current: None,
            duration,
            timeout,
            stage_elapsed: 0.0,
        };

        busy.raise();
        op.start_stage(backend)?;
        Ok(op)
    }

    pub fn cells(&self) -> (Cell, Cell) {
        (self.a, self.b)
    }

    /// Start the next move that has a tile, if any is left
    fn start_stage<B: AnimationBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), AnimationError> {
        self.current = None;
        while self.stage < self.moves.len() {
            if let Some(m) = self.moves[self.stage] {
                self.current = Some(backend.animate(m.tile, m.from, m.to, self.duration)?);
                self.stage_elapsed = 0.0;
                return Ok(());
            }
            self.stage += 1;
        }
        Ok(())
    }

    /// Drive the swap forward; `dt` counts toward the stage timeout
    pub fn poll<B: AnimationBackend + ?Sized>(
        &mut self,
        board: &mut Board,
        backend: &mut B,
        dt: f32,
    ) -> SwapProgress {
        let Some(handle) = self.current else {
            return self.resolve(board);
        };
        self.stage_elapsed += dt;

        match backend.poll(handle) {
            AnimationStatus::Running => match (self.timeout, self.moves[self.stage]) {
                (Some(timeout), Some(m)) if self.stage_elapsed > timeout => {
                    backend.cancel(handle);
                    self.rollback(board);
                    SwapProgress::Failed(AnimationError::TimedOut {
                        tile: m.tile,
                        timeout,
                    })
                }
                _ => SwapProgress::Pending,
            },
            AnimationStatus::Finished => {
                if let Some(m) = self.moves[self.stage] {
                    if let Some(tile) = board.tile_mut(m.cell) {
                        tile.position = m.to;
                    }
                }
                self.stage += 1;
                if let Err(e) = self.start_stage(backend) {
                    self.rollback(board);
                    return SwapProgress::Failed(e);
                }
                if self.current.is_none() {
                    self.resolve(board)
                } else {
                    SwapProgress::Pending
                }
            }
            AnimationStatus::Failed(e) => {
                self.rollback(board);
                SwapProgress::Failed(e)
            }
        }
    }

    fn resolve(&mut self, board: &mut Board) -> SwapProgress {
        board.commit_swap(self.a, self.b, self.position_a, self.position_b);
        SwapProgress::Resolved
    }

    fn rollback(&mut self, board: &mut Board) {
        self.current = None;
        if let Some(tile) = board.tile_mut(self.a) {
            tile.position = self.position_a;
        }
        if let Some(tile) = board.tile_mut(self.b) {
            tile.position = self.position_b;
        }
    }
}
