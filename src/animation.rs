//! Animation backend seam
//!
//! The board never moves pixels itself. It asks a backend to move a tile from
//! one position to another and polls the returned handle until the move has
//! finished. Polling for `Finished` plays the role of a completion callback.

use glam::Vec2;
use thiserror::Error;

use crate::sim::TileId;

/// Handle to one in-flight animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub u64);

/// Animation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("backend rejected animation of tile {0}")]
    Rejected(TileId),
    #[error("animation of tile {tile} failed: {reason}")]
    Failed { tile: TileId, reason: String },
    #[error("animation of tile {tile} did not complete within {timeout}s")]
    TimedOut { tile: TileId, timeout: f32 },
    #[error("unknown animation handle {0:?}")]
    UnknownHandle(AnimationHandle),
}

/// Result of polling an animation
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationStatus {
    Running,
    Finished,
    Failed(AnimationError),
}

/// Timed transition provider
pub trait AnimationBackend {
    /// Start moving `tile` from `from` to `to` over `duration` seconds
    fn animate(
        &mut self,
        tile: TileId,
        from: Vec2,
        to: Vec2,
        duration: f32,
    ) -> Result<AnimationHandle, AnimationError>;

    /// Check on an animation. `Finished` and `Failed` are reported once; the
    /// handle is forgotten afterwards.
    fn poll(&mut self, handle: AnimationHandle) -> AnimationStatus;

    /// Stop an animation that is still running and forget its handle.
    /// Unknown handles are ignored.
    fn cancel(&mut self, _handle: AnimationHandle) {}
}

#[derive(Debug, Clone)]
struct Tween {
    tile: TileId,
    from: Vec2,
    to: Vec2,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }
}

/// Linear tween backend advanced by the host every frame
#[derive(Debug, Default)]
pub struct TweenBackend {
    /// Active tweens in start order
    tweens: Vec<(AnimationHandle, Tween)>,
    next_handle: u64,
}

impl TweenBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every active tween by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        for (_, tween) in &mut self.tweens {
            tween.elapsed += dt;
        }
    }

    /// Interpolated position of a tile that is currently moving
    pub fn position_of(&self, tile: TileId) -> Option<Vec2> {
        self.tweens
            .iter()
            .rev()
            .find(|(_, t)| t.tile == tile)
            .map(|(_, t)| t.from.lerp(t.to, t.progress()))
    }

    /// Number of tweens not yet reported as finished
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

impl AnimationBackend for TweenBackend {
    fn animate(
        &mut self,
        tile: TileId,
        from: Vec2,
        to: Vec2,
        duration: f32,
    ) -> Result<AnimationHandle, AnimationError> {
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        self.tweens.push((
            handle,
            Tween {
                tile,
                from,
                to,
                duration,
                elapsed: 0.0,
            },
        ));
        Ok(handle)
    }

    fn poll(&mut self, handle: AnimationHandle) -> AnimationStatus {
        let Some(index) = self.tweens.iter().position(|(h, _)| *h == handle) else {
            return AnimationStatus::Failed(AnimationError::UnknownHandle(handle));
        };
        if self.tweens[index].1.progress() >= 1.0 {
            self.tweens.remove(index);
            AnimationStatus::Finished
        } else {
            AnimationStatus::Running
        }
    }

    fn cancel(&mut self, handle: AnimationHandle) {
        self.tweens.retain(|(h, _)| *h != handle);
    }
}

/// Backend whose animations complete on the first poll
#[derive(Debug, Default)]
pub struct InstantBackend {
    next_handle: u64,
    /// Total animations started
    pub started: usize,
}

impl InstantBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationBackend for InstantBackend {
    fn animate(
        &mut self,
        _tile: TileId,
        _from: Vec2,
        _to: Vec2,
        _duration: f32,
    ) -> Result<AnimationHandle, AnimationError> {
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        self.started += 1;
        Ok(handle)
    }

    fn poll(&mut self, _handle: AnimationHandle) -> AnimationStatus {
        AnimationStatus::Finished
    }
}
