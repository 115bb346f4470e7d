//! Swipe gesture classification
//!
//! Only four narrow diagonal cones produce a move. Everything else, including
//! straight horizontal/vertical swipes and taps, is ignored.

use glam::Vec2;

use crate::sim::Direction;
use crate::swipe_angle;

/// Classify a swipe angle in degrees
pub fn classify_angle(angle: f32) -> Option<Direction> {
    if (20.0..70.0).contains(&angle) {
        Some(Direction::TowardRight)
    } else if (110.0..160.0).contains(&angle) {
        Some(Direction::TowardTop)
    } else if (-160.0..-110.0).contains(&angle) {
        Some(Direction::TowardLeft)
    } else if (-70.0..-20.0).contains(&angle) {
        Some(Direction::TowardBottom)
    } else {
        None
    }
}

/// Classify the swipe from `start` to `end` (y-up coordinates)
pub fn classify(start: Vec2, end: Vec2) -> Option<Direction> {
    classify_angle(swipe_angle(start, end))
}

/// Pairs touch-start with touch-end
#[derive(Debug, Default, Clone)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, point: Vec2) {
        self.start = Some(point);
    }

    /// Finish the gesture. Returns None for an unmatched touch-end or a swipe
    /// outside every band; the start point is cleared either way.
    pub fn touch_end(&mut self, point: Vec2) -> Option<Direction> {
        let start = self.start.take()?;
        let direction = classify(start, point);
        if direction.is_none() {
            log::debug!(
                "Ignoring swipe at {:.1} degrees",
                swipe_angle(start, point)
            );
        }
        direction
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        // Lower bounds are inclusive
        assert_eq!(classify_angle(20.0), Some(Direction::TowardRight));
        assert_eq!(classify_angle(110.0), Some(Direction::TowardTop));
        assert_eq!(classify_angle(-160.0), Some(Direction::TowardLeft));
        assert_eq!(classify_angle(-70.0), Some(Direction::TowardBottom));

        // Upper bounds are exclusive
        assert_eq!(classify_angle(70.0), None);
        assert_eq!(classify_angle(160.0), None);
        assert_eq!(classify_angle(-110.0), None);
        assert_eq!(classify_angle(-20.0), None);

        // Just inside the upper bounds
        assert_eq!(classify_angle(69.99), Some(Direction::TowardRight));
        assert_eq!(classify_angle(159.99), Some(Direction::TowardTop));
        assert_eq!(classify_angle(-110.01), Some(Direction::TowardLeft));
        assert_eq!(classify_angle(-20.01), Some(Direction::TowardBottom));

        // Just outside the lower bounds
        assert_eq!(classify_angle(19.99), None);
        assert_eq!(classify_angle(109.99), None);
        assert_eq!(classify_angle(-160.01), None);
        assert_eq!(classify_angle(-70.01), None);
    }

    #[test]
    fn test_band_interiors() {
        for angle in [25.0, 45.0, 65.0] {
            assert_eq!(classify_angle(angle), Some(Direction::TowardRight));
        }
        for angle in [115.0, 135.0, 155.0] {
            assert_eq!(classify_angle(angle), Some(Direction::TowardTop));
        }
        for angle in [-155.0, -135.0, -115.0] {
            assert_eq!(classify_angle(angle), Some(Direction::TowardLeft));
        }
        for angle in [-65.0, -45.0, -25.0] {
            assert_eq!(classify_angle(angle), Some(Direction::TowardBottom));
        }
        for angle in [0.0, 10.0, 90.0, 100.0, 170.0, 180.0, -170.0, -90.0, -10.0] {
            assert_eq!(classify_angle(angle), None, "angle {angle}");
        }
    }

    #[test]
    fn test_classify_points() {
        let o = Vec2::new(100.0, 100.0);
        assert_eq!(classify(o, o + Vec2::new(30.0, 30.0)), Some(Direction::TowardRight));
        assert_eq!(classify(o, o + Vec2::new(-30.0, 30.0)), Some(Direction::TowardTop));
        assert_eq!(classify(o, o + Vec2::new(-30.0, -30.0)), Some(Direction::TowardLeft));
        assert_eq!(classify(o, o + Vec2::new(30.0, -30.0)), Some(Direction::TowardBottom));
    }

    #[test]
    fn test_cardinal_swipes_ignored() {
        let o = Vec2::ZERO;
        assert_eq!(classify(o, Vec2::new(50.0, 0.0)), None);
        assert_eq!(classify(o, Vec2::new(0.0, 50.0)), None);
        assert_eq!(classify(o, Vec2::new(-50.0, 0.0)), None);
        assert_eq!(classify(o, Vec2::new(0.0, -50.0)), None);
    }

    #[test]
    fn test_zero_length_swipe_ignored() {
        let p = Vec2::new(7.0, 7.0);
        assert_eq!(classify(p, p), None);
    }

    #[test]
    fn test_tracker_pairs_touches() {
        let mut tracker = SwipeTracker::new();
        // End without start is ignored
        assert_eq!(tracker.touch_end(Vec2::ONE), None);

        tracker.touch_start(Vec2::ZERO);
        assert!(tracker.is_tracking());
        assert_eq!(
            tracker.touch_end(Vec2::new(10.0, 10.0)),
            Some(Direction::TowardRight)
        );
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.touch_end(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_tracker_clears_on_ignored_swipe() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(Vec2::ZERO);
        assert_eq!(tracker.touch_end(Vec2::new(10.0, 0.0)), None);
        assert!(!tracker.is_tracking());
    }
}
