use glam::Vec2;

use crate::config::ShootoutConfig;

/// A completed press-and-release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub start: Vec2,
    pub end: Vec2,
}

impl Gesture {
    pub fn drag(&self) -> Vec2 {
        self.end - self.start
    }

    /// How far the pointer moved up the screen (positive = upward).
    pub fn upward_travel(&self) -> f32 {
        self.start.y - self.end.y
    }

    /// Launch velocity (per tick) if this gesture is a valid shot.
    pub fn shot(&self, cfg: &ShootoutConfig) -> Option<Vec2> {
        if self.drag().length() < cfg.min_shot_distance
            || self.upward_travel() < cfg.min_upward_travel
        {
            return None;
        }
        Some(shot_velocity(self.drag(), cfg.shot_power, cfg.max_shot_speed))
    }
}

/// `drag × power`, scaled down uniformly to at most `max_speed`.
pub fn shot_velocity(drag: Vec2, power: f32, max_speed: f32) -> Vec2 {
    let v = drag * power;
    let speed = v.length();
    if speed > max_speed {
        v * (max_speed / speed)
    } else {
        v
    }
}

/// Tracks the pointer-down origin between press and release.
#[derive(Debug, Default)]
pub struct GestureTracker {
    origin: Option<Vec2>,
}

impl GestureTracker {
    pub fn press(&mut self, pos: Vec2) {
        self.origin = Some(pos);
    }

    /// Complete the gesture, if one was started.
    pub fn release(&mut self, pos: Vec2) -> Option<Gesture> {
        self.origin.take().map(|start| Gesture { start, end: pos })
    }

    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    pub fn clear(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(start: (f32, f32), end: (f32, f32)) -> Gesture {
        Gesture {
            start: Vec2::new(start.0, start.1),
            end: Vec2::new(end.0, end.1),
        }
    }

    #[test]
    fn short_drags_never_fire() {
        let cfg = ShootoutConfig::default();
        assert!(gesture((100.0, 500.0), (100.0, 471.0)).shot(&cfg).is_none());
        assert!(gesture((100.0, 500.0), (110.0, 480.0)).shot(&cfg).is_none());
    }

    #[test]
    fn sideways_and_downward_drags_never_fire() {
        let cfg = ShootoutConfig::default();
        // Long but only 19 units upward.
        assert!(gesture((100.0, 500.0), (300.0, 481.0)).shot(&cfg).is_none());
        assert!(gesture((100.0, 500.0), (100.0, 700.0)).shot(&cfg).is_none());
    }

    #[test]
    fn threshold_drag_fires() {
        let cfg = ShootoutConfig::default();
        let v = gesture((100.0, 500.0), (100.0, 470.0)).shot(&cfg).unwrap();
        assert!((v - Vec2::new(0.0, -9.0)).length() < 1e-4);
    }

    #[test]
    fn clamp_preserves_direction() {
        let drag = Vec2::new(200.0, -400.0);
        let v = shot_velocity(drag, 0.3, 32.0);
        assert!((v.length() - 32.0).abs() < 1e-3);
        assert!(v.normalize().dot(drag.normalize()) > 0.9999);
    }

    #[test]
    fn straight_up_drag_clamps_to_max() {
        let cfg = ShootoutConfig::default();
        let v = gesture((200.0, 500.0), (200.0, 200.0)).shot(&cfg).unwrap();
        assert!((v - Vec2::new(0.0, -32.0)).length() < 1e-4);
    }

    #[test]
    fn tracker_only_completes_after_press() {
        let mut tracker = GestureTracker::default();
        assert!(tracker.release(Vec2::ZERO).is_none());

        tracker.press(Vec2::new(1.0, 2.0));
        assert!(tracker.is_pressed());
        let g = tracker.release(Vec2::new(3.0, 4.0)).unwrap();
        assert_eq!(g.start, Vec2::new(1.0, 2.0));
        assert_eq!(g.end, Vec2::new(3.0, 4.0));
        assert!(!tracker.is_pressed());
        assert!(tracker.release(Vec2::ZERO).is_none());
    }
}
