//! Tuning constants for the shootout, overridable from JSON.
//!
//! Speeds are in world units per simulation tick (one fixed step), distances
//! in world units (CSS pixels), times in seconds.

use serde::{Deserialize, Serialize};

/// How the ball shrinks as it travels up the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    /// The "far" edge is `max(top_min, top_ratio × height)`.
    pub top_min: f32,
    pub top_ratio: f32,
    /// Easing exponent applied to the normalized depth.
    pub exponent: f32,
    /// Scale at the far edge.
    pub min_scale: f32,
    /// Scale at the resting position.
    pub max_scale: f32,
    /// Radius changes smaller than this are skipped.
    pub deadband: f32,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            top_min: 60.0,
            top_ratio: 0.18,
            exponent: 0.65,
            min_scale: 0.78,
            max_scale: 1.0,
            deadband: 0.2,
        }
    }
}

/// Goal frame geometry, derived from the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    /// Goal width is `width_ratio × viewport width`, clamped to `[min_width, max_width]`.
    pub width_ratio: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Thickness of posts and crossbar.
    pub thickness: f32,
    /// Crossbar center sits at `max(top_min, top_ratio × height)`.
    pub top_ratio: f32,
    pub top_min: f32,
    pub post_height: f32,
    /// Sensor height as a fraction of `post_height`.
    pub sensor_height_ratio: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            width_ratio: 0.55,
            min_width: 180.0,
            max_width: 420.0,
            thickness: 12.0,
            top_ratio: 0.08,
            top_min: 40.0,
            post_height: 110.0,
            sensor_height_ratio: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootoutConfig {
    /// Physical and visual ball radius at the resting position.
    pub ball_radius: f32,
    /// Gap between the bottom of the ball and the bottom of the viewport.
    pub rest_margin: f32,

    pub min_shot_distance: f32,
    /// Minimum `start.y - end.y` for a drag to count as a shot.
    pub min_upward_travel: f32,
    /// Drag-to-velocity multiplier.
    pub shot_power: f32,
    pub max_shot_speed: f32,

    /// Vertical speed (upward) that marks a flight as having moved toward the goal.
    pub upward_flag_speed: f32,
    /// Minimum upward speed for a goal when the flight never passed `upward_flag_speed`.
    pub goal_min_upward_speed: f32,
    /// Goal mouth bounds shrink by this many ball radii on each side.
    pub goal_edge_shrink: f32,
    /// Delay between a goal and the ball returning to rest.
    pub goal_reset_delay: f32,

    /// A flight ends once the ball is this far outside the viewport.
    pub out_of_bounds_margin: f32,
    /// A flight ends once the ball is slower than this.
    pub stop_speed: f32,

    pub wall_thickness: f32,

    /// Downward acceleration in world units per second squared.
    pub gravity: f32,
    /// Linear velocity decay per second.
    pub air_damping: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,
    pub ball_density: f32,
    pub frame_restitution: f32,

    pub perspective: PerspectiveConfig,
    pub goal: GoalConfig,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            ball_radius: 26.0,
            rest_margin: 120.0,
            min_shot_distance: 30.0,
            min_upward_travel: 20.0,
            shot_power: 0.3,
            max_shot_speed: 32.0,
            upward_flag_speed: 4.0,
            goal_min_upward_speed: 2.0,
            goal_edge_shrink: 0.6,
            goal_reset_delay: 0.6,
            out_of_bounds_margin: 200.0,
            stop_speed: 2.0,
            wall_thickness: 100.0,
            gravity: 1000.0,
            air_damping: 0.6,
            ball_restitution: 0.5,
            ball_friction: 0.05,
            ball_density: 0.001,
            frame_restitution: 0.4,
            perspective: PerspectiveConfig::default(),
            goal: GoalConfig::default(),
        }
    }
}

impl ShootoutConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ShootoutConfig::from_json("{}").unwrap(), ShootoutConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let cfg = ShootoutConfig::from_json(
            r#"{ "ball_radius": 30, "goal": { "post_height": 90 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.ball_radius, 30.0);
        assert_eq!(cfg.goal.post_height, 90.0);
        assert_eq!(cfg.goal.thickness, 12.0);
        assert_eq!(cfg.max_shot_speed, 32.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ShootoutConfig::from_json("{ ball_radius: }").is_err());
        assert!(ShootoutConfig::from_json(r#"{ "ball_radius": "big" }"#).is_err());
    }

    #[test]
    fn serializes_back_to_equal_config() {
        let cfg = ShootoutConfig {
            gravity: 500.0,
            ..Default::default()
        };
        assert_eq!(ShootoutConfig::from_json(&cfg.to_json()).unwrap(), cfg);
    }
}
