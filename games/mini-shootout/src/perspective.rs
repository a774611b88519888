use crate::config::PerspectiveConfig;

/// Ball scale for a given screen y: `max_scale` at the resting line,
/// easing down to `min_scale` toward the far edge.
pub fn perspective_scale(y: f32, viewport_height: f32, rest_y: f32, cfg: &PerspectiveConfig) -> f32 {
    let y = y.clamp(0.0, viewport_height.max(0.0));
    let top = cfg.top_min.max(viewport_height * cfg.top_ratio);
    let span = rest_y - top;
    if span <= f32::EPSILON {
        return cfg.max_scale;
    }
    let t = ((y - top) / span).clamp(0.0, 1.0);
    let eased = t.powf(cfg.exponent);
    cfg.min_scale + (cfg.max_scale - cfg.min_scale) * eased
}

/// Multiplicative factor taking `current` to `target`, or `None` inside the deadband.
pub fn rescale_factor(current: f32, target: f32, deadband: f32) -> Option<f32> {
    if current <= 0.0 || (target - current).abs() < deadband {
        None
    } else {
        Some(target / current)
    }
}
