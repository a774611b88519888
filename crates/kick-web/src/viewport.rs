use kick_engine::Viewport;

pub const MIN_PIXEL_RATIO: f32 = 1.0;
pub const MAX_PIXEL_RATIO: f32 = 3.0;

/// Candidate viewport sizes read from the page, in CSS pixels.
///
/// Browsers disagree about which of these is trustworthy (mobile URL bars,
/// pinch zoom, iframes), so each is optional and they are tried in order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportSources {
    /// `window.visualViewport.{width,height}`.
    pub visual_viewport: Option<(f64, f64)>,
    /// `window.{innerWidth,innerHeight}`.
    pub window_inner: Option<(f64, f64)>,
    /// `document.documentElement.{clientWidth,clientHeight}`.
    pub document_client: Option<(f64, f64)>,
    /// The canvas's own `client{Width,Height}`.
    pub canvas_client: Option<(f64, f64)>,
    /// `window.devicePixelRatio`.
    pub device_pixel_ratio: Option<f64>,
}

fn usable(pair: Option<(f64, f64)>) -> Option<(f32, f32)> {
    let (w, h) = pair?;
    (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w as f32, h as f32))
}

impl ViewportSources {
    /// The first source with a positive size wins; `fallback` is used when none does.
    pub fn resolve(&self, fallback_width: f32, fallback_height: f32) -> Viewport {
        let (width, height) = [
            self.visual_viewport,
            self.window_inner,
            self.document_client,
            self.canvas_client,
        ]
        .into_iter()
        .find_map(usable)
        .unwrap_or((fallback_width, fallback_height));

        Viewport::new(width, height, self.pixel_ratio())
    }

    /// Device pixel ratio clamped to [1, 3]. Missing or nonsensical values read as 1.
    pub fn pixel_ratio(&self) -> f32 {
        let raw = match self.device_pixel_ratio {
            Some(r) if r.is_finite() && r > 0.0 => r as f32,
            _ => 1.0,
        };
        raw.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
    }
}

/// Backing-store size in device pixels for a viewport, never smaller than 1x1.
pub fn backing_size(viewport: &Viewport) -> (u32, u32) {
    let w = (viewport.width * viewport.pixel_ratio).round().max(1.0);
    let h = (viewport.height * viewport.pixel_ratio).round().max(1.0);
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_viewport_wins() {
        let sources = ViewportSources {
            visual_viewport: Some((390.0, 664.0)),
            window_inner: Some((390.0, 844.0)),
            device_pixel_ratio: Some(3.0),
            ..Default::default()
        };
        assert_eq!(sources.resolve(800.0, 600.0), Viewport::new(390.0, 664.0, 3.0));
    }

    #[test]
    fn zero_sized_sources_are_skipped() {
        let sources = ViewportSources {
            visual_viewport: Some((0.0, 0.0)),
            window_inner: Some((f64::NAN, 500.0)),
            document_client: Some((1024.0, 0.0)),
            canvas_client: Some((300.0, 150.0)),
            device_pixel_ratio: None,
        };
        assert_eq!(sources.resolve(800.0, 600.0), Viewport::new(300.0, 150.0, 1.0));
    }

    #[test]
    fn falls_back_to_configured_size() {
        let vp = ViewportSources::default().resolve(800.0, 600.0);
        assert_eq!(vp, Viewport::new(800.0, 600.0, 1.0));
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let ratio = |r| ViewportSources { device_pixel_ratio: r, ..Default::default() }.pixel_ratio();
        assert_eq!(ratio(Some(0.5)), 1.0);
        assert_eq!(ratio(Some(2.0)), 2.0);
        assert_eq!(ratio(Some(4.0)), 3.0);
        assert_eq!(ratio(Some(f64::INFINITY)), 1.0);
        assert_eq!(ratio(Some(-2.0)), 1.0);
        assert_eq!(ratio(None), 1.0);
    }

    #[test]
    fn backing_size_rounds_and_floors_at_one() {
        assert_eq!(backing_size(&Viewport::new(390.0, 844.0, 3.0)), (1170, 2532));
        assert_eq!(backing_size(&Viewport::new(100.5, 50.2, 1.0)), (101, 50));
        assert_eq!(backing_size(&Viewport::new(0.0, 0.0, 2.0)), (1, 1));
    }
}
