use kick_engine::Viewport;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::error::InitError;
use crate::viewport::{backing_size, ViewportSources};

/// The `<canvas>` the game draws into, plus the window it lives in.
pub struct RenderSurface {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl RenderSurface {
    /// Look up `canvas_id` in the current document.
    pub fn bind(canvas_id: &str) -> Result<Self, InitError> {
        let window = web_sys::window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoDocument)?;
        let element = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| InitError::MissingElement(canvas_id.to_string()))?;
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| InitError::NotACanvas(canvas_id.to_string()))?;
        Ok(Self { window, canvas })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Read every viewport candidate the page currently offers.
    pub fn sources(&self) -> ViewportSources {
        let window = &self.window;
        let visual_viewport = window.visual_viewport().map(|vv| (vv.width(), vv.height()));
        let window_inner = match (window.inner_width(), window.inner_height()) {
            (Ok(w), Ok(h)) => w.as_f64().zip(h.as_f64()),
            _ => None,
        };
        let document_client = window
            .document()
            .and_then(|d| d.document_element())
            .map(|el| (el.client_width() as f64, el.client_height() as f64));
        let canvas_client = Some((
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        ));

        ViewportSources {
            visual_viewport,
            window_inner,
            document_client,
            canvas_client,
            device_pixel_ratio: Some(window.device_pixel_ratio()),
        }
    }

    /// Size the backing store in device pixels and the element in CSS pixels.
    pub fn apply(&self, viewport: &Viewport) {
        let (w, h) = backing_size(viewport);
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let style = self.canvas.style();
        let css_w = format!("{}px", viewport.width);
        let css_h = format!("{}px", viewport.height);
        if style.set_property("width", &css_w).is_err()
            || style.set_property("height", &css_h).is_err()
        {
            log::warn!("could not set canvas CSS size");
        }
    }
}
