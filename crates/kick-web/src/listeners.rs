use std::rc::Rc;

use kick_engine::InputEvent;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, PointerEvent};

use crate::surface::RenderSurface;

/// One registered DOM listener. Dropping the handle unsubscribes it.
pub struct ListenerHandle {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerHandle {
    pub fn subscribe(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Translate a DOM pointer event into an engine input event, in canvas CSS pixels.
fn pointer_input(event: &str, evt: &PointerEvent) -> Option<InputEvent> {
    let x = evt.offset_x() as f32;
    let y = evt.offset_y() as f32;
    match event {
        "pointerdown" => Some(InputEvent::PointerDown {
            x,
            y,
            primary: evt.is_primary() && evt.button() == 0,
        }),
        "pointerup" => Some(InputEvent::PointerUp { x, y }),
        "pointercancel" => Some(InputEvent::PointerCancel { x, y }),
        "pointerleave" => Some(InputEvent::PointerLeave { x, y }),
        _ => None,
    }
}

const POINTER_EVENTS: [&str; 4] = ["pointerdown", "pointerup", "pointercancel", "pointerleave"];

/// Every listener the game registers, held for the life of the session.
pub struct Listeners {
    handles: Vec<ListenerHandle>,
}

impl Listeners {
    /// Subscribe pointer listeners on the canvas and a resize listener on the window.
    pub fn bind(
        surface: &RenderSurface,
        on_input: impl Fn(InputEvent) + 'static,
        on_resize: impl Fn() + 'static,
    ) -> Result<Self, JsValue> {
        let on_input = Rc::new(on_input);
        let canvas: &EventTarget = surface.canvas().as_ref();
        let mut handles = Vec::with_capacity(POINTER_EVENTS.len() + 1);

        for event in POINTER_EVENTS {
            let on_input = Rc::clone(&on_input);
            handles.push(ListenerHandle::subscribe(canvas, event, move |evt| {
                if let Some(pe) = evt.dyn_ref::<PointerEvent>() {
                    if event == "pointerdown" {
                        pe.prevent_default();
                    }
                    if let Some(input) = pointer_input(event, pe) {
                        on_input(input);
                    }
                }
            })?);
        }

        let window: &EventTarget = surface.window().as_ref();
        handles.push(ListenerHandle::subscribe(window, "resize", move |_| on_resize())?);

        log::debug!("subscribed {} listeners", handles.len());
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Unsubscribe everything now rather than at drop.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
