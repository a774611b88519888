use glam::Vec2;

/// Input event types the engine understands.
/// Positions are world coordinates (CSS pixels relative to the canvas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began. `primary` is false for secondary touches and
    /// non-primary mouse buttons.
    PointerDown { x: f32, y: f32, primary: bool },
    /// A touch/click ended.
    PointerUp { x: f32, y: f32 },
    /// The platform took the pointer away (scroll takeover, palm rejection).
    PointerCancel { x: f32, y: f32 },
    /// The pointer left the canvas.
    PointerLeave { x: f32, y: f32 },
    /// The viewport changed size or pixel ratio.
    Resize { width: f32, height: f32, pixel_ratio: f32 },
}

impl InputEvent {
    /// Where a pointer gesture ended, for the up/cancel/leave family.
    pub fn release_point(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerUp { x, y }
            | InputEvent::PointerCancel { x, y }
            | InputEvent::PointerLeave { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

/// A queue of input events.
/// The host pushes events between frames; the first fixed step of the next
/// frame consumes them.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn take(&mut self) -> InputQueue {
        InputQueue {
            events: std::mem::take(&mut self.events),
        }
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_take() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, primary: true });
        q.push(InputEvent::PointerUp { x: 10.0, y: 80.0 });
        assert_eq!(q.len(), 2);

        let taken = q.take();
        assert_eq!(taken.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn release_points() {
        let up = InputEvent::PointerUp { x: 1.0, y: 2.0 };
        let cancel = InputEvent::PointerCancel { x: 3.0, y: 4.0 };
        let leave = InputEvent::PointerLeave { x: 5.0, y: 6.0 };
        let down = InputEvent::PointerDown { x: 0.0, y: 0.0, primary: true };

        assert_eq!(up.release_point(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(cancel.release_point(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(leave.release_point(), Some(Vec2::new(5.0, 6.0)));
        assert_eq!(down.release_point(), None);
    }
}
