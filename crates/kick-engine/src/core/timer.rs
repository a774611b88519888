// core/timer.rs
//
// Deferred one-shot tasks measured in simulation time.
// Payloads are game-defined; nothing here touches the scene.
//
// Usage:
//   let mut timers = TimerQueue::new();
//   let id = timers.schedule(0.6, Task::Reset);
//   for task in timers.tick(dt) { ... }
//   timers.cancel(id);

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    remaining: f32,
    payload: T,
}

/// A set of one-shot timers advanced by the fixed step.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    pending: Vec<Pending<T>>,
    next_id: u32,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Fire `payload` once `delay` seconds of simulation time have elapsed.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending {
            id,
            remaining: delay.max(0.0),
            payload,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance every timer by `dt` and return the payloads that came due,
    /// earliest deadline first. Fired timers are removed.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        for p in &mut self.pending {
            p.remaining -= dt;
        }

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            // Small epsilon so 0.6s of 1/60 steps fires on step 36, not 37.
            if self.pending[i].remaining <= 1e-5 {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|p| p.payload).collect()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
