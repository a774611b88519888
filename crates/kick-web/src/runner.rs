use kick_engine::bridge::protocol::HEADER_FLOATS;
use kick_engine::{
    build_render_buffer, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout, RenderBuffer, RenderContext, Viewport,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because
/// wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    initialized: bool,
    torn_down: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep =
            FixedTimestep::new(config.fixed_dt).with_max_steps(config.max_steps_per_frame);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep,
            layout,
            config,
            header: [0.0; HEADER_FLOATS],
            initialized: false,
            torn_down: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue. Applied at the next fixed step.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Record a new viewport. Before `init` it only seeds the context;
    /// afterwards the game also receives a `Resize` event at the next step.
    pub fn resize(&mut self, viewport: Viewport) {
        self.ctx.viewport = viewport;
        if self.initialized {
            self.input.push(InputEvent::Resize {
                width: viewport.width,
                height: viewport.height,
                pixel_ratio: viewport.pixel_ratio,
            });
        }
    }

    /// Run one host frame: zero or more fixed steps, then rebuild the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.torn_down {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            // Input goes to the first step only; later steps see an empty queue.
            let input = self.input.take();
            let empty = InputQueue::new();
            for step in 0..steps {
                let step_input = if step == 0 { &input } else { &empty };
                self.game.update(&mut self.ctx, step_input);
                #[cfg(feature = "physics")]
                self.ctx.step_physics();
                self.game.after_step(&mut self.ctx);
            }
        }

        self.publish();
    }

    /// Tear the game down. Further ticks are ignored.
    pub fn destroy(&mut self) {
        if self.torn_down {
            return;
        }
        if self.initialized {
            self.game.teardown(&mut self.ctx);
        }
        self.input.clear();
        self.render_buffer.clear();
        self.ctx.clear_frame_data();
        self.torn_down = true;
        self.publish();
    }

    fn publish(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);

        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
                viewport: self.ctx.viewport,
            };
            self.game.render(&mut render_ctx);
        }

        if self.torn_down {
            self.render_buffer.clear();
        }

        self.layout.write_header(
            &mut self.header,
            self.render_buffer.instances.len(),
            self.ctx.events.len(),
            &self.ctx.viewport,
        );
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized && !self.torn_down
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    // ---- Pointer accessors for zero-copy reads from wasm memory ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.ctx.viewport.width
    }

    pub fn world_height(&self) -> f32 {
        self.ctx.viewport.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.ctx.viewport.pixel_ratio
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use kick_engine::bridge::protocol::{HEADER_INSTANCE_COUNT, HEADER_WORLD_WIDTH};
    use kick_engine::{Entity, GameEvent, SpriteComponent};

    /// Records what the runner hands it.
    #[derive(Default)]
    struct Probe {
        updates: u32,
        after_steps: u32,
        inputs_seen: Vec<usize>,
        resizes: Vec<(f32, f32)>,
        torn_down: u32,
    }

    impl Game for Probe {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_pos(Vec2::new(10.0, 10.0))
                    .with_sprite(SpriteComponent::texture()),
            );
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.inputs_seen.push(input.len());
            for event in input.iter() {
                if let InputEvent::Resize { width, height, .. } = *event {
                    self.resizes.push((width, height));
                }
                ctx.emit_event(GameEvent::new(1.0, 0.0));
            }
        }

        fn after_step(&mut self, _ctx: &mut EngineContext) {
            self.after_steps += 1;
        }

        fn teardown(&mut self, _ctx: &mut EngineContext) {
            self.torn_down += 1;
        }
    }

    fn runner() -> GameRunner<Probe> {
        let mut r = GameRunner::new(Probe::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = GameRunner::new(Probe::default());
        r.tick(1.0);
        assert_eq!(r.game().updates, 0);
    }

    #[test]
    fn each_step_runs_update_then_after_step() {
        let mut r = runner();
        r.tick(3.0 / 60.0 + 0.001);
        assert_eq!(r.game().updates, 3);
        assert_eq!(r.game().after_steps, 3);
    }

    #[test]
    fn input_goes_to_first_step_only() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0, primary: true });
        r.push_input(InputEvent::PointerUp { x: 1.0, y: 2.0 });
        r.tick(2.0 / 60.0 + 0.001);
        assert_eq!(r.game().inputs_seen, vec![2, 0]);
        assert_eq!(r.game_events_len(), 2);
    }

    #[test]
    fn zero_step_frame_keeps_input_pending() {
        let mut r = runner();
        r.push_input(InputEvent::PointerUp { x: 0.0, y: 0.0 });
        r.tick(0.001);
        assert_eq!(r.game().updates, 0);
        assert_eq!(r.pending_input(), 1);

        r.tick(1.0 / 60.0);
        assert_eq!(r.game().inputs_seen, vec![1]);
        assert_eq!(r.pending_input(), 0);
    }

    #[test]
    fn resize_updates_context_and_queues_event() {
        let mut r = runner();
        r.resize(Viewport::new(390.0, 844.0, 3.0));
        assert_eq!(r.world_width(), 390.0);
        r.tick(1.0 / 60.0 + 0.001);
        assert_eq!(r.game().resizes, vec![(390.0, 844.0)]);
        assert_eq!(r.header[HEADER_WORLD_WIDTH], 390.0);
    }

    #[test]
    fn resize_before_init_only_seeds_viewport() {
        let mut r = GameRunner::new(Probe::default());
        r.resize(Viewport::new(320.0, 480.0, 2.0));
        r.init();
        r.tick(1.0 / 60.0 + 0.001);
        assert!(r.game().resizes.is_empty());
        assert_eq!(r.pixel_ratio(), 2.0);
    }

    #[test]
    fn render_buffer_and_header_are_published() {
        let r = runner();
        assert_eq!(r.instance_count(), 1);
        assert_eq!(r.header[HEADER_INSTANCE_COUNT], 1.0);
    }

    #[test]
    fn destroy_runs_teardown_once_and_stops_ticking() {
        let mut r = runner();
        r.destroy();
        r.destroy();
        assert_eq!(r.game().torn_down, 1);
        assert!(!r.is_initialized());
        assert_eq!(r.instance_count(), 0);

        r.tick(1.0);
        assert_eq!(r.game().updates, 0);
    }
}
