//! Mini shootout - flick the ball into the goal.
//! The ball rests near the bottom of the screen; a quick upward drag launches it.
//! A goal needs the ball to cross the sensor between the posts while heading
//! upward. The ball shrinks with height to fake depth.

use glam::Vec2;
use kick_engine::input::queue::{InputEvent, InputQueue};
use kick_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Game, GameConfig,
    GameEvent, RenderLayer, SpriteComponent, TimerId, TimerQueue, Viewport,
};

use crate::config::ShootoutConfig;
use crate::field::{rest_position, Field, TAG_GOAL_SENSOR};
use crate::gesture::{Gesture, GestureTracker};
use crate::perspective::{perspective_scale, rescale_factor};

pub const TAG_BALL: &str = "ball";

/// Game event kinds to the host page.
pub mod game_events {
    /// `a` = new score.
    pub const SCORE: f32 = 1.0;
    /// `a`, `b` = launch velocity per tick.
    pub const SHOT: f32 = 2.0;
    /// `a` = score after the goal.
    pub const GOAL: f32 = 3.0;
    /// `a` = score before the miss.
    pub const MISS: f32 = 4.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ball frozen at rest, waiting for a gesture.
    Aiming,
    /// Ball live under physics.
    Flight,
}

/// Deferred work scheduled on simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    GoalReset,
}

pub struct MiniShootout {
    config: ShootoutConfig,
    pending_config: Option<ShootoutConfig>,
    ball: Option<EntityId>,
    field: Option<Field>,
    rest: Vec2,
    phase: Phase,
    gesture: GestureTracker,
    scored: bool,
    had_upward_motion: bool,
    score: u32,
    /// Current physical radius; differs from the configured one mid-flight.
    ball_radius: f32,
    timers: TimerQueue<Deferred>,
    goal_reset: Option<TimerId>,
    /// Scores not yet reported to the host, oldest first.
    score_changes: Vec<u32>,
}

impl MiniShootout {
    pub fn new() -> Self {
        Self::with_config(ShootoutConfig::default())
    }

    pub fn with_config(config: ShootoutConfig) -> Self {
        Self {
            ball_radius: config.ball_radius,
            config,
            pending_config: None,
            ball: None,
            field: None,
            rest: Vec2::ZERO,
            phase: Phase::Aiming,
            gesture: GestureTracker::default(),
            scored: false,
            had_upward_motion: false,
            score: 0,
            timers: TimerQueue::new(),
            goal_reset: None,
            score_changes: Vec::new(),
        }
    }

    /// Drain the score changes recorded since the last call. The host reports
    /// them once the frame is over, so its handler may read the game freely.
    pub fn take_score_changes(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.score_changes)
    }

    /// Replace the tuning. Before `init` this takes effect immediately;
    /// afterwards it is applied at the start of the next step.
    pub fn load_config(&mut self, config: ShootoutConfig) {
        if self.ball.is_none() {
            self.ball_radius = config.ball_radius;
            self.config = config;
        } else {
            self.pending_config = Some(config);
        }
    }

    pub fn tuning(&self) -> &ShootoutConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_static(&self) -> bool {
        self.phase == Phase::Aiming
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    pub fn had_upward_motion(&self) -> bool {
        self.had_upward_motion
    }

    pub fn rest_position(&self) -> Vec2 {
        self.rest
    }

    pub fn ball(&self) -> Option<EntityId> {
        self.ball
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn goal_reset_pending(&self) -> bool {
        self.goal_reset.is_some()
    }

    /// Ball velocity in world units per tick.
    pub fn ball_velocity(&self, ctx: &EngineContext) -> Vec2 {
        self.ball
            .map(|id| ctx.velocity(id) * ctx.physics.dt())
            .unwrap_or(Vec2::ZERO)
    }

    fn ticks_per_second(ctx: &EngineContext) -> f32 {
        let dt = ctx.physics.dt();
        if dt > 0.0 {
            1.0 / dt
        } else {
            60.0
        }
    }

    fn notify_score(&mut self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(game_events::SCORE, self.score as f32));
        self.score_changes.push(self.score);
    }

    fn cancel_goal_reset(&mut self) {
        if let Some(id) = self.goal_reset.take() {
            self.timers.cancel(id);
        }
    }

    fn spawn_ball(&mut self, ctx: &mut EngineContext) {
        let cfg = &self.config;
        let id = ctx.next_id();
        let size = Vec2::splat(cfg.ball_radius * 2.0);
        // Dynamic with full gravity, then frozen, so releasing it needs no re-tuning.
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: cfg.ball_radius })
            .with_position(self.rest)
            .with_ccd(true)
            .with_linear_damping(cfg.air_damping);
        let material = ColliderMaterial {
            restitution: cfg.ball_restitution,
            friction: cfg.ball_friction,
            density: cfg.ball_density,
        };
        ctx.spawn_with_body(
            Entity::new(id)
                .with_tag(TAG_BALL)
                .with_size(size)
                .with_layer(RenderLayer::Ball)
                .with_sprite(SpriteComponent::texture()),
            desc,
            material,
        );
        ctx.set_body_static(id, true);
        self.ball = Some(id);
        self.ball_radius = cfg.ball_radius;
    }

    fn rebuild_field(&mut self, ctx: &mut EngineContext, viewport: &Viewport) {
        if let Some(old) = self.field.take() {
            old.remove(ctx);
        }
        self.field = Some(Field::build(ctx, viewport, &self.config));
    }

    /// Recompute everything that depends on the viewport.
    fn on_resize(&mut self, ctx: &mut EngineContext, viewport: Viewport) {
        if viewport.is_degenerate() {
            return;
        }
        self.cancel_goal_reset();
        self.rest = rest_position(&viewport, &self.config);
        self.rebuild_field(ctx, &viewport);
        if let (Some(ball), Phase::Aiming) = (self.ball, self.phase) {
            ctx.set_position(ball, self.rest);
        }
        log::info!(
            "resized to {}x{} @{}, ball rests at ({:.0}, {:.0})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            self.rest.x,
            self.rest.y
        );
    }

    fn apply_pending_config(&mut self, ctx: &mut EngineContext) {
        let Some(config) = self.pending_config.take() else {
            return;
        };
        self.cancel_goal_reset();
        if let Some(ball) = self.ball.take() {
            ctx.despawn(ball);
        }
        self.config = config;
        ctx.physics.set_gravity(Vec2::new(0.0, self.config.gravity));

        let viewport = ctx.viewport;
        self.rest = rest_position(&viewport, &self.config);
        self.rebuild_field(ctx, &viewport);
        self.spawn_ball(ctx);
        self.phase = Phase::Aiming;
        self.scored = false;
        self.had_upward_motion = false;
        log::info!("config reloaded");
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        match *event {
            InputEvent::Resize { width, height, pixel_ratio } => {
                self.on_resize(ctx, Viewport::new(width, height, pixel_ratio));
            }
            InputEvent::PointerDown { x, y, primary } => {
                if primary && self.is_static() {
                    self.gesture.press(Vec2::new(x, y));
                }
            }
            _ => {
                if let Some(end) = event.release_point() {
                    if let Some(gesture) = self.gesture.release(end) {
                        self.try_shoot(ctx, gesture);
                    }
                }
            }
        }
    }

    fn try_shoot(&mut self, ctx: &mut EngineContext, gesture: Gesture) {
        let Some(ball) = self.ball else {
            return;
        };
        if !self.is_static() {
            return;
        }
        let Some(velocity) = gesture.shot(&self.config) else {
            log::debug!("gesture rejected: drag {:?}", gesture.drag());
            return;
        };

        self.cancel_goal_reset();
        ctx.set_body_static(ball, false);
        ctx.set_position(ball, gesture.start);
        self.had_upward_motion = false;
        self.scored = false;
        ctx.set_velocity(ball, velocity * Self::ticks_per_second(ctx));
        ctx.set_angular_velocity(ball, 0.0);
        if velocity.y < -self.config.upward_flag_speed {
            self.had_upward_motion = true;
        }
        self.phase = Phase::Flight;

        ctx.emit_event(GameEvent {
            kind: game_events::SHOT,
            a: velocity.x,
            b: velocity.y,
            c: 0.0,
        });
        log::debug!("shot from {:?} at {:?}/tick", gesture.start, velocity);
    }

    /// Goal check for one collision-start between the ball and the sensor.
    fn register_goal(&mut self, ctx: &mut EngineContext, ball_pos: Vec2, velocity: Vec2) {
        if self.scored {
            return;
        }
        let Some(field) = &self.field else {
            return;
        };
        let cfg = &self.config;
        let (left, right) = field
            .goal
            .inner_bounds(cfg.goal_edge_shrink * self.ball_radius);
        let inside = ball_pos.x >= left && ball_pos.x <= right;
        let heading_in = velocity.y < -cfg.goal_min_upward_speed || self.had_upward_motion;
        if !(inside && heading_in) {
            log::debug!(
                "sensor touched but no goal: x={:.1} in [{:.1}, {:.1}], vy={:.2}",
                ball_pos.x,
                left,
                right,
                velocity.y
            );
            return;
        }

        self.scored = true;
        self.score += 1;
        self.notify_score(ctx);
        ctx.emit_event(GameEvent::new(game_events::GOAL, self.score as f32));
        self.cancel_goal_reset();
        self.goal_reset = Some(
            self.timers
                .schedule(self.config.goal_reset_delay, Deferred::GoalReset),
        );
        log::debug!("goal! score={}", self.score);
    }

    fn apply_perspective(&mut self, ctx: &mut EngineContext, ball: EntityId, y: f32) {
        let p = &self.config.perspective;
        let scale = perspective_scale(y, ctx.viewport.height, self.rest.y, p);
        let target = self.config.ball_radius * scale;
        let Some(factor) = rescale_factor(self.ball_radius, target, p.deadband) else {
            return;
        };
        if let Some(ColliderDesc::Ball { radius }) = ctx.scale_body(ball, factor) {
            self.ball_radius = radius;
            if let Some(entity) = ctx.scene.get_mut(ball) {
                entity.visual_scale *= factor;
            }
        }
    }

    /// Return the ball to rest. A miss also clears the score.
    fn reset_ball(&mut self, ctx: &mut EngineContext, miss: bool) {
        self.cancel_goal_reset();
        if let Some(ball) = self.ball {
            // Zero velocities while still dynamic; fixed bodies ignore velocity writes.
            ctx.set_velocity(ball, Vec2::ZERO);
            ctx.set_angular_velocity(ball, 0.0);
            ctx.set_body_static(ball, true);
            ctx.set_body_shape(ball, ColliderDesc::Ball { radius: self.config.ball_radius });
            if let Some(entity) = ctx.scene.get_mut(ball) {
                entity.visual_scale = 1.0;
            }
            ctx.set_position(ball, self.rest);
        }
        self.ball_radius = self.config.ball_radius;
        self.scored = false;
        self.had_upward_motion = false;
        self.phase = Phase::Aiming;

        if miss {
            ctx.emit_event(GameEvent::new(game_events::MISS, self.score as f32));
            log::debug!("miss, score was {}", self.score);
            if self.score > 0 {
                self.score = 0;
                self.notify_score(ctx);
            }
        }
    }
}

impl Default for MiniShootout {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MiniShootout {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 16,
            gravity: Vec2::new(0.0, self.config.gravity),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let viewport = ctx.viewport;
        self.rest = rest_position(&viewport, &self.config);
        self.rebuild_field(ctx, &viewport);
        self.spawn_ball(ctx);
        self.phase = Phase::Aiming;
        log::info!(
            "mini shootout ready: {}x{}, {} bodies",
            viewport.width,
            viewport.height,
            ctx.physics.body_count()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.apply_pending_config(ctx);

        for fired in self.timers.tick(ctx.physics.dt()) {
            match fired {
                Deferred::GoalReset => {
                    self.goal_reset = None;
                    if self.scored {
                        self.reset_ball(ctx, false);
                    }
                }
            }
        }

        for event in input.iter() {
            self.handle_input(ctx, event);
        }
    }

    fn after_step(&mut self, ctx: &mut EngineContext) {
        let Some(ball) = self.ball else {
            return;
        };
        if self.phase != Phase::Flight {
            return;
        }
        let Some(pos) = ctx.scene.get(ball).map(|e| e.pos) else {
            return;
        };
        let velocity = self.ball_velocity(ctx);

        let hit_sensor = ctx.collisions().iter().any(|pair| {
            pair.started
                && pair
                    .other(ball)
                    .and_then(|other| ctx.scene.tag_of(other))
                    .is_some_and(|tag| tag == TAG_GOAL_SENSOR)
        });
        if hit_sensor {
            self.register_goal(ctx, pos, velocity);
        }

        if velocity.y < -self.config.upward_flag_speed {
            self.had_upward_motion = true;
        }

        self.apply_perspective(ctx, ball, pos.y);

        let out_of_bounds = !ctx
            .viewport
            .contains_with_margin(pos, self.config.out_of_bounds_margin);
        let stopped = velocity.length() < self.config.stop_speed;
        if out_of_bounds || stopped {
            let miss = !self.scored;
            log::debug!(
                "flight over ({}), scored={}",
                if out_of_bounds { "out of bounds" } else { "stopped" },
                self.scored
            );
            self.reset_ball(ctx, miss);
        }
    }

    fn teardown(&mut self, ctx: &mut EngineContext) {
        self.timers.cancel_all();
        self.goal_reset = None;
        self.gesture.clear();
        if let Some(field) = self.field.take() {
            field.remove(ctx);
        }
        if let Some(ball) = self.ball.take() {
            ctx.despawn(ball);
        }
        self.score_changes.clear();
        self.pending_config = None;
        log::info!("mini shootout torn down, final score {}", self.score);
    }
}
