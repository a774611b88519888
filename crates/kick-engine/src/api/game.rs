use crate::api::types::{EntityId, GameEvent, Viewport};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsWorld,
};
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Initial world width, used until the host reports a real viewport.
    pub world_width: f32,
    /// Initial world height.
    pub world_height: f32,
    /// Maximum number of render instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Upper bound on fixed steps per host frame.
    pub max_steps_per_frame: u32,
    /// Gravity vector in world units per second squared. Positive Y is down.
    #[cfg(feature = "physics")]
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 64,
            max_events: 32,
            max_steps_per_frame: 10,
            #[cfg(feature = "physics")]
            gravity: Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
///
/// Each fixed step the runner calls `update`, steps physics, then calls
/// `after_step`. Input is delivered only to the first step of a frame.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Runs before physics integration. Apply input and queued changes here.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Runs after physics integration. Collision events for the step are in
    /// `ctx.collisions()`.
    fn after_step(&mut self, _ctx: &mut EngineContext) {}

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Release everything the game owns. Called once, before the runner is dropped.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    /// Current play area. Updated by the runner before a resize event is delivered.
    pub viewport: Viewport,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            events: Vec::new(),
            viewport: Viewport::default(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(Vec2::ZERO),
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Create a context sized and stepped according to `config`.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut ctx = Self::new();
        ctx.viewport = Viewport::new(config.world_width, config.world_height, 1.0);
        #[cfg(feature = "physics")]
        {
            ctx.physics.set_gravity(config.gravity);
            ctx.physics.set_dt(config.fixed_dt);
        }
        ctx
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, collision events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        #[cfg(feature = "physics")]
        self.collision_events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Set the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Get the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    #[cfg(feature = "physics")]
    pub fn set_angular_velocity(&mut self, id: EntityId, angvel: f32) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_angular_velocity(&body, angvel);
        }
    }

    #[cfg(feature = "physics")]
    pub fn angular_velocity(&self, id: EntityId) -> f32 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.angular_velocity(body))
            .unwrap_or(0.0)
    }

    /// Teleport an entity and its body. The entity's position is updated
    /// immediately rather than at the next physics sync.
    #[cfg(feature = "physics")]
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            entity.rotation = 0.0;
            if let Some(body) = &entity.body {
                self.physics.set_position(body, pos);
            }
        }
    }

    /// Freeze (`true`) or release (`false`) an entity's body.
    #[cfg(feature = "physics")]
    pub fn set_body_static(&mut self, id: EntityId, frozen: bool) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            let body_type = if frozen { BodyType::Fixed } else { BodyType::Dynamic };
            self.physics.set_body_type(&body, body_type);
        }
    }

    /// Entities without a body count as static.
    #[cfg(feature = "physics")]
    pub fn is_body_static(&self, id: EntityId) -> bool {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .and_then(|body| self.physics.body_type(body))
            .map_or(true, |t| t == BodyType::Fixed)
    }

    /// Uniformly rescale an entity's collider. Returns the new shape.
    #[cfg(feature = "physics")]
    pub fn scale_body(&mut self, id: EntityId, factor: f32) -> Option<ColliderDesc> {
        let body = self.scene.get(id)?.body?;
        self.physics.scale_collider(&body, factor)
    }

    /// Replace an entity's collider shape, e.g. to undo accumulated rescales.
    #[cfg(feature = "physics")]
    pub fn set_body_shape(&mut self, id: EntityId, shape: ColliderDesc) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_collider_shape(&body, shape);
        }
    }

    #[cfg(feature = "physics")]
    pub fn collider_shape(&self, id: EntityId) -> Option<ColliderDesc> {
        let body = self.scene.get(id)?.body?;
        self.physics.collider_shape(&body)
    }

    /// Get collision events from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called automatically by the game runner between `update` and `after_step`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub viewport: Viewport,
}
