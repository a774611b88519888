use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
///
/// `Fixed` is how a body is "frozen": it keeps its collider but ignores
/// gravity and velocity until it is switched back to `Dynamic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        ColliderBuilder::new(self.to_shared_shape())
    }

    fn to_shared_shape(self) -> SharedShape {
        match self {
            ColliderDesc::Ball { radius } => SharedShape::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                SharedShape::cuboid(half_width, half_height)
            }
        }
    }

    /// The same shape uniformly scaled about its center.
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            ColliderDesc::Ball { radius } => ColliderDesc::Ball { radius: radius * factor },
            ColliderDesc::Cuboid { half_width, half_height } => ColliderDesc::Cuboid {
                half_width: half_width * factor,
                half_height: half_height * factor,
            },
        }
    }

    /// Full extents of the shape's bounding box.
    pub fn size(&self) -> Vec2 {
        match *self {
            ColliderDesc::Ball { radius } => Vec2::splat(radius * 2.0),
            ColliderDesc::Cuboid { half_width, half_height } => {
                Vec2::new(half_width * 2.0, half_height * 2.0)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub ccd: bool,
    /// Sensors report collision starts but never push other bodies.
    pub sensor: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            ccd: false,
            sensor: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            gravity_scale: 0.0,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set the linear damping (velocity decay per second). Stands in for air drag.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// If `id` is one side of the pair, return the other side.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        std::mem::take(&mut *self.collisions.lock().unwrap())
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions.lock().unwrap().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct.
///
/// Coordinates are Y-down screen space; velocities are in world units per second.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Positive Y pulls toward the bottom of the screen.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .sensor(desc.sensor)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Colliders removed mid-step have no parent any more; drop those events.
            if let (Some(a), Some(b)) = (self.collider_to_entity(h1), self.collider_to_entity(h2)) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    /// Teleport a body. Rotation is reset to zero.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(nalgebra::Isometry2::new(vec2_to_na(pos), 0.0), true);
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Switch a body between dynamic and fixed.
    pub fn set_body_type(&mut self, body: &PhysicsBody, body_type: BodyType) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_body_type(body_type.to_rapier(), true);
        }
    }

    pub fn body_type(&self, body: &PhysicsBody) -> Option<BodyType> {
        self.bodies.get(body.body_handle).map(|rb| {
            if rb.is_fixed() {
                BodyType::Fixed
            } else {
                BodyType::Dynamic
            }
        })
    }

    /// Uniformly scale a body's collider about its center.
    /// Returns the new shape, or `None` if the collider is gone.
    pub fn scale_collider(&mut self, body: &PhysicsBody, factor: f32) -> Option<ColliderDesc> {
        let scaled = self.collider_shape(body)?.scaled(factor);
        let collider = self.colliders.get_mut(body.collider_handle)?;
        collider.set_shape(scaled.to_shared_shape());
        Some(scaled)
    }

    /// Replace a body's collider shape outright, keeping its material.
    pub fn set_collider_shape(&mut self, body: &PhysicsBody, shape: ColliderDesc) {
        if let Some(collider) = self.colliders.get_mut(body.collider_handle) {
            collider.set_shape(shape.to_shared_shape());
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Query the collider shape of a physics body.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else {
            shape.as_cuboid().map(|cuboid| ColliderDesc::Cuboid {
                half_width: cuboid.half_extents.x,
                half_height: cuboid.half_extents.y,
            })
        }
    }

    pub fn is_sensor(&self, body: &PhysicsBody) -> bool {
        self.colliders
            .get(body.collider_handle)
            .map(|c| c.is_sensor())
            .unwrap_or(false)
    }

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(world: &mut PhysicsWorld, id: u32, pos: Vec2) -> PhysicsBody {
        world.create_body(
            EntityId(id),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }).with_position(pos),
            ColliderMaterial::default(),
        )
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = ball(&mut world, 1, Vec2::ZERO);
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_toward_screen_bottom() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.set_dt(1.0 / 60.0);
        let body = ball(&mut world, 1, Vec2::new(0.0, 100.0));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!(pos.y > 100.0, "body should fall: y={}", pos.y);
    }

    #[test]
    fn fixed_body_ignores_gravity_until_released() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.set_dt(1.0 / 60.0);
        let body = ball(&mut world, 1, Vec2::new(50.0, 50.0));
        world.set_body_type(&body, BodyType::Fixed);
        assert_eq!(world.body_type(&body), Some(BodyType::Fixed));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!((pos.y - 50.0).abs() < 0.001, "frozen body moved: y={}", pos.y);

        world.set_body_type(&body, BodyType::Dynamic);
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!(pos.y > 50.0, "released body should fall: y={}", pos.y);
    }

    #[test]
    fn set_position_and_velocities() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = ball(&mut world, 1, Vec2::ZERO);

        world.set_position(&body, Vec2::new(120.0, 340.0));
        world.set_velocity(&body, Vec2::new(50.0, -30.0));
        world.set_angular_velocity(&body, 2.5);

        let (pos, rot) = world.body_position(&body);
        assert!((pos - Vec2::new(120.0, 340.0)).length() < 0.001);
        assert!(rot.abs() < 0.001);
        assert!((world.velocity(&body) - Vec2::new(50.0, -30.0)).length() < 0.001);
        assert!((world.angular_velocity(&body) - 2.5).abs() < 0.001);
    }

    #[test]
    fn scale_collider_ball_and_back() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = ball(&mut world, 1, Vec2::ZERO);

        match world.scale_collider(&body, 0.8) {
            Some(ColliderDesc::Ball { radius }) => assert!((radius - 8.0).abs() < 1e-4),
            other => panic!("expected ball, got {:?}", other),
        }

        world.scale_collider(&body, 10.0 / 8.0);
        match world.collider_shape(&body) {
            Some(ColliderDesc::Ball { radius }) => assert!((radius - 10.0).abs() < 1e-4),
            other => panic!("expected ball, got {:?}", other),
        }

        world.set_collider_shape(&body, ColliderDesc::Ball { radius: 26.0 });
        assert_eq!(world.collider_shape(&body), Some(ColliderDesc::Ball { radius: 26.0 }));
    }

    #[test]
    fn scaled_cuboid_keeps_aspect() {
        let desc = ColliderDesc::Cuboid { half_width: 10.0, half_height: 4.0 }.scaled(0.5);
        assert_eq!(desc, ColliderDesc::Cuboid { half_width: 5.0, half_height: 2.0 });
        assert_eq!(desc.size(), Vec2::new(10.0, 4.0));
    }

    #[test]
    fn sensor_reports_start_without_blocking() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);

        let sensor = world.create_body(
            EntityId(7),
            &BodyDesc::fixed(ColliderDesc::Cuboid { half_width: 40.0, half_height: 20.0 })
                .with_position(Vec2::new(0.0, 0.0))
                .with_sensor(true),
            ColliderMaterial::default(),
        );
        assert!(world.is_sensor(&sensor));

        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_position(Vec2::new(0.0, 100.0))
                .with_velocity(Vec2::new(0.0, -600.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..30 {
            world.step_into(&mut events);
        }

        let started: Vec<_> = events.iter().filter(|e| e.started).collect();
        assert!(!started.is_empty(), "sensor should report an intersection");
        assert_eq!(started[0].other(EntityId(7)), Some(EntityId(1)));

        // Passed straight through.
        let (pos, _) = world.body_position(&body);
        assert!(pos.y < -100.0, "ball should pass through sensor: y={}", pos.y);
    }

    #[test]
    fn collision_events_between_converging_bodies() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);

        world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
                .with_velocity(Vec2::new(200.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.create_body(
            EntityId(2),
            &BodyDesc::fixed(ColliderDesc::Cuboid { half_width: 5.0, half_height: 50.0 })
                .with_position(Vec2::new(40.0, 0.0)),
            ColliderMaterial::default(),
        );

        let mut all_events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut all_events);
        }

        let first = all_events
            .iter()
            .find(|e| e.started)
            .expect("should have a collision start");
        let ids = [first.entity_a, first.entity_b];
        assert!(ids.contains(&EntityId(1)));
        assert!(ids.contains(&EntityId(2)));
    }

    #[test]
    fn collision_pair_other() {
        let pair = CollisionPair {
            entity_a: EntityId(3),
            entity_b: EntityId(9),
            started: true,
        };
        assert_eq!(pair.other(EntityId(3)), Some(EntityId(9)));
        assert_eq!(pair.other(EntityId(9)), Some(EntityId(3)));
        assert_eq!(pair.other(EntityId(4)), None);
    }
}
