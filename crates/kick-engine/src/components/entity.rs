use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::layer::RenderLayer;
use crate::components::sprite::SpriteComponent;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Label used to recognise the entity in collision events ("ball", "goal-sensor", ...).
    pub tag: String,
    /// Inactive entities are not drawn.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Base rendered size in world units.
    pub size: Vec2,
    /// Multiplier applied on top of `size` when drawing. Accumulates across rescales.
    pub visual_scale: f32,
    pub layer: RenderLayer,
    /// Entities without sprites are invisible (sensors, walls).
    pub sprite: Option<SpriteComponent>,
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            size: Vec2::ONE,
            visual_scale: 1.0,
            layer: RenderLayer::default(),
            sprite: None,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Size actually drawn this frame.
    pub fn drawn_size(&self) -> Vec2 {
        self.size * self.visual_scale
    }
}
