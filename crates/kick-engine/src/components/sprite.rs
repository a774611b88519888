/// What a sprite draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    /// The game's single texture (the ball), stretched over the entity's size.
    Texture,
    /// A flat-colored rectangle.
    Fill { r: f32, g: f32, b: f32 },
}

impl SpriteKind {
    /// Wire code used in the render buffer.
    pub fn code(&self) -> f32 {
        match self {
            SpriteKind::Texture => 0.0,
            SpriteKind::Fill { .. } => 1.0,
        }
    }

    pub fn rgb(&self) -> [f32; 3] {
        match *self {
            SpriteKind::Texture => [1.0, 1.0, 1.0],
            SpriteKind::Fill { r, g, b } => [r, g, b],
        }
    }
}

/// Sprite component: defines how an entity appears visually.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    pub kind: SpriteKind,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl SpriteComponent {
    pub fn texture() -> Self {
        Self {
            kind: SpriteKind::Texture,
            alpha: 1.0,
        }
    }

    pub fn fill(r: f32, g: f32, b: f32) -> Self {
        Self {
            kind: SpriteKind::Fill { r, g, b },
            alpha: 1.0,
        }
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self::texture()
    }
}
