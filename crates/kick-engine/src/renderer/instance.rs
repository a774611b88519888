use bytemuck::{Pod, Zeroable};

/// Per-instance render data published to the host page.
/// Must match the host's reader: 12 floats = 48 bytes stride.
///
/// `width`/`height` are the drawn size in world units, with any visual
/// scale already applied.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position (center) in world space.
    pub x: f32,
    /// Y position (center) in world space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// 0 = textured, 1 = flat fill.
    pub sprite: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Render layer as a float, back to front.
    pub layer: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    _pad: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32,
        y: f32,
        rotation: f32,
        width: f32,
        height: f32,
        sprite: f32,
        alpha: f32,
        layer: f32,
        rgb: [f32; 3],
    ) -> Self {
        Self {
            x,
            y,
            rotation,
            width,
            height,
            sprite,
            alpha,
            layer,
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            _pad: 0.0,
        }
    }
}

/// Render buffer containing all sprite instances for one frame, back to front.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false (and drops it) once the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for zero-copy reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
