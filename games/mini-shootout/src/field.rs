//! Goal frame and boundary walls. Built from the viewport and replaced
//! wholesale whenever it changes.

use glam::Vec2;
use kick_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, RenderLayer,
    SpriteComponent, Viewport,
};

use crate::config::ShootoutConfig;

pub const TAG_GOAL_SENSOR: &str = "goal-sensor";
pub const TAG_GOAL_POST: &str = "goal-post";
pub const TAG_CROSSBAR: &str = "crossbar";
pub const TAG_WALL: &str = "wall";

/// Where the goal sits for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalGeometry {
    pub center_x: f32,
    /// Crossbar center line.
    pub top_y: f32,
    pub width: f32,
    pub thickness: f32,
    pub post_height: f32,
    pub sensor_height: f32,
}

impl GoalGeometry {
    pub fn compute(viewport: &Viewport, cfg: &ShootoutConfig) -> Self {
        let g = &cfg.goal;
        Self {
            center_x: viewport.width / 2.0,
            top_y: g.top_min.max(viewport.height * g.top_ratio),
            width: (viewport.width * g.width_ratio).clamp(g.min_width, g.max_width),
            thickness: g.thickness,
            post_height: g.post_height,
            sensor_height: g.post_height * g.sensor_height_ratio,
        }
    }

    /// Half-width of the opening between the posts' inner faces.
    pub fn inner_half_width(&self) -> f32 {
        self.width / 2.0 - self.thickness
    }

    /// Left and right x of the opening, each moved inward by `shrink`.
    pub fn inner_bounds(&self, shrink: f32) -> (f32, f32) {
        let half = self.inner_half_width();
        (self.center_x - half + shrink, self.center_x + half - shrink)
    }

    /// Centers of the left and right posts.
    pub fn post_centers(&self) -> [Vec2; 2] {
        let dx = self.width / 2.0 - self.thickness / 2.0;
        let y = self.top_y + self.post_height / 2.0;
        [Vec2::new(self.center_x - dx, y), Vec2::new(self.center_x + dx, y)]
    }

    pub fn sensor_center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.top_y + self.post_height / 2.0)
    }
}

/// Where the ball rests between shots.
pub fn rest_position(viewport: &Viewport, cfg: &ShootoutConfig) -> Vec2 {
    Vec2::new(
        viewport.width / 2.0,
        viewport.height - cfg.rest_margin - cfg.ball_radius,
    )
}

/// Every static body that depends on the viewport.
#[derive(Debug)]
pub struct Field {
    pub goal: GoalGeometry,
    parts: Vec<EntityId>,
}

impl Field {
    /// Spawn posts, crossbar, sensor and walls.
    pub fn build(ctx: &mut EngineContext, viewport: &Viewport, cfg: &ShootoutConfig) -> Self {
        let goal = GoalGeometry::compute(viewport, cfg);
        let frame = ColliderMaterial {
            restitution: cfg.frame_restitution,
            ..ColliderMaterial::default()
        };
        let white = SpriteComponent::fill(1.0, 1.0, 1.0);
        let mut parts = Vec::with_capacity(8);

        let post_size = Vec2::new(goal.thickness, goal.post_height);
        for center in goal.post_centers() {
            parts.push(spawn_block(ctx, TAG_GOAL_POST, center, post_size, frame, Some(white.clone())));
        }

        let bar_size = Vec2::new(goal.width, goal.thickness);
        let bar_center = Vec2::new(goal.center_x, goal.top_y);
        parts.push(spawn_block(ctx, TAG_CROSSBAR, bar_center, bar_size, frame, Some(white)));

        let sensor_size = Vec2::new(goal.inner_half_width() * 2.0, goal.sensor_height);
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(cuboid(sensor_size))
            .with_position(goal.sensor_center())
            .with_sensor(true);
        parts.push(ctx.spawn_with_body(
            Entity::new(id).with_tag(TAG_GOAL_SENSOR).with_size(sensor_size),
            desc,
            ColliderMaterial::default(),
        ));

        let (w, h, t) = (viewport.width, viewport.height, cfg.wall_thickness);
        let walls = [
            (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
            (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
            (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w + 2.0 * t, t)),
            (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w + 2.0 * t, t)),
        ];
        for (center, size) in walls {
            parts.push(spawn_block(ctx, TAG_WALL, center, size, frame, None));
        }

        log::debug!(
            "field built: goal {:.0} wide at y={:.0}, {} bodies",
            goal.width,
            goal.top_y,
            parts.len()
        );
        Self { goal, parts }
    }

    /// Despawn every part.
    pub fn remove(self, ctx: &mut EngineContext) {
        for id in self.parts {
            ctx.despawn(id);
        }
    }

    pub fn parts(&self) -> &[EntityId] {
        &self.parts
    }
}

fn cuboid(size: Vec2) -> ColliderDesc {
    ColliderDesc::Cuboid {
        half_width: size.x / 2.0,
        half_height: size.y / 2.0,
    }
}

fn spawn_block(
    ctx: &mut EngineContext,
    tag: &str,
    center: Vec2,
    size: Vec2,
    material: ColliderMaterial,
    sprite: Option<SpriteComponent>,
) -> EntityId {
    let id = ctx.next_id();
    let mut entity = Entity::new(id)
        .with_tag(tag)
        .with_size(size)
        .with_layer(RenderLayer::Structures);
    entity.sprite = sprite;
    ctx.spawn_with_body(entity, BodyDesc::fixed(cuboid(size)).with_position(center), material)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: f32, h: f32) -> Viewport {
        Viewport::new(w, h, 1.0)
    }

    #[test]
    fn goal_width_is_clamped() {
        let cfg = ShootoutConfig::default();
        assert_eq!(GoalGeometry::compute(&viewport(200.0, 600.0), &cfg).width, 180.0);
        assert_eq!(GoalGeometry::compute(&viewport(400.0, 600.0), &cfg).width, 220.0);
        assert_eq!(GoalGeometry::compute(&viewport(1600.0, 600.0), &cfg).width, 420.0);
    }

    #[test]
    fn goal_top_has_a_floor() {
        let cfg = ShootoutConfig::default();
        assert_eq!(GoalGeometry::compute(&viewport(400.0, 300.0), &cfg).top_y, 40.0);
        assert_eq!(GoalGeometry::compute(&viewport(400.0, 1000.0), &cfg).top_y, 80.0);
    }

    #[test]
    fn inner_bounds_and_posts() {
        let cfg = ShootoutConfig::default();
        let goal = GoalGeometry::compute(&viewport(400.0, 800.0), &cfg);
        // width 220, thickness 12: opening spans 200 ± 98.
        assert_eq!(goal.inner_bounds(0.0), (102.0, 298.0));
        assert_eq!(goal.inner_bounds(10.0), (112.0, 288.0));
        let [left, right] = goal.post_centers();
        assert_eq!(left.x, 96.0);
        assert_eq!(right.x, 304.0);
        assert_eq!(left.y, 64.0 + 55.0);
    }

    #[test]
    fn rest_position_sits_above_margin() {
        let cfg = ShootoutConfig::default();
        assert_eq!(rest_position(&viewport(400.0, 800.0), &cfg), Vec2::new(200.0, 654.0));
    }

    #[test]
    fn build_and_remove_leave_no_bodies_behind() {
        let cfg = ShootoutConfig::default();
        let mut ctx = EngineContext::new();
        let field = Field::build(&mut ctx, &viewport(400.0, 800.0), &cfg);

        assert_eq!(field.parts().len(), 8);
        assert_eq!(ctx.physics.body_count(), 8);
        assert_eq!(ctx.scene.ids_with_tag(TAG_GOAL_POST).len(), 2);
        assert_eq!(ctx.scene.ids_with_tag(TAG_WALL).len(), 4);
        let sensor = ctx.scene.find_by_tag(TAG_GOAL_SENSOR).unwrap();
        assert!(sensor.sprite.is_none());
        assert!(ctx.physics.is_sensor(sensor.body.as_ref().unwrap()));

        field.remove(&mut ctx);
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(ctx.scene.is_empty());
    }
}
