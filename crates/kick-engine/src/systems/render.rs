use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Inactive and sprite-less entities are skipped; the rest are ordered by
/// layer (stable within a layer), so the host can draw front to back in one pass.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut visible: Vec<&Entity> = entities
        .filter(|e| e.active && e.sprite.is_some())
        .collect();
    visible.sort_by_key(|e| e.layer.as_u8());

    for entity in visible {
        let sprite = match &entity.sprite {
            Some(s) => s,
            None => continue,
        };
        let size = entity.drawn_size();

        let instance = RenderInstance::new(
            entity.pos.x,
            entity.pos.y,
            entity.rotation,
            size.x,
            size.y,
            sprite.kind.code(),
            sprite.alpha,
            entity.layer.as_u8() as f32,
            sprite.kind.rgb(),
        );

        if !buffer.push(instance) {
            log::warn!("render buffer full ({} instances), dropping the rest", buffer.capacity());
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::layer::RenderLayer;
    use crate::components::sprite::SpriteComponent;
    use glam::Vec2;

    #[test]
    fn build_buffer_orders_by_layer() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(10.0, 20.0))
                .with_size(Vec2::splat(52.0))
                .with_layer(RenderLayer::Ball)
                .with_sprite(SpriteComponent::texture()),
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(30.0, 40.0))
                .with_size(Vec2::new(12.0, 110.0))
                .with_layer(RenderLayer::Structures)
                .with_sprite(SpriteComponent::fill(1.0, 1.0, 1.0)),
            Entity::new(EntityId(3))
                .with_layer(RenderLayer::Background)
                .with_sprite(SpriteComponent::fill(0.1, 0.5, 0.2)),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 3);
        let layers: Vec<f32> = buffer.instances.iter().map(|i| i.layer).collect();
        assert_eq!(layers, vec![0.0, 1.0, 2.0]);
        assert_eq!(buffer.instances[2].x, 10.0);
        assert_eq!(buffer.instances[2].sprite, 0.0);
        assert_eq!(buffer.instances[1].sprite, 1.0);
    }

    #[test]
    fn visual_scale_is_applied_to_size() {
        let mut ball = Entity::new(EntityId(1))
            .with_size(Vec2::splat(52.0))
            .with_sprite(SpriteComponent::texture());
        ball.visual_scale = 0.5;

        let mut buffer = RenderBuffer::new();
        build_render_buffer(std::iter::once(&ball), &mut buffer);
        assert_eq!(buffer.instances[0].width, 26.0);
        assert_eq!(buffer.instances[0].height, 26.0);
    }

    #[test]
    fn inactive_and_invisible_entities_are_skipped() {
        let mut hidden = Entity::new(EntityId(1)).with_sprite(SpriteComponent::default());
        hidden.active = false;
        let sensor = Entity::new(EntityId(2)).with_tag("goal-sensor");

        let entities = vec![hidden, sensor];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
