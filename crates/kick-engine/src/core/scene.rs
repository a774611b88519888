use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Flat entity storage.
/// A shootout scene holds a ball, a goal and a few walls, so a Vec is plenty.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(16),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    /// Preserves insertion order, which is also draw order within a layer.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Tag of an entity, if it exists.
    pub fn tag_of(&self, id: EntityId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// IDs of every entity carrying the given tag.
    pub fn ids_with_tag(&self, tag: &str) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(EntityId(1)).map(|e| e.pos), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn despawn_keeps_order() {
        let mut scene = Scene::new();
        for i in 1..=4 {
            scene.spawn(Entity::new(EntityId(i)));
        }
        assert!(scene.despawn(EntityId(2)).is_some());
        assert!(scene.despawn(EntityId(2)).is_none());
        let ids: Vec<u32> = scene.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn tag_lookups() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("ball"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("wall"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("wall"));

        assert_eq!(scene.find_by_tag("ball").map(|e| e.id), Some(EntityId(1)));
        assert_eq!(scene.ids_with_tag("wall"), vec![EntityId(2), EntityId(3)]);
        assert_eq!(scene.tag_of(EntityId(3)), Some("wall"));
        assert_eq!(scene.tag_of(EntityId(9)), None);
    }
}
