use anyhow::{Result, bail};
use collision::BoxCollider;
use macroquad::math::{Mat4, Vec3};
use slotmap::{SlotMap, new_key_type};

use super::{COLLIDER_PROBE, FLOOR_PROBE};
use crate::config::{BodyConfig, BoxConfig, KitchenObjectConfig, SceneConfig};

new_key_type! {
    /// Key for kitchen objects.
    pub struct ObjectKey;
}

/// What an ant needs to know about the world around it.
pub trait WorldQuery {
    /// True if a step from `position` along `direction` would drop below the
    /// floor or run into a collider. Door colliders only count while their
    /// object is closed.
    fn intersects(&self, position: Vec3, direction: Vec3) -> bool;

    /// True if `position` lies in the trigger of a container that is closed.
    fn is_dying(&self, position: Vec3) -> bool;
}

/// Collider list of one mesh.
#[derive(Debug, Clone, Default)]
pub struct Body {
    pub colliders: Vec<BoxCollider>,
}

impl Body {
    pub fn new(colliders: Vec<BoxCollider>) -> Self {
        Self { colliders }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.colliders.iter().any(|c| c.is_inside(point))
    }

    pub fn transform(&mut self, m: Mat4) {
        for collider in &mut self.colliders {
            collider.trans(m);
        }
    }
}

/// An appliance the ants can walk into. The door only blocks while the
/// object is closed, and the trigger only kills while it is closed.
#[derive(Debug, Clone, Default)]
pub struct KitchenObject {
    pub name: String,
    pub body: Option<Body>,
    pub door: Option<Body>,
    pub trigger: Option<BoxCollider>,
    pub closed: bool,
}

impl KitchenObject {
    pub fn blocks(&self, point: Vec3) -> bool {
        let hits = |body: &Option<Body>| body.as_ref().is_some_and(|b| b.contains(point));
        hits(&self.body) || (self.closed && hits(&self.door))
    }

    pub fn is_lethal_at(&self, point: Vec3) -> bool {
        self.closed && self.trigger.as_ref().is_some_and(|t| t.is_inside(point))
    }

    /// Moves every collider the object owns.
    pub fn transform(&mut self, m: Mat4) {
        for body in [&mut self.body, &mut self.door].into_iter().flatten() {
            body.transform(m);
        }
        if let Some(trigger) = &mut self.trigger {
            trigger.trans(m);
        }
    }
}

/// The scene: a floor plane, static room bodies and the kitchen objects.
pub struct Kitchen {
    pub floor_height: f32,
    room: Vec<Body>,
    objects: SlotMap<ObjectKey, KitchenObject>,
}

impl Kitchen {
    pub fn new(floor_height: f32) -> Self {
        Self {
            floor_height,
            room: Vec::new(),
            objects: SlotMap::with_key(),
        }
    }

    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        let mut kitchen = Self::new(config.floor_height);
        for body in &config.room {
            kitchen.add_room_body(build_body(body));
        }
        for object in &config.objects {
            if kitchen.find(&object.name).is_some() {
                bail!("kitchen object '{}' is defined twice", object.name);
            }
            kitchen.add_object(build_object(object));
        }
        Ok(kitchen)
    }

    pub fn add_room_body(&mut self, body: Body) {
        self.room.push(body);
    }

    pub fn add_object(&mut self, object: KitchenObject) -> ObjectKey {
        self.objects.insert(object)
    }

    pub fn find(&self, name: &str) -> Option<ObjectKey> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(key, _)| key)
    }

    pub fn object(&self, key: ObjectKey) -> Option<&KitchenObject> {
        self.objects.get(key)
    }

    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut KitchenObject> {
        self.objects.get_mut(key)
    }

    /// Opens or closes an object. Returns false if the key is stale.
    pub fn set_closed(&mut self, key: ObjectKey, closed: bool) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => {
                object.closed = closed;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &KitchenObject)> {
        self.objects.iter()
    }

    pub fn room(&self) -> &[Body] {
        &self.room
    }
}

impl WorldQuery for Kitchen {
    fn intersects(&self, position: Vec3, direction: Vec3) -> bool {
        if (position + direction * FLOOR_PROBE).y <= self.floor_height {
            return true;
        }
        let probe = position + direction * COLLIDER_PROBE;
        self.objects.values().any(|o| o.blocks(probe))
            || self.room.iter().any(|b| b.contains(probe))
    }

    fn is_dying(&self, position: Vec3) -> bool {
        self.objects.values().any(|o| o.is_lethal_at(position))
    }
}

fn build_box(config: &BoxConfig) -> BoxCollider {
    BoxCollider::new(Vec3::from_array(config.min), Vec3::from_array(config.max))
}

fn build_colliders(boxes: &[BoxConfig]) -> Option<Body> {
    if boxes.is_empty() {
        None
    } else {
        Some(Body::new(boxes.iter().map(build_box).collect()))
    }
}

fn build_body(config: &BodyConfig) -> Body {
    let mut body = Body::new(config.colliders.iter().map(build_box).collect());
    body.transform(Mat4::from_translation(Vec3::from_array(config.position)));
    body
}

fn build_object(config: &KitchenObjectConfig) -> KitchenObject {
    let mut object = KitchenObject {
        name: config.name.clone(),
        body: build_colliders(&config.body),
        door: build_colliders(&config.door),
        trigger: config.trigger.as_ref().map(build_box),
        closed: config.closed,
    };
    object.transform(Mat4::from_translation(Vec3::from_array(config.position)));
    object
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: Vec3, half: f32) -> BoxCollider {
        BoxCollider::new(center - Vec3::splat(half), center + Vec3::splat(half))
    }

    fn oven() -> KitchenObject {
        KitchenObject {
            name: "oven".to_string(),
            body: Some(Body::new(vec![cube(Vec3::new(0.0, 0.0, 10.0), 1.0)])),
            door: Some(Body::new(vec![cube(Vec3::new(0.0, 0.0, 5.0), 0.5)])),
            trigger: Some(cube(Vec3::new(5.0, 0.0, 0.0), 1.0)),
            closed: false,
        }
    }

    #[test]
    fn test_floor_plane_blocks_downwards() {
        let kitchen = Kitchen::new(-1.0);
        assert!(kitchen.intersects(Vec3::new(0.0, -0.5, 0.0), Vec3::NEG_Y));
        assert!(!kitchen.intersects(Vec3::new(0.0, 0.0, 0.0), Vec3::NEG_Y));
        assert!(!kitchen.intersects(Vec3::new(0.0, -0.5, 0.0), Vec3::X));
    }

    #[test]
    fn test_room_body_probe_one_unit_ahead() {
        let mut kitchen = Kitchen::new(-100.0);
        kitchen.add_room_body(Body::new(vec![cube(Vec3::new(0.0, 0.0, 3.0), 0.5)]));
        assert!(kitchen.intersects(Vec3::new(0.0, 0.0, 2.0), Vec3::Z));
        assert!(!kitchen.intersects(Vec3::new(0.0, 0.0, 1.0), Vec3::Z));
    }

    #[test]
    fn test_door_blocks_only_when_closed() {
        let mut kitchen = Kitchen::new(-100.0);
        let key = kitchen.add_object(oven());
        let in_front_of_door = Vec3::new(0.0, 0.0, 4.0);
        assert!(!kitchen.intersects(in_front_of_door, Vec3::Z));
        assert!(kitchen.set_closed(key, true));
        assert!(kitchen.intersects(in_front_of_door, Vec3::Z));
        assert!(kitchen.intersects(Vec3::new(0.0, 0.0, 9.0), Vec3::Z), "body always blocks");
    }

    #[test]
    fn test_trigger_is_lethal_only_when_closed() {
        let mut kitchen = Kitchen::new(-100.0);
        let key = kitchen.add_object(oven());
        let inside = Vec3::new(5.0, 0.0, 0.0);
        assert!(!kitchen.is_dying(inside));
        kitchen.set_closed(key, true);
        assert!(kitchen.is_dying(inside));
        assert!(!kitchen.is_dying(Vec3::ZERO));
    }

    #[test]
    fn test_objects_without_parts_never_collide() {
        let mut kitchen = Kitchen::new(-100.0);
        kitchen.add_object(KitchenObject {
            name: "shelf".to_string(),
            closed: true,
            ..Default::default()
        });
        assert!(!kitchen.intersects(Vec3::ZERO, Vec3::X));
        assert!(!kitchen.is_dying(Vec3::ZERO));
    }

    #[test]
    fn test_from_config_places_objects() {
        let kitchen = Kitchen::from_config(&SceneConfig::default()).expect("default scene");
        let key = kitchen.find("microwave").expect("microwave exists");
        let microwave = kitchen.object(key).expect("live key");
        let trigger = microwave.trigger.expect("microwave has a trigger");
        assert!(trigger.is_inside(Vec3::new(4.0, 1.5, 0.0)));
        assert_eq!(kitchen.room().len(), 2);
        assert!(kitchen.find("fridge").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = SceneConfig::default();
        let copy = config.objects[0].clone();
        config.objects.push(copy);
        assert!(Kitchen::from_config(&config).is_err());
    }
}
