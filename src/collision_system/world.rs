use super::actor::Actor;
use super::config::{CollisionConfig, ConfigError};
use super::error::CollisionError;
use super::events::{Attachment, CollisionEvent, CollisionListener, Contact};
use super::platform::Platform;
use super::platform_object::{ObjectFrame, PlatformObject};
use super::response::{CollisionResponse, RaycastHit};
use super::{ActorKey, Body, EntityId, PlatformKey, PlatformObjectKey};
use crate::geo::{Aabb, Ray};
use crate::utils::{Float, P2};
use log::debug;
use slotmap::{Key, SecondaryMap, SlotMap};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::vec::Drain;

/// Keys in registration order. Removal leaves a hole that iteration skips,
/// holes are squeezed out once they outnumber the live keys.
pub(crate) struct RegistrationOrder<K: Key> {
    slots: Vec<Option<K>>,
    index: SecondaryMap<K, usize>,
}

impl<K: Key> RegistrationOrder<K> {
    fn new() -> Self {
        RegistrationOrder {
            slots: Vec::new(),
            index: SecondaryMap::new(),
        }
    }

    fn push(&mut self, key: K) {
        self.index.insert(key, self.slots.len());
        self.slots.push(Some(key));
    }

    fn remove(&mut self, key: K) {
        if let Some(slot) = self.index.remove(key).and_then(|i| self.slots.get_mut(i)) {
            *slot = None;
        }
        if self.slots.len() > 2 * self.index.len() + 16 {
            self.compact();
        }
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (i, key) in self.slots.iter().flatten().enumerate() {
            self.index.insert(*key, i);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.iter().filter_map(|key| *key)
    }
}

/// Owns every actor, platform and platform object.
///
/// Bodies are stored in slotmaps, iteration always follows registration
/// order. Attach/detach events are queued here and handed out by
/// `drain_events` or `dispatch_events`.
pub struct CollisionWorld {
    config: CollisionConfig,
    pub(crate) actors: SlotMap<ActorKey, Actor>,
    pub(crate) actor_order: RegistrationOrder<ActorKey>,
    pub(crate) platforms: SlotMap<PlatformKey, Platform>,
    pub(crate) platform_order: RegistrationOrder<PlatformKey>,
    pub(crate) objects: SlotMap<PlatformObjectKey, PlatformObject>,
    pub(crate) object_order: RegistrationOrder<PlatformObjectKey>,
    entities: HashMap<EntityId, Body>,
    events: Vec<CollisionEvent>,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        CollisionWorld::with_valid_config(CollisionConfig::default())
    }
}

impl CollisionWorld {
    pub fn new(config: CollisionConfig) -> Result<CollisionWorld, ConfigError> {
        config.validate()?;
        Ok(CollisionWorld::with_valid_config(config))
    }

    fn with_valid_config(config: CollisionConfig) -> CollisionWorld {
        CollisionWorld {
            config,
            actors: SlotMap::with_key(),
            actor_order: RegistrationOrder::new(),
            platforms: SlotMap::with_key(),
            platform_order: RegistrationOrder::new(),
            objects: SlotMap::with_key(),
            object_order: RegistrationOrder::new(),
            entities: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CollisionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn check_entity_free(&self, entity: EntityId) -> Result<(), CollisionError> {
        match self.entities.get(&entity) {
            Some(owner) => Err(CollisionError::EntityOccupied(entity, *owner)),
            None => Ok(()),
        }
    }

    // ---- actors ----

    pub fn add_actor(&mut self, mut actor: Actor) -> Result<ActorKey, CollisionError> {
        self.check_entity_free(actor.entity())?;
        actor.attached = None;
        let entity = actor.entity();
        let key = self.actors.insert(actor);
        self.entities.insert(entity, Body::Actor(key));
        self.actor_order.push(key);
        Ok(key)
    }

    pub fn remove_actor(&mut self, key: ActorKey) -> Result<Actor, CollisionError> {
        self.detach_actor(key)?;
        let actor = self.actors.remove(key).ok_or(CollisionError::UnknownActor(key))?;
        self.actor_order.remove(key);
        self.entities.remove(&actor.entity());
        Ok(actor)
    }

    pub fn actor(&self, key: ActorKey) -> Option<&Actor> {
        self.actors.get(key)
    }

    pub fn actor_mut(&mut self, key: ActorKey) -> Option<&mut Actor> {
        self.actors.get_mut(key)
    }

    pub fn actor_of(&self, entity: EntityId) -> Option<ActorKey> {
        match self.entities.get(&entity) {
            Some(Body::Actor(key)) => Some(*key),
            _ => None,
        }
    }

    pub fn enable_actor(&mut self, key: ActorKey) -> Result<(), CollisionError> {
        self.actors.get_mut(key).ok_or(CollisionError::UnknownActor(key))?.enabled = true;
        Ok(())
    }

    /// Disabled actors are skipped by the handler and by queries, and lose their platform.
    pub fn disable_actor(&mut self, key: ActorKey) -> Result<(), CollisionError> {
        self.detach_actor(key)?;
        self.actors.get_mut(key).ok_or(CollisionError::UnknownActor(key))?.enabled = false;
        Ok(())
    }

    pub fn for_each_actor<F: FnMut(ActorKey, &Actor)>(&self, mut f: F) {
        for key in self.actor_order.iter() {
            if let Some(actor) = self.actors.get(key) {
                f(key, actor);
            }
        }
    }

    // ---- platforms ----

    pub fn add_platform(&mut self, mut platform: Platform) -> Result<PlatformKey, CollisionError> {
        self.check_entity_free(platform.entity())?;
        platform.objects.clear();
        let entity = platform.entity();
        let key = self.platforms.insert(platform);
        self.entities.insert(entity, Body::Platform(key));
        self.platform_order.push(key);
        Ok(key)
    }

    /// Removes the platform together with all of its platform objects.
    pub fn remove_platform(&mut self, key: PlatformKey) -> Result<Platform, CollisionError> {
        let objects = self
            .platforms
            .get(key)
            .ok_or(CollisionError::UnknownPlatform(key))?
            .objects
            .clone();
        for object in objects {
            self.remove_platform_object(object)?;
        }
        let platform = self.platforms.remove(key).ok_or(CollisionError::UnknownPlatform(key))?;
        self.platform_order.remove(key);
        self.entities.remove(&platform.entity());
        Ok(platform)
    }

    pub fn platform(&self, key: PlatformKey) -> Option<&Platform> {
        self.platforms.get(key)
    }

    pub fn platform_mut(&mut self, key: PlatformKey) -> Option<&mut Platform> {
        self.platforms.get_mut(key)
    }

    pub fn platform_of(&self, entity: EntityId) -> Option<PlatformKey> {
        match self.entities.get(&entity) {
            Some(Body::Platform(key)) => Some(*key),
            _ => None,
        }
    }

    pub fn for_each_platform<F: FnMut(PlatformKey, &Platform)>(&self, mut f: F) {
        for key in self.platform_order.iter() {
            if let Some(platform) = self.platforms.get(key) {
                f(key, platform);
            }
        }
    }

    pub fn set_velocity_for_next_position(
        &mut self,
        key: PlatformKey,
        target: P2,
        delta_time: Float,
    ) -> Result<(), CollisionError> {
        self.platforms
            .get_mut(key)
            .ok_or(CollisionError::UnknownPlatform(key))?
            .set_velocity_for_next_position(target, delta_time);
        Ok(())
    }

    /// Sets the layers of every object of the platform.
    pub fn set_platform_collision_layers(&mut self, key: PlatformKey, layers: u32) -> Result<(), CollisionError> {
        let platform = self.platforms.get(key).ok_or(CollisionError::UnknownPlatform(key))?;
        for &object in &platform.objects {
            if let Some(object) = self.objects.get_mut(object) {
                object.collision_layers = layers;
            }
        }
        Ok(())
    }

    pub(crate) fn advance_platforms(&mut self, delta_time: Float) {
        for key in self.platform_order.iter() {
            if let Some(platform) = self.platforms.get_mut(key) {
                platform.advance(delta_time);
            }
        }
    }

    // ---- platform objects ----

    pub fn add_platform_object(
        &mut self,
        platform: PlatformKey,
        mut object: PlatformObject,
    ) -> Result<PlatformObjectKey, CollisionError> {
        let owner = self.platforms.get_mut(platform).ok_or(CollisionError::UnknownPlatform(platform))?;
        object.platform = Some(platform);
        object.attached.clear();
        let key = self.objects.insert(object);
        owner.objects.push(key);
        self.object_order.push(key);
        Ok(key)
    }

    pub fn remove_platform_object(&mut self, key: PlatformObjectKey) -> Result<PlatformObject, CollisionError> {
        self.detach_all_actors(key)?;
        let object = self.objects.remove(key).ok_or(CollisionError::UnknownPlatformObject(key))?;
        self.object_order.remove(key);
        if let Some(platform) = object.platform.and_then(|p| self.platforms.get_mut(p)) {
            platform.objects.retain(|k| *k != key);
        }
        Ok(object)
    }

    pub fn platform_object(&self, key: PlatformObjectKey) -> Option<&PlatformObject> {
        self.objects.get(key)
    }

    pub fn platform_object_mut(&mut self, key: PlatformObjectKey) -> Option<&mut PlatformObject> {
        self.objects.get_mut(key)
    }

    pub fn enable_platform_object(&mut self, key: PlatformObjectKey) -> Result<(), CollisionError> {
        self.objects
            .get_mut(key)
            .ok_or(CollisionError::UnknownPlatformObject(key))?
            .enabled = true;
        Ok(())
    }

    /// Disabled objects are invisible to every query. Riders are detached.
    pub fn disable_platform_object(&mut self, key: PlatformObjectKey) -> Result<(), CollisionError> {
        self.detach_all_actors(key)?;
        self.objects
            .get_mut(key)
            .ok_or(CollisionError::UnknownPlatformObject(key))?
            .enabled = false;
        Ok(())
    }

    pub fn for_each_platform_object<F: FnMut(PlatformObjectKey, &PlatformObject)>(&self, mut f: F) {
        for key in self.object_order.iter() {
            if let Some(object) = self.objects.get(key) {
                f(key, object);
            }
        }
    }

    /// Position of the owning platform now and its motion over `delta_time`.
    pub fn object_frame(&self, key: PlatformObjectKey, delta_time: Float) -> Option<ObjectFrame> {
        let platform = self.platforms.get(self.objects.get(key)?.platform?)?;
        Some(ObjectFrame {
            position: platform.position,
            displacement: platform.displacement(delta_time),
        })
    }

    // ---- attachment ----

    /// Attaches `actor` to a moving platform object. An actor rides at most one
    /// object, a previous attachment is released first.
    pub fn attach_actor(&mut self, actor: ActorKey, object: PlatformObjectKey) -> Result<(), CollisionError> {
        let a = self.actors.get(actor).ok_or(CollisionError::UnknownActor(actor))?;
        let o = self.objects.get(object).ok_or(CollisionError::UnknownPlatformObject(object))?;
        if !o.is_moving() {
            return Err(CollisionError::NotMovable(object));
        }
        if !a.enabled {
            return Err(CollisionError::Disabled(format!("actor {:?}", actor)));
        }
        if !o.enabled {
            return Err(CollisionError::Disabled(format!("platform object {:?}", object)));
        }
        if a.attached == Some(object) {
            return Ok(());
        }
        self.detach_actor(actor)?;

        if let Some(o) = self.objects.get_mut(object) {
            o.attached.push(actor);
        }
        if let Some(a) = self.actors.get_mut(actor) {
            a.attached = Some(object);
        }
        debug!("actor {:?} attached to platform object {:?}", actor, object);
        if let Some(attachment) = self.attachment(actor, object) {
            self.events.push(CollisionEvent::PlatformAttach(attachment));
        }
        Ok(())
    }

    /// Returns the object the actor was riding, if any.
    pub fn detach_actor(&mut self, actor: ActorKey) -> Result<Option<PlatformObjectKey>, CollisionError> {
        let a = self.actors.get_mut(actor).ok_or(CollisionError::UnknownActor(actor))?;
        let object = match a.attached.take() {
            Some(object) => object,
            None => return Ok(None),
        };
        if let Some(o) = self.objects.get_mut(object) {
            o.attached.retain(|k| *k != actor);
        }
        debug!("actor {:?} detached from platform object {:?}", actor, object);
        if let Some(attachment) = self.attachment(actor, object) {
            self.events.push(CollisionEvent::PlatformDetach(attachment));
        }
        Ok(Some(object))
    }

    /// Detaches the riders of `object`, most recently attached first.
    pub fn detach_all_actors(&mut self, object: PlatformObjectKey) -> Result<(), CollisionError> {
        let riders = self
            .objects
            .get(object)
            .ok_or(CollisionError::UnknownPlatformObject(object))?
            .attached
            .clone();
        for &actor in riders.iter().rev() {
            self.detach_actor(actor)?;
        }
        Ok(())
    }

    /// Carries an attached actor along with its platform's motion over `delta_time`
    /// and returns the actor's new position.
    pub fn move_attached_actor(&mut self, actor: ActorKey, delta_time: Float) -> Result<P2, CollisionError> {
        let position = self
            .carried_position(actor, delta_time)
            .ok_or(CollisionError::UnknownActor(actor))?;
        if let Some(a) = self.actors.get_mut(actor) {
            a.position = position;
        }
        Ok(position)
    }

    /// Where the platform the actor rides would carry it, without moving it.
    pub(crate) fn carried_position(&self, actor: ActorKey, delta_time: Float) -> Option<P2> {
        let a = self.actors.get(actor)?;
        let carried = a.attached.and_then(|object| {
            let frame = self.object_frame(object, delta_time)?;
            Some(self.objects.get(object)?.move_attached_actor(a.position, frame.displacement))
        });
        Some(carried.unwrap_or(a.position))
    }

    fn attachment(&self, actor: ActorKey, object: PlatformObjectKey) -> Option<Attachment> {
        let platform = self.platforms.get(self.objects.get(object)?.platform?)?;
        Some(Attachment {
            actor,
            object,
            actor_entity: self.actors.get(actor)?.entity(),
            platform_entity: platform.entity(),
        })
    }

    /// `None` once either side is gone.
    pub(crate) fn contact(
        &self,
        actor: ActorKey,
        object: PlatformObjectKey,
        response: &CollisionResponse,
    ) -> Option<Contact> {
        let platform = self.platforms.get(self.objects.get(object)?.platform?)?;
        Some(Contact {
            actor,
            object,
            actor_entity: self.actors.get(actor)?.entity(),
            platform_entity: platform.entity(),
            response: *response,
        })
    }

    // ---- queries ----

    /// Every enabled actor on a layer of `collision_mask` hit by `ray`. `hits`
    /// is cleared and refilled nearest first, the number of hits is returned.
    pub fn raycast_all_actors_non_alloc(&self, ray: &Ray, collision_mask: u32, hits: &mut Vec<RaycastHit>) -> usize {
        hits.clear();
        let mut hit = RaycastHit::default();
        for key in self.actor_order.iter() {
            if let Some(actor) = self.actors.get(key) {
                actor.raycast(&mut hit, ray, collision_mask);
                if hit.hit {
                    hit.actor = Some(key);
                    hits.push(hit);
                }
            }
        }
        sort_nearest_first(hits);
        hits.len()
    }

    pub fn raycast_all_platform_objects_non_alloc(
        &self,
        ray: &Ray,
        collision_mask: u32,
        hits: &mut Vec<RaycastHit>,
    ) -> usize {
        hits.clear();
        let mut hit = RaycastHit::default();
        for key in self.object_order.iter() {
            let (object, frame) = match (self.objects.get(key), self.object_frame(key, 0.0)) {
                (Some(object), Some(frame)) => (object, frame),
                _ => continue,
            };
            object.raycast(&frame.position, ray, collision_mask, &mut hit);
            if hit.hit {
                hit.platform_object = Some(key);
                hits.push(hit);
            }
        }
        sort_nearest_first(hits);
        hits.len()
    }

    /// Platform objects strictly overlapping `rect`, in registration order.
    pub fn rect_overlap_all_platform_objects_non_alloc(
        &self,
        rect: &Aabb,
        collision_mask: u32,
        found: &mut Vec<PlatformObjectKey>,
    ) -> usize {
        found.clear();
        for key in self.object_order.iter() {
            if let (Some(object), Some(frame)) = (self.objects.get(key), self.object_frame(key, 0.0)) {
                if object.rect_overlaps(&frame.position, rect, collision_mask) {
                    found.push(key);
                }
            }
        }
        found.len()
    }

    // ---- events ----

    pub(crate) fn push_event(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    pub fn pending_events(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Drain<CollisionEvent> {
        self.events.drain(..)
    }

    /// Delivers and clears the queued events, returns how many were delivered.
    pub fn dispatch_events<L: CollisionListener + ?Sized>(&mut self, listener: &mut L) -> usize {
        let count = self.events.len();
        for event in self.events.drain(..) {
            event.dispatch(listener);
        }
        count
    }
}

// stable, so equal distances keep registration order
fn sort_nearest_first(hits: &mut Vec<RaycastHit>) {
    hits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_system::TileLayerShape;
    use crate::utils::V2;

    fn world_with_lift() -> (CollisionWorld, PlatformKey, PlatformObjectKey) {
        let mut world = CollisionWorld::default();
        let platform = world.add_platform(Platform::new(EntityId(100), P2::new(0.0, 0.0))).unwrap();
        let object = world
            .add_platform_object(platform, PlatformObject::aabb(V2::zeros(), V2::new(10.0, 1.0)))
            .unwrap();
        (world, platform, object)
    }

    fn rider(world: &mut CollisionWorld, id: u64) -> ActorKey {
        world
            .add_actor(Actor::new(EntityId(id), P2::new(0.0, -6.0), V2::new(5.0, 5.0)))
            .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CollisionConfig {
            max_resolve_passes: 0,
            ..CollisionConfig::default()
        };
        assert!(CollisionWorld::new(config.clone()).is_err());
        let mut world = CollisionWorld::default();
        assert!(world.set_config(config).is_err());
        assert_eq!(world.config(), &CollisionConfig::default());
    }

    #[test]
    fn an_entity_owns_one_body() {
        let (mut world, _, _) = world_with_lift();
        let actor = rider(&mut world, 1);
        assert_eq!(
            world.add_platform(Platform::new(EntityId(1), P2::origin())),
            Err(CollisionError::EntityOccupied(EntityId(1), Body::Actor(actor)))
        );
        assert!(world
            .add_actor(Actor::new(EntityId(1), P2::origin(), V2::new(1.0, 1.0)))
            .is_err());
        assert_eq!(world.actor_of(EntityId(1)), Some(actor));
        world.remove_actor(actor).unwrap();
        assert_eq!(world.actor_of(EntityId(1)), None);
        assert!(world.add_platform(Platform::new(EntityId(1), P2::origin())).is_ok());
        assert_eq!(world.remove_actor(actor).unwrap_err(), CollisionError::UnknownActor(actor));
    }

    #[test]
    fn attaching_moves_the_actor_between_objects() {
        let (mut world, platform, first) = world_with_lift();
        let second = world
            .add_platform_object(platform, PlatformObject::aabb(V2::new(30.0, 0.0), V2::new(10.0, 1.0)))
            .unwrap();
        let actor = rider(&mut world, 1);
        world.attach_actor(actor, first).unwrap();
        world.attach_actor(actor, first).unwrap();
        world.attach_actor(actor, second).unwrap();
        assert_eq!(world.actor(actor).unwrap().attached_moving_platform_object(), Some(second));
        assert!(world.platform_object(first).unwrap().attached_actors().is_empty());
        assert_eq!(world.platform_object(second).unwrap().attached_actors(), &[actor]);

        let kinds: Vec<_> = world
            .drain_events()
            .filter_map(|e| match e {
                CollisionEvent::PlatformAttach(a) => Some(("attach", a.object)),
                CollisionEvent::PlatformDetach(a) => Some(("detach", a.object)),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![("attach", first), ("detach", first), ("attach", second)]);
        assert!(world.pending_events().is_empty());
    }

    #[test]
    fn attach_is_refused_for_tile_layers_and_disabled_bodies() {
        let (mut world, platform, object) = world_with_lift();
        let tiles = world
            .add_platform_object(
                platform,
                PlatformObject::tile_layer(TileLayerShape::new(V2::zeros(), V2::new(8.0, 8.0), 2, 2)),
            )
            .unwrap();
        let actor = rider(&mut world, 1);
        assert_eq!(world.attach_actor(actor, tiles), Err(CollisionError::NotMovable(tiles)));
        world.disable_platform_object(object).unwrap();
        assert!(matches!(world.attach_actor(actor, object), Err(CollisionError::Disabled(_))));
        world.enable_platform_object(object).unwrap();
        world.disable_actor(actor).unwrap();
        assert!(matches!(world.attach_actor(actor, object), Err(CollisionError::Disabled(_))));
    }

    #[test]
    fn disabling_an_object_detaches_riders_back_to_front() {
        let (mut world, _, object) = world_with_lift();
        let a = rider(&mut world, 1);
        let b = rider(&mut world, 2);
        world.attach_actor(a, object).unwrap();
        world.attach_actor(b, object).unwrap();
        world.drain_events();
        world.disable_platform_object(object).unwrap();
        let detached: Vec<_> = world
            .drain_events()
            .filter_map(|e| match e {
                CollisionEvent::PlatformDetach(d) => Some(d.actor),
                _ => None,
            })
            .collect();
        assert_eq!(detached, vec![b, a]);
        assert_eq!(world.actor(a).unwrap().attached_moving_platform_object(), None);
        assert!(!world.platform_object(object).unwrap().is_enabled());
    }

    #[test]
    fn removing_a_platform_removes_its_objects() {
        let (mut world, platform, object) = world_with_lift();
        let actor = rider(&mut world, 1);
        world.attach_actor(actor, object).unwrap();
        world.remove_platform(platform).unwrap();
        assert!(world.platform_object(object).is_none());
        assert!(world.platform(platform).is_none());
        assert_eq!(world.platform_of(EntityId(100)), None);
        assert_eq!(world.actor(actor).unwrap().attached_moving_platform_object(), None);
        let mut count = 0;
        world.for_each_platform_object(|_, _| count += 1);
        assert_eq!(count, 0);
        assert_eq!(
            world.add_platform_object(platform, PlatformObject::aabb(V2::zeros(), V2::new(1.0, 1.0))),
            Err(CollisionError::UnknownPlatform(platform))
        );
    }

    #[test]
    fn attached_actor_follows_its_platform() {
        let (mut world, platform, object) = world_with_lift();
        let actor = rider(&mut world, 1);
        world.platform_mut(platform).unwrap().velocity = V2::new(8.0, -4.0);
        assert_eq!(world.move_attached_actor(actor, 0.5).unwrap(), P2::new(0.0, -6.0));
        world.attach_actor(actor, object).unwrap();
        assert_eq!(world.move_attached_actor(actor, 0.5).unwrap(), P2::new(4.0, -8.0));
        assert_eq!(world.actor(actor).unwrap().position, P2::new(4.0, -8.0));
    }

    #[test]
    fn layers_and_next_position() {
        let (mut world, platform, object) = world_with_lift();
        world.set_platform_collision_layers(platform, 4).unwrap();
        assert_eq!(world.platform_object(object).unwrap().collision_layers(), 4);
        world.set_velocity_for_next_position(platform, P2::new(5.0, 0.0), 0.5).unwrap();
        assert_eq!(world.platform(platform).unwrap().velocity, V2::new(10.0, 0.0));
    }

    #[test]
    fn raycasts_report_nearest_first() {
        let mut world = CollisionWorld::default();
        let far = world.add_platform(Platform::new(EntityId(10), P2::new(50.0, 0.0))).unwrap();
        let near = world.add_platform(Platform::new(EntityId(11), P2::new(20.0, 0.0))).unwrap();
        let far_box = world
            .add_platform_object(far, PlatformObject::aabb(V2::zeros(), V2::new(5.0, 5.0)))
            .unwrap();
        let near_box = world
            .add_platform_object(near, PlatformObject::aabb(V2::zeros(), V2::new(5.0, 5.0)))
            .unwrap();
        let other_layer = world
            .add_platform_object(near, PlatformObject::aabb(V2::new(-10.0, 0.0), V2::new(1.0, 1.0)).with_collision_layers(2))
            .unwrap();
        let actor = world
            .add_actor(Actor::new(EntityId(1), P2::new(35.0, 0.0), V2::new(1.0, 1.0)))
            .unwrap();

        let ray = Ray::new(P2::origin(), V2::new(1.0, 0.0), 100.0).unwrap();
        let mut hits = vec![RaycastHit::default(); 3];
        assert_eq!(world.raycast_all_platform_objects_non_alloc(&ray, 1, &mut hits), 2);
        assert_eq!(hits[0].platform_object, Some(near_box));
        assert_eq!(hits[1].platform_object, Some(far_box));
        assert_eq!(hits[0].point, P2::new(15.0, 0.0));
        assert!(hits[0].t < hits[1].t);

        assert_eq!(world.raycast_all_actors_non_alloc(&ray, 1, &mut hits), 1);
        assert_eq!(hits[0].actor, Some(actor));

        let mut found = Vec::new();
        let rect = Aabb::from_edges(0.0, -1.0, 100.0, 1.0);
        assert_eq!(world.rect_overlap_all_platform_objects_non_alloc(&rect, u32::MAX, &mut found), 3);
        assert_eq!(found, vec![far_box, near_box, other_layer]);
        assert_eq!(world.rect_overlap_all_platform_objects_non_alloc(&rect, 2, &mut found), 1);
    }

    #[test]
    fn removal_keeps_order_and_reclaims_holes() {
        let mut world = CollisionWorld::default();
        let keys: Vec<_> = (0..100)
            .map(|i| world.add_actor(Actor::new(EntityId(i), P2::origin(), V2::new(1.0, 1.0))).unwrap())
            .collect();
        for key in keys.iter().filter(|k| !keys[10..15].contains(k)) {
            world.remove_actor(*key).unwrap();
        }
        assert_eq!(world.actor_order.iter().collect::<Vec<_>>(), keys[10..15].to_vec());
        assert!(world.actor_order.slots.len() <= 2 * 5 + 16);
        let late = world
            .add_actor(Actor::new(EntityId(200), P2::origin(), V2::new(1.0, 1.0)))
            .unwrap();
        world.remove_actor(keys[12]).unwrap();
        let mut seen = Vec::new();
        world.for_each_actor(|key, _| seen.push(key));
        assert_eq!(seen, vec![keys[10], keys[11], keys[13], keys[14], late]);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut world = CollisionWorld::default();
        let keys: Vec<_> = (0..4)
            .map(|i| world.add_actor(Actor::new(EntityId(i), P2::origin(), V2::new(1.0, 1.0))).unwrap())
            .collect();
        world.remove_actor(keys[1]).unwrap();
        let mut seen = Vec::new();
        world.for_each_actor(|key, _| seen.push(key));
        assert_eq!(seen, vec![keys[0], keys[2], keys[3]]);
        let mut platforms = 0;
        world.for_each_platform(|_, _| platforms += 1);
        assert_eq!(platforms, 0);
    }
}
