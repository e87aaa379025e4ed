use super::response::{CollisionResponse, Crush};
use super::{ActorKey, EntityId, PlatformObjectKey};

/// An actor touching a platform object during a tick.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Contact {
    pub actor: ActorKey,
    pub object: PlatformObjectKey,
    pub actor_entity: EntityId,
    pub platform_entity: EntityId,
    pub response: CollisionResponse,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Attachment {
    pub actor: ActorKey,
    pub object: PlatformObjectKey,
    pub actor_entity: EntityId,
    pub platform_entity: EntityId,
}

/// Queued by `CollisionWorld`, delivered by `CollisionWorld::dispatch_events`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CollisionEvent {
    Enter(Contact),
    Stay(Contact),
    /// carries the last response of the pair
    Exit(Contact),
    PlatformAttach(Attachment),
    PlatformDetach(Attachment),
    Crush {
        actor: ActorKey,
        entity: EntityId,
        crush: Crush,
    },
}

impl CollisionEvent {
    /// Calls `listener` once for every entity the event concerns. Contacts and
    /// attachments go to the actor's entity first, then to the platform's.
    pub fn dispatch<L: CollisionListener + ?Sized>(&self, listener: &mut L) {
        match self {
            CollisionEvent::Enter(c) => {
                listener.on_collision_enter(c.actor_entity, &c.response);
                listener.on_collision_enter(c.platform_entity, &c.response);
            }
            CollisionEvent::Stay(c) => {
                listener.on_collision_stay(c.actor_entity, &c.response);
                listener.on_collision_stay(c.platform_entity, &c.response);
            }
            CollisionEvent::Exit(c) => {
                listener.on_collision_exit(c.actor_entity, &c.response);
                listener.on_collision_exit(c.platform_entity, &c.response);
            }
            CollisionEvent::PlatformAttach(a) => {
                listener.on_platform_attach(a.actor_entity, a.actor, a.object);
                listener.on_platform_attach(a.platform_entity, a.actor, a.object);
            }
            CollisionEvent::PlatformDetach(a) => {
                listener.on_platform_detach(a.actor_entity, a.actor, a.object);
                listener.on_platform_detach(a.platform_entity, a.actor, a.object);
            }
            CollisionEvent::Crush { entity, crush, .. } => listener.on_collision_crush(*entity, crush),
        }
    }
}

/// Receiver of collision messages. Every method defaults to doing nothing.
pub trait CollisionListener {
    fn on_collision_enter(&mut self, _entity: EntityId, _response: &CollisionResponse) {}

    fn on_collision_stay(&mut self, _entity: EntityId, _response: &CollisionResponse) {}

    fn on_collision_exit(&mut self, _entity: EntityId, _response: &CollisionResponse) {}

    fn on_platform_attach(&mut self, _entity: EntityId, _actor: ActorKey, _object: PlatformObjectKey) {}

    fn on_platform_detach(&mut self, _entity: EntityId, _actor: ActorKey, _object: PlatformObjectKey) {}

    fn on_collision_crush(&mut self, _entity: EntityId, _crush: &Crush) {}
}
