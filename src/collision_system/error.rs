use super::{ActorKey, Body, EntityId, PlatformKey, PlatformObjectKey};

/// Misuse of the world api. The resolver itself never fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("actor {0:?} is not registered")]
    UnknownActor(ActorKey),

    #[error("platform {0:?} is not registered")]
    UnknownPlatform(PlatformKey),

    #[error("platform object {0:?} is not registered")]
    UnknownPlatformObject(PlatformObjectKey),

    /// an entity carries either one actor or one platform
    #[error("{0} already owns a {1}")]
    EntityOccupied(EntityId, Body),

    #[error("platform object {0:?} cannot carry actors")]
    NotMovable(PlatformObjectKey),

    #[error("{0} is disabled")]
    Disabled(String),
}
