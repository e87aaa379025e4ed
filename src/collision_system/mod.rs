pub mod aabb_object;
pub mod actor;
pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod platform;
pub mod platform_object;
pub mod pool;
pub mod response;
pub mod tile_layer;
pub mod world;

pub use aabb_object::AabbShape;
pub use actor::{Actor, SweptActor};
pub use config::{CollisionConfig, ConfigError, UpDirection};
pub use error::CollisionError;
pub use events::{Attachment, CollisionEvent, CollisionListener, Contact};
pub use handler::{CollisionHandler, MAX_RESOLVE_PASSES};
pub use platform::Platform;
pub use platform_object::{Carry, ObjectFrame, PlatformGeometry, PlatformObject, PlatformShape};
pub use pool::{ResponseKey, ResponsePool};
pub use response::{CollisionResponse, CollisionType, Crush, RaycastHit};
pub use tile_layer::TileLayerShape;
pub use world::CollisionWorld;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct ActorKey;
    pub struct PlatformKey;
    pub struct PlatformObjectKey;
}

/// Handle of the external entity that owns an actor or a platform.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// what kind of body an entity carries
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Body {
    Actor(ActorKey),
    Platform(PlatformKey),
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Body::Actor(_) => write!(f, "actor"),
            Body::Platform(_) => write!(f, "platform"),
        }
    }
}
