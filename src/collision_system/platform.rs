use super::{EntityId, PlatformObjectKey};
use crate::utils::{Float, NEAR_ZERO_DELTA_TIME, P2, V2};

/// A static or moving body owning one or more platform objects.
#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    entity: EntityId,
    pub position: P2,
    pub velocity: V2,
    pub(crate) objects: Vec<PlatformObjectKey>,
}

impl Platform {
    pub fn new(entity: EntityId, position: P2) -> Platform {
        Platform {
            entity,
            position,
            velocity: V2::zeros(),
            objects: Vec::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: V2) -> Platform {
        self.velocity = velocity;
        self
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn objects(&self) -> &[PlatformObjectKey] {
        &self.objects
    }

    pub fn displacement(&self, delta_time: Float) -> V2 {
        self.velocity * delta_time
    }

    /// Chooses the velocity that lands the platform on `target` after the next
    /// tick of `delta_time`. For a near zero frame time the platform is placed
    /// on `target` right away and stops.
    pub fn set_velocity_for_next_position(&mut self, target: P2, delta_time: Float) {
        if delta_time < NEAR_ZERO_DELTA_TIME {
            self.position = target;
            self.velocity = V2::zeros();
        } else {
            self.velocity = (target - self.position) / delta_time;
        }
    }

    pub(crate) fn advance(&mut self, delta_time: Float) {
        self.position += self.displacement(delta_time);
    }
}
