use super::response::RaycastHit;
use super::{aabb_object, EntityId, PlatformObjectKey};
use crate::geo::{Aabb, Ray};
use crate::utils::{Float, P2, V2};
use std::f64::consts::FRAC_PI_4;

/// A moving rectangular body.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    entity: EntityId,
    pub position: P2,
    pub velocity: V2,
    /// center of the bounding box relative to `position`
    pub offset: V2,
    pub half_extents: V2,
    /// layers this actor collides with
    pub collision_mask: u32,
    /// layers this actor is found on by raycasts and overlap queries
    pub collision_layers: u32,
    pub gravity_scale: Float,
    pub wind: V2,
    pub project_collision: bool,
    pub zero_velocity_on_collision: bool,
    /// radians
    pub crush_angle_threshold: Float,
    pub auto_attach: bool,
    pub team: u32,
    pub(crate) enabled: bool,
    pub(crate) attached: Option<PlatformObjectKey>,
}

impl Actor {
    pub fn new(entity: EntityId, position: P2, half_extents: V2) -> Actor {
        Actor {
            entity,
            position,
            velocity: V2::zeros(),
            offset: V2::zeros(),
            half_extents,
            collision_mask: u32::MAX,
            collision_layers: 1,
            gravity_scale: 1.0,
            wind: V2::zeros(),
            project_collision: true,
            zero_velocity_on_collision: true,
            crush_angle_threshold: 3.0 * FRAC_PI_4,
            auto_attach: true,
            team: 0,
            enabled: true,
            attached: None,
        }
    }

    pub fn with_velocity(mut self, velocity: V2) -> Actor {
        self.velocity = velocity;
        self
    }

    pub fn with_offset(mut self, offset: V2) -> Actor {
        self.offset = offset;
        self
    }

    pub fn with_collision_mask(mut self, mask: u32) -> Actor {
        self.collision_mask = mask;
        self
    }

    pub fn with_project_collision(mut self, project: bool) -> Actor {
        self.project_collision = project;
        self
    }

    pub fn with_zero_velocity_on_collision(mut self, zero: bool) -> Actor {
        self.zero_velocity_on_collision = zero;
        self
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn attached_moving_platform_object(&self) -> Option<PlatformObjectKey> {
        self.attached
    }

    pub fn rect(&self) -> Aabb {
        self.rect_at(&self.position)
    }

    pub fn rect_at(&self, position: &P2) -> Aabb {
        Aabb::new(position + self.offset, self.half_extents)
    }

    /// ray against this actor's box, a ray starting inside reports nothing
    pub fn raycast(&self, hit: &mut RaycastHit, ray: &Ray, collision_mask: u32) {
        hit.reset();
        if !self.enabled || collision_mask & self.collision_layers == 0 {
            return;
        }
        aabb_object::raycast_box(&self.rect(), ray, aabb_object::Faces::ALL, hit);
    }

    pub fn rect_overlaps(&self, rect: &Aabb, collision_mask: u32) -> bool {
        self.enabled && collision_mask & self.collision_layers != 0 && self.rect().overlaps(rect)
    }

    pub(crate) fn swept(&self, pos0: P2, pos1: P2) -> SweptActor {
        SweptActor {
            pos0,
            pos1,
            offset: self.offset,
            half_extents: self.half_extents,
            collision_mask: self.collision_mask,
        }
    }
}

/// Motion of an actor over one resolve pass.
///
/// Platform pushes treat the actor as standing still at `pos0`; `pos1` is only
/// used there to keep the actor's own motion on the free axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweptActor {
    pub pos0: P2,
    pub pos1: P2,
    pub offset: V2,
    pub half_extents: V2,
    pub collision_mask: u32,
}

impl SweptActor {
    pub fn displacement(&self) -> V2 {
        self.pos1 - self.pos0
    }

    pub fn bounds_at(&self, position: &P2) -> Aabb {
        Aabb::new(position + self.offset, self.half_extents)
    }

    /// box covering the whole motion
    pub fn swept_bounds(&self) -> Aabb {
        self.bounds_at(&self.pos0).merged(&self.bounds_at(&self.pos1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_uses_offset() {
        let actor = Actor::new(EntityId(1), P2::new(10.0, 10.0), V2::new(5.0, 2.0)).with_offset(V2::new(0.0, -2.0));
        let r = actor.rect();
        assert_eq!(r.left(), 5.0);
        assert_eq!(r.top(), 6.0);
        assert_eq!(r.bottom(), 10.0);
    }

    #[test]
    fn raycast_respects_layers() {
        let actor = Actor::new(EntityId(1), P2::new(10.0, 0.0), V2::new(2.0, 2.0));
        let ray = Ray::new(P2::origin(), V2::new(1.0, 0.0), 20.0).unwrap();
        let mut hit = RaycastHit::default();
        actor.raycast(&mut hit, &ray, 1);
        assert!(hit.hit);
        assert_eq!(hit.point, P2::new(8.0, 0.0));
        actor.raycast(&mut hit, &ray, 2);
        assert!(!hit.hit);
    }

    #[test]
    fn overlap_respects_layers() {
        let actor = Actor::new(EntityId(1), P2::origin(), V2::new(2.0, 2.0));
        let rect = Aabb::from_edges(1.0, 1.0, 3.0, 3.0);
        assert!(actor.rect_overlaps(&rect, 1));
        assert!(!actor.rect_overlaps(&rect, 4));
    }
}
