use super::{ActorKey, PlatformObjectKey};
use crate::utils::{Float, P2, V2};

/// How a collision was resolved.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CollisionType {
    /// actor stops where it hit
    Bullet,
    /// actor slides along the face for the rest of the frame
    Project,
    /// actor was already inside the object, never produced by the swept queries
    Intersect,
    /// a moving platform ran into a stationary actor
    MovingPlatform,
}

/// Outcome of one swept query.
///
/// `time` is the fraction of the frame at which contact happens, it may be
/// slightly negative (down to `-EPSILON`) for grazing contact. `normal` points
/// from the platform object into the actor.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CollisionResponse {
    pub hit: bool,
    pub actor: Option<ActorKey>,
    pub platform_object: Option<PlatformObjectKey>,
    pub time: Float,
    pub reposition: P2,
    pub reposition_project: P2,
    pub point: P2,
    pub normal: V2,
    pub kind: CollisionType,
}

impl Default for CollisionResponse {
    fn default() -> Self {
        CollisionResponse {
            hit: false,
            actor: None,
            platform_object: None,
            time: Float::INFINITY,
            reposition: P2::origin(),
            reposition_project: P2::origin(),
            point: P2::origin(),
            normal: V2::zeros(),
            kind: CollisionType::Bullet,
        }
    }
}

impl CollisionResponse {
    pub fn reset(&mut self) {
        *self = CollisionResponse::default();
    }

    /// where the actor continues from after this collision
    pub fn resolved_position(&self, project_collision: bool) -> P2 {
        if project_collision {
            self.reposition_project
        } else {
            self.reposition
        }
    }
}

/// Outcome of a ray query. `t` is the fraction of the ray length.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RaycastHit {
    pub hit: bool,
    pub point: P2,
    pub t: Float,
    pub normal: V2,
    pub actor: Option<ActorKey>,
    pub platform_object: Option<PlatformObjectKey>,
}

impl Default for RaycastHit {
    fn default() -> Self {
        RaycastHit {
            hit: false,
            point: P2::origin(),
            t: Float::INFINITY,
            normal: V2::zeros(),
            actor: None,
            platform_object: None,
        }
    }
}

impl RaycastHit {
    pub fn reset(&mut self) {
        *self = RaycastHit::default();
    }

    /// keeps the nearer of `self` and a candidate hit
    pub(crate) fn offer(&mut self, t: Float, point: P2, normal: V2) {
        if t < self.t {
            self.hit = true;
            self.t = t;
            self.point = point;
            self.normal = normal;
        }
    }
}

/// Two collisions of the same actor in the same tick pushing from diverging sides.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Crush {
    pub first: CollisionResponse,
    pub second: CollisionResponse,
    /// radians between the two normals
    pub angle: Float,
}

impl Crush {
    /// `Some` if the normals of `a` and `b` are more than `threshold` radians apart
    pub fn between(a: &CollisionResponse, b: &CollisionResponse, threshold: Float) -> Option<Crush> {
        let (na, nb) = (a.normal.try_normalize(0.0)?, b.normal.try_normalize(0.0)?);
        let angle = na.dot(&nb).max(-1.0).min(1.0).acos();
        if angle > threshold {
            Some(Crush {
                first: *a,
                second: *b,
                angle,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn with_normal(x: Float, y: Float) -> CollisionResponse {
        CollisionResponse {
            hit: true,
            normal: V2::new(x, y),
            ..CollisionResponse::default()
        }
    }

    #[test]
    fn opposite_normals_crush() {
        let crush = Crush::between(&with_normal(0.0, -1.0), &with_normal(0.0, 1.0), PI * 0.75).unwrap();
        assert_relative_eq!(crush.angle, PI);
    }

    #[test]
    fn perpendicular_normals_do_not_crush() {
        assert!(Crush::between(&with_normal(0.0, -1.0), &with_normal(1.0, 0.0), PI * 0.75).is_none());
        assert!(Crush::between(&with_normal(0.0, 0.0), &with_normal(1.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn raycast_hit_keeps_nearest() {
        let mut hit = RaycastHit::default();
        hit.offer(0.75, P2::new(1.0, 0.0), V2::new(-1.0, 0.0));
        hit.offer(0.25, P2::new(2.0, 0.0), V2::new(0.0, -1.0));
        hit.offer(0.5, P2::new(3.0, 0.0), V2::new(0.0, 1.0));
        assert!(hit.hit);
        assert_eq!(hit.t, 0.25);
        assert_eq!(hit.point, P2::new(2.0, 0.0));
        hit.reset();
        assert!(!hit.hit);
    }
}
