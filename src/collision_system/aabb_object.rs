//! Swept box vs box collision.
//!
//! Every query solves, per axis, the time at which the leading edge of the
//! moving box reaches the facing edge of the other box. A candidate time is
//! accepted when it lies in `(-EPSILON, 1]` and the boxes overlap on the
//! other axis at that time. X candidates are tried before Y candidates.
//! Boxes that already overlap at the start of the motion are not reported.

use super::actor::SweptActor;
use super::platform_object::{ObjectFrame, PlatformGeometry};
use super::response::{CollisionResponse, CollisionType, RaycastHit};
use crate::geo::*;
use serde::{Deserialize, Serialize};

/// Which faces of a box can be hit.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Faces {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Faces {
    pub const ALL: Faces = Faces {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };
}

/// Contact found by `sweep`. `normal` points from the target toward the mover.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SweepHit {
    pub time: Float,
    pub normal: V2,
    pub point: P2,
}

/// `mover` travels by `d` while `target` stands still.
pub fn sweep(mover: &Aabb, d: &V2, target: &Aabb, faces: Faces) -> Option<SweepHit> {
    sweep_x(mover, d, target, faces).or_else(|| sweep_y(mover, d, target, faces))
}

fn valid_time(t: Float) -> bool {
    t > -EPSILON && t <= 1.0
}

fn sweep_x(mover: &Aabb, d: &V2, target: &Aabb, faces: Faces) -> Option<SweepHit> {
    let (t, face, normal) = if d.x > 0.0 && faces.left {
        ((target.left() - mover.right()) / d.x, target.left(), -1.0)
    } else if d.x < 0.0 && faces.right {
        ((target.right() - mover.left()) / d.x, target.right(), 1.0)
    } else {
        return None;
    };
    if !valid_time(t) {
        return None;
    }
    let top = mover.top() + d.y * t;
    let bottom = mover.bottom() + d.y * t;
    if !spans_overlap(top, bottom, target.top(), target.bottom(), EPSILON) {
        return None;
    }
    Some(SweepHit {
        time: t,
        normal: V2::new(normal, 0.0),
        point: P2::new(face, span_midpoint(top, bottom, target.top(), target.bottom())),
    })
}

fn sweep_y(mover: &Aabb, d: &V2, target: &Aabb, faces: Faces) -> Option<SweepHit> {
    let (t, face, normal) = if d.y > 0.0 && faces.top {
        ((target.top() - mover.bottom()) / d.y, target.top(), -1.0)
    } else if d.y < 0.0 && faces.bottom {
        ((target.bottom() - mover.top()) / d.y, target.bottom(), 1.0)
    } else {
        return None;
    };
    if !valid_time(t) {
        return None;
    }
    let left = mover.left() + d.x * t;
    let right = mover.right() + d.x * t;
    if !spans_overlap(left, right, target.left(), target.right(), EPSILON) {
        return None;
    }
    Some(SweepHit {
        time: t,
        normal: V2::new(0.0, normal),
        point: P2::new(span_midpoint(left, right, target.left(), target.right()), face),
    })
}

/// Fills `response` for an actor that ran into a face.
pub(crate) fn resolve_actor_hit(
    actor: &SweptActor,
    hit: &SweepHit,
    project_collision: bool,
    response: &mut CollisionResponse,
) {
    let at_contact = actor.pos0 + actor.displacement() * hit.time;
    let reposition = at_contact + hit.normal * (2.0 * EPSILON);
    response.hit = true;
    response.time = hit.time;
    response.normal = hit.normal;
    response.point = hit.point;
    response.reposition = reposition;
    if project_collision {
        response.reposition_project = with_normal_coordinate(actor.pos1, &reposition, &hit.normal);
        response.kind = CollisionType::Project;
    } else {
        response.reposition_project = reposition;
        response.kind = CollisionType::Bullet;
    }
}

// `target` with its coordinate on the axis of `normal` taken from `flush`
fn with_normal_coordinate(target: P2, flush: &P2, normal: &V2) -> P2 {
    if normal.x != 0.0 {
        P2::new(flush.x, target.y)
    } else {
        P2::new(target.x, flush.y)
    }
}

// actor at pos0 moved out of `platform` along `normal`, resting 2 * EPSILON away
fn pushed_position(actor: &SweptActor, platform: &Aabb, normal: &V2) -> P2 {
    let gap = 2.0 * EPSILON;
    let mut p = actor.pos0;
    if normal.x > 0.0 {
        p.x = platform.right() + gap - actor.offset.x + actor.half_extents.x;
    } else if normal.x < 0.0 {
        p.x = platform.left() - gap - actor.offset.x - actor.half_extents.x;
    } else if normal.y > 0.0 {
        p.y = platform.bottom() + gap - actor.offset.y + actor.half_extents.y;
    } else {
        p.y = platform.top() - gap - actor.offset.y - actor.half_extents.y;
    }
    p
}

// keeps `target` unless `pushed` is further along `normal`
fn not_behind(target: P2, pushed: &P2, normal: &V2) -> P2 {
    let mut p = target;
    if normal.x != 0.0 {
        if (pushed.x - p.x) * normal.x > 0.0 {
            p.x = pushed.x;
        }
    } else if (pushed.y - p.y) * normal.y > 0.0 {
        p.y = pushed.y;
    }
    p
}

/// Nearest entry into `b`, rays starting inside `b` report nothing.
pub(crate) fn raycast_box(b: &Aabb, ray: &Ray, faces: Faces, hit: &mut RaycastHit) {
    if b.contains(&ray.get_origin()) {
        return;
    }
    let d = ray.span();
    let mut offer = |segment: LineSegment, normal: V2| {
        if let Some((t, p)) = ray.intersect(&segment) {
            hit.offer(t, p, normal);
        }
    };
    if d.x > 0.0 && faces.left {
        offer(LineSegment::vertical(b.left(), b.top(), b.bottom()), V2::new(-1.0, 0.0));
    }
    if d.x < 0.0 && faces.right {
        offer(LineSegment::vertical(b.right(), b.top(), b.bottom()), V2::new(1.0, 0.0));
    }
    if d.y > 0.0 && faces.top {
        offer(LineSegment::horizontal(b.top(), b.left(), b.right()), V2::new(0.0, -1.0));
    }
    if d.y < 0.0 && faces.bottom {
        offer(LineSegment::horizontal(b.bottom(), b.left(), b.right()), V2::new(0.0, 1.0));
    }
}

/// Box in platform local space. Can carry actors.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AabbShape {
    pub offset: V2,
    pub half_extents: V2,
}

impl AabbShape {
    pub fn new(offset: V2, half_extents: V2) -> AabbShape {
        AabbShape { offset, half_extents }
    }

    pub fn bounds_at(&self, origin: &P2) -> Aabb {
        Aabb::new(origin + self.offset, self.half_extents)
    }
}

impl PlatformGeometry for AabbShape {
    fn moving_actor_collision(
        &self,
        frame: &ObjectFrame,
        actor: &SweptActor,
        project_collision: bool,
        response: &mut CollisionResponse,
    ) {
        let target = self.bounds_at(&frame.end_position());
        let start = actor.bounds_at(&actor.pos0);
        if let Some(hit) = sweep(&start, &actor.displacement(), &target, Faces::ALL) {
            resolve_actor_hit(actor, &hit, project_collision, response);
        }
    }

    fn moving_platform_collision(&self, frame: &ObjectFrame, actor: &SweptActor, response: &mut CollisionResponse) {
        let d = frame.displacement;
        if d.x == 0.0 && d.y == 0.0 {
            return;
        }
        let start = self.bounds_at(&frame.position);
        let standing = actor.bounds_at(&actor.pos0);
        if let Some(hit) = sweep(&start, &d, &standing, Faces::ALL) {
            let normal = -hit.normal;
            let pushed = pushed_position(actor, &self.bounds_at(&frame.end_position()), &normal);
            response.hit = true;
            response.time = hit.time;
            response.normal = normal;
            response.point = hit.point;
            response.reposition = pushed;
            response.reposition_project = not_behind(actor.pos1, &pushed, &normal);
            response.kind = CollisionType::MovingPlatform;
        }
    }

    fn raycast(&self, origin: &P2, ray: &Ray, hit: &mut RaycastHit) {
        raycast_box(&self.bounds_at(origin), ray, Faces::ALL, hit);
    }

    fn rect_overlaps(&self, origin: &P2, rect: &Aabb) -> bool {
        self.bounds_at(origin).overlaps(rect)
    }
}
