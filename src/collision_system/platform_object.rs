use super::aabb_object::AabbShape;
use super::actor::SweptActor;
use super::response::{CollisionResponse, RaycastHit};
use super::tile_layer::TileLayerShape;
use super::{ActorKey, PlatformKey};
use crate::geo::{Aabb, Ray};
use crate::utils::{P2, V2};

/// Where the owning platform is this tick and how far it moves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectFrame {
    pub position: P2,
    pub displacement: V2,
}

impl ObjectFrame {
    pub fn stationary(position: P2) -> ObjectFrame {
        ObjectFrame {
            position,
            displacement: V2::zeros(),
        }
    }

    pub fn end_position(&self) -> P2 {
        self.position + self.displacement
    }
}

/// Per shape collision queries. The defaults report no hit.
///
/// Layer masks and the enabled flag are checked by `PlatformObject` before a
/// shape is asked, implementations only do geometry.
pub trait PlatformGeometry {
    /// `actor` sweeps from `pos0` to `pos1` against the shape placed at the end of the platform's motion
    fn moving_actor_collision(
        &self,
        _frame: &ObjectFrame,
        _actor: &SweptActor,
        _project_collision: bool,
        _response: &mut CollisionResponse,
    ) {
    }

    /// the shape moves by `frame.displacement` into an actor standing at `pos0`
    fn moving_platform_collision(
        &self,
        _frame: &ObjectFrame,
        _actor: &SweptActor,
        _response: &mut CollisionResponse,
    ) {
    }

    fn raycast(&self, _origin: &P2, _ray: &Ray, _hit: &mut RaycastHit) {}

    fn rect_overlaps(&self, _origin: &P2, _rect: &Aabb) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlatformShape {
    Aabb(AabbShape),
    TileLayer(TileLayerShape),
}

impl PlatformGeometry for PlatformShape {
    fn moving_actor_collision(
        &self,
        frame: &ObjectFrame,
        actor: &SweptActor,
        project_collision: bool,
        response: &mut CollisionResponse,
    ) {
        match self {
            PlatformShape::Aabb(s) => s.moving_actor_collision(frame, actor, project_collision, response),
            PlatformShape::TileLayer(s) => s.moving_actor_collision(frame, actor, project_collision, response),
        }
    }

    fn moving_platform_collision(&self, frame: &ObjectFrame, actor: &SweptActor, response: &mut CollisionResponse) {
        match self {
            PlatformShape::Aabb(s) => s.moving_platform_collision(frame, actor, response),
            PlatformShape::TileLayer(s) => s.moving_platform_collision(frame, actor, response),
        }
    }

    fn raycast(&self, origin: &P2, ray: &Ray, hit: &mut RaycastHit) {
        match self {
            PlatformShape::Aabb(s) => s.raycast(origin, ray, hit),
            PlatformShape::TileLayer(s) => s.raycast(origin, ray, hit),
        }
    }

    fn rect_overlaps(&self, origin: &P2, rect: &Aabb) -> bool {
        match self {
            PlatformShape::Aabb(s) => s.rect_overlaps(origin, rect),
            PlatformShape::TileLayer(s) => s.rect_overlaps(origin, rect),
        }
    }
}

/// How riders follow a moving platform object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Carry {
    /// riders move exactly like the platform
    Rigid,
    /// riders only follow the horizontal part of the motion
    Horizontal,
    /// (rider position, platform displacement) -> new rider position
    Custom(fn(P2, V2) -> P2),
}

impl Carry {
    pub fn apply(self, position: P2, displacement: V2) -> P2 {
        match self {
            Carry::Rigid => position + displacement,
            Carry::Horizontal => position + V2::new(displacement.x, 0.0),
            Carry::Custom(f) => f(position, displacement),
        }
    }
}

/// One collidable shape of a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformObject {
    pub(crate) platform: Option<PlatformKey>,
    pub(crate) collision_layers: u32,
    pub(crate) enabled: bool,
    pub(crate) shape: PlatformShape,
    pub carry: Carry,
    pub(crate) attached: Vec<ActorKey>,
}

impl PlatformObject {
    pub fn new(shape: PlatformShape) -> PlatformObject {
        PlatformObject {
            platform: None,
            collision_layers: 1,
            enabled: true,
            shape,
            carry: Carry::Rigid,
            attached: Vec::new(),
        }
    }

    pub fn aabb(offset: V2, half_extents: V2) -> PlatformObject {
        PlatformObject::new(PlatformShape::Aabb(AabbShape::new(offset, half_extents)))
    }

    pub fn tile_layer(layer: TileLayerShape) -> PlatformObject {
        PlatformObject::new(PlatformShape::TileLayer(layer))
    }

    pub fn with_collision_layers(mut self, layers: u32) -> PlatformObject {
        self.collision_layers = layers;
        self
    }

    pub fn with_carry(mut self, carry: Carry) -> PlatformObject {
        self.carry = carry;
        self
    }

    pub fn platform(&self) -> Option<PlatformKey> {
        self.platform
    }

    pub fn collision_layers(&self) -> u32 {
        self.collision_layers
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn shape(&self) -> &PlatformShape {
        &self.shape
    }

    /// only moving platform objects can carry actors
    pub fn is_moving(&self) -> bool {
        match self.shape {
            PlatformShape::Aabb(_) => true,
            PlatformShape::TileLayer(_) => false,
        }
    }

    pub fn attached_actors(&self) -> &[ActorKey] {
        &self.attached
    }

    pub fn accepts(&self, collision_mask: u32) -> bool {
        self.enabled && collision_mask & self.collision_layers != 0
    }

    pub fn moving_actor_collision(
        &self,
        frame: &ObjectFrame,
        actor: &SweptActor,
        project_collision: bool,
        response: &mut CollisionResponse,
    ) {
        response.reset();
        if self.accepts(actor.collision_mask) {
            self.shape.moving_actor_collision(frame, actor, project_collision, response);
        }
    }

    pub fn moving_platform_collision(&self, frame: &ObjectFrame, actor: &SweptActor, response: &mut CollisionResponse) {
        response.reset();
        if self.is_moving() && self.accepts(actor.collision_mask) {
            self.shape.moving_platform_collision(frame, actor, response);
        }
    }

    pub fn raycast(&self, origin: &P2, ray: &Ray, collision_mask: u32, hit: &mut RaycastHit) {
        hit.reset();
        if self.accepts(collision_mask) {
            self.shape.raycast(origin, ray, hit);
        }
    }

    pub fn rect_overlaps(&self, origin: &P2, rect: &Aabb, collision_mask: u32) -> bool {
        self.accepts(collision_mask) && self.shape.rect_overlaps(origin, rect)
    }

    pub fn move_attached_actor(&self, position: P2, displacement: V2) -> P2 {
        self.carry.apply(position, displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Float;

    fn mover(mask: u32) -> SweptActor {
        SweptActor {
            pos0: P2::new(90.0, 0.0),
            pos1: P2::new(100.0, 0.0),
            offset: V2::zeros(),
            half_extents: V2::new(5.0, 5.0),
            collision_mask: mask,
        }
    }

    fn wall(layers: u32) -> PlatformObject {
        PlatformObject::aabb(V2::new(10.0, 0.0), V2::new(10.0, 10.0)).with_collision_layers(layers)
    }

    #[quickcheck]
    fn hits_only_with_shared_layer_bits(mask: u32, layers: u32) -> bool {
        let object = wall(layers);
        let frame = ObjectFrame::stationary(P2::new(100.0, 0.0));
        let mut response = CollisionResponse::default();
        object.moving_actor_collision(&frame, &mover(mask), false, &mut response);
        let rect = Aabb::from_edges(105.0, -1.0, 110.0, 1.0);
        let overlaps = object.rect_overlaps(&frame.position, &rect, mask);
        let compatible = mask & layers != 0;
        response.hit == compatible && overlaps == compatible
    }

    #[test]
    fn disabled_object_never_hits() {
        let mut object = wall(u32::MAX);
        object.enabled = false;
        let frame = ObjectFrame::stationary(P2::new(100.0, 0.0));
        let mut response = CollisionResponse::default();
        object.moving_actor_collision(&frame, &mover(u32::MAX), false, &mut response);
        assert!(!response.hit);
        assert!(!object.rect_overlaps(&frame.position, &Aabb::from_edges(105.0, -1.0, 110.0, 1.0), u32::MAX));
        let mut hit = RaycastHit::default();
        let ray = Ray::new(P2::new(0.0, 0.0), V2::new(1.0, 0.0), 200.0).unwrap();
        object.raycast(&frame.position, &ray, u32::MAX, &mut hit);
        assert!(!hit.hit);
    }

    #[test]
    fn carry_behaviours() {
        let p = P2::new(1.0, 2.0);
        let d = V2::new(3.0, -1.0);
        assert_eq!(Carry::Rigid.apply(p, d), P2::new(4.0, 1.0));
        assert_eq!(Carry::Horizontal.apply(p, d), P2::new(4.0, 2.0));
        fn double(p: P2, d: V2) -> P2 {
            p + d * (2.0 as Float)
        }
        assert_eq!(Carry::Custom(double).apply(p, d), P2::new(7.0, 0.0));
    }
}
