extern crate nalgebra as na;

use super::*;

/// Finite ray, `length` is the maximum distance travelled from `origin`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Ray {
    origin: P2,
    direction: U2,
    length: Float,
}

impl Ray {
    /// `None` if `direction` has no length
    pub fn new(origin: P2, direction: V2, length: Float) -> Option<Ray> {
        Unit::try_new(direction, 0.0).map(|direction| Ray {
            origin,
            direction,
            length,
        })
    }

    pub fn get_direction(&self) -> U2 {
        self.direction
    }

    /// the whole ray as one displacement vector
    pub fn span(&self) -> V2 {
        self.direction.into_inner() * self.length
    }

    pub fn eval_at_t(&self, t: Float) -> P2 {
        self.origin + self.span() * t
    }

    pub fn bounds(&self) -> Aabb {
        let end = self.eval_at_t(1.0);
        Aabb::from_edges(
            self.origin.x.min(end.x),
            self.origin.y.min(end.y),
            self.origin.x.max(end.x),
            self.origin.y.max(end.y),
        )
    }
}

impl HasOrigin for Ray {
    fn get_origin(&self) -> P2 {
        self.origin
    }
    fn set_origin(&mut self, origin: P2) {
        self.origin = origin;
    }
}

impl Distribution<Ray> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Ray {
        let origin = rng.gen();
        let angle: Float = rng.gen_range(0.0..std::f64::consts::TAU);
        Ray {
            origin,
            direction: Unit::new_normalize(V2::new(angle.cos(), angle.sin())),
            length: rng.gen_range(0.1..10.0),
        }
    }
}
