extern crate nalgebra as na;

use super::*;
use serde::{Deserialize, Serialize};

/// Axis aligned box. The y axis grows downward, so `top` is the smaller y.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Aabb {
    // origin is in the middle
    pub origin: P2,
    pub half_width: Float,
    pub half_height: Float,
}

impl Aabb {
    pub fn new(origin: P2, half_extents: V2) -> Aabb {
        Aabb {
            origin,
            half_width: half_extents.x,
            half_height: half_extents.y,
        }
    }

    pub fn from_edges(left: Float, top: Float, right: Float, bottom: Float) -> Aabb {
        Aabb {
            origin: P2::new((left + right) * 0.5, (top + bottom) * 0.5),
            half_width: (right - left) * 0.5,
            half_height: (bottom - top) * 0.5,
        }
    }

    pub fn left(&self) -> Float {
        self.origin.x - self.half_width
    }

    pub fn right(&self) -> Float {
        self.origin.x + self.half_width
    }

    pub fn top(&self) -> Float {
        self.origin.y - self.half_height
    }

    pub fn bottom(&self) -> Float {
        self.origin.y + self.half_height
    }

    pub fn half_extents(&self) -> V2 {
        V2::new(self.half_width, self.half_height)
    }

    pub fn translated(&self, v: &V2) -> Aabb {
        Aabb {
            origin: self.origin + v,
            ..*self
        }
    }

    /// smallest box containing both `self` and `other`
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// open overlap test, boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.intersect(other).is_some()
    }
}

impl Intersect<Aabb> for Aabb {
    type Intersection = ();

    fn intersect(&self, other: &Aabb) -> Option<()> {
        let p = self.origin - other.origin;
        let w2 = self.half_width + other.half_width;
        let h2 = self.half_height + other.half_height;
        if Float::abs(p.x) < w2 && Float::abs(p.y) < h2 {
            Some(())
        } else {
            None
        }
    }
}

impl HasOrigin for Aabb {
    fn get_origin(&self) -> P2 {
        self.origin
    }
    fn set_origin(&mut self, origin: P2) {
        self.origin = origin;
    }
}

impl Contains for Aabb {
    fn contains(&self, p: &P2) -> bool {
        let trans = p - self.origin;
        Float::abs(trans.x) < self.half_width && Float::abs(trans.y) < self.half_height
    }
}

impl Distribution<Aabb> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Aabb {
        Aabb {
            origin: rng.gen(),
            half_width: rng.gen(),
            half_height: rng.gen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_screen_coordinates() {
        let b = Aabb::new(P2::new(110.0, 0.0), V2::new(10.0, 10.0));
        assert_eq!(b.left(), 100.0);
        assert_eq!(b.right(), 120.0);
        assert_eq!(b.top(), -10.0);
        assert_eq!(b.bottom(), 10.0);
        assert_eq!(Aabb::from_edges(100.0, -10.0, 120.0, 10.0), b);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::from_edges(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_edges(10.0, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&b.translated(&V2::new(-0.5, 0.0))));
    }

    #[test]
    fn overlap_is_symmetric() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let a: Aabb = rng.gen();
            let b: Aabb = rng.gen();
            assert_eq!(a.overlaps(&b), b.overlaps(&a));
            let m = a.merged(&b);
            assert!(m.left() <= a.left() && m.right() >= b.right());
        }
    }

    #[test]
    fn contains_excludes_border() {
        let a = Aabb::from_edges(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&P2::new(5.0, 5.0)));
        assert!(!a.contains(&P2::new(0.0, 5.0)));
    }
}
