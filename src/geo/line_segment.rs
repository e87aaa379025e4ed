extern crate nalgebra as na;

use super::*;

/// Axis aligned segment, the building block of ray vs box queries.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LineSegment {
    /// y = `at`, x in `[from, to]`
    Horizontal { at: Float, from: Float, to: Float },
    /// x = `at`, y in `[from, to]`
    Vertical { at: Float, from: Float, to: Float },
}

impl LineSegment {
    pub fn horizontal(y: Float, x0: Float, x1: Float) -> LineSegment {
        LineSegment::Horizontal {
            at: y,
            from: x0.min(x1),
            to: x0.max(x1),
        }
    }

    pub fn vertical(x: Float, y0: Float, y1: Float) -> LineSegment {
        LineSegment::Vertical {
            at: x,
            from: y0.min(y1),
            to: y0.max(y1),
        }
    }

    pub fn length(&self) -> Float {
        match *self {
            LineSegment::Horizontal { from, to, .. } | LineSegment::Vertical { from, to, .. } => {
                to - from
            }
        }
    }
}

impl Intersect<LineSegment> for Ray {
    /// (t along the ray in `[0, 1]`, intersection point)
    type Intersection = (Float, P2);

    fn intersect(&self, ls: &LineSegment) -> Option<(Float, P2)> {
        let o = self.get_origin();
        let d = self.span();
        match *ls {
            LineSegment::Horizontal { at, from, to } => {
                if d.y == 0.0 {
                    return None;
                }
                let t = (at - o.y) / d.y;
                let x = o.x + d.x * t;
                if between(t, 0.0, 1.0) && between(x, from, to) {
                    Some((t, P2::new(x, at)))
                } else {
                    None
                }
            }
            LineSegment::Vertical { at, from, to } => {
                if d.x == 0.0 {
                    return None;
                }
                let t = (at - o.x) / d.x;
                let y = o.y + d.y * t;
                if between(t, 0.0, 1.0) && between(y, from, to) {
                    Some((t, P2::new(at, y)))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_hits_vertical_segment() {
        let ray = Ray::new(P2::new(0.0, 0.0), V2::new(1.0, 0.0), 20.0).unwrap();
        let (t, p) = ray.intersect(&LineSegment::vertical(10.0, -1.0, 1.0)).unwrap();
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(p.x, 10.0);
        assert!(ray.intersect(&LineSegment::vertical(30.0, -1.0, 1.0)).is_none());
        assert!(ray.intersect(&LineSegment::vertical(-5.0, -1.0, 1.0)).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(P2::new(0.0, 0.0), V2::new(1.0, 0.0), 20.0).unwrap();
        assert!(ray.intersect(&LineSegment::horizontal(0.0, 5.0, 6.0)).is_none());
        let ray = Ray::new(P2::new(0.0, 0.0), V2::new(1.0, 1.0), 20.0).unwrap();
        let (_, p) = ray.intersect(&LineSegment::horizontal(5.0, 0.0, 10.0)).unwrap();
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(LineSegment::horizontal(5.0, 10.0, 0.0).length(), 10.0);
    }
}
