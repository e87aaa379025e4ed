pub mod aabb;
pub mod line_segment;
pub mod ray;
pub mod traits;

extern crate nalgebra as na;

pub use crate::utils::*;
pub use aabb::*;
pub use line_segment::*;
pub use na::Unit;
pub use rand::distributions::{Distribution, Standard};
pub use rand::Rng;
pub use ray::*;
pub use traits::*;
