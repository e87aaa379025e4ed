#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod collision_system;
pub mod geo;
pub mod utils;

pub use collision_system::*;
