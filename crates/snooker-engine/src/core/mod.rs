pub mod geometry;
pub mod notice;
pub mod physics;
#[cfg(feature = "physics")]
pub mod rapier;
pub mod time;
