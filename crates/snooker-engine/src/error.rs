use thiserror::Error;

use crate::balls::BallRole;

/// Failures raised by a physics backend while building bodies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertices do not span a convex hull")]
    DegeneratePolygon,
}

/// A layout generator could not place every requested ball.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("no free spot for a {role:?} ball after {attempts} attempts ({placed} balls already placed)")]
    NoSpace {
        role: BallRole,
        placed: usize,
        attempts: u32,
    },
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Top-level error for building and driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
