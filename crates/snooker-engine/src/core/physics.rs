//! Physics contract consumed by the rule engine.
//!
//! The rules never talk to a rigid-body library directly. They go through
//! [`PhysicsAdapter`], which `RapierWorld` implements for the real game and
//! [`HeadlessWorld`] implements for deterministic headless runs and tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Opaque identifier of a body inside a physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BodyHandle(pub u32);

/// Role tag attached to every body. Used only to classify contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BodyRole {
    CueBall,
    RedBall,
    ColorBall,
    Cushion,
}

/// A body handle together with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedBody {
    pub handle: BodyHandle,
    pub role: BodyRole,
}

/// A contact event between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: TaggedBody,
    pub b: TaggedBody,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// If one side has `role`, return the other side.
    pub fn other_than(&self, role: BodyRole) -> Option<TaggedBody> {
        if self.a.role == role {
            Some(self.b)
        } else if self.b.role == role {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Physical material properties for a body's collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Velocity decay of the body. Stands in for rolling resistance on the felt.
    #[serde(default)]
    pub linear_damping: f32,
}

impl Material {
    /// Snooker ball: bouncy, nearly frictionless.
    pub fn ball() -> Self {
        Self {
            restitution: 0.9,
            friction: 0.005,
            density: 0.05,
            linear_damping: 0.6,
        }
    }

    /// Cushion rubber.
    pub fn cushion() -> Self {
        Self {
            restitution: 0.5,
            friction: 0.1,
            density: 1.0,
            linear_damping: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::ball()
    }
}

/// The operations the rule engine needs from a rigid-body simulation.
///
/// Queries on a handle that no longer exists return `None`; mutations on one
/// are ignored.
pub trait PhysicsAdapter {
    /// Create a dynamic circular body.
    fn create_circle_body(
        &mut self,
        role: BodyRole,
        position: Vec2,
        radius: f32,
        material: Material,
    ) -> Result<BodyHandle, PhysicsError>;

    /// Create an immovable convex polygon body from world-space vertices.
    fn create_static_polygon_body(
        &mut self,
        role: BodyRole,
        vertices: &[Vec2],
        material: Material,
    ) -> Result<BodyHandle, PhysicsError>;

    /// Remove a body from the simulation.
    fn remove_body(&mut self, handle: BodyHandle);

    fn position(&self, handle: BodyHandle) -> Option<Vec2>;
    fn angle(&self, handle: BodyHandle) -> Option<f32>;
    fn velocity(&self, handle: BodyHandle) -> Option<Vec2>;
    fn angular_velocity(&self, handle: BodyHandle) -> Option<f32>;
    fn is_static(&self, handle: BodyHandle) -> Option<bool>;

    fn set_position(&mut self, handle: BodyHandle, position: Vec2);
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32);
    fn set_static(&mut self, handle: BodyHandle, is_static: bool);

    /// Kick a body with `force` applied at world point `point`.
    /// The kick is one-shot: it does not persist into later steps.
    fn apply_force(&mut self, handle: BodyHandle, force: Vec2, point: Vec2);

    /// Advance the simulation by `dt` seconds and append contact events.
    fn step(&mut self, dt: f32, events: &mut Vec<CollisionPair>);

    /// Number of bodies currently simulated.
    fn body_count(&self) -> usize;
}

/// Validate the shape arguments shared by every backend.
pub(crate) fn check_radius(radius: f32) -> Result<(), PhysicsError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidRadius(radius))
    }
}

pub(crate) fn check_polygon(vertices: &[Vec2]) -> Result<(), PhysicsError> {
    if vertices.len() < 3 {
        return Err(PhysicsError::TooFewVertices(vertices.len()));
    }
    // Twice the signed area; zero means every vertex is collinear.
    let mut area2 = 0.0;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        area2 += a.perp_dot(b);
    }
    if area2.abs() <= f32::EPSILON || vertices.iter().any(|v| !v.is_finite()) {
        return Err(PhysicsError::DegeneratePolygon);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// HeadlessWorld
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct HeadlessBody {
    role: BodyRole,
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
    /// `None` for polygons.
    radius: Option<f32>,
    is_static: bool,
    material: Material,
}

impl HeadlessBody {
    fn mass(&self) -> f32 {
        let r = self.radius.unwrap_or(1.0);
        (self.material.density * std::f32::consts::PI * r * r).max(f32::EPSILON)
    }
}

/// Deterministic kinematic backend.
///
/// Integrates velocities and reports circle-circle contact starts/stops, but
/// resolves no collisions. Enough to drive the rules without a solver.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    bodies: BTreeMap<BodyHandle, HeadlessBody>,
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    next_handle: u32,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, body: HeadlessBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(handle, body);
        handle
    }

    /// Role recorded for a body.
    pub fn role(&self, handle: BodyHandle) -> Option<BodyRole> {
        self.bodies.get(&handle).map(|b| b.role)
    }

    fn tagged(&self, handle: BodyHandle) -> Option<TaggedBody> {
        self.role(handle).map(|role| TaggedBody { handle, role })
    }

    fn detect_contacts(&mut self, events: &mut Vec<CollisionPair>) {
        let circles: Vec<(BodyHandle, Vec2, f32)> = self
            .bodies
            .iter()
            .filter_map(|(h, b)| b.radius.map(|r| (*h, b.position, r)))
            .collect();

        let mut now_touching = BTreeSet::new();
        for (i, &(ha, pa, ra)) in circles.iter().enumerate() {
            for &(hb, pb, rb) in &circles[i + 1..] {
                if pa.distance(pb) <= ra + rb {
                    now_touching.insert((ha, hb));
                }
            }
        }

        for pair in now_touching.difference(&self.touching) {
            if let (Some(a), Some(b)) = (self.tagged(pair.0), self.tagged(pair.1)) {
                events.push(CollisionPair { a, b, started: true });
            }
        }
        for pair in self.touching.difference(&now_touching) {
            if let (Some(a), Some(b)) = (self.tagged(pair.0), self.tagged(pair.1)) {
                events.push(CollisionPair { a, b, started: false });
            }
        }
        self.touching = now_touching;
    }
}

impl PhysicsAdapter for HeadlessWorld {
    fn create_circle_body(
        &mut self,
        role: BodyRole,
        position: Vec2,
        radius: f32,
        material: Material,
    ) -> Result<BodyHandle, PhysicsError> {
        check_radius(radius)?;
        Ok(self.insert(HeadlessBody {
            role,
            position,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            radius: Some(radius),
            is_static: false,
            material,
        }))
    }

    fn create_static_polygon_body(
        &mut self,
        role: BodyRole,
        vertices: &[Vec2],
        material: Material,
    ) -> Result<BodyHandle, PhysicsError> {
        check_polygon(vertices)?;
        let centroid = vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32;
        Ok(self.insert(HeadlessBody {
            role,
            position: centroid,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            radius: None,
            is_static: true,
            material,
        }))
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
        self.touching.retain(|(a, b)| *a != handle && *b != handle);
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.position)
    }

    fn angle(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(&handle).map(|b| b.angle)
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.velocity)
    }

    fn angular_velocity(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(&handle).map(|b| b.angular_velocity)
    }

    fn is_static(&self, handle: BodyHandle) -> Option<bool> {
        self.bodies.get(&handle).map(|b| b.is_static)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.position = position;
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.angular_velocity = angular_velocity;
        }
    }

    fn set_static(&mut self, handle: BodyHandle, is_static: bool) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.is_static = is_static;
            if is_static {
                b.velocity = Vec2::ZERO;
                b.angular_velocity = 0.0;
            }
        }
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec2, _point: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            if !b.is_static {
                b.velocity += force / b.mass();
            }
        }
    }

    fn step(&mut self, dt: f32, events: &mut Vec<CollisionPair>) {
        for body in self.bodies.values_mut() {
            if body.is_static {
                continue;
            }
            body.position += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
            let decay = 1.0 / (1.0 + dt * body.material.linear_damping);
            body.velocity *= decay;
        }
        self.detect_contacts(events);
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
