use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::core::physics::{
    check_polygon, check_radius, BodyHandle, BodyRole, CollisionPair, Material, PhysicsAdapter,
    TaggedBody,
};
use crate::error::PhysicsError;

// ---------------------------------------------------------------------------
// glam / nalgebra conversions
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// The role sits in the upper half of user_data, the handle in the lower half.
fn encode_user_data(handle: BodyHandle, role: BodyRole) -> u128 {
    let role_bits: u128 = match role {
        BodyRole::CueBall => 0,
        BodyRole::RedBall => 1,
        BodyRole::ColorBall => 2,
        BodyRole::Cushion => 3,
    };
    (role_bits << 64) | handle.0 as u128
}

fn decode_user_data(data: u128) -> Option<TaggedBody> {
    let role = match data >> 64 {
        0 => BodyRole::CueBall,
        1 => BodyRole::RedBall,
        2 => BodyRole::ColorBall,
        3 => BodyRole::Cushion,
        _ => return None,
    };
    Some(TaggedBody {
        handle: BodyHandle(data as u32),
        role,
    })
}

// ---------------------------------------------------------------------------
// Event collection without crossbeam channels (WASM)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut guard) = self.collisions.lock() {
            guard.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

// ---------------------------------------------------------------------------
// RapierWorld
// ---------------------------------------------------------------------------

/// Top-down Rapier2D world (no gravity) backing the real game.
pub struct RapierWorld {
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    next_handle: u32,
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            handles: HashMap::new(),
            next_handle: 0,
        }
    }

    fn allocate(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn rigid_body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(*self.handles.get(&handle)?)
    }

    fn rigid_body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(*self.handles.get(&handle)?)
    }

    fn collider_to_tagged(&self, collider_handle: ColliderHandle) -> Option<TaggedBody> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        decode_user_data(body.user_data)
    }

    fn attach(
        &mut self,
        handle: BodyHandle,
        rb: RigidBody,
        collider: ColliderBuilder,
        material: Material,
    ) -> BodyHandle {
        let body_handle = self.bodies.insert(rb);
        let collider = collider
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.handles.insert(handle, body_handle);
        handle
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsAdapter for RapierWorld {
    fn create_circle_body(
        &mut self,
        role: BodyRole,
        position: Vec2,
        radius: f32,
        material: Material,
    ) -> Result<BodyHandle, PhysicsError> {
        check_radius(radius)?;
        let handle = self.allocate();
        let rb = RigidBodyBuilder::dynamic()
            .translation(to_na(position))
            .linear_damping(material.linear_damping)
            .angular_damping(material.linear_damping)
            .ccd_enabled(true)
            .user_data(encode_user_data(handle, role))
            .build();
        Ok(self.attach(handle, rb, ColliderBuilder::ball(radius), material))
    }

    fn create_static_polygon_body(
        &mut self,
        role: BodyRole,
        vertices: &[Vec2],
        material: Material,
    ) -> Result<BodyHandle, PhysicsError> {
        check_polygon(vertices)?;
        let centroid = vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32;
        let local: Vec<Point<Real>> = vertices.iter().map(|v| to_point(*v - centroid)).collect();
        let collider =
            ColliderBuilder::convex_hull(&local).ok_or(PhysicsError::DegeneratePolygon)?;

        let handle = self.allocate();
        let rb = RigidBodyBuilder::fixed()
            .translation(to_na(centroid))
            .user_data(encode_user_data(handle, role))
            .build();
        Ok(self.attach(handle, rb, collider, material))
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        if let Some(body_handle) = self.handles.remove(&handle) {
            self.bodies.remove(
                body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle).map(|rb| from_na(rb.translation()))
    }

    fn angle(&self, handle: BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.rotation().angle())
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle).map(|rb| from_na(rb.linvel()))
    }

    fn angular_velocity(&self, handle: BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.angvel())
    }

    fn is_static(&self, handle: BodyHandle) -> Option<bool> {
        self.rigid_body(handle).map(|rb| rb.body_type() == RigidBodyType::Fixed)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_translation(to_na(position), true);
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_linvel(to_na(velocity), true);
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_angvel(angular_velocity, true);
        }
    }

    fn set_static(&mut self, handle: BodyHandle, is_static: bool) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            let body_type = if is_static {
                RigidBodyType::Fixed
            } else {
                RigidBodyType::Dynamic
            };
            if rb.body_type() != body_type {
                rb.set_body_type(body_type, true);
            }
        }
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec2, point: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.apply_impulse_at_point(to_na(force), to_point(point), true);
        }
    }

    fn step(&mut self, dt: f32, events: &mut Vec<CollisionPair>) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &vector![0.0, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        // Resolve collider handles → body user_data → tagged handles
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            if let (Some(a), Some(b)) = (self.collider_to_tagged(h1), self.collider_to_tagged(h2)) {
                events.push(CollisionPair { a, b, started });
            }
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
