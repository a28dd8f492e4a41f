//! Snooker balls: identity, colours, and the registry that owns their bodies.

use glam::Vec2;
use serde::Serialize;

use crate::core::physics::{BodyHandle, BodyRole, Material, PhysicsAdapter};
use crate::error::PhysicsError;

/// The six colored (non-red) balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SnookerColor {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl SnookerColor {
    pub const ALL: [SnookerColor; 6] = [
        SnookerColor::Yellow,
        SnookerColor::Green,
        SnookerColor::Brown,
        SnookerColor::Blue,
        SnookerColor::Pink,
        SnookerColor::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SnookerColor::Yellow => "yellow",
            SnookerColor::Green => "green",
            SnookerColor::Brown => "brown",
            SnookerColor::Blue => "blue",
            SnookerColor::Pink => "pink",
            SnookerColor::Black => "black",
        }
    }
}

/// What a ball is for the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BallRole {
    Red,
    Color(SnookerColor),
    Cue,
}

impl BallRole {
    pub fn body_role(self) -> BodyRole {
        match self {
            BallRole::Red => BodyRole::RedBall,
            BallRole::Color(_) => BodyRole::ColorBall,
            BallRole::Cue => BodyRole::CueBall,
        }
    }

    /// Display colour as linear RGB.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            BallRole::Red => [0.8, 0.0, 0.0],
            BallRole::Cue => [1.0, 1.0, 1.0],
            BallRole::Color(c) => match c {
                SnookerColor::Yellow => [1.0, 0.84, 0.0],
                SnookerColor::Green => [0.0, 0.5, 0.0],
                SnookerColor::Brown => [0.55, 0.27, 0.07],
                SnookerColor::Blue => [0.0, 0.0, 0.8],
                SnookerColor::Pink => [1.0, 0.41, 0.71],
                SnookerColor::Black => [0.04, 0.04, 0.04],
            },
        }
    }

    /// Small integer tag used in packed render buffers.
    pub fn code(self) -> u32 {
        match self {
            BallRole::Cue => 0,
            BallRole::Red => 1,
            BallRole::Color(c) => 2 + c as u32,
        }
    }
}

/// Stable identity of a ball for the lifetime of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BallId(pub u32);

/// A live ball. Owns its physics body exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub role: BallRole,
    pub radius: f32,
    pub body: BodyHandle,
}

/// Every live ball of a session.
///
/// The cue ball is kept apart from the other balls in a single optional slot,
/// together with its placement flags.
#[derive(Debug, Default)]
pub struct BallRegistry {
    balls: Vec<Ball>,
    cue: Option<Ball>,
    cue_placed: bool,
    cue_pocketed: bool,
    next_id: u32,
    material: Material,
}

impl BallRegistry {
    pub fn new(material: Material) -> Self {
        Self {
            balls: Vec::with_capacity(21),
            material,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a ball and its body. A cue ball replaces whatever occupied the
    /// cue slot.
    pub fn spawn<P: PhysicsAdapter + ?Sized>(
        &mut self,
        physics: &mut P,
        position: Vec2,
        radius: f32,
        role: BallRole,
    ) -> Result<BallId, PhysicsError> {
        let body = physics.create_circle_body(role.body_role(), position, radius, self.material)?;
        let id = self.next_id();
        let ball = Ball {
            id,
            role,
            radius,
            body,
        };
        if role == BallRole::Cue {
            if let Some(old) = self.cue.replace(ball) {
                physics.remove_body(old.body);
            }
        } else {
            self.balls.push(ball);
        }
        Ok(id)
    }

    /// Teleport a ball and stop it dead. Identity and role are kept.
    pub fn respawn_at<P: PhysicsAdapter + ?Sized>(
        &self,
        physics: &mut P,
        id: BallId,
        position: Vec2,
    ) -> bool {
        let Some(ball) = self.get(id) else {
            return false;
        };
        physics.set_position(ball.body, position);
        physics.set_velocity(ball.body, Vec2::ZERO);
        physics.set_angular_velocity(ball.body, 0.0);
        true
    }

    /// Destroy a ball's body and drop it from the registry.
    pub fn remove<P: PhysicsAdapter + ?Sized>(&mut self, physics: &mut P, id: BallId) -> Option<Ball> {
        if self.cue.as_ref().is_some_and(|c| c.id == id) {
            let cue = self.cue.take()?;
            physics.remove_body(cue.body);
            return Some(cue);
        }
        let idx = self.balls.iter().position(|b| b.id == id)?;
        let ball = self.balls.remove(idx);
        physics.remove_body(ball.body);
        Some(ball)
    }

    /// Remove every ball, the cue ball included, and forget its flags.
    pub fn clear<P: PhysicsAdapter + ?Sized>(&mut self, physics: &mut P) {
        for ball in self.balls.drain(..) {
            physics.remove_body(ball.body);
        }
        if let Some(cue) = self.cue.take() {
            physics.remove_body(cue.body);
        }
        self.cue_placed = false;
        self.cue_pocketed = false;
    }

    /// Put a fresh cue ball on the table. Legality is the caller's job.
    pub fn place_cue<P: PhysicsAdapter + ?Sized>(
        &mut self,
        physics: &mut P,
        position: Vec2,
        radius: f32,
    ) -> Result<BallId, PhysicsError> {
        let id = self.spawn(physics, position, radius, BallRole::Cue)?;
        self.cue_placed = true;
        self.cue_pocketed = false;
        Ok(id)
    }

    /// Take the cue ball off the table until it is placed again.
    pub fn pocket_cue<P: PhysicsAdapter + ?Sized>(&mut self, physics: &mut P) {
        if let Some(cue) = self.cue.take() {
            physics.remove_body(cue.body);
        }
        self.cue_placed = false;
        self.cue_pocketed = true;
    }

    pub fn cue(&self) -> Option<&Ball> {
        self.cue.as_ref()
    }

    pub fn cue_placed(&self) -> bool {
        self.cue_placed
    }

    /// The cue ball went down and has not been placed again yet.
    pub fn cue_pocketed(&self) -> bool {
        self.cue_pocketed
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.cue
            .as_ref()
            .filter(|c| c.id == id)
            .or_else(|| self.balls.iter().find(|b| b.id == id))
    }

    /// Non-cue balls in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    /// Non-cue balls followed by the cue ball, if any.
    pub fn iter_all(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().chain(self.cue.iter())
    }

    /// Number of non-cue balls.
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn red_count(&self) -> usize {
        self.balls.iter().filter(|b| b.role == BallRole::Red).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::HeadlessWorld;

    #[test]
    fn spawn_and_remove_own_bodies() {
        let mut world = HeadlessWorld::new();
        let mut reg = BallRegistry::new(Material::ball());
        let red = reg.spawn(&mut world, Vec2::new(10.0, 10.0), 5.0, BallRole::Red).unwrap();
        let blue = reg
            .spawn(&mut world, Vec2::new(40.0, 10.0), 5.0, BallRole::Color(SnookerColor::Blue))
            .unwrap();
        assert_ne!(red, blue);
        assert_eq!(reg.len(), 2);
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.role(reg.get(blue).unwrap().body), Some(BodyRole::ColorBall));

        let removed = reg.remove(&mut world, red).unwrap();
        assert_eq!(removed.role, BallRole::Red);
        assert_eq!(reg.len(), 1);
        assert_eq!(world.body_count(), 1);
        assert!(reg.remove(&mut world, red).is_none());
    }

    #[test]
    fn respawn_resets_motion_and_keeps_identity() {
        let mut world = HeadlessWorld::new();
        let mut reg = BallRegistry::new(Material::ball());
        let id = reg
            .spawn(&mut world, Vec2::new(10.0, 10.0), 5.0, BallRole::Color(SnookerColor::Pink))
            .unwrap();
        let body = reg.get(id).unwrap().body;
        world.set_velocity(body, Vec2::new(3.0, 4.0));
        world.set_angular_velocity(body, 2.0);

        assert!(reg.respawn_at(&mut world, id, Vec2::new(100.0, 50.0)));
        assert_eq!(world.position(body), Some(Vec2::new(100.0, 50.0)));
        assert_eq!(world.velocity(body), Some(Vec2::ZERO));
        assert_eq!(world.angular_velocity(body), Some(0.0));
        assert_eq!(reg.get(id).unwrap().role, BallRole::Color(SnookerColor::Pink));
    }

    #[test]
    fn cue_slot_flags() {
        let mut world = HeadlessWorld::new();
        let mut reg = BallRegistry::new(Material::ball());
        assert!(!reg.cue_placed());

        let cue = reg.place_cue(&mut world, Vec2::new(150.0, 200.0), 5.0).unwrap();
        assert!(reg.cue_placed());
        assert_eq!(reg.cue().map(|c| c.id), Some(cue));
        assert_eq!(reg.len(), 0);

        reg.pocket_cue(&mut world);
        assert!(reg.cue().is_none());
        assert!(!reg.cue_placed());
        assert!(reg.cue_pocketed());
        assert_eq!(world.body_count(), 0);

        reg.place_cue(&mut world, Vec2::new(150.0, 200.0), 5.0).unwrap();
        assert!(!reg.cue_pocketed());
    }

    #[test]
    fn clear_removes_everything() {
        let mut world = HeadlessWorld::new();
        let mut reg = BallRegistry::new(Material::ball());
        for i in 0..5 {
            reg.spawn(&mut world, Vec2::new(i as f32 * 20.0, 0.0), 5.0, BallRole::Red).unwrap();
        }
        reg.place_cue(&mut world, Vec2::new(150.0, 200.0), 5.0).unwrap();
        assert_eq!(reg.red_count(), 5);

        reg.clear(&mut world);
        assert!(reg.is_empty());
        assert!(reg.cue().is_none());
        assert!(!reg.cue_placed());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn role_codes_are_distinct() {
        let mut codes: Vec<u32> = SnookerColor::ALL.iter().map(|c| BallRole::Color(*c).code()).collect();
        codes.push(BallRole::Red.code());
        codes.push(BallRole::Cue.code());
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }
}
