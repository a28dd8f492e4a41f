//! Per-tick pocket and hazard-hole checks and what they do to the balls.

use glam::Vec2;
use serde::Serialize;

use crate::balls::{BallId, BallRegistry, BallRole, SnookerColor};
use crate::core::geometry::TableGeometry;
use crate::core::physics::PhysicsAdapter;
use crate::rules::holes::Hole;

/// Share of the pocket radius a ball centre has to be inside of to drop.
pub const POCKET_CAPTURE_SCALE: f32 = 0.6;

/// Index of the first pocket that swallows a ball centred at `ball`.
pub fn pocket_hit(ball: Vec2, pockets: &[Vec2], pocket_radius: f32) -> Option<usize> {
    let capture = POCKET_CAPTURE_SCALE * pocket_radius;
    pockets.iter().position(|p| ball.distance(*p) < capture)
}

/// Consecutive colored pots without a red in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultTracker {
    streak: u32,
}

/// Colored pots in a row that make a fault.
pub const FAULT_STREAK: u32 = 2;

impl FaultTracker {
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Count a colored pot. Returns `true` when this pot is a fault, in
    /// which case the streak starts over.
    pub fn color_potted(&mut self) -> bool {
        self.streak += 1;
        if self.streak >= FAULT_STREAK {
            self.streak = 0;
            true
        } else {
            false
        }
    }

    pub fn red_potted(&mut self) {
        self.streak = 0;
    }

    pub fn reset(&mut self) {
        self.streak = 0;
    }
}

/// Something that happened to a ball this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PotEvent {
    CuePocketed,
    ColorRespawned { id: BallId, color: SnookerColor },
    RedPotted { id: BallId },
    Fault,
    /// A ball fell into a hazard hole and is gone for good.
    Lost { id: BallId, role: BallRole },
}

/// Check every ball against every pocket and apply the consequences.
///
/// The cue ball goes first. Other balls are checked in spawn order, each
/// against the pockets in [`crate::core::geometry::PocketId`] order; the first
/// matching pocket wins.
pub fn resolve_pockets<P: PhysicsAdapter + ?Sized>(
    registry: &mut BallRegistry,
    physics: &mut P,
    geometry: &TableGeometry,
    faults: &mut FaultTracker,
    events: &mut Vec<PotEvent>,
) {
    let pockets = &geometry.pockets;
    let radius = geometry.pocket_radius;

    let cue_down = registry
        .cue()
        .and_then(|c| physics.position(c.body))
        .is_some_and(|p| pocket_hit(p, pockets, radius).is_some());
    if cue_down {
        log::info!("cue ball pocketed");
        registry.pocket_cue(physics);
        events.push(PotEvent::CuePocketed);
    }

    let candidates: Vec<(BallId, BallRole, Vec2)> = registry
        .iter()
        .filter_map(|b| physics.position(b.body).map(|p| (b.id, b.role, p)))
        .collect();

    for (id, role, pos) in candidates {
        if pocket_hit(pos, pockets, radius).is_none() {
            continue;
        }
        match role {
            BallRole::Color(color) => {
                log::info!("{} potted, back on its spot", color.name());
                registry.respawn_at(physics, id, geometry.color_spot(color));
                events.push(PotEvent::ColorRespawned { id, color });
                if faults.color_potted() {
                    log::info!("fault: two colored balls in a row");
                    events.push(PotEvent::Fault);
                }
            }
            BallRole::Red => {
                log::info!("red potted");
                registry.remove(physics, id);
                faults.red_potted();
                events.push(PotEvent::RedPotted { id });
            }
            BallRole::Cue => {}
        }
    }
}

/// Destroy every ball whose centre is inside a hazard hole.
///
/// A cue ball lost this way waits to be placed again, like a pocketed one.
pub fn resolve_holes<P: PhysicsAdapter + ?Sized>(
    registry: &mut BallRegistry,
    physics: &mut P,
    holes: &[Hole],
    events: &mut Vec<PotEvent>,
) {
    let in_hole = |p: Vec2| holes.iter().any(|h| p.distance(h.position) < h.radius);

    let victims: Vec<(BallId, BallRole)> = registry
        .iter_all()
        .filter(|b| physics.position(b.body).is_some_and(|p| in_hole(p)))
        .map(|b| (b.id, b.role))
        .collect();

    for (id, role) in victims {
        log::info!("{:?} ball fell into a hole", role);
        if role == BallRole::Cue {
            registry.pocket_cue(physics);
        } else {
            registry.remove(physics, id);
        }
        events.push(PotEvent::Lost { id, role });
    }
}
