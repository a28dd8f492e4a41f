//! A single game: table, balls, rules and timers, advanced one tick at a time.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::api::game::{Game, GameConfig};
use crate::api::settings::GameSettings;
use crate::balls::{BallRegistry, BallRole};
use crate::bridge::snapshot::{BallInstance, FrameSnapshot, SessionStatus};
use crate::core::geometry::TableGeometry;
use crate::core::notice::NoticeBoard;
use crate::core::physics::{BodyHandle, BodyRole, CollisionPair, HeadlessWorld, PhysicsAdapter};
#[cfg(feature = "physics")]
use crate::core::rapier::RapierWorld;
use crate::core::time::FrameClock;
use crate::error::{LayoutError, SessionError};
use crate::input::queue::{InputEvent, MenuSignal};
use crate::rules::collision::latest_cue_contact;
use crate::rules::holes::{Hole, HoleScheduler};
use crate::rules::layout::{build_layout, LayoutKind};
use crate::rules::pocketing::{resolve_holes, resolve_pockets, FaultTracker, PotEvent};
use crate::rules::shot::ShotController;

/// The mode a session is playing. Chosen once from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    Unselected,
    Standard,
    AllRandom,
    RandomReds,
    Extreme,
}

impl GameMode {
    fn layout(self) -> Option<LayoutKind> {
        match self {
            GameMode::Unselected => None,
            GameMode::Standard => Some(LayoutKind::Standard),
            GameMode::AllRandom => Some(LayoutKind::AllRandom),
            GameMode::RandomReds => Some(LayoutKind::RandomReds),
            GameMode::Extreme => Some(LayoutKind::Extreme),
        }
    }
}

/// Owns every piece of mutable game state.
pub struct Session<P: PhysicsAdapter> {
    settings: GameSettings,
    geometry: TableGeometry,
    physics: P,
    registry: BallRegistry,
    cushions: Vec<BodyHandle>,
    mode: GameMode,
    instructions_shown: bool,
    faults: FaultTracker,
    notices: NoticeBoard,
    holes: HoleScheduler,
    shot: ShotController,
    clock: FrameClock,
    rng: Pcg32,
    collisions: Vec<CollisionPair>,
    pot_events: Vec<PotEvent>,
}

#[cfg(feature = "physics")]
impl Session<RapierWorld> {
    /// A session on the Rapier backend.
    pub fn with_rapier(settings: GameSettings, seed: u64) -> Result<Self, SessionError> {
        Self::new(RapierWorld::new(), settings, seed)
    }
}

impl Session<HeadlessWorld> {
    /// A session on the kinematic backend, no collision response.
    pub fn headless(settings: GameSettings, seed: u64) -> Result<Self, SessionError> {
        Self::new(HeadlessWorld::new(), settings, seed)
    }
}

impl<P: PhysicsAdapter> Session<P> {
    /// Build the table and its cushions. No balls exist until a mode is
    /// selected.
    pub fn new(mut physics: P, settings: GameSettings, seed: u64) -> Result<Self, SessionError> {
        let geometry = TableGeometry::from_config(&settings.table);

        let mut cushions = Vec::with_capacity(6);
        for quad in geometry.cushion_polygons() {
            cushions.push(physics.create_static_polygon_body(
                BodyRole::Cushion,
                &quad,
                settings.cushion_material,
            )?);
        }
        log::info!(
            "table {}x{} px, border {:.1}, ball {:.2}, pocket {:.2}",
            geometry.width,
            geometry.height,
            geometry.border,
            geometry.ball_diameter,
            geometry.pocket_diameter
        );

        Ok(Self {
            registry: BallRegistry::new(settings.ball_material),
            holes: HoleScheduler::new(settings.hole_capacity, settings.timing.hole_interval_secs),
            shot: ShotController::new(settings.shot, geometry.width),
            clock: FrameClock::new(settings.fixed_dt),
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Unselected,
            instructions_shown: false,
            faults: FaultTracker::default(),
            notices: NoticeBoard::new(),
            collisions: Vec::with_capacity(32),
            pot_events: Vec::with_capacity(8),
            cushions,
            geometry,
            physics,
            settings,
        })
    }

    // -- Menu --

    /// Apply a menu choice. Ignored once a mode is playing.
    ///
    /// A layout that cannot be racked leaves the session in the menu with an
    /// empty table and returns the error.
    pub fn select(&mut self, signal: MenuSignal) -> Result<(), LayoutError> {
        if self.mode != GameMode::Unselected {
            return Ok(());
        }
        match signal {
            MenuSignal::Standard => self.start(GameMode::Standard),
            MenuSignal::RandomReds => self.start(GameMode::RandomReds),
            MenuSignal::AllRandom => self.start(GameMode::AllRandom),
            MenuSignal::ExtremeInstructions => {
                self.instructions_shown = true;
                Ok(())
            }
            MenuSignal::Confirm if self.instructions_shown => self.start(GameMode::Extreme),
            MenuSignal::Confirm => Ok(()),
        }
    }

    fn start(&mut self, mode: GameMode) -> Result<(), LayoutError> {
        let Some(kind) = mode.layout() else {
            return Ok(());
        };
        self.instructions_shown = false;
        self.shot.cancel();
        self.faults.reset();
        self.notices.clear();
        self.holes.stop();

        build_layout(
            kind,
            &mut self.registry,
            &mut self.physics,
            &self.geometry,
            &mut self.rng,
            self.settings.placement_attempts,
        )?;

        if mode == GameMode::Extreme {
            self.holes.start(self.clock.now());
        }
        self.mode = mode;
        log::info!("mode selected: {:?}", mode);
        Ok(())
    }

    // -- Pointer --

    /// Put the cue ball down at `at` if it is off the table and `at` is
    /// inside the D. Returns whether a ball was placed.
    pub fn place_cue(&mut self, at: Vec2) -> bool {
        if self.mode == GameMode::Unselected || self.registry.cue_placed() || !self.geometry.in_d(at) {
            return false;
        }
        match self.registry.place_cue(&mut self.physics, at, self.geometry.ball_radius) {
            Ok(_) => {
                log::info!("cue ball placed at ({:.0}, {:.0})", at.x, at.y);
                true
            }
            Err(e) => {
                log::error!("cue ball placement failed: {}", e);
                false
            }
        }
    }

    fn cue_target(&self) -> Option<(Vec2, f32)> {
        if !self.registry.cue_placed() {
            return None;
        }
        let cue = self.registry.cue()?;
        Some((self.physics.position(cue.body)?, cue.radius))
    }

    pub fn pointer_down(&mut self, at: Vec2) -> bool {
        if self.mode == GameMode::Unselected {
            return false;
        }
        let target = self.cue_target();
        self.shot.press(at, target)
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        self.shot.pointer_moved(at);
    }

    /// Release a drag and strike the cue ball. Returns whether a shot was
    /// played.
    pub fn pointer_up(&mut self, at: Vec2) -> bool {
        let Some(shot) = self.shot.release(at) else {
            return false;
        };
        let Some(cue) = self.registry.cue() else {
            return false;
        };
        let body = cue.body;
        let Some(centre) = self.physics.position(body) else {
            return false;
        };
        self.physics.set_static(body, false);
        self.physics.apply_force(body, shot.impulse, centre);
        log::debug!("shot along ({:.2}, {:.2})", shot.direction.x, shot.direction.y);
        true
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.pointer_down(Vec2::new(x, y));
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer_up(Vec2::new(x, y));
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
            InputEvent::Click { x, y } => {
                self.place_cue(Vec2::new(x, y));
            }
            InputEvent::KeyDown { key_code } => {
                if let Some(signal) = MenuSignal::from_key_code(key_code) {
                    if let Err(e) = self.select(signal) {
                        log::warn!("could not rack the table: {}", e);
                    }
                }
            }
        }
    }

    // -- Tick --

    /// One fixed step: simulate, check pockets and holes, report cue-ball
    /// contacts, apply input, then expire notices.
    pub fn step(&mut self, input: &[InputEvent]) {
        let dt = self.clock.dt();
        self.collisions.clear();
        self.physics.step(dt, &mut self.collisions);
        let now = self.clock.advance();
        let timing = self.settings.timing;

        self.pot_events.clear();
        if self.mode != GameMode::Unselected {
            resolve_pockets(
                &mut self.registry,
                &mut self.physics,
                &self.geometry,
                &mut self.faults,
                &mut self.pot_events,
            );
        }

        if self.mode == GameMode::Extreme {
            self.holes.tick(
                now,
                &mut self.rng,
                &self.geometry,
                self.settings.placement_attempts,
            );
            let holes: Vec<Hole> = self.holes.holes().copied().collect();
            resolve_holes(&mut self.registry, &mut self.physics, &holes, &mut self.pot_events);
        }

        for event in &self.pot_events {
            match event {
                PotEvent::Fault => self.notices.raise_fault(now, timing.fault_notice_secs),
                PotEvent::Lost { .. } => self.notices.raise_lost_ball(now, timing.lost_ball_notice_secs),
                _ => {}
            }
        }

        if let Some(contact) = latest_cue_contact(&self.collisions) {
            self.notices.raise_collision(contact, now, timing.collision_notice_secs);
        }

        if self.registry.cue().is_none() {
            self.shot.cancel();
        }

        for event in input {
            self.handle(*event);
        }

        self.notices.sweep(now);
    }

    // -- Accessors --

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn instructions_shown(&self) -> bool {
        self.instructions_shown
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn registry(&self) -> &BallRegistry {
        &self.registry
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn faults(&self) -> &FaultTracker {
        &self.faults
    }

    pub fn holes(&self) -> &HoleScheduler {
        &self.holes
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn cushions(&self) -> &[BodyHandle] {
        &self.cushions
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Simulated seconds since the session was created.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn instance(&self, role: BallRole, body: BodyHandle, radius: f32) -> Option<BallInstance> {
        let pos = self.physics.position(body)?;
        let [r, g, b] = role.rgb();
        Some(BallInstance {
            x: pos.x,
            y: pos.y,
            angle: self.physics.angle(body).unwrap_or(0.0),
            radius,
            r,
            g,
            b,
            role: role.code() as f32,
        })
    }
}

impl<P: PhysicsAdapter> Game for Session<P> {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: self.settings.fixed_dt,
            world_width: self.geometry.width,
            world_height: self.geometry.height,
            max_balls: 22,
            max_holes: self.settings.hole_capacity,
        }
    }

    fn update(&mut self, input: &[InputEvent]) {
        self.step(input);
    }

    fn snapshot(&self) -> FrameSnapshot {
        let balls = self
            .registry
            .iter_all()
            .filter_map(|b| self.instance(b.role, b.body, b.radius))
            .collect();

        FrameSnapshot {
            status: SessionStatus {
                mode: self.mode,
                instructions_shown: self.instructions_shown,
                cue_placed: self.registry.cue_placed(),
                cue_pocketed: self.registry.cue_pocketed(),
                holes: self.holes.holes().copied().collect(),
                notices: self.notices.views(),
                aim: self.shot.aim(),
                fault_streak: self.faults.streak(),
                reds_left: self.registry.red_count(),
                time: self.clock.now(),
            },
            balls,
        }
    }
}
