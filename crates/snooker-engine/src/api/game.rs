use crate::bridge::snapshot::FrameSnapshot;
use crate::input::queue::InputEvent;

/// Configuration the host needs before the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in canvas pixels.
    pub world_width: f32,
    /// World height in canvas pixels.
    pub world_height: f32,
    /// Capacity of the packed ball buffer (every ball plus the cue ball).
    pub max_balls: usize,
    /// Capacity of the hole list.
    pub max_holes: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 400.0,
            max_balls: 22,
            max_holes: 10,
        }
    }
}

/// The contract a game offers to a frame loop.
pub trait Game {
    /// Engine configuration. Read once before the first tick.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Run one fixed step, applying `input` after the simulation moved.
    fn update(&mut self, input: &[InputEvent]);

    /// Read-only view of everything a renderer draws.
    fn snapshot(&self) -> FrameSnapshot;
}
