/// Fixed timestep clock.
/// Turns variable frame deltas into a whole number of simulation steps and
/// keeps the simulated time every session timer is compared against.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Simulated seconds since the clock started.
    elapsed: f64,
}

/// Most steps a single frame may run before the backlog is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 10;

impl FrameClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Advance simulated time by one fixed step.
    pub fn advance(&mut self) -> f64 {
        self.elapsed += self.dt as f64;
        self.elapsed
    }

    /// Simulated seconds elapsed.
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
