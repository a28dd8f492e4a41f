use snooker_engine::{BallInstance, FrameClock, Game, GameConfig, InputEvent, InputQueue};

/// Generic runner that drives a [`Game`] from browser frame callbacks.
///
/// wasm-bindgen cannot export generic structs, so the game crate keeps a
/// `thread_local!` runner and exports free functions (see `export_game!`).
pub struct GameRunner<G: Game> {
    game: G,
    input: InputQueue,
    clock: FrameClock,
    config: GameConfig,
    /// Packed balls of the latest frame.
    balls: Vec<BallInstance>,
    /// Status of the latest frame as JSON.
    status_json: String,
    frame: u64,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let mut runner = Self {
            clock: FrameClock::new(config.fixed_dt),
            balls: Vec::with_capacity(config.max_balls),
            status_json: String::from("{}"),
            input: InputQueue::new(),
            frame: 0,
            config,
            game,
        };
        runner.refresh_outputs();
        runner
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by a variable frame delta (seconds).
    ///
    /// Pending input is handed to the first fixed step of the frame only.
    /// A frame too short to run a step keeps its input for the next one.
    pub fn tick(&mut self, dt: f32) {
        let steps = self.clock.accumulate(dt);
        if steps > 0 {
            let events = self.input.drain();
            self.game.update(&events);
            for _ in 1..steps {
                self.game.update(&[]);
            }
        }
        self.frame += 1;
        self.refresh_outputs();
    }

    fn refresh_outputs(&mut self) {
        let snapshot = self.game.snapshot();
        self.balls.clear();
        self.balls
            .extend(snapshot.balls.iter().take(self.config.max_balls).copied());
        match serde_json::to_string(&snapshot.status) {
            Ok(json) => self.status_json = json,
            Err(e) => log::error!("status serialization failed: {}", e),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn balls_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<BallInstance, f32>(&self.balls).as_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.len() as u32
    }

    pub fn status_json(&self) -> String {
        self.status_json.clone()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_balls(&self) -> u32 {
        self.config.max_balls as u32
    }

    pub fn max_holes(&self) -> u32 {
        self.config.max_holes as u32
    }
}
