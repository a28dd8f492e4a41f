pub mod runner;

pub use runner::GameRunner;

/// Generate the `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - every wasm-bindgen export (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// snooker_web::export_game!(
///     Session<RapierWorld>,
///     "snooker",
///     |settings, seed| Session::with_rapier(settings, seed)
/// );
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `snooker_engine::Game`
/// - `$game_name`: a string literal used in log messages
/// - `$build`: closure `(GameSettings, u64) -> Result<$game_type, SessionError>`
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal, $build:expr) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        web_sys::console::warn_1(
                            &concat!($game_name, ": call game_init() first").into(),
                        );
                        None
                    }
                }
            })
        }

        /// Build the session. `settings_json` may be empty for defaults.
        /// Returns `false` when the settings or the table are invalid.
        #[wasm_bindgen]
        pub fn game_init(settings_json: &str) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let settings = if settings_json.trim().is_empty() {
                snooker_engine::GameSettings::default()
            } else {
                match snooker_engine::GameSettings::from_json(settings_json) {
                    Ok(s) => s,
                    Err(e) => {
                        log::error!("{}: {}", $game_name, e);
                        return false;
                    }
                }
            };

            let seed = js_sys::Date::now() as u64;
            let build = $build;
            let game: $game_type = match build(settings, seed) {
                Ok(game) => game,
                Err(e) => {
                    log::error!("{}: {}", $game_name, e);
                    return false;
                }
            };

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some($crate::GameRunner::new(game));
            });
            log::info!("{}: initialized (seed {})", $game_name, seed);
            true
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(snooker_engine::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(snooker_engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(snooker_engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_click(x: f32, y: f32) {
            with_runner(|r| r.push_input(snooker_engine::InputEvent::Click { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(snooker_engine::InputEvent::KeyDown { key_code }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_balls_ptr() -> *const f32 {
            with_runner(|r| r.balls_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_ball_count() -> u32 {
            with_runner(|r| r.ball_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_status_json() -> String {
            with_runner(|r| r.status_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_balls() -> u32 {
            with_runner(|r| r.max_balls()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_holes() -> u32 {
            with_runner(|r| r.max_holes()).unwrap_or(0)
        }
    };
}

#[cfg(target_arch = "wasm32")]
mod exports {
    use wasm_bindgen::prelude::*;

    #[cfg(feature = "physics")]
    crate::export_game!(
        snooker_engine::Session<snooker_engine::RapierWorld>,
        "snooker",
        |settings, seed| snooker_engine::Session::with_rapier(settings, seed)
    );

    #[cfg(not(feature = "physics"))]
    crate::export_game!(
        snooker_engine::Session<snooker_engine::HeadlessWorld>,
        "snooker",
        |settings, seed| snooker_engine::Session::headless(settings, seed)
    );
}
