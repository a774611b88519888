pub mod error;
pub mod listeners;
pub mod runner;
pub mod surface;
pub mod viewport;

pub use error::InitError;
pub use listeners::{ListenerHandle, Listeners};
pub use runner::GameRunner;
pub use surface::RenderSurface;
pub use viewport::{backing_size, ViewportSources};

/// Browser-side state for a running game: the bound canvas and the DOM
/// listeners feeding it. Dropping it unsubscribes every listener.
pub struct WebHost {
    pub surface: RenderSurface,
    pub listeners: Listeners,
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner and its `WebHost`
/// - a `with_runner()` helper returning `None` when no game is running
/// - lifecycle exports (`game_init`, `game_tick`, `game_destroy`)
/// - manual input exports for hosts that forward events themselves
/// - data accessors for the frame buffer
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use kick_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// kick_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `kick_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in lifecycle log messages
///
/// A second form, `export_game!(MyGame, "my-game", new = make_game())`,
/// builds the game with the given expression instead of `MyGame::new()`.
///
/// The full form adds `after_tick = report_frame`, a function called at the
/// end of every `game_tick` once the runner is released. Host callbacks go
/// there so they can call back into the exports.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal, new = $ctor:expr, after_tick = $after_tick:expr) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
            static HOST: RefCell<Option<$crate::WebHost>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        /// Re-read the page size, resize the canvas and tell the game.
        fn refresh_viewport() {
            let Some((fallback_w, fallback_h)) =
                with_runner(|r| (r.config().world_width, r.config().world_height))
            else {
                return;
            };
            let viewport = HOST.with(|cell| {
                cell.borrow().as_ref().map(|host| {
                    let viewport = host.surface.sources().resolve(fallback_w, fallback_h);
                    host.surface.apply(&viewport);
                    viewport
                })
            });
            if let Some(viewport) = viewport {
                log::info!(
                    "{}: viewport {}x{} @{}",
                    $game_name, viewport.width, viewport.height, viewport.pixel_ratio
                );
                with_runner(|r| r.resize(viewport));
            }
        }

        /// Bind the canvas, build the game and subscribe its listeners.
        #[wasm_bindgen]
        pub fn game_init(canvas_id: &str) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            if RUNNER.with(|cell| cell.borrow().is_some()) {
                log::warn!("{}: already running, restarting", $game_name);
                game_destroy();
            }

            let surface = $crate::RenderSurface::bind(canvas_id)?;

            let mut runner = $crate::GameRunner::new($ctor);
            let viewport = surface
                .sources()
                .resolve(runner.config().world_width, runner.config().world_height);
            surface.apply(&viewport);
            runner.resize(viewport);
            runner.init();

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            let listeners = match $crate::Listeners::bind(
                &surface,
                |event| {
                    with_runner(|r| r.push_input(event));
                },
                refresh_viewport,
            ) {
                Ok(listeners) => listeners,
                Err(err) => {
                    game_destroy();
                    return Err(err);
                }
            };

            HOST.with(|cell| {
                *cell.borrow_mut() = Some($crate::WebHost { surface, listeners });
            });

            log::info!(
                "{}: initialized on #{} ({}x{})",
                $game_name, canvas_id, viewport.width, viewport.height
            );
            Ok(())
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
            ($after_tick)();
        }

        /// Unsubscribe listeners, tear the game down and free it.
        #[wasm_bindgen]
        pub fn game_destroy() {
            let host = HOST.with(|cell| cell.borrow_mut().take());
            drop(host);

            let runner = RUNNER.with(|cell| cell.borrow_mut().take());
            if let Some(mut runner) = runner {
                runner.destroy();
                log::info!("{}: destroyed", $game_name);
            }
        }

        // ---- Manual input ----

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, primary: bool) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, primary }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_cancel(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerCancel { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_leave(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerLeave { x, y }));
        }

        /// Report a viewport explicitly, bypassing the page lookup.
        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32, pixel_ratio: f32) {
            let viewport = Viewport::new(width, height, pixel_ratio);
            if viewport.is_degenerate() {
                log::warn!("{}: ignoring degenerate viewport {}x{}", $game_name, width, height);
                return;
            }
            HOST.with(|cell| {
                if let Some(host) = cell.borrow().as_ref() {
                    host.surface.apply(&viewport);
                }
            });
            with_runner(|r| r.resize(viewport));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_pixel_ratio() -> f32 {
            with_runner(|r| r.pixel_ratio()).unwrap_or(1.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }
    };

    ($game_type:ty, $game_name:literal, new = $ctor:expr) => {
        $crate::export_game!($game_type, $game_name, new = $ctor, after_tick = || {});
    };

    ($game_type:ty, $game_name:literal) => {
        $crate::export_game!($game_type, $game_name, new = <$game_type>::new());
    };
}
