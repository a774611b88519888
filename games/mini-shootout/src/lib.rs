use wasm_bindgen::prelude::*;
use kick_engine::*;

pub mod config;
pub mod field;
pub mod game;
pub mod gesture;
pub mod perspective;

pub use config::ShootoutConfig;
pub use game::MiniShootout;

thread_local! {
    /// Tuning loaded before `game_init`; reused if the game is restarted.
    static PRESET: std::cell::RefCell<Option<ShootoutConfig>> = std::cell::RefCell::new(None);
    /// Host score handler. Lives outside the runner so it survives restarts.
    static SCORE_HANDLER: std::cell::RefCell<Option<Box<dyn FnMut(u32)>>> =
        std::cell::RefCell::new(None);
}

fn preset_game() -> MiniShootout {
    PRESET
        .with(|cell| cell.borrow().clone())
        .map(MiniShootout::with_config)
        .unwrap_or_default()
}

/// Report this frame's score changes. Runs after the runner is released,
/// so the handler may call any export.
fn report_score_changes() {
    let changes = with_runner(|r| r.game_mut().take_score_changes()).unwrap_or_default();
    if changes.is_empty() {
        return;
    }
    let Some(mut handler) = SCORE_HANDLER.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    for score in changes {
        handler(score);
    }
    // Keep a handler the callback itself may have installed.
    SCORE_HANDLER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(handler);
        }
    });
}

kick_web::export_game!(
    MiniShootout,
    "mini-shootout",
    new = preset_game(),
    after_tick = report_score_changes
);

/// Install the Rust-side score handler, replacing any previous one.
pub fn set_score_handler(handler: impl FnMut(u32) + 'static) {
    SCORE_HANDLER.with(|cell| *cell.borrow_mut() = Some(Box::new(handler)));
}

/// Register `callback(score)`, called after each frame in which the score
/// changed. May be called before `game_init`.
#[wasm_bindgen]
pub fn game_set_score_callback(callback: js_sys::Function) {
    set_score_handler(move |score| {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(score)) {
            log::warn!("score callback threw: {:?}", err);
        }
    });
}

/// Apply a (possibly partial) JSON tuning override. On a parse error the
/// current tuning is kept.
#[wasm_bindgen]
pub fn game_load_config(json: &str) -> Result<(), JsValue> {
    let config = ShootoutConfig::from_json(json).map_err(|err| {
        log::warn!("rejected config: {}", err);
        JsValue::from(js_sys::Error::new(&format!("invalid config: {err}")))
    })?;
    PRESET.with(|cell| *cell.borrow_mut() = Some(config.clone()));
    with_runner(|r| r.game_mut().load_config(config));
    Ok(())
}

#[wasm_bindgen]
pub fn game_get_score() -> u32 {
    with_runner(|r| r.game().score()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn start() {
        let mut runner = kick_web::GameRunner::new(preset_game());
        runner.resize(Viewport::new(400.0, 800.0, 1.0));
        runner.init();
        RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    }

    fn shoot_and_play() {
        let rest = with_runner(|r| r.game().rest_position()).unwrap();
        game_pointer_down(rest.x, rest.y, true);
        game_pointer_up(rest.x, rest.y - 300.0);
        for _ in 0..120 {
            game_tick(1.0 / 60.0);
        }
    }

    #[test]
    fn score_handler_may_read_the_game_and_survives_restart() {
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        set_score_handler(move |score| sink.borrow_mut().push((score, game_get_score())));

        start();
        shoot_and_play();
        assert_eq!(*seen.borrow(), vec![(1, 1)]);

        game_destroy();
        start();
        shoot_and_play();
        assert_eq!(*seen.borrow(), vec![(1, 1), (1, 1)]);

        game_destroy();
        assert_eq!(game_get_score(), 0);
    }

    #[test]
    fn no_handler_drops_changes_quietly() {
        start();
        shoot_and_play();
        assert_eq!(game_get_score(), 1);
        assert!(with_runner(|r| r.game_mut().take_score_changes())
            .unwrap()
            .is_empty());
        game_destroy();
    }
}
