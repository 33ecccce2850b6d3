//! Browser entry points. The session (controller + view) lives in a
//! thread-local slot; async round work borrows it only between awaits.

mod fetch;
mod view;

pub use fetch::{FetchImageProbe, FetchPageSource};
pub use view::View;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::GameConfig;
use crate::game::{GameController, RoundHost, drive_round};
use crate::logging;
use crate::rng::XorShiftIndexSource;

struct Session {
    game: GameController,
    view: View,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Option<T> {
    SESSION.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// The thread-local session as a round host. Every step re-renders, so each
/// branch of a round (including failures) leaves the screen up to date.
struct SessionHost;

impl RoundHost for SessionHost {
    fn with_game<T>(&mut self, f: impl FnOnce(&mut GameController) -> T) -> Option<T> {
        with_session(|s| {
            let out = f(&mut s.game);
            s.view.render(&s.game);
            out
        })
    }
}

/// Start with the built-in endpoints.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    start_with(GameConfig::default())
}

/// Start with a JSON object overriding any of `list_base`, `image_base`,
/// `page_size`, `max_redraws`, `log_level`.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    start_with(GameConfig::from_json(json)?)
}

/// Discard the current round and start over from the catalog load.
#[wasm_bindgen]
pub fn reset_game() {
    restart();
}

fn start_with(config: GameConfig) -> Result<(), JsValue> {
    let config = config.validated()?;
    logging::init(config.level()?);

    // Reconfigure rather than replace: the round counter must survive so a
    // round still in flight from the previous start stays stale.
    let restarted = with_session(|s| s.game.reconfigure(config.clone())).is_some();
    if !restarted {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let view = View::mount(&doc)?;
        install_listeners(&view)?;
        SESSION.with(|cell| {
            cell.replace(Some(Session { game: GameController::new(config), view }));
        });
    }
    restart();
    Ok(())
}

fn install_listeners(view: &View) -> Result<(), JsValue> {
    // Guess submission
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            evt.prevent_default();
            let verdict = with_session(|s| {
                let raw = s.view.guess_text();
                let verdict = s.game.submit_guess(&raw);
                s.view.render(&s.game);
                verdict
            });
            if verdict.is_some_and(|v| v.asks_to_retry()) {
                if let Some(w) = window() {
                    let _ = w.alert_with_message("Keep trying!");
                }
            }
        }) as Box<dyn FnMut(_)>);
        view.form
            .add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Reload / guess another
    for button in [&view.reload, &view.again] {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            restart();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn restart() {
    wasm_bindgen_futures::spawn_local(play_round());
}

async fn play_round() {
    let mut host = SessionHost;
    let mut rng = match XorShiftIndexSource::from_entropy() {
        Ok(rng) => rng,
        Err(err) => {
            host.with_game(|g| {
                let token = g.reset();
                g.mark_failed(token, &err);
            });
            return;
        }
    };
    let Some(list_base) = host.with_game(|g| g.config().list_base.clone()) else {
        return;
    };
    let source = FetchPageSource::new(list_base);
    // Failures are logged and rendered through the controller.
    let _ = drive_round(&mut host, &source, &FetchImageProbe, &mut rng).await;
}
