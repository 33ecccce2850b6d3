//! Silhouette Guess core crate.
//!
//! A random creature sprite is shown as a black silhouette; typing its name
//! reveals it. The name list comes from a paginated public API, the sprite is
//! confirmed to exist before it is shown (with a bounded number of redraws),
//! and guesses are compared case-insensitively.
//!
//! Everything except the `web` module is plain Rust and runs under
//! `cargo test` on the host; `web` wires the same pieces to `fetch` and the DOM.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod guess;
pub mod logging;
pub mod resolver;
pub mod rng;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{NameCatalog, NamePage, PageSource, load_catalog};
pub use config::GameConfig;
pub use error::GameError;
pub use game::{GameController, Phase, RoundHost, RoundToken, drive_round};
pub use guess::{GuessState, Verdict};
pub use resolver::{ImageProbe, ImageResolver, ResolveOutcome, ResolverState, Resolution};
pub use rng::{IndexSource, XorShiftIndexSource};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
