//! Pinyin Air Force core crate.
//!
//! Hanzi balloons drift toward the player's castle; typing a character's pinyin pops
//! it. The gameplay (spawning, matching, scoring, lives, level progression) lives in
//! [`game`] and runs natively under `cargo test`. [`screen`] wires sessions to
//! per-device progress, and the browser front end (`start_game()`) only draws and
//! forwards key presses.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod dataset;
pub mod error;
pub mod game;
pub mod levels;
pub mod pinyin;
pub mod practice;
pub mod scoring;
pub mod screen;
pub mod shuffle;
pub mod store;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::{GameConfig, Params};
pub use dataset::{Character, character_pool};
pub use error::GameError;
pub use game::{CharacterInGame, GameEvent, GamePhase, GameState, Session, SubmitOutcome};
pub use levels::{LEVELS, LevelConfig};
pub use screen::{App, Screen};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::default());
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    launch()
}

#[cfg(target_arch = "wasm32")]
fn launch() -> Result<(), JsValue> {
    web::start()
}

#[cfg(not(target_arch = "wasm32"))]
fn launch() -> Result<(), JsValue> {
    Err(JsValue::from_str("start_game needs a browser"))
}
