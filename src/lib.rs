//! Pocket Arcade: a retro handheld-style shell with three browser mini-games.
//!
//! The game rules (`chase`, `maze`, `draw`) are plain Rust driven by
//! `tick(dt)` and unit tested natively; `web` binds them to the DOM, Web
//! Audio and `localStorage` and is the only part exported to JavaScript.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod chase;
pub mod draw;
pub mod error;
pub mod grid;
pub mod logger;
pub mod maze;
pub mod menu;
pub mod settings;
pub mod web;

pub use error::{ArcadeError, Result};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init();
    log::info!("pocket-arcade {} ready", env!("CARGO_PKG_VERSION"));
}
