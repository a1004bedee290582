//! Maze Dash core crate.
//!
//! A browser maze game: a randomized depth-first backtracker carves a
//! perfect maze, the canvas renderer draws it, and the arrow keys walk a
//! player marker from the top-left cell to the bottom-right goal against a
//! count-up timer. Completed runs land in an in-session history list.
//!
//! The game rules ([`grid`], [`generator`], [`session`]) are plain Rust and
//! test natively; `start_game()` hands control to the browser glue in
//! [`app`], which owns the DOM, the canvas and the interval timer.

use wasm_bindgen::prelude::*;

mod app;
mod generator;
mod grid;
mod session;

pub use generator::generate;
pub use grid::{Cell, Direction, Grid};
pub use session::{
    DEFAULT_MAZE_SIZE, GameSession, MAX_MAZE_SIZE, MIN_MAZE_SIZE, MoveOutcome, Phase, Player,
    RunRecord, SizeError, format_elapsed,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Entry point called from the host page once the wasm module is loaded.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::start_maze_mode()
}
