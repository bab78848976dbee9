// Game logic lives in the library so tests can drive it without a terminal.
// Only the TUI (screens, widgets, the event loop) stays in main.rs.
pub mod app_dirs;
pub mod chance;
pub mod config;
pub mod engine;
pub mod feed;
pub mod game;
pub mod geometry;
pub mod landmark;
pub mod runtime;
pub mod session;
pub mod target;
pub mod timers;
pub mod util;
pub mod warmup;
