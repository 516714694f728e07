//! CLI layer - argument parsing, presentation, and the app runner

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod screen;

pub use args::{RunMode, RunOptions};
