// Presentation layer: turns user input into shop intents and renders the
// resulting snapshots.

pub mod commands;
pub mod render;

pub use commands::{Command, Presenter};
