//! Command-line interface.

pub mod args;
pub mod logging;
pub mod overlay;

pub use args::{Cli, Commands, OverlayArgs};
pub use overlay::run_overlay;
