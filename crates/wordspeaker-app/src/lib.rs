//! WordSpeaker terminal front end.
//!
//! The binary in `main.rs` wires these pieces to stdin and the tokio runtime;
//! keeping them in a library lets the integration tests drive a session
//! directly.

pub mod app;
pub mod cli;
pub mod commands;

pub use app::{App, Flow};
pub use cli::CliArgs;
pub use commands::Command;
