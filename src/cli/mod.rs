//! CLI module
//!
//! Command-line interface for walking paged collections.
//!
//! # Commands
//!
//! - `walk` - Stream every item of a collection as JSON lines
//! - `decode-cursor` - Show the position behind a cursor token
//! - `encode-cursor` - Build a cursor token by hand

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
