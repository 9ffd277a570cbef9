//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the herald binary.

mod commands;
mod draft;
mod output;
mod publish;

pub use commands::{Cli, Commands, ModeArg, OutputFormat};
pub use draft::{handle_draft, handle_preview, handle_show};
pub use publish::{handle_publish, image_source_from_file};
