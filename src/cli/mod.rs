//! CLI module for flow block configuration
//!
//! Provides subcommands for exercising the editor without a UI host:
//! - `blocks`: list the block palette
//! - `suggest`: show the reference at a cursor position and its candidates
//! - `replay`: run a scripted panel session

pub mod blocks;
pub mod replay;
pub mod suggest;

use clap::{Parser, Subcommand};

/// Flow block configuration - inline reference editing for workflow blocks
#[derive(Parser)]
#[command(name = "flow-block-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List configurable block kinds
    Blocks,

    /// Show the reference being typed at a cursor and its suggestions
    Suggest(suggest::SuggestArgs),

    /// Replay a scripted panel session and print its events
    Replay(replay::ReplayArgs),
}
