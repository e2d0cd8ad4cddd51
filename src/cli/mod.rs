//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// vnote - block-structured notes with voice attachments
#[derive(Parser, Debug)]
#[command(name = "vnote", version, about, long_about = None)]
pub struct Cli {
    /// Data directory for the note database (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new note
    New(NewArgs),

    /// List notes
    #[command(name = "ls")]
    List(ListArgs),

    /// Show a note's blocks
    Show(ShowArgs),

    /// Append text to a note's trailing block
    Append(AppendArgs),

    /// Attach a voice recording to a note
    AddVoice(AddVoiceArgs),

    /// Remove a block from a note
    RmBlock(RmBlockArgs),

    /// Delete a note and all of its blocks
    Rm(RmArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title
    pub title: String,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `append` command
#[derive(Parser, Debug)]
pub struct AppendArgs {
    /// Note ID
    pub note: String,

    /// Text to append
    pub text: String,
}

/// Arguments for the `add-voice` command
#[derive(Parser, Debug)]
pub struct AddVoiceArgs {
    /// Note ID
    pub note: String,

    /// Path to the recording file
    pub path: PathBuf,

    /// Recording size in bytes (defaults to the file's size on disk)
    #[arg(long)]
    pub size: Option<u64>,
}

/// Arguments for the `rm-block` command
#[derive(Parser, Debug)]
pub struct RmBlockArgs {
    /// Note ID
    pub note: String,

    /// Block position as shown by `show` (1-based)
    pub position: usize,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID
    pub note: String,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
