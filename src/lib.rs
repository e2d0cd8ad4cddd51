//! vnote - block-structured notes with voice attachments

pub mod cli;
pub mod domain;
pub mod editor;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::Level;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_add_voice, handle_append, handle_list, handle_new, handle_rm, handle_rm_block,
        handle_show,
    },
};
use store::DbManager;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Completions don't need the database.
    if let Command::Completions(args) = &cli.command {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(args.shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    let data_dir = config.data_dir(cli.data_dir.as_ref());
    let store = DbManager::open_in_dir(&data_dir)?;

    match &cli.command {
        Command::New(args) => handle_new(args, &store),
        Command::List(args) => handle_list(args, &store),
        Command::Show(args) => handle_show(args, &store),
        Command::Append(args) => handle_append(args, &store),
        Command::AddVoice(args) => handle_add_voice(args, &store),
        Command::RmBlock(args) => handle_rm_block(args, &store),
        Command::Rm(args) => handle_rm(args, &store),
        Command::Completions(_) => Ok(()),
    }
}
