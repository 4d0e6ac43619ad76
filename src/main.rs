//! Formkit CLI - Form Workspace Editor
//!
//! Command-line host for editing form definitions on disk.

use anyhow::Context;
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use formkit::cli::commands;
use formkit::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Formkit v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(&cli.workspace, cmd),
        None => {
            println!("Formkit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(workspace: &std::path::Path, cmd: Commands) -> anyhow::Result<()> {
    let result = match cmd {
        Commands::Init { name, description } => {
            commands::init(workspace, name.as_deref(), description.as_deref())
        }
        Commands::Palette => commands::show_palette(),
        Commands::Add { kind } => commands::add(workspace, &kind),
        Commands::Remove { id } => commands::remove(workspace, &id),
        Commands::Move { from, to } => commands::move_element(workspace, from, to),
        Commands::Set { id, settings } => commands::set(workspace, &id, &settings),
        Commands::Duplicate { id } => commands::duplicate(workspace, &id),
        Commands::Select { id, clear } => {
            let id = if clear { None } else { id };
            commands::select(workspace, id.as_deref())
        }
        Commands::Rename { name, description } => {
            commands::rename(workspace, &name, description.as_deref())
        }
        Commands::Undo => commands::undo(workspace),
        Commands::Redo => commands::redo(workspace),
        Commands::History => commands::show_history(workspace),
        Commands::Print { inputs } => commands::print_form(workspace, inputs),
        Commands::Submit { values } => commands::submit(workspace, &values),
        Commands::Save => commands::save(workspace),
        Commands::Forms => commands::list_forms(workspace),
    };

    result
        .map_err(|e| {
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("hint: {}", hint);
            }
            e
        })
        .with_context(|| format!("[{}] command failed", workspace.display()))
}
