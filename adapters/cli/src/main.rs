#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless CrashNet sessions and manages
//! room layout files.

mod config;
mod layout_files;
mod logging;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crashnet_core::{TileLayout, TileType};
use log::info;

use crate::{
    config::{SessionConfig, WorldChoice},
    session::Session,
};

/// Headless driver for the CrashNet room simulation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run a scripted session and print the final room.
    Run(RunArgs),
    /// Inspect or create room layout files.
    #[command(subcommand)]
    Layout(LayoutCommand),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// TOML session configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides the configured number of ticks.
    #[arg(long)]
    ticks: Option<u32>,

    /// Overrides the configured world size.
    #[arg(long, value_enum)]
    world: Option<WorldChoice>,

    /// CSV layout loaded into the start room before the first tick.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,

    /// Writes the final room's layout to this CSV file.
    #[arg(long, value_name = "PATH")]
    save_layout: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum LayoutCommand {
    /// Validate a layout file, optionally against room dimensions.
    Check {
        /// CSV layout file.
        path: PathBuf,
        /// Expected number of columns.
        #[arg(long, requires = "rows")]
        columns: Option<u32>,
        /// Expected number of rows.
        #[arg(long, requires = "columns")]
        rows: Option<u32>,
    },
    /// Write a layout of ground tiles, optionally walled in.
    Blank {
        /// Destination CSV file.
        path: PathBuf,
        /// Number of columns.
        #[arg(long, default_value_t = 25)]
        columns: u32,
        /// Number of rows.
        #[arg(long, default_value_t = 19)]
        rows: u32,
        /// Surround the room with walls.
        #[arg(long)]
        walled: bool,
    },
}

/// Entry point for the CrashNet command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.mode {
        Mode::Run(args) => run(args),
        Mode::Layout(command) => layout(command),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(world) = args.world {
        config.world.number = world;
    }
    let ticks = args.ticks.unwrap_or(config.session.ticks);

    let mut session = Session::new(config);
    if let Some(path) = &args.layout {
        let layout = layout_files::read(path)?;
        session
            .load_layout(layout)
            .with_context(|| format!("cannot use layout {}", path.display()))?;
    }

    let report = session.run(ticks)?;
    for (from, to) in &report.room_changes {
        info!("moved from {from:?} to {to:?}");
    }
    println!(
        "{} ticks, {} room changes, room ({}, {}) holds {} objects",
        report.ticks,
        report.room_changes.len(),
        report.final_room.column(),
        report.final_room.row(),
        report.objects
    );
    println!("{}", report.frame);

    if let Some(path) = &args.save_layout {
        layout_files::write(path, &report.layout)?;
        info!("saved layout to {}", path.display());
    }
    Ok(())
}

fn layout(command: LayoutCommand) -> Result<()> {
    match command {
        LayoutCommand::Check {
            path,
            columns,
            rows,
        } => {
            let layout = layout_files::check(&path, columns.zip(rows))?;
            let walls = layout.iter().filter(|(_, _, tile)| tile.is_wall()).count();
            println!(
                "{}: {}x{} tiles, {walls} walls",
                path.display(),
                layout.columns(),
                layout.rows()
            );
        }
        LayoutCommand::Blank {
            path,
            columns,
            rows,
            walled,
        } => {
            anyhow::ensure!(columns > 0 && rows > 0, "layouts need at least one tile");
            let layout = TileLayout::from_fn(columns, rows, |column, row| {
                let edge = column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
                if walled && edge {
                    TileType::Wall
                } else {
                    TileType::Ground
                }
            });
            layout_files::write(&path, &layout)?;
            info!("wrote {columns}x{rows} layout to {}", path.display());
        }
    }
    Ok(())
}
