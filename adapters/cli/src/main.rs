#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Robots in a terminal.

mod config;
mod input;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use robots_core::Command;
use robots_rendering::{Presenter, Scene, TextPresenter};
use robots_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Overrides,
    input::{Action, HELP},
};

/// Chase game on a grid: dodge the robots until they wreck each other.
#[derive(Debug, Parser)]
#[command(name = "robots", version)]
struct Cli {
    /// TOML file with `seed` and a `[board]` table.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of board rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of board columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Robots scattered by every new game.
    #[arg(long)]
    robots: Option<u32>,
    /// Teleport units granted by every new game.
    #[arg(long)]
    teleports: Option<u32>,
    /// Seed for robot placement and teleports.
    #[arg(long)]
    seed: Option<u64>,
    /// Do not ring the terminal bell when a game ends.
    #[arg(long)]
    no_bell: bool,
}

/// Entry point for the Robots command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = config::resolve(
        cli.config.as_deref(),
        Overrides {
            rows: cli.rows,
            columns: cli.columns,
            robots: cli.robots,
            teleports: cli.teleports,
            seed: cli.seed,
        },
    )?;
    info!(seed = settings.seed, "starting robots");

    let mut world = World::new(settings.board, settings.seed).context("failed to start game")?;
    let stdout = io::stdout();
    let mut presenter = TextPresenter::new(stdout.lock(), !cli.no_bell);
    run(&mut world, io::stdin().lock(), &mut presenter)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Reads one command per line until input ends or the player quits.
fn run<R, P>(world: &mut World, input: R, presenter: &mut P) -> Result<()>
where
    R: BufRead,
    P: Presenter,
{
    let mut scene = Scene::from_snapshot(&query::snapshot(world));
    presenter.message(HELP)?;
    presenter.present(&scene)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let Some(action) = input::parse(&line) else {
            debug!(input = %line.trim(), "unrecognised input");
            presenter.message(HELP)?;
            continue;
        };

        let events = match action {
            Action::Quit => break,
            Action::Help => {
                presenter.message(HELP)?;
                continue;
            }
            Action::Move(direction) => world.move_human(direction)?.events,
            Action::Teleport => world.teleport_human()?.events,
            Action::NewGame => {
                let mut events = Vec::new();
                world::apply(world, Command::NewGame, &mut events)?;
                events
            }
        };

        for cue in scene.apply(&events)? {
            presenter.play(cue)?;
        }
        presenter.present(&scene)?;
    }

    Ok(())
}
