#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Bomber experience.

mod config;
mod headless;
mod scene;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bomber_core::ArenaLayout;
use bomber_rendering::{Presentation, RenderingBackend, Scene};
use bomber_rendering_macroquad::MacroquadBackend;
use bomber_simulation::Simulation;
use bomber_world::{query, DEFAULT_SEED};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Arcade bomb duel against an AI opponent.
#[derive(Debug, Parser)]
#[command(name = "bomber", version)]
struct CliArgs {
    /// Seed for power-up placement and AI tie-breaking.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with `[rules]` and `[ai]` overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Tracing filter directives, overriding `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
    /// Run without a window and print a JSON summary.
    #[arg(long)]
    headless: bool,
    /// Ticks to simulate in headless mode.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,
}

impl CliArgs {
    fn vsync(&self) -> Option<bool> {
        if self.vsync {
            Some(true)
        } else if self.no_vsync {
            Some(false)
        } else {
            None
        }
    }
}

/// Entry point for the Bomber command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_filter.as_deref())?;

    let settings = config::load(args.config.as_deref())?;
    let seed = args.seed.or(settings.seed).unwrap_or(DEFAULT_SEED);
    let simulation = Simulation::new(ArenaLayout::classic(), settings.rules, settings.ai, seed)
        .context("failed to start the match")?;
    info!(seed, headless = args.headless, "{}", query::welcome_banner(simulation.world()));

    if args.headless {
        let summary = headless::run(simulation, seed, args.ticks);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
        return Ok(());
    }

    run_windowed(simulation, &args)
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

fn run_windowed(mut simulation: Simulation, args: &CliArgs) -> Result<()> {
    let presentation = Presentation::new(
        query::welcome_banner(simulation.world()),
        scene::BACKGROUND,
        scene::logical_size(simulation.world()),
        Scene::Blank,
    );

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(enabled) = args.vsync() {
        backend = backend.with_vsync(enabled);
    }

    backend.run(presentation, move |_frame_dt, input, scene| {
        let frame = simulation.step(input.pad());
        for event in simulation.events() {
            debug!(?event, "world event");
        }
        *scene = scene::from_frame(frame.as_ref());
    })
}
