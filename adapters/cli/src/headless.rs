//! Window-less runner used for smoke tests and scripted soak runs.

use bomber_core::{Controller, Event, PadState, Scoreboard};
use bomber_simulation::Simulation;
use bomber_world::query;
use serde::Serialize;
use tracing::debug;

/// Outcome of a headless run, printed as JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct HeadlessSummary {
    pub(crate) seed: u64,
    pub(crate) ticks_run: u32,
    pub(crate) frames_rendered: u32,
    pub(crate) frames_skipped: u32,
    pub(crate) matches_decided: u32,
    pub(crate) scores: Scoreboard,
    pub(crate) winner: Option<Controller>,
}

/// Steps the simulation `ticks` times with an idle pad.
pub(crate) fn run(mut simulation: Simulation, seed: u64, ticks: u32) -> HeadlessSummary {
    let mut frames_rendered = 0_u32;
    let mut matches_decided = 0_u32;

    for _ in 0..ticks {
        if simulation.step(PadState::idle()).is_some() {
            frames_rendered += 1;
        }
        for event in simulation.events() {
            if matches!(event, Event::MatchDecided { .. }) {
                matches_decided += 1;
            }
            if !matches!(event, Event::TimeAdvanced { .. }) {
                debug!(?event, "world event");
            }
        }
    }

    let world = simulation.world();
    HeadlessSummary {
        seed,
        ticks_run: ticks,
        frames_rendered,
        frames_skipped: ticks - frames_rendered,
        matches_decided,
        scores: query::scores(world),
        winner: query::winner(world),
    }
}
