#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match orchestration for Bomber.
//!
//! A [`Simulation`] owns the world and the systems that drive it. Hosts call
//! [`Simulation::step`] exactly once per display refresh with the sampled pad
//! state and draw whatever frame comes back.

mod frame;

use std::mem;

use bomber_core::{ArenaLayout, Buttons, Command, Controller, Event, PadState, Rules, RulesError};
use bomber_system_ai::{Ai, Config as AiConfig};
use bomber_system_player_input::PlayerInput;
use bomber_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use frame::{
    ArenaFrame, Frame, Hud, VictoryFrame, CONTROLS_HINT, PROMPT_BLINK_TICKS, RESTART_PROMPT,
};

/// Random stream reserved for AI tie-breaking, distinct from power-up seeding.
const AI_STREAM: u64 = 1;

/// Drives a match one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    player_input: PlayerInput,
    ai: Ai,
    rng: ChaCha8Rng,
    events: Vec<Event>,
    pending_ai_events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation running a fresh match on `layout`.
    ///
    /// `seed` feeds both the power-up placement and the AI tie-breaking, on
    /// separate streams.
    pub fn new(
        layout: ArenaLayout,
        rules: Rules,
        ai_config: AiConfig,
        seed: u64,
    ) -> Result<Self, RulesError> {
        rules.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(AI_STREAM);

        let mut simulation = Self {
            world: World::new(),
            player_input: PlayerInput::new(),
            ai: Ai::new(ai_config),
            rng,
            events: Vec::new(),
            pending_ai_events: Vec::new(),
        };
        simulation.dispatch(Command::ConfigureArena {
            layout,
            rules,
            seed,
        });
        Ok(simulation)
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events emitted by the most recent step.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Advances the match by one tick.
    ///
    /// Returns `None` on the tick a match is decided; the following ticks
    /// yield the victory screen until the restart is confirmed.
    pub fn step(&mut self, pad: PadState) -> Option<Frame> {
        self.events.clear();

        if query::winner(&self.world).is_some() {
            // The AI only needs to hear from the restart onwards.
            self.pending_ai_events.clear();
            self.dispatch(Command::Tick);
            let frame = VictoryFrame::capture(&self.world).map(Frame::Victory);
            if pad.is_pressed(Buttons::ACTION) {
                self.dispatch(Command::RestartMatch);
            }
            return frame;
        }

        let roster = query::actor_view(&self.world).into_vec();
        for entry in roster {
            self.dispatch(Command::AnimateActor { actor: entry.id });

            let Some(actor) = query::actor(&self.world, entry.id) else {
                continue;
            };
            let mut commands = Vec::new();
            match actor.controller {
                Controller::Human => self.player_input.handle(&actor, pad, &mut commands),
                Controller::Ai => {
                    let events = mem::take(&mut self.pending_ai_events);
                    let actors = query::actor_view(&self.world);
                    self.ai.handle(
                        &events,
                        &actor,
                        actors.human(),
                        &query::hazard_view(&self.world),
                        &mut self.rng,
                        &mut commands,
                    );
                }
            }

            for command in commands {
                self.dispatch(command);
            }
        }

        self.dispatch(Command::Tick);

        if self
            .events
            .iter()
            .any(|event| matches!(event, Event::MatchDecided { .. }))
        {
            debug!(tick = query::tick_index(&self.world), "frame skipped on match decision");
            return None;
        }

        Some(Frame::Arena(ArenaFrame::capture(&self.world)))
    }

    fn dispatch(&mut self, command: Command) {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        self.pending_ai_events.extend_from_slice(&self.events[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_rules_are_rejected() {
        let error = Simulation::new(
            ArenaLayout::classic(),
            Rules {
                bomb_fuse_ticks: 0,
                ..Rules::default()
            },
            AiConfig::default(),
            1,
        )
        .expect_err("zero fuse must be rejected");

        assert_eq!(error, RulesError::ZeroBombFuse);
    }

    #[test]
    fn first_step_renders_the_arena() {
        let mut simulation =
            Simulation::new(ArenaLayout::classic(), Rules::default(), AiConfig::default(), 1)
                .expect("default rules are valid");

        let Some(Frame::Arena(frame)) = simulation.step(PadState::idle()) else {
            panic!("expected an arena frame");
        };

        assert_eq!((frame.columns, frame.rows), (15, 9));
        assert_eq!(frame.tiles.len(), 15 * 9);
        assert_eq!(frame.actors.len(), 2);
        assert!(frame.bombs.is_empty());
        assert_eq!(frame.hud.score, "0:0");
        assert_eq!(frame.hud.bombs, "BOMBS:1/1");
        assert!(simulation.events().contains(&Event::TimeAdvanced { tick: 1 }));
    }
}
