#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bomber.
//!
//! The world owns the tile grid, the actor roster, live bombs and explosion
//! cells, hidden power-ups and the match bookkeeping. It is mutated only by
//! [`apply`] and observed only through [`query`].

mod actors;
mod arena;
mod blast;
mod ordnance;
mod power_ups;

use bomber_core::{
    ActorId, ArenaLayout, Command, Controller, DeathCause, Direction, Event, Rules, Scoreboard,
    WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub use blast::{blast_footprint, blast_hits, HazardView};

use actors::Actor;
use arena::TileMap;
use ordnance::Ordnance;
use power_ups::PowerUp;

/// Power-up seed used when no seed is supplied.
pub const DEFAULT_SEED: u64 = 0x5eed_b0b5_1e55_0001;

/// Represents the authoritative Bomber world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    layout: ArenaLayout,
    rules: Rules,
    tiles: TileMap,
    actors: Vec<Actor>,
    ordnance: Ordnance,
    power_ups: Vec<PowerUp>,
    rng: ChaCha8Rng,
    winner: Option<Controller>,
    win_delay: u32,
    scores: Scoreboard,
    tick_index: u64,
}

impl World {
    /// Creates a new world running a match on the classic arena with default rules.
    #[must_use]
    pub fn new() -> Self {
        let layout = ArenaLayout::classic();
        let tiles = TileMap::from_layout(&layout);
        let mut world = Self {
            banner: WELCOME_BANNER,
            layout,
            rules: Rules::default(),
            tiles,
            actors: Vec::new(),
            ordnance: Ordnance::default(),
            power_ups: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
            winner: None,
            win_delay: 0,
            scores: Scoreboard::default(),
            tick_index: 0,
        };
        world.reset_match();
        world
    }

    /// Rebuilds the grid, roster, ordnance and power-ups from the installed
    /// layout. Scores and the random stream carry over.
    fn reset_match(&mut self) {
        let tile_size = self.rules.tile_size;
        self.tiles = TileMap::from_layout(&self.layout);
        self.actors = self
            .layout
            .spawns()
            .iter()
            .enumerate()
            .map(|(slot, spawn)| {
                let id = ActorId::new(u32::try_from(slot).unwrap_or(u32::MAX));
                Actor::spawn(id, *spawn, tile_size)
            })
            .collect();
        self.ordnance.clear();
        self.power_ups = power_ups::seed(
            &self.tiles.view(),
            self.rules.power_up_chance,
            &mut self.rng,
        );
        self.winner = None;
        self.win_delay = 0;
    }

    fn actor_mut(&mut self, actor: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(actor.index()).filter(|entry| entry.id == actor)
    }

    fn step_actor(&mut self, actor: ActorId, direction: Direction, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            debug!(?actor, "step ignored after the match was decided");
            return;
        }
        let Some(entry) = self.actors.get(actor.index()) else {
            debug!(?actor, "step ignored for unknown actor");
            return;
        };
        if entry.moving {
            debug!(?actor, "step ignored while animating");
            return;
        }

        let from = entry.cell;
        let tiles = self.tiles.view();
        let Some(to) = tiles
            .neighbor(from, direction)
            .filter(|cell| tiles.can_move_to(*cell))
        else {
            debug!(?actor, ?direction, "step blocked");
            return;
        };

        if let Some(entry) = self.actor_mut(actor) {
            entry.step_to(to);
            out_events.push(Event::ActorStepped { actor, from, to });
        }
    }

    fn place_bomb(&mut self, actor: ActorId, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            debug!(?actor, "bomb ignored after the match was decided");
            return;
        }
        let fuse = self.rules.bomb_fuse_ticks;
        let Some(entry) = self.actors.get(actor.index()) else {
            debug!(?actor, "bomb ignored for unknown actor");
            return;
        };
        if !entry.can_place_bomb() {
            debug!(?actor, active = entry.active_bombs, "bomb ignored at capacity");
            return;
        }
        let cell = entry.cell;
        if self.ordnance.bomb_at(cell) {
            debug!(?actor, ?cell, "bomb ignored on occupied cell");
            return;
        }

        self.ordnance.plant(actor, cell, fuse);
        if let Some(entry) = self.actor_mut(actor) {
            entry.active_bombs = entry.active_bombs.saturating_add(1);
        }
        out_events.push(Event::BombPlaced { actor, cell });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        if self.winner.is_some() {
            self.win_delay = self.win_delay.saturating_sub(1);
            return;
        }

        let detonations = self
            .ordnance
            .advance(&mut self.tiles, self.rules.explosion_ticks);
        for detonation in detonations {
            if let Some(owner) = self.actor_mut(detonation.owner) {
                owner.active_bombs = owner.active_bombs.saturating_sub(1);
            }
            out_events.push(Event::BombDetonated {
                owner: detonation.owner,
                cell: detonation.cell,
                blast: detonation.blast,
            });
            for cell in detonation.destroyed {
                out_events.push(Event::WallDestroyed { cell });
            }
        }

        self.collect_power_ups(out_events);
        self.resolve_deaths(out_events);
    }

    fn collect_power_ups(&mut self, out_events: &mut Vec<Event>) {
        let tiles = self.tiles.view();
        for actor in &mut self.actors {
            let mut collected = Vec::new();
            self.power_ups.retain(|power_up| {
                let taken =
                    power_up.cell == actor.cell && power_ups::is_revealed(&tiles, power_up.cell);
                if taken {
                    collected.push((power_up.cell, power_up.kind));
                }
                !taken
            });

            for (cell, kind) in collected {
                actor.max_bombs = actor.max_bombs.saturating_add(1);
                out_events.push(Event::PowerUpCollected {
                    actor: actor.id,
                    cell,
                    kind,
                });
            }
        }
    }

    fn resolve_deaths(&mut self, out_events: &mut Vec<Event>) {
        let exploded = self
            .actors
            .iter()
            .find(|actor| self.ordnance.explosion_at(actor.cell))
            .map(|actor| (actor.id, actor.controller, DeathCause::Explosion));

        let casualty = exploded.or_else(|| {
            let human = self
                .actors
                .iter()
                .find(|actor| actor.controller == Controller::Human)?;
            self.actors
                .iter()
                .any(|actor| actor.controller == Controller::Ai && actor.cell == human.cell)
                .then_some((human.id, human.controller, DeathCause::Collision))
        });

        let Some((actor, side, cause)) = casualty else {
            return;
        };

        let winner = side.opponent();
        self.winner = Some(winner);
        self.win_delay = self.rules.win_delay_ticks;
        self.scores.record_win(winner);
        info!(?actor, ?cause, ?winner, scores = %self.scores, "match decided");
        out_events.push(Event::ActorKilled { actor, cause });
        out_events.push(Event::MatchDecided {
            winner,
            scores: self.scores,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that the current state does not permit are ignored without
/// emitting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena {
            layout,
            rules,
            seed,
        } => {
            if let Err(error) = rules.validate() {
                warn!(%error, "arena configuration rejected");
                return;
            }
            world.layout = layout;
            world.rules = rules;
            world.rng = ChaCha8Rng::seed_from_u64(seed);
            world.scores = Scoreboard::default();
            world.tick_index = 0;
            world.reset_match();

            let columns = world.layout.columns();
            let rows = world.layout.rows();
            let actors = u32::try_from(world.actors.len()).unwrap_or(u32::MAX);
            info!(columns, rows, actors, seed, "arena configured");
            out_events.push(Event::ArenaConfigured {
                columns,
                rows,
                actors,
            });
        }
        Command::AnimateActor { actor } => {
            let tile_size = world.rules.tile_size;
            let speed = world.rules.move_speed;
            if let Some(entry) = world.actor_mut(actor) {
                entry.animate(tile_size, speed);
            }
        }
        Command::StepActor { actor, direction } => {
            world.step_actor(actor, direction, out_events);
        }
        Command::PlaceBomb { actor } => {
            world.place_bomb(actor, out_events);
        }
        Command::Tick => {
            world.tick(out_events);
        }
        Command::RestartMatch => {
            if world.winner.is_none() || world.win_delay > 0 {
                debug!(
                    decided = world.winner.is_some(),
                    delay = world.win_delay,
                    "restart ignored"
                );
                return;
            }
            world.reset_match();
            info!(scores = %world.scores, "match restarted");
            out_events.push(Event::MatchRestarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bomber_core::{
        ActorId, ActorSnapshot, ActorView, ArenaLayout, BombSnapshot, CellCoord, Controller,
        ExplosionSnapshot, PowerUpSnapshot, Rules, Scoreboard, TileView,
    };

    use super::{HazardView, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules governing the current match.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Layout the arena is rebuilt from on every restart.
    #[must_use]
    pub fn layout(world: &World) -> &ArenaLayout {
        &world.layout
    }

    /// Read-only view of the live tile grid.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView<'_> {
        world.tiles.view()
    }

    /// Captures a read-only view of every actor in roster order.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(world.actors.iter().map(|actor| actor.snapshot()).collect())
    }

    /// Snapshot of a single actor.
    #[must_use]
    pub fn actor(world: &World, actor: ActorId) -> Option<ActorSnapshot> {
        world
            .actors
            .get(actor.index())
            .filter(|entry| entry.id == actor)
            .map(|entry| entry.snapshot())
    }

    /// Live bombs in placement order.
    #[must_use]
    pub fn bombs(world: &World) -> Vec<BombSnapshot> {
        let tile_size = world.rules.tile_size;
        world
            .ordnance
            .bombs()
            .iter()
            .map(|bomb| bomb.snapshot(tile_size))
            .collect()
    }

    /// Live explosion cells in ignition order.
    #[must_use]
    pub fn explosions(world: &World) -> Vec<ExplosionSnapshot> {
        let tile_size = world.rules.tile_size;
        world
            .ordnance
            .explosions()
            .iter()
            .map(|explosion| explosion.snapshot(tile_size))
            .collect()
    }

    /// Power-ups still waiting to be collected, hidden ones included.
    #[must_use]
    pub fn power_ups(world: &World) -> Vec<PowerUpSnapshot> {
        let tiles = world.tiles.view();
        let tile_size = world.rules.tile_size;
        world
            .power_ups
            .iter()
            .map(|power_up| power_up.snapshot(&tiles, tile_size))
            .collect()
    }

    /// Combined view of tiles, bombs and explosions used for danger checks.
    #[must_use]
    pub fn hazard_view(world: &World) -> HazardView<'_> {
        HazardView::new(
            world.tiles.view(),
            world.ordnance.bombs(),
            world.ordnance.explosions(),
        )
    }

    /// Reports whether the cell is currently inside a live blast or explosion.
    #[must_use]
    pub fn is_dangerous(world: &World, cell: CellCoord) -> bool {
        hazard_view(world).is_dangerous(cell)
    }

    /// Side that won the current match, if it has been decided.
    #[must_use]
    pub fn winner(world: &World) -> Option<Controller> {
        world.winner
    }

    /// Ticks left before a restart is accepted.
    #[must_use]
    pub fn win_delay(world: &World) -> u32 {
        world.win_delay
    }

    /// Cumulative wins per side.
    #[must_use]
    pub fn scores(world: &World) -> Scoreboard {
        world.scores
    }

    /// Number of ticks processed since the arena was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
