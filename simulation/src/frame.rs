use bomber_core::{
    ActorSnapshot, BombSnapshot, Controller, ExplosionSnapshot, PowerUpSnapshot, Scoreboard,
    TileKind,
};
use bomber_world::{query, World};

/// Controls hint shown beneath the arena.
pub const CONTROLS_HINT: &str = "ARROWS:MOVE A:BOMB";

/// Prompt shown on the victory screen once a restart is possible.
pub const RESTART_PROMPT: &str = "Press A to restart";

/// Ticks the restart prompt stays in one blink phase.
pub const PROMPT_BLINK_TICKS: u32 = 15;

/// Everything a host needs to draw one tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Match in progress.
    Arena(ArenaFrame),
    /// Match decided, waiting for a restart.
    Victory(VictoryFrame),
}

/// Snapshot of the arena while the match is running.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArenaFrame {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Edge length of a tile in pixels.
    pub tile_size: u32,
    /// Tile kinds in row-major order.
    pub tiles: Vec<TileKind>,
    /// Actors in roster order.
    pub actors: Vec<ActorSnapshot>,
    /// Live bombs in placement order.
    pub bombs: Vec<BombSnapshot>,
    /// Live explosion cells.
    pub explosions: Vec<ExplosionSnapshot>,
    /// Power-ups whose wall is gone.
    pub power_ups: Vec<PowerUpSnapshot>,
    /// Status line texts.
    pub hud: Hud,
}

impl ArenaFrame {
    pub(crate) fn capture(world: &World) -> Self {
        let tiles = query::tile_view(world);
        let (columns, rows) = tiles.dimensions();
        let actors = query::actor_view(world);
        let hud = Hud::new(query::scores(world), actors.human());

        Self {
            columns,
            rows,
            tile_size: query::rules(world).tile_size,
            tiles: tiles.iter().map(|(_, kind)| kind).collect(),
            actors: actors.into_vec(),
            bombs: query::bombs(world),
            explosions: query::explosions(world),
            power_ups: query::power_ups(world)
                .into_iter()
                .filter(|power_up| power_up.revealed)
                .collect(),
            hud,
        }
    }
}

/// Text shown around the arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hud {
    /// Cumulative wins, human first.
    pub score: String,
    /// Static controls hint.
    pub controls: &'static str,
    /// Bombs the human may still drop against its capacity.
    pub bombs: String,
}

impl Hud {
    fn new(scores: Scoreboard, human: Option<&ActorSnapshot>) -> Self {
        let (available, max) = human
            .map(|actor| (actor.bombs_available(), actor.max_bombs))
            .unwrap_or_default();

        Self {
            score: scores.to_string(),
            controls: CONTROLS_HINT,
            bombs: format!("BOMBS:{available}/{max}"),
        }
    }
}

/// Win screen shown between matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VictoryFrame {
    /// Side that won the match.
    pub winner: Controller,
    /// Announcement naming the winning player.
    pub headline: String,
    /// Cumulative wins per side.
    pub scores: Scoreboard,
    /// Whether the restart prompt is drawn this tick.
    pub prompt_visible: bool,
}

impl VictoryFrame {
    pub(crate) fn capture(world: &World) -> Option<Self> {
        let winner = query::winner(world)?;

        Some(Self {
            winner,
            headline: format!("PLAYER {} WON!", winner.player_number()),
            scores: query::scores(world),
            prompt_visible: restart_prompt_visible(query::win_delay(world)),
        })
    }
}

/// The prompt blinks while the delay runs and stays lit once it expires.
fn restart_prompt_visible(win_delay: u32) -> bool {
    win_delay == 0 || (win_delay / PROMPT_BLINK_TICKS) % 2 == 0
}
