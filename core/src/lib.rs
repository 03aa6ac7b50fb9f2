#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bomber engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and adapters react to deterministically. Systems read immutable
//! snapshots and respond exclusively with new command batches.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bomber.";

/// Number of tile columns in the classic arena.
pub const ARENA_COLUMNS: u32 = 15;

/// Number of tile rows in the classic arena.
pub const ARENA_ROWS: u32 = 9;

/// Number of tiles a blast travels along each arm.
///
/// The radius is fixed; the AI escape search assumes it.
pub const BLAST_RADIUS: u32 = 1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a layout and rule set, clears the scoreboard and starts a fresh match.
    ConfigureArena {
        /// Tile layout and spawn points of the arena.
        layout: ArenaLayout,
        /// Timers and tuning values applied to the match.
        rules: Rules,
        /// Seed for the random source used when hiding power-ups.
        seed: u64,
    },
    /// Advances the pixel animation of an actor by a single tick.
    AnimateActor {
        /// Actor whose animation should advance.
        actor: ActorId,
    },
    /// Requests that an actor move one tile in the provided direction.
    StepActor {
        /// Actor attempting to move.
        actor: ActorId,
        /// Direction of travel.
        direction: Direction,
    },
    /// Requests that an actor plant a bomb on its current cell.
    PlaceBomb {
        /// Actor planting the bomb.
        actor: ActorId,
    },
    /// Advances bombs, explosions and match bookkeeping by one tick.
    Tick,
    /// Requests a fresh round after a win once the post-win delay has expired.
    RestartMatch,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a new arena was installed and a match started.
    ArenaConfigured {
        /// Number of tile columns in the arena.
        columns: u32,
        /// Number of tile rows in the arena.
        rows: u32,
        /// Number of actors in the roster.
        actors: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Confirms that an actor moved between two cells.
    ActorStepped {
        /// Actor that moved.
        actor: ActorId,
        /// Cell the actor occupied before moving.
        from: CellCoord,
        /// Cell the actor occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a bomb was planted.
    BombPlaced {
        /// Actor that owns the bomb.
        actor: ActorId,
        /// Cell holding the bomb.
        cell: CellCoord,
    },
    /// Reports that a bomb's fuse ran out.
    BombDetonated {
        /// Actor that planted the bomb.
        owner: ActorId,
        /// Cell that held the bomb.
        cell: CellCoord,
        /// Cells engulfed by the resulting explosion, bomb cell first.
        blast: Vec<CellCoord>,
    },
    /// Reports that a breakable wall was destroyed by a blast.
    WallDestroyed {
        /// Cell that held the wall.
        cell: CellCoord,
    },
    /// Reports that an actor picked up a power-up.
    PowerUpCollected {
        /// Actor that collected the power-up.
        actor: ActorId,
        /// Cell the power-up was collected from.
        cell: CellCoord,
        /// Kind of power-up collected.
        kind: PowerUpKind,
    },
    /// Reports that an actor was eliminated.
    ActorKilled {
        /// Actor that was eliminated.
        actor: ActorId,
        /// What eliminated the actor.
        cause: DeathCause,
    },
    /// Announces that a side won the current match.
    MatchDecided {
        /// Side credited with the win.
        winner: Controller,
        /// Cumulative wins after crediting the winner.
        scores: Scoreboard,
    },
    /// Announces that the arena was reset for a new match.
    MatchRestarted,
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in the canonical evaluation order: up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Column and row deltas for a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

/// Roster slot identifying a single actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided roster slot.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Roster slot expressed as a collection index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Who decides an actor's moves. Also names the side credited with wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    /// Driven by the button state supplied by the host.
    Human,
    /// Driven by the AI system.
    Ai,
}

impl Controller {
    /// Player number shown on the win screen.
    #[must_use]
    pub const fn player_number(self) -> u32 {
        match self {
            Self::Human => 1,
            Self::Ai => 2,
        }
    }

    /// The side opposing this one.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Human => Self::Ai,
            Self::Ai => Self::Human,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Signed column and row offset from `self` to `other`.
    #[must_use]
    pub fn offset_to(self, other: CellCoord) -> (i64, i64) {
        (
            i64::from(other.column) - i64::from(self.column),
            i64::from(other.row) - i64::from(self.row),
        )
    }

    /// Adjacent cell in the provided direction, or `None` when it would leave
    /// the non-negative quadrant.
    ///
    /// Upper bounds are not checked; use [`TileView::neighbor`] for that.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }
}

/// Pixel position of an actor, bomb or explosion relative to the arena origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Upper-left pixel of the provided cell.
    #[must_use]
    pub fn of_cell(cell: CellCoord, tile_size: u32) -> Self {
        let size = i64::from(tile_size);
        let x = i64::from(cell.column()) * size;
        let y = i64::from(cell.row()) * size;
        Self {
            x: i32::try_from(x).unwrap_or(i32::MAX),
            y: i32::try_from(y).unwrap_or(i32::MAX),
        }
    }
}

/// Contents of a single arena tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable floor.
    Empty,
    /// Indestructible wall that also stops blasts.
    SolidWall,
    /// Wall that a blast turns into floor.
    BreakableWall,
}

impl TileKind {
    /// Reports whether actors are prevented from entering the tile.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::SolidWall | Self::BreakableWall)
    }

    /// Reports whether a blast stops before reaching the tile.
    #[must_use]
    pub const fn blocks_blast(self) -> bool {
        matches!(self, Self::SolidWall)
    }
}

/// Read-only view into the arena's tile grid.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    tiles: &'a [TileKind],
    columns: u32,
    rows: u32,
}

impl<'a> TileView<'a> {
    /// Captures a new tile view backed by the provided row-major slice.
    #[must_use]
    pub fn new(tiles: &'a [TileKind], columns: u32, rows: u32) -> Self {
        Self {
            tiles,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether an actor may enter the cell.
    ///
    /// Out-of-bounds cells and both wall kinds are rejected.
    #[must_use]
    pub fn can_move_to(&self, cell: CellCoord) -> bool {
        self.tile(cell)
            .is_some_and(|tile| !tile.blocks_movement())
    }

    /// Adjacent in-bounds cell in the provided direction.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction).filter(|next| self.contains(*next))
    }

    /// Iterates over every cell and its tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + 'a {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorSnapshot {
    /// Roster slot of the actor.
    pub id: ActorId,
    /// Who decides the actor's moves.
    pub controller: Controller,
    /// Authoritative grid cell.
    pub cell: CellCoord,
    /// Cell the actor returns to on reset.
    pub spawn: CellCoord,
    /// Animated pixel position converging toward the grid cell.
    pub pixel: PixelPoint,
    /// Indicates whether the pixel animation is still in progress.
    pub moving: bool,
    /// Number of bombs the actor may have live at once.
    pub max_bombs: u32,
    /// Number of the actor's bombs currently live.
    pub active_bombs: u32,
}

impl ActorSnapshot {
    /// Bombs the actor may still plant before reaching capacity.
    #[must_use]
    pub const fn bombs_available(&self) -> u32 {
        self.max_bombs.saturating_sub(self.active_bombs)
    }
}

/// Read-only snapshot describing every actor in the roster.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the first human-controlled actor.
    #[must_use]
    pub fn human(&self) -> Option<&ActorSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.controller == Controller::Human)
    }

    /// Number of actors in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a live bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BombSnapshot {
    /// Actor that planted the bomb.
    pub owner: ActorId,
    /// Cell holding the bomb.
    pub cell: CellCoord,
    /// Grid-aligned pixel position of the bomb.
    pub pixel: PixelPoint,
    /// Ticks remaining before detonation.
    pub fuse: u32,
}

/// Immutable representation of a tile engulfed in blast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExplosionSnapshot {
    /// Cell covered by the explosion.
    pub cell: CellCoord,
    /// Grid-aligned pixel position of the explosion.
    pub pixel: PixelPoint,
    /// Ticks remaining before the explosion fades.
    pub remaining: u32,
}

/// Types of power-ups hidden under breakable walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Raises the collector's bomb capacity by one.
    ExtraBomb,
}

/// Immutable representation of a power-up still waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PowerUpSnapshot {
    /// Cell hiding the power-up.
    pub cell: CellCoord,
    /// Grid-aligned pixel position of the power-up.
    pub pixel: PixelPoint,
    /// Kind of bonus granted on pickup.
    pub kind: PowerUpKind,
    /// Indicates whether the wall above it is gone.
    pub revealed: bool,
}

/// What eliminated an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The actor stood on a live explosion cell.
    Explosion,
    /// The human shared a cell with an AI actor.
    Collision,
}

/// Cumulative wins per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    human: u32,
    ai: u32,
}

impl Scoreboard {
    /// Creates a scoreboard with explicit win counts.
    #[must_use]
    pub const fn new(human: u32, ai: u32) -> Self {
        Self { human, ai }
    }

    /// Wins credited to the provided side.
    #[must_use]
    pub const fn wins(&self, side: Controller) -> u32 {
        match side {
            Controller::Human => self.human,
            Controller::Ai => self.ai,
        }
    }

    /// Credits one win to the provided side.
    pub fn record_win(&mut self, side: Controller) {
        match side {
            Controller::Human => self.human = self.human.saturating_add(1),
            Controller::Ai => self.ai = self.ai.saturating_add(1),
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.human, self.ai)
    }
}

bitflags! {
    /// Buttons exposed by the host's input primitive.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// Directional pad up.
        const UP = 1 << 0;
        /// Directional pad down.
        const DOWN = 1 << 1;
        /// Directional pad left.
        const LEFT = 1 << 2;
        /// Directional pad right.
        const RIGHT = 1 << 3;
        /// Primary action button.
        const ACTION = 1 << 4;
    }
}

/// Button state sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PadState {
    held: Buttons,
    pressed: Buttons,
}

impl PadState {
    /// Creates a pad state from the held and freshly pressed button sets.
    #[must_use]
    pub const fn new(held: Buttons, pressed: Buttons) -> Self {
        Self { held, pressed }
    }

    /// Pad state with nothing held or pressed.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            held: Buttons::empty(),
            pressed: Buttons::empty(),
        }
    }

    /// Reports whether every provided button is currently held.
    #[must_use]
    pub fn is_held(&self, buttons: Buttons) -> bool {
        self.held.contains(buttons)
    }

    /// Reports whether every provided button went down on this tick.
    #[must_use]
    pub fn is_pressed(&self, buttons: Buttons) -> bool {
        self.pressed.contains(buttons)
    }
}

/// Timers and tuning values that govern a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Side length of a tile in pixels.
    pub tile_size: u32,
    /// Pixels an actor's animation advances per tick.
    pub move_speed: u32,
    /// Ticks between planting a bomb and its detonation.
    pub bomb_fuse_ticks: u32,
    /// Ticks an explosion cell stays live.
    pub explosion_ticks: u32,
    /// Probability that a breakable wall hides a power-up.
    pub power_up_chance: f64,
    /// Ticks the win screen waits before accepting a restart.
    pub win_delay_ticks: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tile_size: 16,
            move_speed: 2,
            bomb_fuse_ticks: 90,
            explosion_ticks: 30,
            power_up_chance: 0.3,
            win_delay_ticks: 60,
        }
    }
}

impl Rules {
    /// Checks that the rule set describes a playable match.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.tile_size == 0 {
            return Err(RulesError::ZeroTileSize);
        }
        if self.move_speed == 0 {
            return Err(RulesError::ZeroMoveSpeed);
        }
        if self.tile_size % self.move_speed != 0 {
            return Err(RulesError::MisalignedMoveSpeed {
                tile_size: self.tile_size,
                move_speed: self.move_speed,
            });
        }
        if self.bomb_fuse_ticks == 0 {
            return Err(RulesError::ZeroBombFuse);
        }
        if self.explosion_ticks == 0 {
            return Err(RulesError::ZeroExplosionDuration);
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(RulesError::InvalidPowerUpChance {
                chance: self.power_up_chance,
            });
        }
        Ok(())
    }
}

/// Reasons a [`Rules`] value may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RulesError {
    /// Tiles must have a positive size.
    #[error("tile_size must be positive")]
    ZeroTileSize,
    /// Actors must move at a positive speed.
    #[error("move_speed must be positive")]
    ZeroMoveSpeed,
    /// Animations must land exactly on tile boundaries.
    #[error("move_speed {move_speed} does not divide tile_size {tile_size}")]
    MisalignedMoveSpeed {
        /// Configured tile size.
        tile_size: u32,
        /// Configured move speed.
        move_speed: u32,
    },
    /// Bombs must burn for at least one tick.
    #[error("bomb_fuse_ticks must be positive")]
    ZeroBombFuse,
    /// Explosions must last at least one tick.
    #[error("explosion_ticks must be positive")]
    ZeroExplosionDuration,
    /// Probabilities must lie within `[0, 1]`.
    #[error("power_up_chance {chance} lies outside [0, 1]")]
    InvalidPowerUpChance {
        /// Configured probability.
        chance: f64,
    },
}

/// Starting cell assigned to a roster slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Spawn {
    /// Who controls the actor spawned here.
    pub controller: Controller,
    /// Cell the actor starts on.
    pub cell: CellCoord,
}

/// Starting tiles and spawn points of an arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaLayout {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
    spawns: Vec<Spawn>,
}

const CLASSIC_TILES: [[u8; ARENA_COLUMNS as usize]; ARENA_ROWS as usize] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 2, 2, 2, 0, 2, 0, 2, 2, 2, 0, 0, 1],
    [1, 0, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 0, 1],
    [1, 2, 2, 2, 0, 2, 2, 0, 2, 2, 0, 2, 2, 2, 1],
    [1, 2, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 2, 1],
    [1, 2, 2, 2, 0, 2, 2, 0, 2, 2, 0, 2, 2, 2, 1],
    [1, 0, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 0, 1],
    [1, 0, 0, 2, 2, 2, 0, 2, 0, 2, 2, 2, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl ArenaLayout {
    /// The fixed 15×9 arena with the human in the top-left corner and the AI
    /// in the bottom-right corner.
    #[must_use]
    pub fn classic() -> Self {
        let tiles = CLASSIC_TILES
            .iter()
            .flat_map(|row| row.iter())
            .map(|code| match code {
                1 => TileKind::SolidWall,
                2 => TileKind::BreakableWall,
                _ => TileKind::Empty,
            })
            .collect();

        Self {
            columns: ARENA_COLUMNS,
            rows: ARENA_ROWS,
            tiles,
            spawns: vec![
                Spawn {
                    controller: Controller::Human,
                    cell: CellCoord::new(1, 1),
                },
                Spawn {
                    controller: Controller::Ai,
                    cell: CellCoord::new(ARENA_COLUMNS - 2, ARENA_ROWS - 2),
                },
            ],
        }
    }

    /// Builds a layout from text rows.
    ///
    /// `#` is a solid wall, `+` a breakable wall, `.` floor, `P` the human
    /// spawn and `E` an AI spawn. The outer ring must be solid, exactly one
    /// human spawn is required, and at least one AI spawn.
    pub fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();
        let columns = u32::try_from(width).map_err(|_| LayoutError::TooLarge)?;
        let row_count = u32::try_from(height).map_err(|_| LayoutError::TooLarge)?;
        if columns < 3 || row_count < 3 {
            return Err(LayoutError::TooSmall {
                columns,
                rows: row_count,
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut human = None;
        let mut ai_spawns = Vec::new();

        for (row_index, text) in rows.iter().enumerate() {
            let row = u32::try_from(row_index).map_err(|_| LayoutError::TooLarge)?;
            let found = text.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column_index, glyph) in text.chars().enumerate() {
                let column = u32::try_from(column_index).map_err(|_| LayoutError::TooLarge)?;
                let cell = CellCoord::new(column, row);
                let tile = match glyph {
                    '#' => TileKind::SolidWall,
                    '+' => TileKind::BreakableWall,
                    '.' => TileKind::Empty,
                    'P' => {
                        if human.replace(cell).is_some() {
                            return Err(LayoutError::DuplicateHuman { cell });
                        }
                        TileKind::Empty
                    }
                    'E' => {
                        ai_spawns.push(cell);
                        TileKind::Empty
                    }
                    other => {
                        return Err(LayoutError::UnknownGlyph { glyph: other, cell });
                    }
                };

                let on_border = row == 0
                    || column == 0
                    || row == row_count - 1
                    || column == columns - 1;
                if on_border && tile != TileKind::SolidWall {
                    return Err(LayoutError::OpenBorder { cell });
                }
                tiles.push(tile);
            }
        }

        let human = human.ok_or(LayoutError::MissingHuman)?;
        if ai_spawns.is_empty() {
            return Err(LayoutError::MissingAi);
        }

        let mut spawns = Vec::with_capacity(ai_spawns.len() + 1);
        spawns.push(Spawn {
            controller: Controller::Human,
            cell: human,
        });
        spawns.extend(ai_spawns.into_iter().map(|cell| Spawn {
            controller: Controller::Ai,
            cell,
        }));

        Ok(Self {
            columns,
            rows: row_count,
            tiles,
            spawns,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Starting tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Spawn points in roster order, human first.
    #[must_use]
    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    /// Read-only view of the starting tiles.
    #[must_use]
    pub fn tile_view(&self) -> TileView<'_> {
        TileView::new(&self.tiles, self.columns, self.rows)
    }
}

/// Reasons a textual layout may be rejected by [`ArenaLayout::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No rows were provided.
    #[error("layout contains no rows")]
    Empty,
    /// The layout does not fit in 32-bit coordinates.
    #[error("layout is too large")]
    TooLarge,
    /// The layout cannot hold a border and an interior.
    #[error("layout of {columns}x{rows} is smaller than 3x3")]
    TooSmall {
        /// Columns found.
        columns: u32,
        /// Rows found.
        rows: u32,
    },
    /// A row differs in length from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Offending row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph outside the layout alphabet was found.
    #[error("unknown glyph {glyph:?} at {cell:?}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Cell holding the character.
        cell: CellCoord,
    },
    /// The outer ring contains something other than a solid wall.
    #[error("border cell {cell:?} is not a solid wall")]
    OpenBorder {
        /// Offending border cell.
        cell: CellCoord,
    },
    /// No human spawn was declared.
    #[error("layout has no human spawn")]
    MissingHuman,
    /// More than one human spawn was declared.
    #[error("second human spawn at {cell:?}")]
    DuplicateHuman {
        /// Cell of the second spawn.
        cell: CellCoord,
    },
    /// No AI spawn was declared.
    #[error("layout has no AI spawn")]
    MissingAi,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
        assert_eq!(origin.offset_to(destination), (3, 2));
        assert_eq!(destination.offset_to(origin), (-3, -2));
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn only_solid_walls_stop_a_blast() {
        assert!(!TileKind::Empty.blocks_movement());
        assert!(!TileKind::Empty.blocks_blast());
        assert!(TileKind::BreakableWall.blocks_movement());
        assert!(!TileKind::BreakableWall.blocks_blast());
        assert!(TileKind::SolidWall.blocks_movement());
        assert!(TileKind::SolidWall.blocks_blast());
    }

    #[test]
    fn classic_layout_matches_arena_dimensions() {
        let layout = ArenaLayout::classic();
        let view = layout.tile_view();

        assert_eq!(view.dimensions(), (ARENA_COLUMNS, ARENA_ROWS));
        for (cell, tile) in view.iter() {
            let border = cell.column() == 0
                || cell.row() == 0
                || cell.column() == ARENA_COLUMNS - 1
                || cell.row() == ARENA_ROWS - 1;
            if border {
                assert_eq!(tile, TileKind::SolidWall, "border cell {cell:?}");
            }
        }
        assert_eq!(view.tile(CellCoord::new(7, 4)), Some(TileKind::Empty));
        assert_eq!(view.tile(CellCoord::new(3, 1)), Some(TileKind::BreakableWall));
        assert_eq!(view.tile(CellCoord::new(15, 4)), None);

        let spawns = layout.spawns();
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].controller, Controller::Human);
        assert_eq!(spawns[0].cell, CellCoord::new(1, 1));
        assert_eq!(spawns[1].controller, Controller::Ai);
        assert_eq!(spawns[1].cell, CellCoord::new(13, 7));
        for spawn in spawns {
            assert!(view.can_move_to(spawn.cell));
        }
    }

    #[test]
    fn parse_builds_roster_in_reading_order() {
        let layout = ArenaLayout::parse(&["#####", "#E.P#", "#+.E#", "#####"])
            .expect("valid layout");

        assert_eq!((layout.columns(), layout.rows()), (5, 4));
        let spawns = layout.spawns();
        assert_eq!(spawns.len(), 3);
        assert_eq!(spawns[0].controller, Controller::Human);
        assert_eq!(spawns[0].cell, CellCoord::new(3, 1));
        assert_eq!(spawns[1].cell, CellCoord::new(1, 1));
        assert_eq!(spawns[2].cell, CellCoord::new(3, 2));
        assert_eq!(
            layout.tile_view().tile(CellCoord::new(1, 2)),
            Some(TileKind::BreakableWall)
        );
    }

    #[test]
    fn parse_rejects_malformed_layouts() {
        assert_eq!(ArenaLayout::parse(&[]), Err(LayoutError::Empty));
        assert_eq!(
            ArenaLayout::parse(&["##", "##"]),
            Err(LayoutError::TooSmall {
                columns: 2,
                rows: 2
            })
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", "#P.E#", "####"]),
            Err(LayoutError::Ragged {
                row: 2,
                expected: 5,
                found: 4
            })
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", "#P?E#", "#####"]),
            Err(LayoutError::UnknownGlyph {
                glyph: '?',
                cell: CellCoord::new(2, 1)
            })
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", ".P.E#", "#####"]),
            Err(LayoutError::OpenBorder {
                cell: CellCoord::new(0, 1)
            })
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", "#..E#", "#####"]),
            Err(LayoutError::MissingHuman)
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", "#P.P#", "#####"]),
            Err(LayoutError::DuplicateHuman {
                cell: CellCoord::new(3, 1)
            })
        );
        assert_eq!(
            ArenaLayout::parse(&["#####", "#P..#", "#####"]),
            Err(LayoutError::MissingAi)
        );
    }

    #[test]
    fn tile_view_rejects_walls_and_out_of_bounds_moves() {
        let layout = ArenaLayout::parse(&["#####", "#P+E#", "#####"]).expect("valid layout");
        let view = layout.tile_view();

        assert!(view.can_move_to(CellCoord::new(1, 1)));
        assert!(!view.can_move_to(CellCoord::new(2, 1)));
        assert!(!view.can_move_to(CellCoord::new(0, 1)));
        assert!(!view.can_move_to(CellCoord::new(9, 9)));
        assert_eq!(view.neighbor(CellCoord::new(4, 1), Direction::East), None);
        assert_eq!(
            view.neighbor(CellCoord::new(3, 1), Direction::East),
            Some(CellCoord::new(4, 1))
        );
    }

    #[test]
    fn default_rules_validate() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn rules_reject_unplayable_values() {
        let misaligned = Rules {
            move_speed: 3,
            ..Rules::default()
        };
        assert_eq!(
            misaligned.validate(),
            Err(RulesError::MisalignedMoveSpeed {
                tile_size: 16,
                move_speed: 3
            })
        );

        let chance = Rules {
            power_up_chance: 1.5,
            ..Rules::default()
        };
        assert!(matches!(
            chance.validate(),
            Err(RulesError::InvalidPowerUpChance { .. })
        ));

        let fuse = Rules {
            bomb_fuse_ticks: 0,
            ..Rules::default()
        };
        assert_eq!(fuse.validate(), Err(RulesError::ZeroBombFuse));
    }

    #[test]
    fn scoreboard_credits_sides_independently() {
        let mut scores = Scoreboard::default();
        scores.record_win(Controller::Ai);
        scores.record_win(Controller::Ai);
        scores.record_win(Controller::Human);

        assert_eq!(scores.wins(Controller::Human), 1);
        assert_eq!(scores.wins(Controller::Ai), 2);
        assert_eq!(scores.to_string(), "1:2");
    }

    #[test]
    fn pad_state_separates_held_and_pressed() {
        let pad = PadState::new(Buttons::UP | Buttons::ACTION, Buttons::ACTION);

        assert!(pad.is_held(Buttons::UP));
        assert!(!pad.is_pressed(Buttons::UP));
        assert!(pad.is_pressed(Buttons::ACTION));
        assert!(!PadState::idle().is_held(Buttons::DOWN));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn rules_round_trip_through_bincode() {
        assert_round_trip(&Rules {
            power_up_chance: 0.75,
            win_delay_ticks: 12,
            ..Rules::default()
        });
    }

    #[test]
    fn scoreboard_round_trips_through_bincode() {
        assert_round_trip(&Scoreboard::new(3, 7));
    }
}
