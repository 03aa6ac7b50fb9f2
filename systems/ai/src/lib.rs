#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision system for AI-controlled actors.
//!
//! Every call evaluates one actor. An actor standing in danger flees at once;
//! otherwise decisions are throttled to a fixed cadence, at which point the
//! actor either drops a bomb and runs from it or steps toward the human.

use std::collections::{BTreeMap, HashSet, VecDeque};

use bomber_core::{
    ActorId, ActorSnapshot, CellCoord, Command, Direction, Event, TileKind,
};
use bomber_world::HazardView;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CLEAR_OF_BLAST_SCORE: i32 = 100;
const ONWARD_ROUTE_SCORE: i32 = 10;
const SAFE_ONWARD_ROUTE_SCORE: i32 = 20;

/// Tuning values for the AI controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ticks between strategic decisions.
    pub decision_interval: u32,
    /// Ticks an actor waits after dropping a bomb before it may drop another.
    pub bomb_cooldown: u32,
    /// Manhattan distance to the human at which the actor bombs.
    pub chase_bomb_distance: u32,
    /// Escape search depth that counts as safe regardless of the blast.
    pub escape_horizon: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decision_interval: 20,
            bomb_cooldown: 90,
            chase_bomb_distance: 2,
            escape_horizon: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Pacing {
    decision_timer: u32,
    bomb_cooldown: u32,
}

/// Pure system that turns hazard views into movement and bomb commands.
#[derive(Debug, Default)]
pub struct Ai {
    config: Config,
    pacing: BTreeMap<ActorId, Pacing>,
}

impl Ai {
    /// Creates a new AI system with the provided tuning values.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pacing: BTreeMap::new(),
        }
    }

    /// Consumes world events and the current views to decide for `actor`.
    ///
    /// `target` is the human the actor chases, if one exists. Commands are
    /// appended to `out` in the order they must be applied.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        actor: &ActorSnapshot,
        target: Option<&ActorSnapshot>,
        hazards: &HazardView<'_>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        if events
            .iter()
            .any(|event| matches!(event, Event::ArenaConfigured { .. } | Event::MatchRestarted))
        {
            self.pacing.clear();
        }

        let config = self.config;
        let pacing = self.pacing.entry(actor.id).or_default();
        pacing.bomb_cooldown = pacing.bomb_cooldown.saturating_sub(1);

        if actor.moving {
            return;
        }

        if hazards.is_dangerous(actor.cell) {
            pacing.decision_timer = 0;
            if let Some(direction) = flee_direction(actor.cell, hazards) {
                debug!(actor = ?actor.id, ?direction, "fleeing danger");
                out.push(Command::StepActor {
                    actor: actor.id,
                    direction,
                });
            }
            return;
        }

        pacing.decision_timer = pacing.decision_timer.saturating_add(1);
        if pacing.decision_timer < config.decision_interval {
            return;
        }
        pacing.decision_timer = 0;

        let Some(target) = target else {
            return;
        };

        let wants_bomb = actor.cell.manhattan_distance(target.cell) <= config.chase_bomb_distance
            || touches_breakable_wall(actor.cell, hazards);
        if wants_bomb && actor.bombs_available() > 0 && pacing.bomb_cooldown == 0 {
            if !has_escape_route(actor.cell, hazards, config.escape_horizon) {
                debug!(actor = ?actor.id, cell = ?actor.cell, "bomb withheld without escape route");
                return;
            }

            pacing.bomb_cooldown = config.bomb_cooldown;
            out.push(Command::PlaceBomb { actor: actor.id });
            if let Some(direction) = escape_direction(actor.cell, hazards) {
                debug!(actor = ?actor.id, ?direction, "bomb dropped");
                out.push(Command::StepActor {
                    actor: actor.id,
                    direction,
                });
            }
            return;
        }

        if let Some(direction) = chase_direction(actor.cell, target.cell, hazards, rng) {
            out.push(Command::StepActor {
                actor: actor.id,
                direction,
            });
        }
    }
}

fn reachable_neighbor(
    cell: CellCoord,
    direction: Direction,
    hazards: &HazardView<'_>,
) -> Option<CellCoord> {
    hazards
        .tiles()
        .neighbor(cell, direction)
        .filter(|next| hazards.tiles().can_move_to(*next))
}

/// First reachable safe neighbour in canonical order, or failing that the
/// first reachable one.
fn flee_direction(cell: CellCoord, hazards: &HazardView<'_>) -> Option<Direction> {
    let mut fallback = None;
    for direction in Direction::ALL {
        let Some(next) = reachable_neighbor(cell, direction, hazards) else {
            continue;
        };
        if !hazards.is_dangerous(next) {
            return Some(direction);
        }
        if fallback.is_none() {
            fallback = Some(direction);
        }
    }
    fallback
}

fn touches_breakable_wall(cell: CellCoord, hazards: &HazardView<'_>) -> bool {
    let tiles = hazards.tiles();
    Direction::ALL.into_iter().any(|direction| {
        tiles
            .neighbor(cell, direction)
            .and_then(|next| tiles.tile(next))
            == Some(TileKind::BreakableWall)
    })
}

/// Breadth-first search for a way out of a bomb dropped on `origin`.
///
/// Expands through reachable cells that are not already dangerous. Succeeds
/// on the first cell outside the hypothetical blast or once the search depth
/// reaches `horizon`.
fn has_escape_route(origin: CellCoord, hazards: &HazardView<'_>, horizon: u32) -> bool {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for direction in Direction::ALL {
        if let Some(next) = reachable_neighbor(origin, direction, hazards) {
            if !hazards.is_dangerous(next) && visited.insert(next) {
                queue.push_back((next, 1_u32));
            }
        }
    }

    while let Some((cell, depth)) = queue.pop_front() {
        if !hazards.blast_hits(origin, cell) || depth >= horizon {
            return true;
        }

        for direction in Direction::ALL {
            let Some(next) = reachable_neighbor(cell, direction, hazards) else {
                continue;
            };
            if !visited.contains(&next) && !hazards.is_dangerous(next) {
                let _ = visited.insert(next);
                queue.push_back((next, depth + 1));
            }
        }
    }

    false
}

/// Best first step away from a bomb just dropped on `bomb`.
///
/// Candidates score for leaving the blast and for every onward cell they
/// open up, more when that onward cell is itself outside the blast. Ties keep
/// the earliest direction.
fn escape_direction(bomb: CellCoord, hazards: &HazardView<'_>) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;

    for direction in Direction::ALL {
        let Some(candidate) = reachable_neighbor(bomb, direction, hazards) else {
            continue;
        };

        let mut score = 0;
        if !hazards.blast_hits(bomb, candidate) {
            score += CLEAR_OF_BLAST_SCORE;
        }
        for onward in Direction::ALL {
            let Some(next) = reachable_neighbor(candidate, onward, hazards) else {
                continue;
            };
            if next == bomb {
                continue;
            }
            score += ONWARD_ROUTE_SCORE;
            if !hazards.blast_hits(bomb, next) {
                score += SAFE_ONWARD_ROUTE_SCORE;
            }
        }

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((direction, score));
        }
    }

    best.map(|(direction, _)| direction)
}

/// Step toward `target` along the axis with the larger offset, then the
/// other axis, then every direction in shuffled order. Only reachable cells
/// that are currently safe qualify.
fn chase_direction<R>(
    from: CellCoord,
    target: CellCoord,
    hazards: &HazardView<'_>,
    rng: &mut R,
) -> Option<Direction>
where
    R: Rng + ?Sized,
{
    let (dx, dy) = from.offset_to(target);
    let horizontal = match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    };
    let vertical = match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    };
    let preferred = if dx.abs() >= dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    let mut fallback = Direction::ALL;
    fallback.shuffle(rng);

    preferred
        .into_iter()
        .flatten()
        .chain(fallback)
        .find(|direction| {
            reachable_neighbor(from, *direction, hazards)
                .is_some_and(|next| !hazards.is_dangerous(next))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::{ArenaLayout, Rules};
    use bomber_world::{apply, query, World};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world(rows: &[&str]) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureArena {
                layout: ArenaLayout::parse(rows).expect("valid layout"),
                rules: Rules::default(),
                seed: 1,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn escape_route_found_around_a_corner() {
        let world = world(&["#######", "#P.#..#", "#...E+#", "#######"]);
        let hazards = query::hazard_view(&world);

        assert!(has_escape_route(CellCoord::new(4, 2), &hazards, 3));
    }

    #[test]
    fn dead_end_has_no_escape_route() {
        let world = world(&["#######", "#P#.E+#", "#######"]);
        let hazards = query::hazard_view(&world);

        assert!(!has_escape_route(CellCoord::new(4, 1), &hazards, 3));
    }

    #[test]
    fn shallow_horizon_accepts_any_first_step() {
        let world = world(&["#######", "#P#.E+#", "#######"]);
        let hazards = query::hazard_view(&world);

        assert!(has_escape_route(CellCoord::new(4, 1), &hazards, 1));
    }

    #[test]
    fn escape_prefers_cells_with_safe_onward_routes() {
        let world = world(&["#######", "#P#..##", "#..E..#", "#######"]);
        let hazards = query::hazard_view(&world);

        assert_eq!(
            escape_direction(CellCoord::new(3, 2), &hazards),
            Some(Direction::East)
        );
    }

    #[test]
    fn escape_ties_keep_the_earliest_direction() {
        let world = world(&["#######", "#P#.###", "#..E..#", "#######"]);
        let hazards = query::hazard_view(&world);

        assert_eq!(
            escape_direction(CellCoord::new(3, 2), &hazards),
            Some(Direction::West)
        );
    }

    #[test]
    fn flee_falls_back_to_any_open_cell() {
        let mut world = world(&["#####", "#P.E#", "#####"]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceBomb {
                actor: ActorId::new(1),
            },
            &mut events,
        );
        let hazards = query::hazard_view(&world);

        assert_eq!(
            flee_direction(CellCoord::new(3, 1), &hazards),
            Some(Direction::West)
        );
    }

    #[test]
    fn chase_prefers_the_longer_axis() {
        let world = world(&["#######", "#P....#", "#.....#", "#.....#", "#....E#", "#######"]);
        let hazards = query::hazard_view(&world);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert_eq!(
            chase_direction(CellCoord::new(5, 4), CellCoord::new(1, 3), &hazards, &mut rng),
            Some(Direction::West)
        );
        assert_eq!(
            chase_direction(CellCoord::new(2, 4), CellCoord::new(1, 1), &hazards, &mut rng),
            Some(Direction::North)
        );
    }
}
