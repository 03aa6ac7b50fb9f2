//! Blast footprints and danger queries.

use bomber_core::{CellCoord, Direction, TileView, BLAST_RADIUS};

use crate::ordnance::{Bomb, Explosion};

/// Reports whether a bomb at `bomb` would engulf `target`.
///
/// The bomb cell is always hit. Otherwise the target must share a row or
/// column with the bomb, lie within [`BLAST_RADIUS`], and every tile walked
/// from the bomb up to and including the target must let the blast through.
/// Only solid walls stop a blast; a breakable wall is itself engulfed.
#[must_use]
pub fn blast_hits(tiles: &TileView<'_>, bomb: CellCoord, target: CellCoord) -> bool {
    if bomb == target {
        return true;
    }

    let Some(direction) = aligned_direction(bomb, target) else {
        return false;
    };
    let distance = bomb.manhattan_distance(target);
    if distance > BLAST_RADIUS {
        return false;
    }

    let mut cell = bomb;
    for step in 1..=distance {
        let Some(next) = tiles.neighbor(cell, direction) else {
            return false;
        };
        let Some(tile) = tiles.tile(next) else {
            return false;
        };
        if tile.blocks_blast() || (tile.blocks_movement() && step < distance) {
            return false;
        }
        cell = next;
    }
    true
}

/// Cells that ignite when a bomb at `bomb` detonates, bomb cell first.
///
/// Arms are walked in the canonical direction order. An arm stops before a
/// solid wall or the grid edge and stops after the first breakable wall.
#[must_use]
pub fn blast_footprint(tiles: &TileView<'_>, bomb: CellCoord) -> Vec<CellCoord> {
    let mut cells = vec![bomb];
    for direction in Direction::ALL {
        let mut cell = bomb;
        for _ in 0..BLAST_RADIUS {
            let Some(next) = tiles.neighbor(cell, direction) else {
                break;
            };
            let Some(tile) = tiles.tile(next) else {
                break;
            };
            if tile.blocks_blast() {
                break;
            }
            cells.push(next);
            if tile.blocks_movement() {
                break;
            }
            cell = next;
        }
    }
    cells
}

fn aligned_direction(from: CellCoord, to: CellCoord) -> Option<Direction> {
    if from.column() == to.column() {
        if to.row() < from.row() {
            Some(Direction::North)
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            None
        }
    } else if from.row() == to.row() {
        if to.column() < from.column() {
            Some(Direction::West)
        } else {
            Some(Direction::East)
        }
    } else {
        None
    }
}

/// Read-only view combining the tile grid with live bombs and explosions.
///
/// Danger is evaluated on every query; nothing is cached between calls.
#[derive(Clone, Copy, Debug)]
pub struct HazardView<'a> {
    tiles: TileView<'a>,
    bombs: &'a [Bomb],
    explosions: &'a [Explosion],
}

impl<'a> HazardView<'a> {
    pub(crate) fn new(tiles: TileView<'a>, bombs: &'a [Bomb], explosions: &'a [Explosion]) -> Self {
        Self {
            tiles,
            bombs,
            explosions,
        }
    }

    /// Tile grid backing the view.
    #[must_use]
    pub fn tiles(&self) -> TileView<'a> {
        self.tiles
    }

    /// Reports whether a hypothetical bomb at `bomb` would engulf `target`.
    #[must_use]
    pub fn blast_hits(&self, bomb: CellCoord, target: CellCoord) -> bool {
        blast_hits(&self.tiles, bomb, target)
    }

    /// Reports whether the cell is engulfed by a live explosion or lies in
    /// the blast of a live bomb.
    #[must_use]
    pub fn is_dangerous(&self, cell: CellCoord) -> bool {
        self.explosions
            .iter()
            .any(|explosion| explosion.cell() == cell)
            || self
                .bombs
                .iter()
                .any(|bomb| blast_hits(&self.tiles, bomb.cell(), cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::ArenaLayout;

    fn layout(rows: &[&str]) -> ArenaLayout {
        ArenaLayout::parse(rows).expect("valid layout")
    }

    #[test]
    fn bomb_cell_is_always_hit() {
        let layout = layout(&["###", "#P#", "#E#", "###"]);
        let view = layout.tile_view();
        let cell = CellCoord::new(1, 1);

        assert!(blast_hits(&view, cell, cell));
        assert_eq!(blast_footprint(&view, cell), vec![cell, CellCoord::new(1, 2)]);
    }

    #[test]
    fn solid_walls_stop_the_blast() {
        let layout = layout(&["#####", "#P#E#", "#####"]);
        let view = layout.tile_view();
        let bomb = CellCoord::new(1, 1);

        assert!(!blast_hits(&view, bomb, CellCoord::new(2, 1)));
        assert!(!blast_hits(&view, bomb, CellCoord::new(1, 0)));
        assert_eq!(blast_footprint(&view, bomb), vec![bomb]);
    }

    #[test]
    fn breakable_walls_are_engulfed() {
        let layout = layout(&["#####", "#P+E#", "#####"]);
        let view = layout.tile_view();
        let bomb = CellCoord::new(1, 1);

        assert!(blast_hits(&view, bomb, CellCoord::new(2, 1)));
        assert!(!blast_hits(&view, bomb, CellCoord::new(3, 1)));
        assert_eq!(
            blast_footprint(&view, bomb),
            vec![bomb, CellCoord::new(2, 1)]
        );
    }

    #[test]
    fn diagonal_and_distant_cells_are_safe() {
        let layout = layout(&["#######", "#P...E#", "#.....#", "#######"]);
        let view = layout.tile_view();
        let bomb = CellCoord::new(2, 1);

        assert!(!blast_hits(&view, bomb, CellCoord::new(3, 2)));
        assert!(!blast_hits(&view, bomb, CellCoord::new(4, 1)));
        assert!(blast_hits(&view, bomb, CellCoord::new(3, 1)));
        assert!(blast_hits(&view, bomb, CellCoord::new(2, 2)));
    }

    #[test]
    fn open_center_produces_a_cross() {
        let layout = layout(&["#####", "#P..#", "#...#", "#..E#", "#####"]);
        let view = layout.tile_view();
        let bomb = CellCoord::new(2, 2);

        assert_eq!(
            blast_footprint(&view, bomb),
            vec![
                bomb,
                CellCoord::new(2, 1),
                CellCoord::new(2, 3),
                CellCoord::new(1, 2),
                CellCoord::new(3, 2),
            ]
        );
    }
}
