//! Power-ups hidden under breakable walls.

use bomber_core::{CellCoord, PixelPoint, PowerUpKind, PowerUpSnapshot, TileKind, TileView};
use rand::Rng;

#[derive(Clone, Debug)]
pub(crate) struct PowerUp {
    pub(crate) cell: CellCoord,
    pub(crate) kind: PowerUpKind,
}

impl PowerUp {
    pub(crate) fn snapshot(&self, tiles: &TileView<'_>, tile_size: u32) -> PowerUpSnapshot {
        PowerUpSnapshot {
            cell: self.cell,
            pixel: PixelPoint::of_cell(self.cell, tile_size),
            kind: self.kind,
            revealed: is_revealed(tiles, self.cell),
        }
    }
}

/// Hides an extra-bomb power-up under each breakable wall with probability
/// `chance`, visiting walls in row-major order.
pub(crate) fn seed<R: Rng + ?Sized>(tiles: &TileView<'_>, chance: f64, rng: &mut R) -> Vec<PowerUp> {
    tiles
        .iter()
        .filter(|(_, tile)| *tile == TileKind::BreakableWall)
        .filter_map(|(cell, _)| {
            (rng.gen::<f64>() < chance).then_some(PowerUp {
                cell,
                kind: PowerUpKind::ExtraBomb,
            })
        })
        .collect()
}

/// A power-up is visible and collectible only once its hiding wall is gone.
pub(crate) fn is_revealed(tiles: &TileView<'_>, cell: CellCoord) -> bool {
    tiles.tile(cell) == Some(TileKind::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::ArenaLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn certain_chance_covers_every_breakable_wall() {
        let layout = ArenaLayout::classic();
        let view = layout.tile_view();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let power_ups = seed(&view, 1.0, &mut rng);
        let walls = view
            .iter()
            .filter(|(_, tile)| *tile == TileKind::BreakableWall)
            .count();

        assert_eq!(power_ups.len(), walls);
        assert!(power_ups
            .iter()
            .all(|power_up| !is_revealed(&view, power_up.cell)));
    }

    #[test]
    fn zero_chance_hides_nothing() {
        let layout = ArenaLayout::classic();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert!(seed(&layout.tile_view(), 0.0, &mut rng).is_empty());
    }

    #[test]
    fn seeding_is_reproducible_for_a_seed() {
        let layout = ArenaLayout::classic();
        let view = layout.tile_view();
        let cells = |seed_value: u64| -> Vec<CellCoord> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed_value);
            seed(&view, 0.3, &mut rng)
                .into_iter()
                .map(|power_up| power_up.cell)
                .collect()
        };

        assert_eq!(cells(11), cells(11));
    }
}
