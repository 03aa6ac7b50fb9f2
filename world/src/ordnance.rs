//! Live bombs and explosion cells.

use bomber_core::{ActorId, BombSnapshot, CellCoord, ExplosionSnapshot, PixelPoint};

use crate::{arena::TileMap, blast::blast_footprint};

#[derive(Clone, Debug)]
pub(crate) struct Bomb {
    owner: ActorId,
    cell: CellCoord,
    fuse: u32,
}

impl Bomb {
    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn snapshot(&self, tile_size: u32) -> BombSnapshot {
        BombSnapshot {
            owner: self.owner,
            cell: self.cell,
            pixel: PixelPoint::of_cell(self.cell, tile_size),
            fuse: self.fuse,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Explosion {
    cell: CellCoord,
    remaining: u32,
}

impl Explosion {
    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn snapshot(&self, tile_size: u32) -> ExplosionSnapshot {
        ExplosionSnapshot {
            cell: self.cell,
            pixel: PixelPoint::of_cell(self.cell, tile_size),
            remaining: self.remaining,
        }
    }
}

/// Outcome of a single bomb running out of fuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Detonation {
    pub(crate) owner: ActorId,
    pub(crate) cell: CellCoord,
    pub(crate) blast: Vec<CellCoord>,
    pub(crate) destroyed: Vec<CellCoord>,
}

/// Bombs in placement order and explosion cells in ignition order.
///
/// Explosion cells are positional and never merged; overlapping cells age
/// independently.
#[derive(Clone, Debug, Default)]
pub(crate) struct Ordnance {
    bombs: Vec<Bomb>,
    explosions: Vec<Explosion>,
}

impl Ordnance {
    pub(crate) fn clear(&mut self) {
        self.bombs.clear();
        self.explosions.clear();
    }

    pub(crate) fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub(crate) fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub(crate) fn bomb_at(&self, cell: CellCoord) -> bool {
        self.bombs.iter().any(|bomb| bomb.cell == cell)
    }

    pub(crate) fn explosion_at(&self, cell: CellCoord) -> bool {
        self.explosions.iter().any(|explosion| explosion.cell == cell)
    }

    /// Plants a bomb. Callers enforce capacity and the one-bomb-per-cell rule.
    pub(crate) fn plant(&mut self, owner: ActorId, cell: CellCoord, fuse: u32) {
        self.bombs.push(Bomb { owner, cell, fuse });
    }

    /// Ages every bomb, detonating those whose fuse ran out, then ages every
    /// explosion cell including the ones ignited during this call.
    ///
    /// Detonations never trigger other bombs.
    pub(crate) fn advance(&mut self, tiles: &mut TileMap, explosion_ticks: u32) -> Vec<Detonation> {
        let mut detonations = Vec::new();
        let mut index = 0;
        while index < self.bombs.len() {
            let bomb = &mut self.bombs[index];
            bomb.fuse = bomb.fuse.saturating_sub(1);
            if bomb.fuse > 0 {
                index += 1;
                continue;
            }

            let bomb = self.bombs.remove(index);
            detonations.push(self.detonate(tiles, bomb, explosion_ticks));
        }

        for explosion in &mut self.explosions {
            explosion.remaining = explosion.remaining.saturating_sub(1);
        }
        self.explosions.retain(|explosion| explosion.remaining > 0);

        detonations
    }

    fn detonate(&mut self, tiles: &mut TileMap, bomb: Bomb, explosion_ticks: u32) -> Detonation {
        let blast = blast_footprint(&tiles.view(), bomb.cell);
        let mut destroyed = Vec::new();
        for &cell in &blast {
            if tiles.destroy_wall(cell) {
                destroyed.push(cell);
            }
            self.explosions.push(Explosion {
                cell,
                remaining: explosion_ticks,
            });
        }

        Detonation {
            owner: bomb.owner,
            cell: bomb.cell,
            blast,
            destroyed,
        }
    }
}
