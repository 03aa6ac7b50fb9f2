//! Mutable tile grid owned by the world.

use bomber_core::{ArenaLayout, CellCoord, TileKind, TileView};

/// Dense row-major tile storage seeded from an [`ArenaLayout`].
///
/// The only mutation path is [`TileMap::destroy_wall`], which keeps the solid
/// border intact and makes wall destruction one-way.
#[derive(Clone, Debug)]
pub(crate) struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    pub(crate) fn from_layout(layout: &ArenaLayout) -> Self {
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            tiles: layout.tiles().to_vec(),
        }
    }

    pub(crate) fn view(&self) -> TileView<'_> {
        TileView::new(&self.tiles, self.columns, self.rows)
    }

    /// Turns a breakable wall into floor. Returns `false` for any other tile.
    pub(crate) fn destroy_wall(&mut self, cell: CellCoord) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        match self.tiles.get_mut(index) {
            Some(tile @ TileKind::BreakableWall) => {
                *tile = TileKind::Empty;
                true
            }
            _ => false,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        Some(row * width + column)
    }
}
