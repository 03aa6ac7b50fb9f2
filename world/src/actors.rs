//! Actor state and the pixel animation that trails grid moves.

use bomber_core::{ActorId, ActorSnapshot, CellCoord, Controller, PixelPoint, Spawn};

#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) id: ActorId,
    pub(crate) controller: Controller,
    pub(crate) spawn: CellCoord,
    pub(crate) cell: CellCoord,
    pixel: PixelPoint,
    pub(crate) moving: bool,
    pub(crate) max_bombs: u32,
    pub(crate) active_bombs: u32,
}

impl Actor {
    pub(crate) fn spawn(id: ActorId, spawn: Spawn, tile_size: u32) -> Self {
        let mut actor = Self {
            id,
            controller: spawn.controller,
            spawn: spawn.cell,
            cell: spawn.cell,
            pixel: PixelPoint::default(),
            moving: false,
            max_bombs: 1,
            active_bombs: 0,
        };
        actor.reset(tile_size);
        actor
    }

    /// Returns the actor to its spawn cell and drops collected power-ups.
    pub(crate) fn reset(&mut self, tile_size: u32) {
        self.cell = self.spawn;
        self.pixel = PixelPoint::of_cell(self.spawn, tile_size);
        self.moving = false;
        self.max_bombs = 1;
        self.active_bombs = 0;
    }

    /// Moves the pixel position toward the grid cell by at most `speed`
    /// pixels along a single axis, horizontal first, never overshooting.
    pub(crate) fn animate(&mut self, tile_size: u32, speed: u32) {
        let target = PixelPoint::of_cell(self.cell, tile_size);
        let speed = i32::try_from(speed).unwrap_or(i32::MAX);

        self.moving = true;
        if self.pixel.x < target.x {
            self.pixel.x = self.pixel.x.saturating_add(speed).min(target.x);
        } else if self.pixel.x > target.x {
            self.pixel.x = self.pixel.x.saturating_sub(speed).max(target.x);
        } else if self.pixel.y < target.y {
            self.pixel.y = self.pixel.y.saturating_add(speed).min(target.y);
        } else if self.pixel.y > target.y {
            self.pixel.y = self.pixel.y.saturating_sub(speed).max(target.y);
        } else {
            self.moving = false;
        }
    }

    /// Commits a grid move. The actor counts as moving until the animation
    /// reaches the new cell.
    pub(crate) fn step_to(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.moving = true;
    }

    pub(crate) const fn can_place_bomb(&self) -> bool {
        self.active_bombs < self.max_bombs
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            controller: self.controller,
            cell: self.cell,
            spawn: self.spawn,
            pixel: self.pixel,
            moving: self.moving,
            max_bombs: self.max_bombs,
            active_bombs: self.active_bombs,
        }
    }
}
