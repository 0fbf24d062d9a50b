//! Tile storage over the torus.

use std::collections::BTreeSet;

use crate::world::{DotId, GroupId, Position, Torus};

/// A single grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    /// Controlling group (None = unowned).
    pub owner: Option<GroupId>,
    /// Dots whose control radius covers this tile.
    pub claimants: BTreeSet<DotId>,
    /// Dot standing on this tile.
    pub occupant: Option<DotId>,
}

impl Tile {
    /// Whether no dot stands here.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// One tile per cell, created once and never resized.
#[derive(Debug, Clone)]
pub struct Grid {
    torus: Torus,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create an unowned, unoccupied grid covering the torus.
    #[must_use]
    pub fn new(torus: Torus) -> Self {
        Self {
            torus,
            tiles: vec![Tile::default(); torus.area()],
        }
    }

    /// The coordinate space this grid covers.
    #[must_use]
    pub const fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Tile at a position. Wraps first, so every input is valid.
    #[must_use]
    pub fn tile(&self, position: Position) -> &Tile {
        &self.tiles[self.torus.index(position)]
    }

    /// Mutable tile at a position. Wraps first, so every input is valid.
    #[must_use]
    pub fn tile_mut(&mut self, position: Position) -> &mut Tile {
        let idx = self.torus.index(position);
        &mut self.tiles[idx]
    }

    /// Iterate over every wrapped position and its tile.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        let torus = self.torus;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (torus.position(idx), tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_covers_torus() {
        let grid = Grid::new(Torus::new(6, 4));
        assert_eq!(grid.iter().count(), 24);
        assert!(grid.iter().all(|(_, tile)| tile.owner.is_none() && tile.is_empty()));
    }

    #[test]
    fn test_tile_lookup_wraps() {
        let mut grid = Grid::new(Torus::new(5, 5));
        grid.tile_mut(Position::new(-1, 7)).occupant = Some(9);
        assert_eq!(grid.tile(Position::new(4, 2)).occupant, Some(9));
        assert_eq!(grid.tile(Position::new(9, -3)).occupant, Some(9));
    }

    #[test]
    fn test_iter_positions_are_normalized() {
        let grid = Grid::new(Torus::new(3, 2));
        let positions: Vec<_> = grid.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[4], Position::new(1, 1));
    }
}
