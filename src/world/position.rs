//! Positions and the toroidal coordinate space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate.
///
/// Positions are not wrapped on their own; neighbourhood queries may step
/// outside `0..width` and [`Torus::wrap`] folds them back onto the map.
/// Offsets wrap at the `i32` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four diagonal neighbours.
    #[must_use]
    pub const fn adjacent(self) -> [Position; 4] {
        [
            self.offset(1, 1),
            self.offset(1, -1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }

    /// The 8-neighbourhood, excluding `self`.
    #[must_use]
    pub fn nearby(self) -> [Position; 8] {
        let mut result = [self; 8];
        let mut count = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    result[count] = self.offset(dx, dy);
                    count += 1;
                }
            }
        }
        result
    }

    /// Every position whose Euclidean distance from `self` is at most `distance`.
    ///
    /// This is a disc, not a box. Cells exactly `distance` away are included.
    pub fn in_range(self, distance: u32) -> impl Iterator<Item = Position> {
        let reach = i32::try_from(distance).unwrap_or(i32::MAX);
        (-reach..=reach).flat_map(move |dx| {
            (-reach..=reach).filter_map(move |dy| {
                within(dx, dy, distance).then(|| self.offset(dx, dy))
            })
        })
    }

    const fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Euclidean distance, without wrapping.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Whether the offset `(dx, dy)` lies within Euclidean `distance`.
fn within(dx: i32, dy: i32, distance: u32) -> bool {
    let squared = |v: u32| u128::from(v) * u128::from(v);
    squared(dx.unsigned_abs()) + squared(dy.unsigned_abs()) <= squared(distance)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The fixed-size toroidal space every position is folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    width: i32,
    height: i32,
}

impl Torus {
    /// Create a torus of the given size. Both dimensions must be non-zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width: i32::from(width),
            height: i32::from(height),
        }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Fold a position onto the torus. Total for every integer input.
    #[must_use]
    pub const fn wrap(&self, position: Position) -> Position {
        Position::new(
            position.x.rem_euclid(self.width),
            position.y.rem_euclid(self.height),
        )
    }

    /// Row-major index of a position after wrapping.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(&self, position: Position) -> usize {
        let wrapped = self.wrap(position);
        (wrapped.y as usize) * (self.width as usize) + (wrapped.x as usize)
    }

    /// Position for a row-major index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn position(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Wrapped 8-neighbourhood of `position`.
    #[must_use]
    pub fn nearby(&self, position: Position) -> [Position; 8] {
        position.nearby().map(|p| self.wrap(p))
    }

    /// Wrapped disc of radius `distance` around `position`.
    ///
    /// Each cell is visited once, through its shortest offset from
    /// `position`, so the walk never covers more than [`Torus::area`] cells
    /// however large `distance` is.
    pub fn in_range(
        &self,
        position: Position,
        distance: u32,
    ) -> impl Iterator<Item = Position> + use<> {
        let torus = *self;
        let reach = i32::try_from(distance).unwrap_or(i32::MAX);
        let xs = -reach.min(self.width / 2)..=reach.min((self.width - 1) / 2);
        let ys = -reach.min(self.height / 2)..=reach.min((self.height - 1) / 2);
        xs.flat_map(move |dx| {
            ys.clone().filter_map(move |dy| {
                within(dx, dy, distance).then(|| torus.wrap(position.offset(dx, dy)))
            })
        })
    }

    /// Iterate over every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let torus = *self;
        (0..self.area()).map(move |idx| torus.position(idx))
    }
}
