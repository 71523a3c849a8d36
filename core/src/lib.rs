#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use palette::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod grid;
mod palette;
mod tile;
mod types;

/// Board dimensions and colors for a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GameConfigParts")]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub palette: Palette,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, palette: Palette) -> Self {
        Self { size, palette }
    }

    pub fn new((rows, cols): Coord2, palette: Palette) -> Self {
        let clamped = (rows.clamp(1, Coord::MAX), cols.clamp(1, Coord::MAX));
        if clamped != (rows, cols) {
            log::warn!(
                "Grid size {}x{} is not playable, using {}x{}",
                rows,
                cols,
                clamped.0,
                clamped.1
            );
        }
        Self::new_unchecked(clamped, palette)
    }

    /// Like [`GameConfig::new`], validating the color names into a [`Palette`] first.
    pub fn with_colors<I, S>(size: Coord2, colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<alloc::string::String>,
    {
        Ok(Self::new(size, Palette::new(colors)?))
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Unchecked [`GameConfig`] as read from serialized data, clamped on conversion.
#[derive(Deserialize)]
struct GameConfigParts {
    size: Coord2,
    palette: Palette,
}

impl From<GameConfigParts> for GameConfig {
    fn from(parts: GameConfigParts) -> Self {
        Self::new(parts.size, parts.palette)
    }
}

impl Default for GameConfig {
    /// The classic 10x10 board with five colors.
    fn default() -> Self {
        Self::new_unchecked((10, 10), Palette::default())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Over,
}

impl GameStatus {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Outcome of committing a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Number of tiles removed, zero when the move was not legal.
    pub removed: CellCount,
    /// Game status after the move.
    pub status: GameStatus,
}

impl MoveOutcome {
    pub const fn no_change(status: GameStatus) -> Self {
        Self { removed: 0, status }
    }

    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        self.removed > 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoOutcome {
    NothingToUndo,
    Restored,
}

impl UndoOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NothingToUndo => false,
            Self::Restored => true,
        }
    }
}
