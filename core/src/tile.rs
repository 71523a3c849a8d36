use serde::{Deserialize, Serialize};

/// Index of a color in the game's [`Palette`](crate::Palette).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColorId(pub u8);

impl ColorId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Canonical cell state stored in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Occupied(ColorId),
}

impl Tile {
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn color(self) -> Option<ColorId> {
        match self {
            Self::Occupied(color) => Some(color),
            Self::Empty => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<ColorId> for Tile {
    fn from(color: ColorId) -> Self {
        Self::Occupied(color)
    }
}
