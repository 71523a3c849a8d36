use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Colors of the classic game, in palette order.
pub const DEFAULT_COLORS: [&str; 5] = ["red", "blue", "green", "yellow", "purple"];

/// Ordered set of named tile colors. Each [`ColorId`] indexes into it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Builds a palette, rejecting ones that cannot produce a playable game.
    ///
    /// An empty palette cannot fill a grid, and a single color makes the whole
    /// board one group, so both are refused. Repeated names are refused too,
    /// since two ids would look the same on screen.
    pub fn new<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        match colors.len() {
            0 => Err(GameError::EmptyPalette),
            1 => Err(GameError::DegeneratePalette),
            len if len > usize::from(u8::MAX) + 1 => Err(GameError::PaletteTooLarge),
            _ if has_duplicates(&colors) => Err(GameError::DuplicateColor),
            _ => Ok(Self { colors }),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn name(&self, color: ColorId) -> Option<&str> {
        self.colors.get(color.index()).map(String::as_str)
    }

    pub fn contains(&self, color: ColorId) -> bool {
        color.index() < self.colors.len()
    }

    pub fn find(&self, name: &str) -> Option<ColorId> {
        self.colors
            .iter()
            .position(|color| color == name)
            .and_then(|index| u8::try_from(index).ok())
            .map(ColorId)
    }

    pub fn ids(&self) -> impl Iterator<Item = ColorId> + use<> {
        // palette length is capped at u8::MAX + 1 by the constructor
        (0..self.colors.len()).map(|index| ColorId(index as u8))
    }
}

fn has_duplicates(colors: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(colors.len());
    !colors.iter().all(|color| seen.insert(color.as_str()))
}

impl TryFrom<Vec<String>> for Palette {
    type Error = GameError;

    fn try_from(colors: Vec<String>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(ToString::to_string).collect(),
        }
    }
}
