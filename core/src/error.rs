use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Palette has no colors")]
    EmptyPalette,
    #[error("Palette needs at least two colors")]
    DegeneratePalette,
    #[error("Palette names the same color twice")]
    DuplicateColor,
    #[error("Palette has more colors than a tile can address")]
    PaletteTooLarge,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Tile color is not part of the palette")]
    UnknownColor,
}

pub type Result<T> = core::result::Result<T, GameError>;
