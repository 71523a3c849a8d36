use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Owns the grid of a running game and applies player moves to it.
///
/// Only the state before the last committed move is kept, so a single
/// [`PlayEngine::undo`] is possible at any time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineParts", into = "EngineParts")]
pub struct PlayEngine {
    config: GameConfig,
    grid: Grid,
    snapshot: Option<Grid>,
    status: GameStatus,
}

/// Serialized form of [`PlayEngine`]. The status is derived again on load.
#[derive(Serialize, Deserialize)]
struct EngineParts {
    config: GameConfig,
    grid: Grid,
    snapshot: Option<Grid>,
}

impl TryFrom<EngineParts> for PlayEngine {
    type Error = GameError;

    fn try_from(parts: EngineParts) -> Result<Self> {
        if let Some(snapshot) = &parts.snapshot {
            check_grid(&parts.config, snapshot)?;
        }
        let mut engine = Self::from_grid(parts.config, parts.grid)?;
        engine.snapshot = parts.snapshot;
        Ok(engine)
    }
}

impl From<PlayEngine> for EngineParts {
    fn from(engine: PlayEngine) -> Self {
        Self {
            config: engine.config,
            grid: engine.grid,
            snapshot: engine.snapshot,
        }
    }
}

/// Checks that `grid` has the configured size and only uses palette colors.
fn check_grid(config: &GameConfig, grid: &Grid) -> Result<()> {
    if grid.size() != config.size {
        return Err(GameError::InvalidBoardShape);
    }
    if grid
        .iter()
        .filter_map(|(_, tile)| tile.color())
        .any(|color| !config.palette.contains(color))
    {
        return Err(GameError::UnknownColor);
    }
    Ok(())
}

impl PlayEngine {
    /// Starts a game on a randomly filled grid.
    pub fn new_game(config: GameConfig, seed: u64) -> Self {
        Self::with_generator(config, RandomGridGenerator::new(seed))
    }

    pub fn with_generator(config: GameConfig, generator: impl GridGenerator) -> Self {
        let grid = generator.generate(&config);
        log::debug!("New {}x{} game", config.rows(), config.cols());
        Self {
            config,
            grid,
            snapshot: None,
            status: GameStatus::InProgress,
        }
    }

    /// Starts a game on an explicit grid, which must match the config.
    pub fn from_grid(config: GameConfig, grid: Grid) -> Result<Self> {
        check_grid(&config, &grid)?;

        let status = grid.status();
        Ok(Self {
            config,
            grid,
            snapshot: None,
            status,
        })
    }

    /// Throws the current grid away and deals a fresh one with the same config.
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new_game(self.config.clone(), seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        self.grid.tile_at(coords)
    }

    /// Status as of the last move, new game or undo.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Derives the status from the current grid, ignoring the stored one.
    pub fn check_status(&self) -> GameStatus {
        self.grid.status()
    }

    pub fn can_undo(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn query_group(&self, coords: Coord2) -> Result<Group> {
        self.grid.query_group(coords)
    }

    /// The cells a click at `coords` would remove, empty if it would do nothing.
    pub fn hover_group(&self, coords: Coord2) -> Result<Group> {
        if self.status.is_over() {
            self.grid.validate_coords(coords)?;
            return Ok(Group::empty());
        }
        self.grid.removable_group(coords)
    }

    pub fn remaining_tiles(&self) -> CellCount {
        self.grid.remaining_tiles()
    }

    pub fn remaining_by_color(&self) -> Vec<(ColorId, CellCount)> {
        self.grid.remaining_by_color(&self.config.palette)
    }

    pub fn is_cleared(&self) -> bool {
        self.grid.is_cleared()
    }

    /// Removes the group at `coords` and settles the grid.
    ///
    /// Clicking an empty cell, a lone tile, or any cell after the game is over
    /// is not an error; the returned outcome simply reports no update.
    pub fn commit_move(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.status.is_over() {
            log::trace!("{:?} ignored, game is over", coords);
            return Ok(MoveOutcome::no_change(self.status));
        }

        if self.grid[coords].is_empty() {
            log::trace!("{:?} ignored, cell is empty", coords);
            return Ok(MoveOutcome::no_change(self.status));
        }

        let group = self.grid.query_group(coords)?;
        if !group.is_removable() {
            log::trace!("{:?} ignored, tile is isolated", coords);
            return Ok(MoveOutcome::no_change(self.status));
        }

        self.snapshot = Some(self.grid.clone());
        self.grid.remove(&group);
        self.grid.collapse();
        self.status = self.grid.status();

        // group size is bounded by the cell count
        let removed = group.len() as CellCount;
        log::debug!(
            "Removed {} tiles at {:?}, {} left, {:?}",
            removed,
            coords,
            self.grid.remaining_tiles(),
            self.status
        );

        Ok(MoveOutcome {
            removed,
            status: self.status,
        })
    }

    /// Restores the grid from before the last committed move.
    pub fn undo(&mut self) -> UndoOutcome {
        match self.snapshot.take() {
            Some(previous) => {
                self.grid = previous;
                self.status = GameStatus::InProgress;
                log::debug!("Undid last move");
                UndoOutcome::Restored
            }
            None => {
                log::trace!("Nothing to undo");
                UndoOutcome::NothingToUndo
            }
        }
    }
}
