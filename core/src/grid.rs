use alloc::vec;
use alloc::vec::Vec;
use core::ops::Index;
use hashbrown::HashSet;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Maximal set of orthogonally adjacent, same-colored, occupied cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    color: Option<ColorId>,
    cells: Vec<Coord2>,
}

impl Group {
    pub const fn empty() -> Self {
        Self {
            color: None,
            cells: Vec::new(),
        }
    }

    pub fn color(&self) -> Option<ColorId> {
        self.color
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the player may remove this group.
    pub fn is_removable(&self) -> bool {
        self.cells.len() >= 2
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }
}

/// Rectangular board of tiles, indexed `(row, col)`.
///
/// Both dimensions are fixed at construction and never exceed [`Coord::MAX`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Tile>", into = "Array2<Tile>")]
pub struct Grid {
    tiles: Array2<Tile>,
}

impl Grid {
    /// Grid of the given size with each cell produced by `f`, in row-major order.
    ///
    /// A zero dimension is raised to one, as [`GameConfig::new`] does.
    pub fn from_fn(size: Coord2, mut f: impl FnMut(Coord2) -> Tile) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        Self {
            tiles: Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
                f((row as Coord, col as Coord))
            }),
        }
    }

    pub fn from_tiles(tiles: Array2<Tile>) -> Result<Self> {
        let (rows, cols) = tiles.dim();
        let max = usize::from(Coord::MAX);
        if rows == 0 || cols == 0 || rows > max || cols > max {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { tiles })
    }

    /// Builds a grid from rows listed top to bottom; all rows must have the same length.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != cols) {
            return Err(GameError::InvalidBoardShape);
        }

        let flat: Vec<Tile> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        let tiles = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_tiles(tiles)
    }

    pub fn size(&self) -> Coord2 {
        // dimensions are bounded by Coord::MAX on construction
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    /// All cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.tiles
            .indexed_iter()
            .map(|((row, col), &tile)| ((row as Coord, col as Coord), tile))
    }

    /// The maximal group containing `coords`, or the empty group if that cell is empty.
    pub fn query_group(&self, coords: Coord2) -> Result<Group> {
        let coords = self.validate_coords(coords)?;
        let Tile::Occupied(color) = self[coords] else {
            return Ok(Group::empty());
        };

        let mut visited = HashSet::new();
        Ok(Group {
            color: Some(color),
            cells: self.flood_fill(coords, color, &mut visited),
        })
    }

    /// Like [`Grid::query_group`], but only returns groups the player could remove.
    pub fn removable_group(&self, coords: Coord2) -> Result<Group> {
        let group = self.query_group(coords)?;
        Ok(if group.is_removable() {
            group
        } else {
            Group::empty()
        })
    }

    /// Every removable group on the grid, each reported once.
    pub fn removable_groups(&self) -> Vec<Group> {
        self.components()
            .filter(|group| group.is_removable())
            .collect()
    }

    /// `Over` when no occupied cell belongs to a removable group.
    pub fn status(&self) -> GameStatus {
        if self.components().any(|group| group.is_removable()) {
            GameStatus::InProgress
        } else {
            GameStatus::Over
        }
    }

    pub fn remaining_tiles(&self) -> CellCount {
        // bounded by total_cells, which fits
        self.tiles.iter().filter(|tile| tile.is_occupied()).count() as CellCount
    }

    pub fn is_cleared(&self) -> bool {
        self.tiles.iter().all(|tile| tile.is_empty())
    }

    /// Occupied cell count per palette color, in palette order.
    pub fn remaining_by_color(&self, palette: &Palette) -> Vec<(ColorId, CellCount)> {
        let mut counts = vec![0; palette.len()];
        for color in self.tiles.iter().filter_map(|tile| tile.color()) {
            if let Some(count) = counts.get_mut(color.index()) {
                *count += 1;
            }
        }
        palette.ids().zip(counts).collect()
    }

    /// Empties every cell of `group`. Leaves the grid unsettled until [`Grid::collapse`].
    pub(crate) fn remove(&mut self, group: &Group) {
        for &coords in group.cells() {
            self.tiles[coords.to_nd_index()] = Tile::Empty;
        }
    }

    /// Settles the grid: tiles fall to the bottom of their column, then empty
    /// columns are squeezed out to the right.
    pub fn collapsed(&self) -> Grid {
        let mut tiles = self.tiles.clone();
        settle_columns(&mut tiles);
        Grid {
            tiles: shift_columns_left(&tiles),
        }
    }

    pub fn collapse(&mut self) {
        settle_columns(&mut self.tiles);
        self.tiles = shift_columns_left(&self.tiles);
    }

    /// Whether the grid is in the shape [`Grid::collapse`] leaves it in.
    pub fn is_settled(&self) -> bool {
        let mut seen_empty_column = false;
        for column in self.tiles.columns() {
            let first_occupied = column.iter().position(|tile| tile.is_occupied());
            match first_occupied {
                None => seen_empty_column = true,
                Some(_) if seen_empty_column => return false,
                Some(top) => {
                    if column.iter().skip(top).any(|tile| tile.is_empty()) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn components(&self) -> Components<'_> {
        Components {
            grid: self,
            visited: HashSet::new(),
            cursor: 0,
        }
    }

    /// Collects the component of `color` reachable from `start`, marking it in `visited`.
    fn flood_fill(&self, start: Coord2, color: ColorId, visited: &mut HashSet<u16>) -> Vec<Coord2> {
        let mut cells = Vec::new();
        let mut stack = vec![start];
        visited.insert(pack(start));

        while let Some(coords) = stack.pop() {
            cells.push(coords);
            for next in self.tiles.iter_neighbors(coords) {
                if self[next] == Tile::Occupied(color) && visited.insert(pack(next)) {
                    stack.push(next);
                }
            }
        }

        cells
    }
}

impl Index<Coord2> for Grid {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}

impl TryFrom<Array2<Tile>> for Grid {
    type Error = GameError;

    fn try_from(tiles: Array2<Tile>) -> Result<Self> {
        Self::from_tiles(tiles)
    }
}

impl From<Grid> for Array2<Tile> {
    fn from(grid: Grid) -> Self {
        grid.tiles
    }
}

/// Moves the occupied cells of every column to its bottom, keeping their order.
fn settle_columns(tiles: &mut Array2<Tile>) {
    let rows = tiles.len_of(Axis(0));
    for mut column in tiles.columns_mut() {
        let mut write = rows;
        for read in (0..rows).rev() {
            let tile = column[read];
            if tile.is_occupied() {
                write -= 1;
                column[write] = tile;
            }
        }
        for row in 0..write {
            column[row] = Tile::Empty;
        }
    }
}

/// Drops fully empty columns, packing the rest against the left edge in their original order.
fn shift_columns_left(tiles: &Array2<Tile>) -> Array2<Tile> {
    let mut shifted = Array2::default(tiles.dim());
    let non_empty = tiles
        .columns()
        .into_iter()
        .filter(|column| column.iter().any(|tile| tile.is_occupied()));
    for (target, column) in non_empty.enumerate() {
        shifted.column_mut(target).assign(&column);
    }
    shifted
}

/// Walks the grid in row-major order yielding each connected component once.
struct Components<'a> {
    grid: &'a Grid,
    visited: HashSet<u16>,
    cursor: usize,
}

impl Iterator for Components<'_> {
    type Item = Group;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, cols) = self.grid.tiles.dim();
        while self.cursor < self.grid.tiles.len() {
            let coords = ((self.cursor / cols) as Coord, (self.cursor % cols) as Coord);
            self.cursor += 1;

            if let Tile::Occupied(color) = self.grid[coords] {
                if !self.visited.contains(&pack(coords)) {
                    let cells = self.grid.flood_fill(coords, color, &mut self.visited);
                    return Some(Group {
                        color: Some(color),
                        cells,
                    });
                }
            }
        }
        None
    }
}
