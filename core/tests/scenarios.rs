use rand::prelude::*;
use samegame_core::*;

const R: Tile = Tile::Occupied(ColorId(0));
const B: Tile = Tile::Occupied(ColorId(1));
const G: Tile = Tile::Occupied(ColorId(2));
const E: Tile = Tile::Empty;

fn colors() -> Palette {
    Palette::new(["red", "blue", "green"]).unwrap()
}

/// Arbitrary, possibly unsettled grid with roughly one cell in `empty_one_in` left empty.
fn random_grid(seed: u64, size: Coord2, colors: u8, empty_one_in: u32) -> Grid {
    let mut rng = SmallRng::seed_from_u64(seed);
    Grid::from_fn(size, |_| {
        if rng.random_range(0..empty_one_in) == 0 {
            Tile::Empty
        } else {
            Tile::Occupied(ColorId(rng.random_range(0..colors)))
        }
    })
}

fn random_grids() -> impl Iterator<Item = Grid> {
    (0..120u64).map(|seed| {
        let rows = 1 + (seed % 9) as Coord;
        let cols = 1 + (seed / 9 % 11) as Coord;
        random_grid(seed, (rows, cols), 2 + (seed % 3) as u8, 3)
    })
}

fn all_coords(grid: &Grid) -> impl Iterator<Item = Coord2> + '_ {
    grid.iter().map(|(coords, _)| coords)
}

#[test]
fn collapse_is_idempotent() {
    for grid in random_grids() {
        let once = grid.collapsed();
        assert_eq!(once.collapsed(), once, "grid: {grid:?}");
    }
}

#[test]
fn collapse_bottom_aligns_and_left_packs() {
    for grid in random_grids() {
        let settled = grid.collapsed();
        let (rows, cols) = settled.size();

        let mut seen_empty_column = false;
        for col in 0..cols {
            let column: Vec<Tile> = (0..rows).map(|row| settled[(row, col)]).collect();
            let occupied = column.iter().filter(|tile| tile.is_occupied()).count();
            assert!(
                column[..rows as usize - occupied].iter().all(|tile| tile.is_empty()),
                "column {col} not bottom aligned: {settled:?}"
            );
            if occupied == 0 {
                seen_empty_column = true;
            } else {
                assert!(!seen_empty_column, "gap before column {col}: {settled:?}");
            }
        }
        assert!(settled.is_settled());
    }
}

#[test]
fn collapse_keeps_every_tile() {
    for grid in random_grids() {
        let palette = Palette::new(["a", "b", "c", "d"]).unwrap();
        assert_eq!(
            grid.collapsed().remaining_by_color(&palette),
            grid.remaining_by_color(&palette)
        );
    }
}

#[test]
fn query_group_is_a_maximal_same_colored_set() {
    for grid in random_grids() {
        let (rows, cols) = grid.size();
        for start in all_coords(&grid) {
            let group = grid.query_group(start).unwrap();
            let Tile::Occupied(color) = grid[start] else {
                assert!(group.is_empty());
                continue;
            };

            let mut cells = group.cells().to_vec();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), group.len(), "duplicates from {start:?}");
            assert!(group.contains(start));

            for &(row, col) in group.cells() {
                assert!(row < rows && col < cols);
                assert_eq!(grid[(row, col)], Tile::Occupied(color));

                let neighbors = [
                    row.checked_sub(1).map(|r| (r, col)),
                    Some((row + 1, col)).filter(|&(r, _)| r < rows),
                    col.checked_sub(1).map(|c| (row, c)),
                    Some((row, col + 1)).filter(|&(_, c)| c < cols),
                ];
                for neighbor in neighbors.into_iter().flatten() {
                    if grid[neighbor] == Tile::Occupied(color) {
                        assert!(group.contains(neighbor), "{neighbor:?} left out");
                    }
                }
            }
        }
    }
}

#[test]
fn status_matches_exhaustive_scan() {
    for grid in random_grids().chain((0..40).map(|seed| random_grid(seed, (6, 6), 6, 2))) {
        let exhaustive_over = all_coords(&grid)
            .filter(|&coords| grid[coords].is_occupied())
            .all(|coords| grid.query_group(coords).unwrap().len() < 2);

        assert_eq!(grid.status().is_over(), exhaustive_over, "grid: {grid:?}");
        assert_eq!(grid.removable_groups().is_empty(), exhaustive_over);
    }
}

#[test]
fn undo_restores_exact_grid() {
    for seed in 0..20 {
        let mut engine = PlayEngine::new_game(GameConfig::default(), seed);
        let mut rng = SmallRng::seed_from_u64(seed);

        while engine.check_status() == GameStatus::InProgress {
            let groups = engine.grid().removable_groups();
            let group = &groups[rng.random_range(0..groups.len())];
            let before = engine.grid().clone();

            let outcome = engine.commit_move(group.cells()[0]).unwrap();
            assert_eq!(usize::from(outcome.removed), group.len());
            assert!(engine.grid().is_settled());

            let after = engine.grid().clone();
            assert_eq!(engine.undo(), UndoOutcome::Restored);
            assert_eq!(engine.grid(), &before);
            assert_eq!(engine.undo(), UndoOutcome::NothingToUndo);
            assert_eq!(engine.grid(), &before);

            engine.commit_move(group.cells()[0]).unwrap();
            assert_eq!(engine.grid(), &after);
        }

        assert_eq!(engine.check_status(), GameStatus::Over);
        assert!(engine.grid().removable_groups().is_empty());
    }
}

#[test]
fn removing_red_pair_settles_blue_in_first_column() {
    // columns top to bottom: [R, R, B], [G, R, R], [B, B, B]
    let grid = Grid::from_rows(&[&[R, G, B], &[R, R, B], &[B, R, B]]).unwrap();
    let config = GameConfig::new(grid.size(), colors());
    let mut engine = PlayEngine::from_grid(config, grid).unwrap();

    let outcome = engine.commit_move((0, 0)).unwrap();

    assert_eq!(outcome.removed, 4);
    assert_eq!(outcome.status, GameStatus::InProgress);
    assert_eq!(
        engine.grid(),
        &Grid::from_rows(&[&[E, E, B], &[E, E, B], &[B, G, B]]).unwrap()
    );
    assert!(engine.tile_at((0, 0)).unwrap().is_empty());
    assert_eq!(engine.tile_at((2, 0)).unwrap(), B);
}

#[test]
fn uniform_grid_is_one_group() {
    let grid = Grid::from_fn((7, 9), |_| R);

    assert_eq!(grid.status(), GameStatus::InProgress);
    for coords in all_coords(&grid) {
        assert_eq!(grid.query_group(coords).unwrap().len(), 63);
    }
}

#[test]
fn large_uniform_grid_does_not_overflow_the_stack() {
    let grid = Grid::from_fn((Coord::MAX, Coord::MAX), |_| R);

    let group = grid.query_group((127, 127)).unwrap();

    assert_eq!(group.len(), usize::from(grid.total_cells()));
}

#[test]
fn checkerboard_is_over_from_the_start() {
    for colors in [2u8, 3, 5] {
        let grid = Grid::from_fn((8, 8), |(row, col)| {
            Tile::Occupied(ColorId((row + col) % colors))
        });
        let config = GameConfig::with_colors(grid.size(), ["a", "b", "c", "d", "e"]).unwrap();
        let engine = PlayEngine::from_grid(config, grid).unwrap();

        assert_eq!(engine.check_status(), GameStatus::Over);
        assert!(engine.is_over());
    }
}

#[test]
fn clearing_the_board_ends_the_game() {
    let grid = Grid::from_rows(&[&[R, B], &[R, B]]).unwrap();
    let mut engine = PlayEngine::from_grid(GameConfig::new((2, 2), colors()), grid).unwrap();

    engine.commit_move((0, 0)).unwrap();
    let outcome = engine.commit_move((1, 0)).unwrap();

    assert_eq!(outcome.status, GameStatus::Over);
    assert!(engine.is_cleared());
    assert_eq!(engine.remaining_tiles(), 0);
}

#[test]
fn engine_state_serializes() {
    let mut engine = PlayEngine::new_game(GameConfig::default(), 11);
    let coords = engine.grid().removable_groups()[0].cells()[0];
    engine.commit_move(coords).unwrap();

    let json = serde_json::to_string(&engine).unwrap();
    let restored: PlayEngine = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, engine);
    assert!(restored.can_undo());
}

#[test]
fn snapshot_of_another_size_is_rejected_on_deserialize() {
    let grid = Grid::from_rows(&[&[R, R], &[B, G]]).unwrap();
    let mut engine = PlayEngine::from_grid(GameConfig::new((2, 2), colors()), grid).unwrap();
    engine.commit_move((0, 0)).unwrap();
    let mut value = serde_json::to_value(&engine).unwrap();

    value["snapshot"] = serde_json::to_value(Grid::from_fn((3, 5), |_| R)).unwrap();

    assert!(serde_json::from_value::<PlayEngine>(value).is_err());
}

#[test]
fn grid_colors_must_fit_the_palette_on_deserialize() {
    let grid = Grid::from_rows(&[&[R, G], &[B, B]]).unwrap();
    let engine = PlayEngine::from_grid(GameConfig::new((2, 2), colors()), grid).unwrap();
    let mut value = serde_json::to_value(&engine).unwrap();

    value["config"]["palette"] = serde_json::json!(["red", "blue"]);

    assert!(serde_json::from_value::<PlayEngine>(value).is_err());
}

#[test]
fn status_is_derived_from_the_grid_on_deserialize() {
    let grid = Grid::from_rows(&[&[R, R], &[B, B]]).unwrap();
    let engine = PlayEngine::from_grid(GameConfig::new((2, 2), colors()), grid).unwrap();
    let mut value = serde_json::to_value(&engine).unwrap();

    value["status"] = serde_json::json!("Over");
    let mut restored: PlayEngine = serde_json::from_value(value).unwrap();

    assert_eq!(restored.status(), GameStatus::InProgress);
    assert!(restored.commit_move((0, 0)).unwrap().has_update());
    assert_eq!(restored.undo(), UndoOutcome::Restored);
    assert_eq!(restored.size(), (2, 2));
}

#[test]
fn repeated_color_names_are_rejected() {
    assert_eq!(
        Palette::new(["red", "red"]),
        Err(GameError::DuplicateColor)
    );
    let result: serde_json::Result<Palette> = serde_json::from_str(r#"["red","blue","red"]"#);
    assert!(result.is_err());
}

#[test]
fn malformed_palette_is_rejected_on_deserialize() {
    let result: serde_json::Result<Palette> = serde_json::from_str(r#"["red"]"#);

    assert!(result.is_err());
}
