use super::*;

/// Fills every cell with a color drawn independently and uniformly from the palette.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: &GameConfig) -> Grid {
        use rand::prelude::*;

        // a palette always holds between 2 and u8::MAX + 1 colors
        let colors = config.palette.len();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let grid = Grid::from_fn(config.size, |_| {
            Tile::Occupied(ColorId(rng.random_range(0..colors) as u8))
        });

        log::trace!(
            "Generated {}x{} grid with {} colors from seed {}",
            config.rows(),
            config.cols(),
            colors,
            self.seed
        );
        grid
    }
}
