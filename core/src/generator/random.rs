use super::*;

/// Purely random layout: every symbol twice, Fisher-Yates shuffled, laid out row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self) -> Board {
        use rand::prelude::*;

        let mut symbols: Vec<Symbol> = (1..=SYMBOL_COUNT).flat_map(|symbol| [symbol, symbol]).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in (1..symbols.len()).rev() {
            let j = rng.random_range(0..=i);
            symbols.swap(i, j);
        }
        log::debug!("Generated board from seed {}", self.seed);

        let cols = usize::from(GRID_COLS);
        let size = (GRID_ROWS, GRID_COLS);
        Board::new_unchecked(Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            symbols[row * cols + col]
        }))
    }
}
