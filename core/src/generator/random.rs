use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use super::*;

/// Uniformly shuffled deck, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, size: BoardSize) -> Deck {
        let total_cells = usize::from(size.total_cells());

        // one key more than needed on odd boards, its twin falls off when truncating
        let key_count = size.total_cells().div_ceil(2);
        let mut values: Vec<PairKey> = (1..=key_count).flat_map(|key| [key, key]).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        values.shuffle(&mut rng);
        values.truncate(total_cells);

        let deck = Deck::from_shuffled(size, values);
        log::trace!(
            "Generated {} deck from seed {}, orphan: {:?}",
            size,
            self.seed,
            deck.orphan()
        );
        deck
    }
}
