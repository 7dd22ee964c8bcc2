use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Source of random ordering for pairing
pub trait Shuffler {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Uniform shuffle backed by a `rand` generator
pub struct RandomShuffler<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomShuffler<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomShuffler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomShuffler<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffler for RandomShuffler<R> {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Identity permutation, used where exact outcomes matter
#[derive(Debug, Default, Clone, Copy)]
pub struct PreserveOrder;

impl Shuffler for PreserveOrder {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}
