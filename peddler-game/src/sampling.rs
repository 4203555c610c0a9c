//! Uniform sampling without replacement.

use rand::Rng;
use rand::seq::SliceRandom;

/// Draw `amount` distinct elements uniformly at random.
///
/// Uses a partial Fisher–Yates shuffle over a copy of `items`, so every
/// subset (and every ordering of it) is equally likely. When fewer than
/// `amount` items exist, all of them are returned in shuffled order.
pub fn sample_without_replacement<T, R>(items: &[T], amount: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let take = amount.min(items.len());
    if take == 0 {
        return Vec::new();
    }
    let mut pool = items.to_vec();
    let (chosen, _) = pool.partial_shuffle(rng, take);
    chosen.to_vec()
}
