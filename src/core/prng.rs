// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It is used only for shuffling and slot sampling, where reproducibility from a
// seed matters more than statistical strength.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

const ZERO_STATE_REPLACEMENT: u64 = 0x9E3779B97F4A7C15;

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves a zero state.
        let seed = if seed == 0 {
            ZERO_STATE_REPLACEMENT
        } else {
            seed
        };
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        // Marsaglia / Vigna family. Simple, fast, decent for simulation noise.
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform integer in `[low, high)`. Returns `low` for an empty range.
    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u64;
        let v = self.next_u64() % span;
        low + v as usize
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range_usize(0, i + 1);
            items.swap(i, j);
        }
    }

    /// `count` draws from `[0, slots)` with replacement, sorted ascending.
    ///
    /// Sorting makes several draws of the same slot stack in a fixed order.
    pub fn sorted_slots(&mut self, count: usize, slots: usize) -> Vec<usize> {
        let mut drawn: Vec<usize> = (0..count)
            .map(|_| self.gen_range_usize(0, slots))
            .collect();
        drawn.sort_unstable();
        drawn
    }
}

/// Derive an independent seed for stream `index` of a run seeded with `seed`.
///
/// SplitMix64 finalizer over `seed + (index + 1) * golden_gamma`, so neighbouring
/// indices land far apart and index 0 never reproduces the run seed itself.
pub fn derive_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_add(1).wrapping_mul(ZERO_STATE_REPLACEMENT));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::new(12345);
        let mut b = Prng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = Prng::new(0);
        let first = rng.next_u64();
        let second = rng.next_u64();
        assert_ne!(first, 0);
        assert_ne!(first, second);
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut rng = Prng::new(7);
        for _ in 0..1000 {
            let v = rng.gen_range_usize(3, 9);
            assert!((3..9).contains(&v));
        }
        assert_eq!(rng.gen_range_usize(5, 5), 5);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Prng::new(99);
        let mut items: Vec<usize> = (0..50).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }

    #[test]
    fn sorted_slots_are_sorted_and_bounded() {
        let mut rng = Prng::new(3);
        let slots = rng.sorted_slots(40, 6);
        assert_eq!(slots.len(), 40);
        assert!(slots.windows(2).all(|w| w[0] <= w[1]));
        assert!(slots.iter().all(|&s| s < 6));
    }

    #[test]
    fn derived_seeds_differ_per_index() {
        let a = derive_seed(42, 0);
        let b = derive_seed(42, 1);
        let c = derive_seed(43, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, 42);
        assert_eq!(a, derive_seed(42, 0));
    }
}
