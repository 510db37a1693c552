//! Random number helpers shared by every loot stage.
//!
//! All rolls go through `&mut R where R: Rng + ?Sized` so callers choose the
//! source: tests and the survey pass seeded `Xoshiro256PlusPlus` generators,
//! live loot rolls use the per-thread generator from [`with_thread_rng`].
//! No generator is shared between threads, so there is nothing to lock.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use sha3::{Digest, Sha3_256};

thread_local! {
    static LOOT_RNG: RefCell<Xoshiro256PlusPlus> =
        RefCell::new(Xoshiro256PlusPlus::seed_from_u64(rand::random::<u64>()));
}

/// Run `f` with this thread's loot generator.
///
/// Each worker thread lazily seeds its own generator from OS entropy the
/// first time it rolls loot.
pub fn with_thread_rng<T>(f: impl FnOnce(&mut Xoshiro256PlusPlus) -> T) -> T {
    LOOT_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Deterministic generator for a seed
pub fn seeded(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Deterministic per-item seed from a base seed and an index
pub fn derive_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[0..8]);
    u64::from_le_bytes(bytes)
}

/// Uniform integer in `[min, max]` (both inclusive).
/// A degenerate range (`max <= min`) returns `min`.
pub fn next_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniform real in `[min, max)`. A degenerate range returns `min`.
pub fn next_float<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Uniform real in `[0, 1)` scaled by `1 + quality_mod`.
///
/// A higher quality modifier pushes the draw up, past more thresholds.
pub fn next_interval<R: Rng + ?Sized>(rng: &mut R, quality_mod: f32) -> f32 {
    rng.gen::<f32>() * (1.0 + quality_mod)
}

/// Uniform index into a collection of `len` elements (`len` must be > 0)
pub fn next_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    rng.gen_range(0..len.max(1))
}

/// In-place Fisher-Yates shuffle
pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in 0..items.len() {
        let idx = rng.gen_range(i..items.len());
        items.swap(i, idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_int_inclusive_bounds() {
        let mut rng = seeded(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2_000 {
            let v = next_int(&mut rng, 1, 4);
            assert!((1..=4).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 4;
        }
        assert!(seen_min && seen_max, "both bounds should be reachable");
    }

    #[test]
    fn test_next_int_degenerate_range() {
        let mut rng = seeded(1);
        assert_eq!(next_int(&mut rng, 1, 1), 1);
        assert_eq!(next_int(&mut rng, 1, 0), 1);
        assert_eq!(next_int(&mut rng, 5, -3), 5);
    }

    #[test]
    fn test_next_float_range() {
        let mut rng = seeded(3);
        for _ in 0..1_000 {
            let v = next_float(&mut rng, 0.9, 1.1);
            assert!((0.9..1.1).contains(&v));
        }
        assert_eq!(next_float(&mut rng, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_next_interval_scaling() {
        let mut rng = seeded(11);
        for _ in 0..1_000 {
            let v = next_interval(&mut rng, 0.5);
            assert!((0.0..1.5).contains(&v));
        }
    }

    #[test]
    fn test_derive_seed_deterministic() {
        assert_eq!(derive_seed(42, 7), derive_seed(42, 7));
        assert_ne!(derive_seed(42, 7), derive_seed(42, 8));
        assert_ne!(derive_seed(42, 7), derive_seed(43, 7));
    }

    #[test]
    fn test_seeded_reproducible() {
        let mut first = seeded(99);
        let mut second = seeded(99);
        let a: Vec<u32> = (0..10).map(|_| first.gen()).collect();
        let b: Vec<u32> = (0..10).map(|_| second.gen()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = seeded(5);
        let mut values: Vec<u32> = (0..20).collect();
        shuffle(&mut rng, &mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_thread_rng_usable_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| with_thread_rng(|rng| next_int(rng, 1, 100))))
            .collect();
        for h in handles {
            let v = h.join().expect("thread panicked");
            assert!((1..=100).contains(&v));
        }
    }
}
