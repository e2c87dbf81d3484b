//! Randomized trial orderings.
//!
//! Every function takes the generator as a parameter so paradigms can pass
//! `rand::rng()` in production and a seeded `StdRng` in tests.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Uniform random permutation in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    items.shuffle(rng);
}

/// Shuffled copy of a slice.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Exactly `round(total * ratio)` `true` values and the remainder `false`,
/// shuffled. An exact count rather than a per-item coin flip, so target and
/// non-target trials hit the requested ratio regardless of `total`.
pub fn ratio_sequence<R: Rng + ?Sized>(rng: &mut R, total: usize, ratio: f64) -> Vec<bool> {
    let true_count = ((total as f64) * ratio).round() as usize;
    let true_count = true_count.min(total);
    let mut sequence = vec![true; true_count];
    sequence.resize(total, false);
    sequence.shuffle(rng);
    sequence
}

/// Build a sequence by calling `draw` repeatedly, redrawing whenever a
/// candidate equals the immediately preceding element. Consecutive repeats
/// would trivialize recall in digit/letter/spatial span tasks.
///
/// `draw` must be able to produce at least 2 distinct values when
/// `length >= 2`, or the rejection loop cannot terminate.
pub fn repeat_avoiding_draws<T, F>(length: usize, mut draw: F) -> Vec<T>
where
    T: PartialEq,
    F: FnMut() -> T,
{
    let mut out: Vec<T> = Vec::with_capacity(length);
    for _ in 0..length {
        loop {
            let candidate = draw();
            if out.last() != Some(&candidate) {
                out.push(candidate);
                break;
            }
        }
    }
    out
}

/// Repeat-avoiding sequence drawn uniformly from `alphabet`.
pub fn repeat_avoiding_sequence<T, R>(rng: &mut R, length: usize, alphabet: &[T]) -> Vec<T>
where
    T: Clone + PartialEq,
    R: Rng + ?Sized,
{
    assert!(
        !alphabet.is_empty() && (length < 2 || alphabet.len() >= 2),
        "repeat-avoiding draw needs an alphabet of at least 2 elements"
    );
    repeat_avoiding_draws(length, || {
        alphabet
            .choose(&mut *rng)
            .expect("alphabet is non-empty")
            .clone()
    })
}

/// Uniform pick of one element.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    items.choose(rng).expect("pick from empty slice")
}

/// Uniform integer in `[min, max]` inclusive.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn ratio_sequence_has_exact_counts() {
        let mut rng = rng(11);
        for &total in &[0usize, 1, 2, 7, 10, 60, 100] {
            for &ratio in &[0.0, 0.25, 1.0 / 3.0, 0.5, 0.75, 1.0] {
                let seq = ratio_sequence(&mut rng, total, ratio);
                let expected = ((total as f64) * ratio).round() as usize;
                assert_eq!(seq.len(), total);
                assert_eq!(
                    seq.iter().filter(|&&v| v).count(),
                    expected,
                    "total={total} ratio={ratio}"
                );
            }
        }
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut rng = rng(7);
        let original = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        let mut shuffled = original.clone();
        shuffle(&mut rng, &mut shuffled);
        let mut a = original.clone();
        let mut b = shuffled.clone();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_positions_roughly_uniform() {
        // Each element should land at position 0 about 1/6 of the time.
        let mut rng = rng(42);
        let trials = 6000;
        let mut counts = [0usize; 6];
        for _ in 0..trials {
            let mut items = [0usize, 1, 2, 3, 4, 5];
            shuffle(&mut rng, &mut items);
            counts[items[0]] += 1;
        }
        let expected = trials / 6;
        for (value, &count) in counts.iter().enumerate() {
            assert!(
                count > expected * 7 / 10 && count < expected * 13 / 10,
                "value {value} appeared at position 0 {count} times (expected ~{expected})"
            );
        }
    }

    #[test]
    fn repeat_avoiding_never_repeats_adjacent() {
        let mut rng = rng(3);
        let binary = repeat_avoiding_sequence(&mut rng, 500, &[0u8, 1]);
        assert_eq!(binary.len(), 500);
        assert!(binary.windows(2).all(|w| w[0] != w[1]));

        let letters = repeat_avoiding_sequence(&mut rng, 64, &["A", "B", "C"]);
        assert!(letters.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn repeat_avoiding_draws_with_custom_generator() {
        // Digit-span style: digits 1-9, no consecutive repeats.
        let mut rng = rng(13);
        let digits = repeat_avoiding_draws(100, || random_int(&mut rng, 1, 9));
        assert!(digits.iter().all(|d| (1..=9).contains(d)));
        assert!(digits.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn random_int_stays_in_inclusive_range() {
        let mut rng = rng(5);
        for _ in 0..200 {
            let v = random_int(&mut rng, 1, 9);
            assert!((1..=9).contains(&v));
        }
        assert_eq!(random_int(&mut rng, 4, 4), 4);
    }

    #[test]
    fn pick_returns_member() {
        let mut rng = rng(9);
        let items = ["left", "right", "up"];
        for _ in 0..50 {
            assert!(items.contains(pick(&mut rng, &items)));
        }
    }
}
