//! Fake data generation for seed records.
//!
//! [`FakeData`] is the small vocabulary the factories need. [`Faker`]
//! implements it on top of the `fake` crate's English locale, drawing from
//! an owned RNG so that a seeded faker produces reproducible records.

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::Name;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Words per generated sentence (exclusive upper bound).
const SENTENCE_WORDS: std::ops::Range<usize> = 4..9;

/// Source of plausible synthetic field values.
pub trait FakeData {
    /// A short sentence of four to eight words.
    fn sentence(&mut self) -> String;

    /// A single lowercase word.
    fn word(&mut self) -> String;

    /// An integer in `min..=max`. Reversed bounds are swapped.
    fn number_between(&mut self, min: i32, max: i32) -> i32;

    /// A paragraph made of `sentences` sentences.
    fn paragraph(&mut self, sentences: usize) -> String;

    /// A person's full name.
    fn name(&mut self) -> String;

    /// An e-mail address on a reserved example domain.
    fn safe_email(&mut self) -> String;

    /// A uniformly chosen index into a collection of `len` elements.
    ///
    /// Returns `None` when `len` is zero.
    fn pick_index(&mut self, len: usize) -> Option<usize>;
}

/// [`FakeData`] backed by the `fake` crate.
#[derive(Debug, Clone)]
pub struct Faker<R = StdRng> {
    rng: R,
}

impl Faker<StdRng> {
    /// A faker seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible faker.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Faker<R> {
    /// Wrap an existing RNG.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> FakeData for Faker<R> {
    fn sentence(&mut self) -> String {
        Sentence(SENTENCE_WORDS).fake_with_rng(&mut self.rng)
    }

    fn word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }

    fn number_between(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    fn paragraph(&mut self, sentences: usize) -> String {
        let count = sentences.max(1);
        Paragraph(count..count + 1).fake_with_rng(&mut self.rng)
    }

    fn name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn safe_email(&mut self) -> String {
        SafeEmail().fake_with_rng(&mut self.rng)
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_between_is_inclusive() {
        let mut faker = Faker::seeded(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2_000 {
            let n = faker.number_between(1, 3);
            assert!((1..=3).contains(&n));
            seen_min |= n == 1;
            seen_max |= n == 3;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_number_between_swaps_reversed_bounds() {
        let mut faker = Faker::seeded(1);
        for _ in 0..100 {
            assert!((10..=20).contains(&faker.number_between(20, 10)));
        }
        assert_eq!(faker.number_between(5, 5), 5);
    }

    #[test]
    fn test_text_shapes_are_not_empty() {
        let mut faker = Faker::seeded(3);
        assert!(faker.sentence().split_whitespace().count() >= 4);
        assert!(!faker.word().is_empty());
        assert!(!faker.word().contains(' '));
        assert!(faker.paragraph(5).len() > faker.sentence().len());
        assert!(faker.safe_email().contains('@'));
        assert!(!faker.name().is_empty());
    }

    #[test]
    fn test_seeded_fakers_are_reproducible() {
        let mut a = Faker::seeded(42);
        let mut b = Faker::seeded(42);
        assert_eq!(a.sentence(), b.sentence());
        assert_eq!(a.number_between(100, 1000), b.number_between(100, 1000));
    }

    #[test]
    fn test_pick_index() {
        let mut faker = Faker::seeded(9);
        assert_eq!(faker.pick_index(0), None);
        assert_eq!(faker.pick_index(1), Some(0));
        for _ in 0..100 {
            assert!(faker.pick_index(4).is_some_and(|i| i < 4));
        }
    }
}
