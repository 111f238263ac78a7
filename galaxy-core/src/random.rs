//! Uniform deviate sources for the field generator.
//!
//! The generator never talks to a concrete RNG. It pulls deviates in
//! `[0, 1)` from a [`UniformSource`], so tests can pin the exact sequence
//! with [`SequenceSource`] while the viewer plugs in `rand::rng()`.

use rand::Rng;

/// A stream of uniform deviates in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f32;

    /// `+1.0` or `-1.0` with equal probability.
    #[inline]
    fn next_sign(&mut self) -> f32 {
        if self.next_unit() < 0.5 { 1.0 } else { -1.0 }
    }
}

impl<R: Rng> UniformSource for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of deviates, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// Builds a source from `values`.
    ///
    /// ### Returns
    /// `None` if `values` is empty or any value lies outside `[0, 1)`.
    pub fn new(values: Vec<f32>) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| !(0.0..1.0).contains(v)) {
            return None;
        }
        Some(Self { values, cursor: 0 })
    }

    /// Number of deviates drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sequence_source_cycles_and_counts_draws() {
        let mut s = SequenceSource::new(vec![0.1, 0.2, 0.3]).unwrap();
        let drawn: Vec<f32> = (0..5).map(|_| s.next_unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.3, 0.1, 0.2]);
        assert_eq!(s.drawn(), 5);
    }

    #[test]
    fn sequence_source_rejects_bad_input() {
        assert!(SequenceSource::new(Vec::new()).is_none());
        assert!(SequenceSource::new(vec![0.5, 1.0]).is_none());
        assert!(SequenceSource::new(vec![-0.1]).is_none());
        assert!(SequenceSource::new(vec![f32::NAN]).is_none());
    }

    #[test]
    fn next_sign_splits_at_one_half() {
        let mut s = SequenceSource::new(vec![0.0, 0.49, 0.5, 0.99]).unwrap();
        let signs: Vec<f32> = (0..4).map(|_| s.next_sign()).collect();
        assert_eq!(signs, vec![1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn rng_deviates_stay_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u), "deviate {u} out of [0, 1)");
        }
    }
}
