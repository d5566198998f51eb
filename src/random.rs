//! Injectable source of uniform randomness.
//!
//! Scene composition never calls a global RNG. Everything random is drawn
//! through [`RandomSource`], so the host can use an entropy-seeded generator
//! while tests plug in seeded or scripted sources.

use rand::Rng;
use rand::rngs::StdRng;

/// A uniform `[0, 1)` sample stream.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform sample in `[low, high)`.
    ///
    /// Samples that round up to `high` are pulled back to the largest float
    /// below it. An empty range yields `low`.
    fn range(&mut self, low: f32, high: f32) -> f32 {
        let v = low + self.next_unit() * (high - low);
        if v < high { v } else { below(high).max(low) }
    }
}

/// Largest `f32` strictly less than `x`.
fn below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f32 {
        self.r#gen::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Replays a fixed list of samples, cycling when it runs out.
#[cfg(test)]
pub(crate) struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl SequenceSource {
    pub(crate) fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "sequence source needs at least one value");
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
