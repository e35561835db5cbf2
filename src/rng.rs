// rng.rs - Random sources
//
// Every random draw in the engine goes through `RandomSource` so tests can
// swap the generator for a fixed sequence.

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in `[lo, hi)`; returns `lo` for an empty interval.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi { return lo; }
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// xorshift64 generator. Small, fast, good enough for visuals.
#[derive(Debug, Clone)]
pub struct XorShift {
    state: u64,
}

impl XorShift {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        Self { state: if seed == 0 { 0xDEAD_BEEF_CAFE_F00D } else { seed } }
    }

    /// Seed from `Math.random()` in the browser, a constant elsewhere.
    pub fn from_entropy() -> Self {
        #[cfg(target_arch = "wasm32")]
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        #[cfg(not(target_arch = "wasm32"))]
        let seed = 0xDEAD_BEEF;
        Self::new(seed)
    }
}

impl RandomSource for XorShift {
    #[inline(always)]
    fn next_f64(&mut self) -> f64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        // Top 53 bits fill the mantissa exactly
        (self.state >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct Sequence {
    values: Vec<f64>,
    pos: usize,
}

impl Sequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "Sequence needs at least one value");
        Self { values, pos: 0 }
    }

    /// Same sample every draw.
    pub fn constant(v: f64) -> Self {
        Self::new(vec![v])
    }
}

impl RandomSource for Sequence {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.pos];
        self.pos = (self.pos + 1) % self.values.len();
        v
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_stays_in_unit_interval() {
        let mut rng = XorShift::new(1);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = XorShift::new(0);
        assert_ne!(rng.next_f64(), 0.0);
    }

    #[test]
    fn range_handles_degenerate_interval() {
        let mut rng = Sequence::constant(0.9);
        assert_eq!(rng.range(10.0, 10.0), 10.0);
        assert_eq!(rng.range(0.0, 10.0), 9.0);
    }

    #[test]
    fn index_never_reaches_len() {
        let mut rng = Sequence::constant(0.999_999_999_999);
        assert_eq!(rng.index(3), 2);
    }

    #[test]
    fn sequence_cycles() {
        let mut rng = Sequence::new([0.1, 0.2]);
        let drawn: Vec<f64> = (0..4).map(|_| rng.next_f64()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.1, 0.2]);
    }
}
