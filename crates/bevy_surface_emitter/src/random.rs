//! Injected randomness for emitter sampling.
//!
//! Every emitter draws through a [`RandomSource`] handed in by the caller, so a
//! seeded source makes emission fully reproducible.

/// A source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform float in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Next uniform float in `[0, 1)` with double precision. Used where an f32
    /// draw is too coarse, e.g. indexing into tens of millions of items.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_f32())
    }

    /// Uniform float in `[lo, hi)` (or `[hi, lo)` when the bounds are swapped).
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f32(&mut self) -> f32 {
        self.f32()
    }

    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
