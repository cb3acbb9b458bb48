//! The escape-time evaluator: iterate z ← z² + c and report, as a
//! continuous value, how quickly the orbit left the neighbourhood of
//! the origin.

use num::Complex;

/// Squared magnitude past which an orbit counts as escaped.  Large
/// enough that the double logarithm used for smoothing is well
/// behaved, and cheap to test against `norm_sqr()`.
pub const BAILOUT: f64 = (1 << 16) as f64;

/// Divisor applied to the escape index.  Larger values stretch a single
/// cycle of the palette over more iterations.
pub const DEFAULT_SPREAD: f64 = 2.0;

// Magnitudes below this make log2(log2(|z|)) undefined or negative.
const MIN_MAGNITUDE: f64 = 2.0;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// How a discrete escape iteration is turned into an escape index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Smoothing {
    /// Double-logarithm correction on the escaped magnitude.  Removes
    /// the banding of raw iteration counts.
    Normalize,
    /// The raw iteration count.  Produces visible bands.
    Linear,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Normalize
    }
}

/// The two halves of the `and` expression are false if the point is
/// guaranteed to be inside the main cardioid or the period-2 bulb.
/// True does *not* mean the point is outside; those still have to be
/// iterated.
pub fn maybe_outside(point: Complex<f64>) -> bool {
    let y = point.im.powi(2);
    let q = y + (point.re - D4).powi(2);
    q * (q + point.re - D4) > (y * D4) && (point.re + 1.0_f64).powi(2) + y > D16
}

/// Computes escape indices.  Holds only immutable knobs, so a single
/// evaluator is shared read-only by every render thread.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeEvaluator {
    spread: f64,
    smoothing: Smoothing,
    bailout: f64,
    // 1 + log2(log2(sqrt(bailout))): an orbit that just crossed the
    // bailout at iteration n lands on n + 1.
    offset: f64,
}

impl Default for EscapeEvaluator {
    fn default() -> Self {
        EscapeEvaluator::new(DEFAULT_SPREAD, Smoothing::default())
    }
}

impl EscapeEvaluator {
    /// An evaluator with the standard bailout.  `spread` must be
    /// positive; `Renderer::new` checks this.
    pub fn new(spread: f64, smoothing: Smoothing) -> Self {
        let bailout = BAILOUT;
        EscapeEvaluator {
            spread,
            smoothing,
            bailout,
            offset: 1.0 + bailout.sqrt().log2().log2(),
        }
    }

    /// The palette spread divisor.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// The smoothing variant in use.
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// The index reported for points that never escape.
    pub fn interior(&self, max_iterations: usize) -> f64 {
        (max_iterations as f64) / self.spread
    }

    /// Double-logarithm of an escaped magnitude.  The magnitude is
    /// clamped so neither logarithm sees a value at or below 1.
    pub fn normalize(&self, magnitude: f64) -> f64 {
        magnitude.max(MIN_MAGNITUDE).log2().log2().abs()
    }

    /// Iterate `c` up to `max_iterations` times starting from z = c,
    /// and return the escape index.  Escaped orbits land in `[0,
    /// max_iterations / spread)`; the upper bound itself is reserved
    /// for points judged to be inside the set.
    pub fn escape(&self, c: Complex<f64>, max_iterations: usize) -> f64 {
        let interior = self.interior(max_iterations);
        if !maybe_outside(c) {
            return interior;
        }

        let mut z = c;
        for n in 1..=max_iterations {
            z = z * z + c;
            let norm_sqr = z.norm_sqr();
            if norm_sqr > self.bailout {
                return match self.smooth(n, norm_sqr, max_iterations) {
                    Some(index) => index,
                    None => {
                        tracing::trace!(re = c.re, im = c.im, n, "escape index not finite, treating as interior");
                        interior
                    }
                };
            }
            // NaN never compares greater than the bailout.
            if norm_sqr.is_nan() {
                tracing::trace!(re = c.re, im = c.im, n, "orbit became NaN, treating as interior");
                return interior;
            }
        }
        interior
    }

    fn smooth(&self, n: usize, norm_sqr: f64, max_iterations: usize) -> Option<f64> {
        let raw = match self.smoothing {
            Smoothing::Normalize => (n as f64) + self.offset - self.normalize(norm_sqr.sqrt()),
            Smoothing::Linear => n as f64,
        };
        if !raw.is_finite() {
            return None;
        }
        let interior = self.interior(max_iterations);
        let index = raw.max(0.0) / self.spread;
        if index < interior {
            Some(index)
        } else {
            // The largest value below interior: escaped orbits never
            // share the interior color.
            Some(f64::from_bits(interior.to_bits() - 1))
        }
    }
}
