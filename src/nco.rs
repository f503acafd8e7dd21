//! Numerically Controlled Oscillator + Complex Mixer
//!
//! First stage of the down-converter: generates a complex local oscillator at
//! a programmable fraction of the sample rate and multiplies it against the
//! real input stream, shifting the tuned frequency down to baseband.
//!
//! The LO for input sample `n` is `exp(-j*2*pi*ftune*n)`, so a real tone at
//! the tuned frequency lands at DC and a tone `delta` Hz above it lands at
//! `+delta` in the complex output.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::nco::Nco;
//!
//! let mut nco = Nco::new();
//! nco.set_tuning(0.25); // LO at one quarter of the sample rate
//!
//! let baseband = nco.mix_block(&[1.0, 1.0, 1.0, 1.0]);
//! assert_eq!(baseband.len(), 4);
//!
//! // The LO has unit magnitude, so mixing never changes sample magnitude
//! for s in &baseband {
//!     assert!((s.norm() - 1.0).abs() < 1e-12);
//! }
//! ```

use num_complex::Complex64;
use std::f64::consts::TAU;

/// Numerically controlled oscillator with a built-in down-mixer.
///
/// The phase accumulator is kept in normalized-cycle units: it advances by the
/// tuning ratio once per sample and wraps to the canonical range [0, 1). The
/// one-cycle wrap is an exact floating-point subtraction, so the accumulator
/// matches a closed-form `ftune * n` phase to rounding tolerance even over
/// very long runs, while still supporting block-by-block streaming with phase
/// continuity at block boundaries.
#[derive(Debug, Clone)]
pub struct Nco {
    /// Normalized tuning ratio: center frequency / sample rate, in cycles per sample
    ftune: f64,
    /// Phase accumulator in cycles, wrapped to [0, 1)
    phase: f64,
}

impl Nco {
    /// Create an NCO with zero tuning ratio and zero phase.
    pub fn new() -> Self {
        Self {
            ftune: 0.0,
            phase: 0.0,
        }
    }

    /// Set the normalized tuning ratio (center_frequency / sample_rate).
    ///
    /// Meaningful placement requires a ratio in [0, 1). Values outside that
    /// range are not rejected: the per-sample phase wrap folds them per
    /// Nyquist aliasing, so e.g. 1.25 tunes the same frequency as 0.25.
    pub fn set_tuning(&mut self, ratio: f64) {
        self.ftune = ratio;
    }

    /// Current tuning ratio.
    pub fn tuning(&self) -> f64 {
        self.ftune
    }

    /// Current accumulator phase in cycles, always in [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Produce the next local-oscillator sample `exp(-j*2*pi*phase)` and
    /// advance the accumulator by the tuning ratio.
    pub fn lo_step(&mut self) -> Complex64 {
        let angle = TAU * self.phase;
        let lo = Complex64::new(angle.cos(), -angle.sin());

        self.phase += self.ftune;
        // Wrap to one cycle; the subtraction is exact, preventing
        // floating-point drift over long runs
        self.phase -= self.phase.floor();

        lo
    }

    /// Mix a single real sample down to complex baseband.
    ///
    /// Advances the oscillator one step per call, so the k-th call since
    /// construction (or [`reset`](Nco::reset)) multiplies by
    /// `exp(-j*2*pi*ftune*k)`.
    pub fn mix(&mut self, sample: f64) -> Complex64 {
        self.lo_step() * sample
    }

    /// Mix a block of real samples down to complex baseband.
    ///
    /// Phase is continuous across successive calls: processing a stream in
    /// blocks gives the same output as processing it in one call.
    pub fn mix_block(&mut self, input: &[f64]) -> Vec<Complex64> {
        input.iter().map(|&x| self.mix(x)).collect()
    }

    /// Reset the phase accumulator to zero. The tuning ratio is retained.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for Nco {
    fn default() -> Self {
        Self::new()
    }
}
