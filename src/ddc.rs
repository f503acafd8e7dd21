//! Digital Down-Converter
//!
//! Ties the oscillator, mixer, and decimation filter into the front-end
//! chain: real ADC samples in, complex baseband out at a fraction of the
//! input rate.
//!
//! ```text
//!                  +-------------+      +-------------+
//!              +-->| CIC dec. R  |----->| I           |
//!   ADC   mix  |   +-------------+      |             |
//!   ------(x)--+                        |  I/Q out    |
//!          |   |   +-------------+      |             |
//!          |   +-->| CIC dec. R  |----->| Q           |
//!   +------+--+    +-------------+      +-------------+
//!   | NCO e^-j |
//!   +---------+
//! ```
//!
//! The in-phase and quadrature legs run through two independent real-valued
//! [`CicDecimator`]s, matching a hardware implementation where each leg is
//! its own register chain. The CIC gain of `R^N` is left in the output; see
//! [`Ddc::gain`] for the factor to divide out when absolute levels matter.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::ddc::Ddc;
//!
//! // 14-bit input samples, decimate by 4
//! let mut ddc = Ddc::new(14, 4).unwrap();
//! ddc.set_ftune(0.125);
//!
//! let input: Vec<f64> = (0..64)
//!     .map(|n| (std::f64::consts::TAU * 0.125 * n as f64).sin())
//!     .collect();
//! let baseband = ddc.calc(&input);
//! assert_eq!(baseband.len(), 16); // 64 / 4
//! ```

use crate::cic::CicDecimator;
use crate::nco::Nco;
use crate::types::{DdcError, DspResult, IQBuffer};
use num_complex::Complex64;

/// Default CIC order when none is given, matching the reference front-end.
pub const DEFAULT_CIC_STAGES: usize = 4;

/// NCO/mixer plus I/Q CIC decimators with persistent state.
///
/// The oscillator phase, both integrator chains, both comb delay lines, and
/// the decimation counter all carry across [`calc`](Ddc::calc) calls, so a
/// capture may be streamed through in blocks of any size.
/// [`reset`](Ddc::reset) returns everything to the freshly constructed state
/// while keeping the tuning ratio.
#[derive(Debug, Clone)]
pub struct Ddc {
    /// Input sample bit width; metadata for full-scale bookkeeping, not
    /// enforced on the sample values
    data_bits: u32,
    /// Local oscillator / phase accumulator
    nco: Nco,
    /// In-phase decimation leg
    cic_i: CicDecimator,
    /// Quadrature decimation leg
    cic_q: CicDecimator,
}

impl Ddc {
    /// Create a down-converter for `data_bits`-wide input samples with CIC
    /// decimation rate `dec_rate` and the default stage count.
    ///
    /// The tuning ratio starts at zero; call [`set_ftune`](Ddc::set_ftune)
    /// before processing. Fails if `data_bits` is outside 1..=32 or
    /// `dec_rate` is zero.
    pub fn new(data_bits: u32, dec_rate: usize) -> DspResult<Self> {
        Self::with_stages(data_bits, dec_rate, DEFAULT_CIC_STAGES)
    }

    /// Create a down-converter with an explicit CIC stage count.
    pub fn with_stages(data_bits: u32, dec_rate: usize, stages: usize) -> DspResult<Self> {
        if !(1..=32).contains(&data_bits) {
            return Err(DdcError::InvalidDataBits(data_bits));
        }
        Ok(Self {
            data_bits,
            nco: Nco::new(),
            cic_i: CicDecimator::new(stages, dec_rate)?,
            cic_q: CicDecimator::new(stages, dec_rate)?,
        })
    }

    /// Set the tuning ratio: LO frequency as a fraction of the input sample
    /// rate, normally in `[0, 1)`. Values outside that range alias.
    pub fn set_ftune(&mut self, ratio: f64) {
        self.nco.set_tuning(ratio);
    }

    /// Current tuning ratio.
    pub fn ftune(&self) -> f64 {
        self.nco.tuning()
    }

    /// Run a block of real input samples through the mixer and both
    /// decimation legs, returning complex baseband.
    ///
    /// From a fresh or [`reset`](Ddc::reset) converter, an input of length L
    /// yields `L / dec_rate` samples (integer division). Leftover samples of
    /// an incomplete decimation group stay in the filter state and complete
    /// on the next call, so consecutive calls behave exactly like one call
    /// on the concatenated input.
    pub fn calc(&mut self, input: &[f64]) -> IQBuffer {
        let mut i_path = Vec::with_capacity(input.len());
        let mut q_path = Vec::with_capacity(input.len());

        for &x in input {
            let mixed = self.nco.mix(x);
            i_path.push(mixed.re);
            q_path.push(mixed.im);
        }

        let i_dec = self.cic_i.process(&i_path);
        let q_dec = self.cic_q.process(&q_path);

        i_dec
            .iter()
            .zip(q_dec.iter())
            .map(|(&i, &q)| Complex64::new(i, q))
            .collect()
    }

    /// Clear the oscillator phase and all filter state. The tuning ratio is
    /// kept, so `reset` followed by `calc` replays a capture identically.
    pub fn reset(&mut self) {
        self.nco.reset();
        self.cic_i.reset();
        self.cic_q.reset();
    }

    /// Input sample bit width this converter was built for.
    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// CIC decimation rate R.
    pub fn dec_rate(&self) -> usize {
        self.cic_i.dec_rate()
    }

    /// CIC stage count N.
    pub fn stages(&self) -> usize {
        self.cic_i.stages()
    }

    /// Linear gain the decimation legs apply to the passband: `R^N`. Divide
    /// the output by this to recover input-referred amplitudes.
    pub fn gain(&self) -> f64 {
        self.cic_i.gain()
    }

    /// Output sample rate for a given input rate: `input_rate / dec_rate`.
    /// Any further rate reduction (a post-filter, say) is downstream of this
    /// block and accounted for by its owner.
    pub fn output_rate(&self, input_rate: f64) -> f64 {
        input_rate / self.dec_rate() as f64
    }
}
