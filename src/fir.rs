//! Decimating FIR Filter
//!
//! Lowpass filtering fused with integer decimation: output samples are only
//! computed at the reduced rate, so the filter costs `taps / M` multiplies
//! per input sample. In the down-converter chain this is the clean-up stage
//! after the CIC, flattening the sinc droop region out of band and taking
//! the final rate step the hardware performs in its fixed divide-by-8
//! back end.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::fir::FirDecimator;
//! use num_complex::Complex64;
//!
//! let mut fir = FirDecimator::lowpass(8, 0).unwrap(); // auto tap count
//! let input: Vec<Complex64> = (0..160)
//!     .map(|i| Complex64::new((i as f64 * 0.05).sin(), 0.0))
//!     .collect();
//! let output = fir.process(&input);
//! assert_eq!(output.len(), 20); // 160 / 8
//! ```

use crate::types::{DdcError, DspResult};
use num_complex::Complex64;
use std::f64::consts::PI;

/// FIR lowpass combined with keep-1-in-M decimation over complex samples.
///
/// The delay line and decimation phase persist across
/// [`process`](FirDecimator::process) calls for streaming use.
#[derive(Debug, Clone)]
pub struct FirDecimator {
    /// Filter coefficients, unity DC gain for the designed lowpass
    taps: Vec<f64>,
    /// Keep one output sample per `decim` inputs
    decim: usize,
    /// Delay line, most recent sample first
    history: Vec<Complex64>,
    /// Inputs consumed since the last emitted output
    phase: usize,
}

impl FirDecimator {
    /// Create a decimating FIR from explicit coefficients.
    ///
    /// Fails on an empty tap set or a zero decimation factor.
    pub fn new(taps: &[f64], decimation: usize) -> DspResult<Self> {
        if taps.is_empty() {
            return Err(DdcError::EmptyTaps);
        }
        if decimation < 1 {
            return Err(DdcError::InvalidDecimationRate);
        }
        Ok(Self {
            taps: taps.to_vec(),
            decim: decimation,
            history: vec![Complex64::new(0.0, 0.0); taps.len()],
            phase: 0,
        })
    }

    /// Create a decimator with an auto-designed windowed-sinc lowpass.
    ///
    /// Cutoff sits at the decimated Nyquist rate and the taps are normalized
    /// to unity DC gain. `num_taps = 0` picks `8 * decimation + 1`, enough
    /// for useful alias rejection at moderate rates.
    pub fn lowpass(decimation: usize, num_taps: usize) -> DspResult<Self> {
        if decimation < 1 {
            return Err(DdcError::InvalidDecimationRate);
        }
        let n = if num_taps > 0 {
            num_taps
        } else {
            decimation * 8 + 1
        };
        let taps = design_lowpass(n, 1.0 / decimation as f64);
        Self::new(&taps, decimation)
    }

    /// Filter and decimate a block, returning every M-th filtered sample.
    ///
    /// From a fresh or reset filter the output length is `len / M` (integer
    /// division); leftovers stay in the delay line for the next call.
    pub fn process(&mut self, input: &[Complex64]) -> Vec<Complex64> {
        let mut output = Vec::with_capacity(input.len() / self.decim + 1);

        for &sample in input {
            self.history.rotate_right(1);
            self.history[0] = sample;

            self.phase += 1;
            if self.phase == self.decim {
                self.phase = 0;
                let sum: Complex64 = self
                    .taps
                    .iter()
                    .zip(self.history.iter())
                    .map(|(&t, &h)| h * t)
                    .sum();
                output.push(sum);
            }
        }

        output
    }

    /// Decimation factor M.
    pub fn decimation(&self) -> usize {
        self.decim
    }

    /// Filter coefficients.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of taps.
    pub fn order(&self) -> usize {
        self.taps.len()
    }

    /// Clear the delay line and decimation phase.
    pub fn reset(&mut self) {
        self.history.fill(Complex64::new(0.0, 0.0));
        self.phase = 0;
    }
}

/// Windowed-sinc lowpass design, Hamming window, taps normalized to unity
/// DC gain. `cutoff` is in units of the Nyquist rate.
fn design_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    let m = (num_taps - 1) as f64 / 2.0;
    let mut taps = Vec::with_capacity(num_taps);

    for i in 0..num_taps {
        let x = i as f64 - m;
        let sinc = if x.abs() < 1e-10 {
            cutoff
        } else {
            (PI * cutoff * x).sin() / (PI * x)
        };
        let window = if num_taps > 1 {
            0.54 - 0.46 * (2.0 * PI * i as f64 / (num_taps - 1) as f64).cos()
        } else {
            1.0
        };
        taps.push(sinc * window);
    }

    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-10 {
        for t in &mut taps {
            *t /= sum;
        }
    }

    taps
}
