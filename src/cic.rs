//! CIC Decimation Filter
//!
//! Cascaded Integrator-Comb decimator: the rate-change stage of the
//! down-converter. N integrator stages run at the input rate, the rate
//! changes by keeping every R-th sample, and N comb stages run at the reduced
//! rate. The whole filter is additions and subtractions only, which is what
//! makes the structure attractive for hardware front-ends.
//!
//! The transfer function is:
//!
//! ```text
//! H(z) = ((1 - z^-R) / (1 - z^-1))^N
//! ```
//!
//! where R is the decimation rate and N the stage count. The passband gain is
//! R^N and is deliberately NOT normalized away here: the hardware being
//! modeled grows register widths instead of rescaling, and the downstream
//! spectrum scaling divides the gain out. [`gain`](CicDecimator::gain)
//! exposes the factor and [`bit_growth`](CicDecimator::bit_growth) the
//! register headroom it implies.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::cic::CicDecimator;
//!
//! let mut cic = CicDecimator::new(3, 4).unwrap();
//! let out = cic.process(&vec![1.0; 64]);
//! assert_eq!(out.len(), 16); // 64 / 4
//!
//! // Settled DC output is the unnormalized gain R^N = 64
//! let last = *out.last().unwrap();
//! assert!((last - 64.0).abs() < 1e-9);
//! ```

use crate::types::{DdcError, DspResult};
use std::f64::consts::PI;

/// N-stage CIC decimation filter over real-valued samples.
///
/// Integrator accumulators and comb delay registers persist across
/// [`process`](CicDecimator::process) calls, so a long stream may be fed in
/// arbitrary block sizes. Input samples that do not complete a decimation
/// group advance the internal state but emit nothing; the group completes on
/// the first samples of the next call. [`reset`](CicDecimator::reset) returns
/// the filter to its freshly constructed all-zero state.
#[derive(Debug, Clone)]
pub struct CicDecimator {
    /// Number of integrator/comb stage pairs
    stages: usize,
    /// Decimation rate R
    dec_rate: usize,
    /// Integrator accumulators, one per stage, input rate
    integrators: Vec<f64>,
    /// Comb delay registers, one retained sample deep per stage, output rate
    comb_delays: Vec<f64>,
    /// Input samples consumed since the last retained output
    sample_count: usize,
}

impl CicDecimator {
    /// Create a CIC decimator with `stages` integrator/comb pairs and
    /// decimation rate `dec_rate`.
    ///
    /// Both parameters must be at least 1; anything else fails here rather
    /// than mid-stream. Odd stage counts (3, 5, ...) give the classic
    /// alias-rejection placement but even counts are accepted.
    pub fn new(stages: usize, dec_rate: usize) -> DspResult<Self> {
        if stages < 1 {
            return Err(DdcError::InvalidStageCount);
        }
        if dec_rate < 1 {
            return Err(DdcError::InvalidDecimationRate);
        }
        Ok(Self {
            stages,
            dec_rate,
            integrators: vec![0.0; stages],
            comb_delays: vec![0.0; stages],
            sample_count: 0,
        })
    }

    /// Process a block of input samples, returning the decimated output.
    ///
    /// From a fresh (or [`reset`](CicDecimator::reset)) filter, an input of
    /// length L yields exactly `L / R` samples (integer division); trailing
    /// samples of an incomplete group are absorbed into the state and emit
    /// nothing until the group completes on a later call.
    pub fn process(&mut self, input: &[f64]) -> Vec<f64> {
        let mut output = Vec::with_capacity(input.len() / self.dec_rate + 1);

        for &x in input {
            // Integrator cascade, one accumulation per stage at the input rate
            let mut val = x;
            for acc in self.integrators.iter_mut() {
                *acc += val;
                val = *acc;
            }

            self.sample_count += 1;
            if self.sample_count == self.dec_rate {
                self.sample_count = 0;

                // Comb cascade at the retained-sample rate: subtract the
                // previous retained value, stage by stage
                let mut comb_val = val;
                for delay in self.comb_delays.iter_mut() {
                    let delayed = *delay;
                    *delay = comb_val;
                    comb_val -= delayed;
                }

                output.push(comb_val);
            }
        }

        output
    }

    /// Number of integrator/comb stage pairs.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Decimation rate R. The output sample rate is the input rate divided
    /// by this factor.
    pub fn dec_rate(&self) -> usize {
        self.dec_rate
    }

    /// Passband (DC) gain of the cascade: R^N.
    pub fn gain(&self) -> f64 {
        (self.dec_rate as f64).powi(self.stages as i32)
    }

    /// Register growth over the input width needed to hold the gain without
    /// overflow: `N * ceil(log2(R))` bits.
    pub fn bit_growth(&self) -> u32 {
        let log2_r = (self.dec_rate as f64).log2().ceil() as u32;
        self.stages as u32 * log2_r
    }

    /// Magnitude response sampled at `num_points` frequencies from 0 to pi
    /// (radians per input sample): `|sin(f*R/2) / sin(f/2)|^N`, the sinc^N
    /// shape with nulls at multiples of the output rate.
    pub fn frequency_response(&self, num_points: usize) -> Vec<f64> {
        (0..num_points)
            .map(|k| {
                let f = k as f64 * PI / num_points as f64;
                if f.abs() < 1e-12 {
                    self.gain()
                } else {
                    let num = (f * self.dec_rate as f64 / 2.0).sin();
                    let den = (f / 2.0).sin();
                    (num / den).abs().powi(self.stages as i32)
                }
            })
            .collect()
    }

    /// Zero all integrator accumulators, comb delays, and the decimation
    /// counter, restoring the freshly constructed state.
    pub fn reset(&mut self) {
        self.integrators.fill(0.0);
        self.comb_delays.fill(0.0);
        self.sample_count = 0;
    }
}
