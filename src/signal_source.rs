//! Two-Tone Test Signal Source
//!
//! Generates the quantized two-tone stimulus used to exercise the
//! down-converter: a pair of closely spaced sinusoids, summed and rounded to
//! a signed integer grid the way an ADC capture would arrive. Two tones make
//! intermodulation and imaging visible in one shot, which a single tone
//! would hide.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::signal_source::{quantize, TwoToneSpec};
//!
//! // Tones 5 kHz below and 12 kHz above a 7.125 MHz carrier
//! let spec = TwoToneSpec::new(7.120e6, 7.137e6);
//! let raw = spec.generate(50.0e6, 1024);
//! let samples = quantize(&raw, 14);
//!
//! assert_eq!(samples.len(), 1024);
//! assert!(samples.iter().all(|s| s.fract() == 0.0));
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Two-tone stimulus description: absolute tone frequencies plus a common
/// amplitude applied to each tone before summing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TwoToneSpec {
    /// First tone frequency in Hz
    pub freq1_hz: f64,
    /// Second tone frequency in Hz
    pub freq2_hz: f64,
    /// Per-tone amplitude before quantization
    pub amplitude: f64,
}

impl TwoToneSpec {
    /// Two unit-amplitude tones at the given frequencies.
    pub fn new(freq1_hz: f64, freq2_hz: f64) -> Self {
        Self {
            freq1_hz,
            freq2_hz,
            amplitude: 1.0,
        }
    }

    /// Generate `num_samples` of `amplitude * (sin(2*pi*f1*t) + sin(2*pi*f2*t))`
    /// at the given sample rate, starting at t = 0.
    pub fn generate(&self, sample_rate: f64, num_samples: usize) -> Vec<f64> {
        (0..num_samples)
            .map(|n| {
                let t = n as f64 / sample_rate;
                self.amplitude * ((TAU * self.freq1_hz * t).sin() + (TAU * self.freq2_hz * t).sin())
            })
            .collect()
    }
}

/// Full-scale magnitude of a signed `data_bits`-wide sample: `2^(bits-1) - 1`.
pub fn full_scale(data_bits: u32) -> f64 {
    ((1_i64 << (data_bits - 1)) - 1) as f64
}

/// Quantize unit-amplitude samples onto the signed `data_bits` integer grid.
///
/// Each input is scaled by half of full scale and rounded mid-tread via
/// `floor(x + 0.5)`, so a two-tone sum (peak 2.0) exactly fills the signed
/// range. The result stays in `f64` but every value is integer-valued.
pub fn quantize(samples: &[f64], data_bits: u32) -> Vec<f64> {
    let scale = full_scale(data_bits) / 2.0;
    samples.iter().map(|&x| (scale * x + 0.5).floor()).collect()
}

/// Generate and quantize in one step: the stimulus vector fed to the
/// down-converter in the reference scenario.
pub fn two_tone_quantized(
    spec: &TwoToneSpec,
    sample_rate: f64,
    data_bits: u32,
    num_samples: usize,
) -> Vec<f64> {
    quantize(&spec.generate(sample_rate, num_samples), data_bits)
}
