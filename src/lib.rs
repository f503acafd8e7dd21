//! # Digital Down-Converter Simulation
//!
//! This crate models a hardware Digital Down-Converter (DDC) receive chain
//! in software, from quantized ADC samples to filtered complex baseband,
//! together with the testbench that exercises it.
//!
//! ## Overview
//!
//! The chain mirrors the usual FPGA receive signal path:
//!
//! - **Signal Source**: Two-tone stimulus quantized onto the ADC bit grid
//! - **NCO/Mixer**: Numerically controlled oscillator and complex mixer that
//!   translate the tuned carrier to DC
//! - **CIC Decimator**: Multiplier-free cascaded integrator-comb filter that
//!   does the heavy rate reduction
//! - **FIR Decimator**: Lowpass clean-up stage with a fixed divide-by-8
//! - **Spectrum**: Windowed FFT analysis in dB relative to full scale
//! - **Charts**: Time-series and spectrum rendering to SVG
//!
//! ## Signal Flow
//!
//! ```text
//! ADC samples → NCO mix → CIC ÷R (I leg, Q leg) → FIR ÷8 → baseband I/Q
//!                                                           → spectrum → charts
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::{Ddc, FirDecimator};
//!
//! // 14-bit input, CIC decimation by 68, divide-by-8 back end
//! let mut ddc = Ddc::new(14, 68).unwrap();
//! ddc.set_ftune(7.125e6 / 50.0e6);
//! let mut fir = FirDecimator::lowpass(8, 0).unwrap();
//!
//! let input: Vec<f64> = (0..4096)
//!     .map(|n| (2.0 * std::f64::consts::PI * 0.1425 * n as f64).sin())
//!     .collect();
//! let baseband = ddc.calc(&input);
//! let output = fir.process(&baseband);
//! assert_eq!(output.len(), input.len() / 68 / 8);
//! ```

pub mod cic;
pub mod ddc;
pub mod fir;
pub mod nco;
pub mod plot;
pub mod signal_source;
pub mod spectrum;
pub mod testbench;
pub mod types;

// Re-export main types
pub use cic::CicDecimator;
pub use ddc::{Ddc, DEFAULT_CIC_STAGES};
pub use fir::FirDecimator;
pub use nco::Nco;
pub use signal_source::TwoToneSpec;
pub use spectrum::{Spectrum, SpectrumAnalyzer, SpectrumConfig, Window};
pub use testbench::{TestbenchConfig, TestbenchReport, TonePeak};
pub use types::{Complex, DdcError, DspResult, IQBuffer, IQSample, Sample};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cic::CicDecimator;
    pub use crate::ddc::Ddc;
    pub use crate::fir::FirDecimator;
    pub use crate::nco::Nco;
    pub use crate::signal_source::TwoToneSpec;
    pub use crate::types::{Complex, DspResult, IQSample};
}
