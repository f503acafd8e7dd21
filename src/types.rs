//! Core types for the down-converter model
//!
//! Defines the sample-type aliases shared by every stage of the chain and the
//! crate-wide error type.
//!
//! ## Sample representation
//!
//! The model runs on `f64` throughout. Input samples are integer-valued
//! floats: the signal source quantizes to a signed fixed bit width (14 bits
//! for the reference ADC) but keeps the values in floating point, so the
//! filter arithmetic stays exact while the full-scale range of the hardware
//! is preserved for dBFS scaling. The bit width travels as metadata on the
//! [`Ddc`](crate::ddc::Ddc) and in the testbench configuration, never
//! inferred from the data itself.
//!
//! Baseband samples are complex:
//!
//! ```text
//!            Q (imaginary)
//!            ^
//!            |     * (I, Q)
//!            |    /
//!            |   /
//!            |  /
//!            | /
//!   ---------+---------> I (real)
//!            |
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// A floating point sample (for real-valued signals)
pub type Sample = f64;

/// A buffer of I/Q samples
pub type IQBuffer = Vec<IQSample>;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DdcError>;

/// Errors that can occur while building or running the down-converter chain
///
/// Construction parameters are validated eagerly so a bad rate or stage count
/// fails before any sample is processed. The numeric transforms themselves
/// have no error paths: an out-of-range tuning ratio aliases rather than
/// failing, and an empty input produces an empty output.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DdcError {
    #[error("Decimation rate must be at least 1")]
    InvalidDecimationRate,

    #[error("Stage count must be at least 1")]
    InvalidStageCount,

    #[error("Invalid data bit width: {0}. Must be between 1 and 32")]
    InvalidDataBits(u32),

    #[error("FIR tap set must not be empty")]
    EmptyTaps,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DdcError::InvalidDecimationRate;
        assert!(err.to_string().contains("at least 1"));

        let err = DdcError::InvalidDataBits(99);
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_complex_alias() {
        let s: IQSample = Complex::new(1.0, -1.0);
        assert_eq!(s.re, 1.0);
        assert_eq!(s.im, -1.0);
    }
}
