//! Spectrum Analysis
//!
//! Windowed FFT with amplitude-referenced dB scaling, shaped for eyeballing
//! down-converter output: DC in the center, frequency axis in kHz, levels in
//! dBFS so a full-scale tone reads 0 dB regardless of record length or
//! window choice.
//!
//! ## Signal Flow
//!
//! ```text
//! input → [window] → [FFT] → fftshift → 20·log10(|·| / (N · fs_ampl · cg))
//! ```
//!
//! The normalization divides out the record length N, the configured
//! full-scale amplitude, and the window's coherent gain `cg = sum(w)/N`, so
//! windowing attenuates nothing that the scale does not put back.
//!
//! ## Example
//!
//! ```rust
//! use ddc_sim::spectrum::{SpectrumAnalyzer, SpectrumConfig, Window};
//! use num_complex::Complex64;
//!
//! let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
//!     sample_rate: 256_000.0,
//!     window: Window::Rectangular,
//!     ..Default::default()
//! });
//!
//! // Unit tone at bin 32 of 256 = 32 kHz
//! let input: Vec<Complex64> = (0..256)
//!     .map(|i| {
//!         let phase = 2.0 * std::f64::consts::PI * 32.0 * i as f64 / 256.0;
//!         Complex64::new(phase.cos(), phase.sin())
//!     })
//!     .collect();
//!
//! let spectrum = analyzer.analyze(&input);
//! let (freq_khz, level_db) = spectrum.peak().unwrap();
//! assert!((freq_khz - 32.0).abs() < 0.01);
//! assert!(level_db.abs() < 0.1); // full scale reads 0 dB
//! ```

use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;
use std::fmt;

/// Window function applied before the FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Rectangular,
    Hann,
    /// 4-term Blackman-Harris, the default: sidelobes below -92 dB at the
    /// cost of a wide main lobe
    BlackmanHarris,
}

impl Window {
    /// Window coefficients for a record of length `n`.
    pub fn coefficients(&self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1).max(1) as f64;
                match self {
                    Window::Rectangular => 1.0,
                    Window::Hann => 0.5 * (1.0 - (2.0 * PI * x).cos()),
                    Window::BlackmanHarris => {
                        0.35875 - 0.48829 * (2.0 * PI * x).cos()
                            + 0.14128 * (4.0 * PI * x).cos()
                            - 0.01168 * (6.0 * PI * x).cos()
                    }
                }
            })
            .collect()
    }

    /// Coherent gain `sum(w) / n`: the factor a windowed on-bin tone loses,
    /// divided back out by the analyzer's scaling.
    pub fn coherent_gain(&self, n: usize) -> f64 {
        if n == 0 {
            return 1.0;
        }
        self.coefficients(n).iter().sum::<f64>() / n as f64
    }
}

/// Analyzer settings.
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Sample rate of the analyzed signal in Hz
    pub sample_rate: f64,
    /// Window applied before the FFT. Default: Blackman-Harris
    pub window: Window,
    /// Amplitude that maps to 0 dB. Default: 1.0
    pub full_scale: f64,
    /// Level reported for empty bins instead of -inf. Default: -200 dB
    pub floor_db: f64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1.0,
            window: Window::BlackmanHarris,
            full_scale: 1.0,
            floor_db: -200.0,
        }
    }
}

/// One analyzed record: centered frequency axis plus matching dB levels.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Frequency per bin in kHz, ascending, DC at index `len / 2`
    pub freq_khz: Vec<f64>,
    /// Level per bin in dB relative to the configured full scale
    pub magnitude_db: Vec<f64>,
}

impl Spectrum {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.magnitude_db.len()
    }

    /// True for a zero-length record.
    pub fn is_empty(&self) -> bool {
        self.magnitude_db.is_empty()
    }

    /// Strongest bin as `(freq_khz, level_db)`.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.peak_in_band(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Strongest bin within `[lo_khz, hi_khz]`.
    pub fn peak_in_band(&self, lo_khz: f64, hi_khz: f64) -> Option<(f64, f64)> {
        self.freq_khz
            .iter()
            .zip(self.magnitude_db.iter())
            .filter(|(&f, _)| f >= lo_khz && f <= hi_khz)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(&f, &db)| (f, db))
    }

    /// Level of the bin nearest to `freq_khz`.
    pub fn level_at(&self, freq_khz: f64) -> Option<f64> {
        self.freq_khz
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - freq_khz).abs().total_cmp(&(*b - freq_khz).abs())
            })
            .map(|(i, _)| self.magnitude_db[i])
    }
}

/// Windowed FFT analyzer with dBFS scaling.
///
/// Record length is taken from each input block, so one analyzer serves
/// arbitrary capture sizes; the FFT planner caches plans per length.
pub struct SpectrumAnalyzer {
    config: SpectrumConfig,
    planner: FftPlanner<f64>,
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("config", &self.config)
            .finish()
    }
}

impl SpectrumAnalyzer {
    pub fn new(config: SpectrumConfig) -> Self {
        Self {
            config,
            planner: FftPlanner::new(),
        }
    }

    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Analyze a complex record. An empty input yields an empty spectrum.
    pub fn analyze(&mut self, input: &[Complex64]) -> Spectrum {
        let n = input.len();
        if n == 0 {
            return Spectrum {
                freq_khz: Vec::new(),
                magnitude_db: Vec::new(),
            };
        }

        let window = self.config.window.coefficients(n);
        let coherent_gain = window.iter().sum::<f64>() / n as f64;

        let mut buffer: Vec<Complex64> = input
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| s * w)
            .collect();
        self.planner.plan_fft_forward(n).process(&mut buffer);

        let shifted = fft_shift(&buffer);
        let reference = n as f64 * self.config.full_scale * coherent_gain;

        let magnitude_db = shifted
            .iter()
            .map(|c| {
                let normalized = c.norm() / reference;
                if normalized > 1e-15 {
                    20.0 * normalized.log10()
                } else {
                    self.config.floor_db
                }
            })
            .collect();

        Spectrum {
            freq_khz: self.freq_axis_khz(n),
            magnitude_db,
        }
    }

    /// Analyze a real record by lifting it to complex. The resulting
    /// spectrum is conjugate-symmetric, each sine showing as a +/- pair at
    /// half its time-domain amplitude.
    pub fn analyze_real(&mut self, input: &[f64]) -> Spectrum {
        let complex: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.analyze(&complex)
    }

    /// Centered frequency axis in kHz for a record of length `n`: bin `j`
    /// sits at `(j - n/2) * sample_rate / n`.
    fn freq_axis_khz(&self, n: usize) -> Vec<f64> {
        let half = (n / 2) as i64;
        (0..n as i64)
            .map(|j| (j - half) as f64 * self.config.sample_rate / n as f64 / 1e3)
            .collect()
    }
}

/// Move DC to the center of the record. For odd lengths the split matches
/// the centered frequency axis: `(n + 1) / 2` high bins rotate to the front.
fn fft_shift(spectrum: &[Complex64]) -> Vec<Complex64> {
    let n = spectrum.len();
    let mid = (n + 1) / 2;
    let mut shifted = Vec::with_capacity(n);
    shifted.extend_from_slice(&spectrum[mid..]);
    shifted.extend_from_slice(&spectrum[..mid]);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn complex_tone(bin: f64, amplitude: f64, n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| {
                let angle = TAU * bin * i as f64 / n as f64;
                Complex64::new(amplitude * angle.cos(), amplitude * angle.sin())
            })
            .collect()
    }

    #[test]
    fn test_full_scale_tone_reads_zero_db() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 256_000.0,
            window: Window::BlackmanHarris,
            full_scale: 3.0,
            ..Default::default()
        });

        let spectrum = analyzer.analyze(&complex_tone(32.0, 3.0, 256));
        let (freq_khz, level_db) = spectrum.peak().unwrap();

        assert!(
            (freq_khz - 32.0).abs() < 1e-9,
            "Tone at bin 32 of 256 at 256 kHz is 32 kHz, got {freq_khz}"
        );
        assert!(
            level_db.abs() < 0.1,
            "Full-scale tone should read 0 dB, got {level_db}"
        );
    }

    #[test]
    fn test_half_scale_tone_reads_minus_six_db() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 1000.0,
            full_scale: 2.0,
            ..Default::default()
        });

        let spectrum = analyzer.analyze(&complex_tone(10.0, 1.0, 200));
        let (_, level_db) = spectrum.peak().unwrap();
        assert!(
            (level_db + 6.02).abs() < 0.1,
            "Half scale is -6.02 dB, got {level_db}"
        );
    }

    #[test]
    fn test_dc_lands_center_bin() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 1000.0,
            ..Default::default()
        });

        let spectrum = analyzer.analyze(&vec![Complex64::new(1.0, 0.0); 64]);
        let center = 64 / 2;
        assert_eq!(spectrum.freq_khz[center], 0.0);

        let peak_idx = spectrum
            .magnitude_db
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_idx, center, "DC belongs in the middle after the shift");
    }

    #[test]
    fn test_odd_length_axis_and_center() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 5000.0,
            window: Window::Rectangular,
            ..Default::default()
        });

        let spectrum = analyzer.analyze(&vec![Complex64::new(1.0, 0.0); 5]);
        assert_eq!(spectrum.freq_khz, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);

        let (freq_khz, level_db) = spectrum.peak().unwrap();
        assert_eq!(freq_khz, 0.0);
        assert!(level_db.abs() < 1e-9);
    }

    #[test]
    fn test_real_input_symmetric_pair() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 1_000_000.0,
            full_scale: 1.0,
            ..Default::default()
        });

        // 125 kHz real sine at full scale: lines at +/-125 kHz, -6 dB each
        let input: Vec<f64> = (0..1000)
            .map(|i| (TAU * 125.0 * i as f64 / 1000.0).sin())
            .collect();
        let spectrum = analyzer.analyze_real(&input);

        let (f_pos, db_pos) = spectrum.peak_in_band(1.0, 500.0).unwrap();
        let (f_neg, db_neg) = spectrum.peak_in_band(-500.0, -1.0).unwrap();

        assert!((f_pos - 125.0).abs() < 1.0, "Positive line at {f_pos} kHz");
        assert!((f_neg + 125.0).abs() < 1.0, "Negative line at {f_neg} kHz");
        assert!((db_pos + 6.02).abs() < 0.2);
        assert!((db_neg - db_pos).abs() < 0.01, "Conjugate pair, equal level");
    }

    #[test]
    fn test_zero_input_sits_on_floor() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 1000.0,
            floor_db: -200.0,
            ..Default::default()
        });

        let spectrum = analyzer.analyze(&vec![Complex64::new(0.0, 0.0); 128]);
        assert!(spectrum.magnitude_db.iter().all(|&db| db == -200.0));
    }

    #[test]
    fn test_empty_input() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig::default());
        let spectrum = analyzer.analyze(&[]);
        assert!(spectrum.is_empty());
        assert!(spectrum.peak().is_none());
    }

    #[test]
    fn test_peak_in_band_finds_secondary_tone() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 1_000_000.0,
            ..Default::default()
        });

        let n = 1024;
        let mut input = complex_tone(100.0, 1.0, n);
        for (s, w) in input.iter_mut().zip(complex_tone(-200.0, 0.25, n)) {
            *s += w;
        }
        let spectrum = analyzer.analyze(&input);

        // Global peak is the big tone near +97.6 kHz
        let (f_main, _) = spectrum.peak().unwrap();
        assert!(f_main > 0.0);

        // Band-limited search isolates the weak one
        let (f_weak, db_weak) = spectrum.peak_in_band(-300.0, -100.0).unwrap();
        assert!(
            (f_weak + 195.3).abs() < 2.0,
            "Weak tone near -195.3 kHz, got {f_weak}"
        );
        assert!((db_weak + 12.04).abs() < 0.2, "Quarter scale is -12 dB");
    }

    #[test]
    fn test_blackman_harris_coherent_gain() {
        let cg = Window::BlackmanHarris.coherent_gain(1024);
        assert!(
            (cg - 0.35875).abs() < 1e-3,
            "4-term BH coherent gain approaches a0, got {cg}"
        );
        let cg_rect = Window::Rectangular.coherent_gain(64);
        assert!((cg_rect - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coherent_gain_normalizes_window_loss() {
        // Same tone, rectangular vs Blackman-Harris: identical reported level
        let tone = complex_tone(16.0, 1.0, 512);

        let mut rect = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 512.0,
            window: Window::Rectangular,
            ..Default::default()
        });
        let mut bh = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 512.0,
            window: Window::BlackmanHarris,
            ..Default::default()
        });

        let (_, db_rect) = rect.analyze(&tone).peak().unwrap();
        let (_, db_bh) = bh.analyze(&tone).peak().unwrap();
        assert!(
            (db_rect - db_bh).abs() < 0.05,
            "Scaling should cancel the window: rect {db_rect} vs bh {db_bh}"
        );
    }
}
