//! Chart Rendering
//!
//! Renders the testbench's time-domain and spectrum traces to SVG line
//! charts. SVG keeps the output self-contained: text is emitted as markup,
//! so rendering works on a headless box with no font or image libraries
//! installed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ddc_sim::plot::plot_spectrum;
//! use ddc_sim::spectrum::{SpectrumAnalyzer, SpectrumConfig};
//! use num_complex::Complex64;
//! use std::path::Path;
//!
//! let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig::default());
//! let spectrum = analyzer.analyze(&vec![Complex64::new(1.0, 0.0); 256]);
//! plot_spectrum(Path::new("spectrum.svg"), "Baseband Spectrum", &spectrum).unwrap();
//! ```

use crate::spectrum::Spectrum;
use crate::types::{DdcError, DspResult};
use num_complex::Complex64;
use plotters::prelude::*;
use std::fmt;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (900, 500);

fn render_err<E: fmt::Display>(err: E) -> DdcError {
    DdcError::Render(err.to_string())
}

/// Expand a data range by 5% on each side so traces stay off the frame.
/// A degenerate range (constant data) widens to +/-1 around the value.
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Render I and Q traces against time.
///
/// `time_s` and `signal` are paired index-wise; both must be non-empty.
pub fn plot_time(path: &Path, title: &str, time_s: &[f64], signal: &[Complex64]) -> DspResult<()> {
    if time_s.is_empty() || signal.is_empty() {
        return Err(DdcError::Render("empty time series".to_string()));
    }

    let (t_lo, t_hi) = min_max(time_s.iter().copied())
        .ok_or_else(|| DdcError::Render("empty time series".to_string()))?;
    let (y_lo, y_hi) = min_max(signal.iter().flat_map(|s| [s.re, s.im]))
        .ok_or_else(|| DdcError::Render("empty time series".to_string()))?;
    let (y_lo, y_hi) = pad_range(y_lo, y_hi);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_lo..t_hi, y_lo..y_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Amplitude")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            time_s.iter().zip(signal.iter()).map(|(&t, s)| (t, s.re)),
            &BLUE,
        ))
        .map_err(render_err)?
        .label("I")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            time_s.iter().zip(signal.iter()).map(|(&t, s)| (t, s.im)),
            &RED,
        ))
        .map_err(render_err)?
        .label("Q")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)
}

/// Render a magnitude spectrum: dB against kHz, DC centered.
pub fn plot_spectrum(path: &Path, title: &str, spectrum: &Spectrum) -> DspResult<()> {
    if spectrum.is_empty() {
        return Err(DdcError::Render("empty spectrum".to_string()));
    }

    let (f_lo, f_hi) = min_max(spectrum.freq_khz.iter().copied())
        .ok_or_else(|| DdcError::Render("empty spectrum".to_string()))?;
    let (db_lo, db_hi) = min_max(spectrum.magnitude_db.iter().copied())
        .ok_or_else(|| DdcError::Render("empty spectrum".to_string()))?;
    let (db_lo, db_hi) = pad_range(db_lo, db_hi);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(f_lo..f_hi, db_lo..db_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (kHz)")
        .y_desc("Magnitude (dB)")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            spectrum
                .freq_khz
                .iter()
                .zip(spectrum.magnitude_db.iter())
                .map(|(&f, &db)| (f, db)),
            &BLUE,
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{SpectrumAnalyzer, SpectrumConfig};
    use std::f64::consts::TAU;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ddc_sim_{}_{}.svg", name, std::process::id()))
    }

    #[test]
    fn test_pad_range() {
        let (lo, hi) = pad_range(0.0, 10.0);
        assert_eq!(lo, -0.5);
        assert_eq!(hi, 10.5);

        let (lo, hi) = pad_range(3.0, 3.0);
        assert_eq!(lo, 2.0);
        assert_eq!(hi, 4.0);
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        let path = temp_path("never_written");
        assert!(matches!(
            plot_time(&path, "t", &[], &[]),
            Err(DdcError::Render(_))
        ));

        let empty = Spectrum {
            freq_khz: Vec::new(),
            magnitude_db: Vec::new(),
        };
        assert!(matches!(
            plot_spectrum(&path, "s", &empty),
            Err(DdcError::Render(_))
        ));
    }

    #[test]
    fn test_time_chart_renders() {
        let time_s: Vec<f64> = (0..200).map(|i| i as f64 / 1000.0).collect();
        let signal: Vec<Complex64> = (0..200)
            .map(|i| {
                let angle = TAU * 5.0 * i as f64 / 1000.0;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();

        let path = temp_path("time");
        plot_time(&path, "Baseband Output", &time_s, &signal).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"), "Output should be an SVG document");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_spectrum_chart_renders() {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 100_000.0,
            ..Default::default()
        });
        let input: Vec<Complex64> = (0..512)
            .map(|i| {
                let angle = TAU * 40.0 * i as f64 / 512.0;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();
        let spectrum = analyzer.analyze(&input);

        let path = temp_path("spectrum");
        plot_spectrum(&path, "Input Spectrum", &spectrum).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        let _ = std::fs::remove_file(&path);
    }
}
