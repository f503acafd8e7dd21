//! Down-Converter Demo (Console Entry Point)
//!
//! Runs the two-tone receive scenario and writes the input spectrum, output
//! time series, and output spectrum charts. Pass a YAML config path to
//! override the reference scenario:
//!
//! ```text
//! ddc-sim [config.yaml]
//! ```
//!
//! Log verbosity follows `RUST_LOG`, defaulting to `info`.

use ddc_sim::testbench::{self, TestbenchConfig};
use ddc_sim::types::DspResult;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> DspResult<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            TestbenchConfig::load_from(Path::new(&path))?
        }
        None => {
            tracing::info!("No config given, using the reference scenario");
            TestbenchConfig::default()
        }
    };

    let report = testbench::run(&config)?;

    tracing::info!(
        "Processed {} samples into {} at {:.2} Hz",
        report.input_len,
        report.output_len,
        report.output_rate_hz
    );
    for peak in &report.peaks {
        tracing::info!(
            "Tone near {:.2} kHz measured at {:.2} kHz, {:.1} dB",
            peak.expected_khz,
            peak.measured_khz,
            peak.level_db
        );
    }
    for chart in &report.charts {
        tracing::info!("Wrote {}", chart.display());
    }

    Ok(())
}
