pub mod aggregate;
pub mod resample;

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::types::Signal;

pub use aggregate::segment_mean;
pub use resample::linear_resample;

/// On-disk form of a signal: `{"rate": 200.0, "array": [...]}`.
#[derive(Debug, Deserialize)]
struct SignalFile {
    rate: f64,
    array: Vec<f32>,
}

pub fn load_signal(path: &Path) -> Result<Signal> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read signal {:?}", path))?;
    parse_signal(&data).with_context(|| format!("invalid signal file {:?}", path))
}

pub fn parse_signal(raw: &str) -> Result<Signal> {
    let file: SignalFile = serde_json::from_str(raw).context("failed to parse signal JSON")?;
    ensure!(
        file.rate.is_finite() && file.rate > 0.0,
        "signal rate must be positive, got {}",
        file.rate
    );
    Ok(Signal::new(file.array, file.rate))
}

/// Brings `volume` onto the pitch frame grid and truncates both to a common length.
pub fn align_weight(f0: &Signal, volume: &Signal) -> Result<(Signal, Signal)> {
    let mut volume = linear_resample(volume, f0.rate)?;
    let mut f0 = f0.clone();
    let min_length = f0.len().min(volume.len());
    f0.truncate(min_length);
    volume.truncate(min_length);
    Ok((f0, volume))
}
