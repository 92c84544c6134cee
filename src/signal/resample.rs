use anyhow::{ensure, Result};

use crate::types::Signal;

/// Linearly resample `signal` to `target_rate`.
///
/// The output covers the same duration: `floor(len * target_rate / rate)` samples.
pub fn linear_resample(signal: &Signal, target_rate: f64) -> Result<Signal> {
    ensure!(signal.rate > 0.0, "source sample rate must be positive");
    ensure!(target_rate > 0.0, "target sample rate must be positive");
    if signal.is_empty() || signal.rate == target_rate {
        return Ok(Signal::new(signal.samples.clone(), target_rate));
    }
    let ratio = target_rate / signal.rate;
    let output_len = (signal.len() as f64 * ratio).floor() as usize;
    let last_index = signal.len() - 1;
    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let position = i as f64 / ratio;
        let left = (position.floor() as usize).min(last_index);
        let right = (left + 1).min(last_index);
        let t = (position - left as f64) as f32;
        let sample = signal.samples[left] * (1.0 - t) + signal.samples[right] * t;
        output.push(sample);
    }
    Ok(Signal::new(output, target_rate))
}
