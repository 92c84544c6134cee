use crate::types::Signal;

/// Mean of the positive samples of `signal` between consecutive split times.
///
/// Returns `split_seconds.len() + 1` values. With `weight`, each bucket is
/// `sum(f0 * w) / sum(w)` over the frames where `f0 > 0`. Buckets with no
/// qualifying frames, or a zero weight sum, come out as 0.
pub fn segment_mean(signal: &Signal, split_seconds: &[f64], weight: Option<&[f32]>) -> Vec<f64> {
    let len = signal.len();
    let mut bounds = Vec::with_capacity(split_seconds.len() + 2);
    bounds.push(0);
    bounds.extend(
        split_seconds
            .iter()
            .map(|seconds| frame_index(*seconds, signal.rate).min(len)),
    );
    bounds.push(len);

    bounds
        .windows(2)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1].max(pair[0]));
            let frames = &signal.samples[start..end];
            let mean = match weight {
                None => positive_mean(frames),
                Some(weight) => {
                    let weight = &weight[start.min(weight.len())..end.min(weight.len())];
                    weighted_positive_mean(frames, weight)
                }
            };
            if mean.is_finite() {
                mean
            } else {
                0.0
            }
        })
        .collect()
}

fn frame_index(seconds: f64, rate: f64) -> usize {
    (seconds * rate).floor().max(0.0) as usize
}

fn positive_mean(frames: &[f32]) -> f64 {
    let (sum, count) = frames
        .iter()
        .filter(|&&value| value > 0.0)
        .fold((0.0, 0usize), |(sum, count), &value| {
            (sum + value as f64, count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

fn weighted_positive_mean(frames: &[f32], weight: &[f32]) -> f64 {
    let (numerator, denominator) = frames
        .iter()
        .zip(weight.iter())
        .filter(|(&value, _)| value > 0.0)
        .fold((0.0, 0.0), |(num, den), (&value, &w)| {
            (num + value as f64 * w as f64, den + w as f64)
        });
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}
