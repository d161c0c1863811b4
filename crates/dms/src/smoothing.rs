//! Recency-weighted smoothing of openness samples

use ring_buffer::RingBuffer;

/// Default weights for the three most recent samples, newest first
pub const DEFAULT_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Record `sample` and return the smoothed openness
///
/// Until the history holds as many samples as there are weights the raw
/// sample is returned unchanged.
pub fn smooth(history: &mut RingBuffer<f64>, sample: f64, weights: &[f64; 3]) -> f64 {
    history.push(sample);

    if history.len() < weights.len() {
        return sample;
    }

    history
        .iter_recent(weights.len())
        .zip(weights)
        .map(|(value, weight)| value * weight)
        .sum()
}
