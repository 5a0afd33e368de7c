//! Mel-scale conversion and filterbank construction.

use std::f64::consts::PI;

/// Generates a Hamming window of length `n`.
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Builds a triangular mel filterbank.
///
/// Returns `[num_mels][half_fft]` weights where `half_fft = fft_size / 2 + 1`.
/// Filter centers are equally spaced on the mel scale between `low_freq`
/// and `high_freq`, with adjacent bins nudged apart so every filter spans
/// at least one FFT bin.
pub fn mel_filter_bank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: usize,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);

    let step = (high_mel - low_mel) / (num_mels + 1) as f64;
    let mut bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let hz = mel_to_hz(low_mel + i as f64 * step);
            (hz * fft_size as f64 / sample_rate as f64).round() as usize
        })
        .collect();

    // Keep bin edges strictly increasing so no filter collapses to zero width.
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = bins[i - 1] + 1;
        }
    }

    let mut bank = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let left = bins[m].min(half_fft - 1);
        let center = bins[m + 1].min(half_fft - 1);
        let right = bins[m + 2].min(half_fft - 1);
        let mut filter = vec![0.0f64; half_fft];

        if center > left {
            for k in left..center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        bank.push(filter);
    }
    bank
}
