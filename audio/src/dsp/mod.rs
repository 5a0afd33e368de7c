//! Signal-processing primitives.
//!
//! Shared by the spectral voiceprint extractor and the emotion heuristics:
//! fixed-hop framing, an in-place radix-2 FFT, Hamming windowing, a
//! triangular mel filterbank, and per-frame energy features.

mod fft;
mod mel;

pub use fft::fft;
pub use mel::{hamming_window, mel_filter_bank};

/// Iterates over fixed-size frames of `samples` advancing by `hop`.
///
/// Yields nothing if the input is shorter than one frame or if `size`
/// or `hop` is zero.
pub fn frames(samples: &[f32], size: usize, hop: usize) -> impl Iterator<Item = &[f32]> {
    let count = frame_count(samples.len(), size, hop);
    (0..count).map(move |t| &samples[t * hop..t * hop + size])
}

/// Number of full frames of `size` samples with the given `hop` in `n` samples.
pub fn frame_count(n: usize, size: usize, hop: usize) -> usize {
    if size == 0 || hop == 0 || n < size {
        return 0;
    }
    (n - size) / hop + 1
}

/// Mean squared amplitude of a frame. 0 for an empty frame.
pub fn mean_square(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / frame.len() as f64) as f32
}

/// Root mean square amplitude of a frame.
pub fn rms(frame: &[f32]) -> f32 {
    mean_square(frame).sqrt()
}

/// Fraction of adjacent sample pairs whose signs differ, in `[0, 1]`.
pub fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let mut crossings = 0usize;
    for pair in frame.windows(2) {
        if (pair[0] >= 0.0) != (pair[1] >= 0.0) {
            crossings += 1;
        }
    }
    crossings as f32 / (frame.len() - 1) as f32
}

/// Smallest power of two greater than or equal to `n`.
pub fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}
