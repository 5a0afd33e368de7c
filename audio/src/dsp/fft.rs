//! In-place radix-2 Cooley-Tukey FFT.

use std::f64::consts::PI;

/// Performs an in-place radix-2 FFT over split real/imaginary buffers.
///
/// `real` and `imag` must have the same power-of-2 length.
pub fn fft(real: &mut [f64], imag: &mut [f64]) {
    let n = real.len();
    debug_assert_eq!(n, imag.len());
    debug_assert!(n.is_power_of_two() || n == 0);
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut rev = 0usize;
    for i in 0..n - 1 {
        if i < rev {
            real.swap(i, rev);
            imag.swap(i, rev);
        }
        let mut bit = n >> 1;
        while bit <= rev {
            rev -= bit;
            bit >>= 1;
        }
        rev += bit;
    }

    // Butterflies, doubling the stage size each pass.
    let mut size = 2;
    while size <= n {
        let half = size >> 1;
        let angle = -2.0 * PI / size as f64;
        let step = (angle.cos(), angle.sin());

        let mut start = 0;
        while start < n {
            let mut w = (1.0f64, 0.0f64);
            for k in 0..half {
                let a = start + k;
                let b = a + half;
                let t_re = w.0 * real[b] - w.1 * imag[b];
                let t_im = w.0 * imag[b] + w.1 * real[b];
                real[b] = real[a] - t_re;
                imag[b] = imag[a] - t_im;
                real[a] += t_re;
                imag[a] += t_im;
                w = (w.0 * step.0 - w.1 * step.1, w.0 * step.1 + w.1 * step.0);
            }
            start += size;
        }
        size <<= 1;
    }
}
