use earshot_audio::{AudioClip, dsp};

use crate::error::VoiceprintError;
use crate::extract::VoiceprintExtractor;
use crate::voiceprint::Voiceprint;

/// Configures [`SpectralExtractor`].
#[derive(Debug, Clone)]
pub struct SpectralConfig {
    /// Number of mel filterbank bands. The output dimension is twice this.
    pub mel_bands: usize,
    /// Frame length in milliseconds (default: 25).
    pub frame_ms: usize,
    /// Hop between frames in milliseconds (default: 10).
    pub hop_ms: usize,
    /// Pre-emphasis coefficient (default: 0.97).
    pub pre_emphasis: f64,
    /// Low cutoff frequency for mel bands in Hz (default: 20).
    pub low_freq: f64,
    /// High cutoff frequency; zero or negative means offset from Nyquist
    /// (default: -400).
    pub high_freq: f64,
    /// Floor for band energies before the log (default: 1e-10).
    pub energy_floor: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            mel_bands: 128,
            frame_ms: 25,
            hop_ms: 10,
            pre_emphasis: 0.97,
            low_freq: 20.0,
            high_freq: -400.0,
            energy_floor: 1e-10,
        }
    }
}

/// Deterministic spectral-statistics voiceprint extractor.
///
/// Summarizes a clip as per-band mean and standard deviation of log mel
/// filterbank energies, L2-normalized. The same clip always produces the
/// same voiceprint.
pub struct SpectralExtractor {
    cfg: SpectralConfig,
}

impl SpectralExtractor {
    pub fn new(cfg: SpectralConfig) -> Self {
        Self { cfg }
    }
}

impl Default for SpectralExtractor {
    fn default() -> Self {
        Self::new(SpectralConfig::default())
    }
}

impl VoiceprintExtractor for SpectralExtractor {
    fn extract(&self, clip: &AudioClip) -> Result<Voiceprint, VoiceprintError> {
        let cfg = &self.cfg;
        let rate = clip.sample_rate as usize;
        if rate == 0 {
            return Err(VoiceprintError::Extraction("zero sample rate".into()));
        }
        if cfg.mel_bands == 0 {
            return Err(VoiceprintError::Extraction("zero mel bands".into()));
        }

        let frame_len = rate * cfg.frame_ms / 1000;
        let hop = rate * cfg.hop_ms / 1000;
        if frame_len == 0 || hop == 0 {
            return Err(VoiceprintError::Extraction(format!(
                "frame {}ms / hop {}ms collapse at {rate} Hz",
                cfg.frame_ms, cfg.hop_ms
            )));
        }
        if clip.len() < frame_len {
            return Err(VoiceprintError::TooShort {
                need: frame_len,
                got: clip.len(),
            });
        }

        let nyquist = rate as f64 / 2.0;
        let high_freq = if cfg.high_freq <= 0.0 {
            nyquist + cfg.high_freq
        } else {
            cfg.high_freq.min(nyquist)
        };
        if high_freq <= cfg.low_freq {
            return Err(VoiceprintError::Extraction(format!(
                "empty mel range {} .. {high_freq} Hz",
                cfg.low_freq
            )));
        }

        let fft_size = dsp::next_pow2(frame_len);
        let half_fft = fft_size / 2 + 1;
        let window = dsp::hamming_window(frame_len);
        let bank = dsp::mel_filter_bank(cfg.mel_bands, fft_size, rate, cfg.low_freq, high_freq);

        // Running per-band sums; the full feature matrix is never kept.
        let mut sums = vec![0.0f64; cfg.mel_bands];
        let mut sq_sums = vec![0.0f64; cfg.mel_bands];
        let mut frame_total = 0usize;

        let mut real = vec![0.0f64; fft_size];
        let mut imag = vec![0.0f64; fft_size];
        let mut power = vec![0.0f64; half_fft];

        for frame in dsp::frames(&clip.samples, frame_len, hop) {
            let mean: f64 = frame.iter().map(|&s| s as f64).sum::<f64>() / frame_len as f64;

            // DC removal, pre-emphasis, window, zero-pad.
            for i in 0..frame_len {
                let s = frame[i] as f64 - mean;
                let prev = if i > 0 { frame[i - 1] as f64 - mean } else { s };
                real[i] = (s - cfg.pre_emphasis * prev) * window[i];
            }
            real[frame_len..].fill(0.0);
            imag.fill(0.0);

            dsp::fft(&mut real, &mut imag);
            for k in 0..half_fft {
                power[k] = real[k] * real[k] + imag[k] * imag[k];
            }

            for (m, filter) in bank.iter().enumerate() {
                let mut energy = 0.0f64;
                for (k, &w) in filter.iter().enumerate() {
                    energy += w * power[k];
                }
                let log_e = energy.max(cfg.energy_floor).ln();
                sums[m] += log_e;
                sq_sums[m] += log_e * log_e;
            }
            frame_total += 1;
        }

        let t = frame_total as f64;
        let mut values = vec![0.0f32; cfg.mel_bands * 2];
        for m in 0..cfg.mel_bands {
            let mean = sums[m] / t;
            let variance = (sq_sums[m] / t - mean * mean).max(0.0);
            values[m] = mean as f32;
            values[cfg.mel_bands + m] = variance.sqrt() as f32;
        }
        l2_normalize(&mut values);

        Ok(Voiceprint::from_values(values))
    }

    fn dimension(&self) -> usize {
        self.cfg.mel_bands * 2
    }
}

/// Scales a vector to unit L2 norm in place. Zero vectors are left as-is.
fn l2_normalize(v: &mut [f32]) {
    let mut norm: f64 = 0.0;
    for &x in v.iter() {
        norm += (x as f64) * (x as f64);
    }
    norm = norm.sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}
