//! Loudness gating ahead of the transcriber.

use earshot_audio::{AudioClip, dsp};

/// Passes utterances whose loudest frame clears an RMS threshold.
///
/// Stands in for a wake-word detector: cheap enough to run on every
/// capture while keeping dead air away from the transcriber.
#[derive(Debug, Clone)]
pub struct EnergyGate {
    threshold: f32,
    frame_len: usize,
}

impl Default for EnergyGate {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl EnergyGate {
    /// Gate with the given RMS threshold, measured over 32ms frames at 16kHz.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            frame_len: 512,
        }
    }

    /// True if any frame is loud enough to bother transcribing.
    pub fn is_speech(&self, clip: &AudioClip) -> bool {
        if clip.samples.is_empty() {
            return false;
        }
        if clip.samples.len() < self.frame_len {
            return dsp::rms(&clip.samples) >= self.threshold;
        }
        dsp::frames(&clip.samples, self.frame_len, self.frame_len)
            .any(|frame| dsp::rms(frame) >= self.threshold)
    }
}

#[cfg(test)]
mod wake_tests {
    use super::*;

    #[test]
    fn test_silence_is_not_speech() {
        let gate = EnergyGate::default();
        assert!(!gate.is_speech(&AudioClip::new(vec![0.0; 4096], 16000)));
    }

    #[test]
    fn test_single_burst_passes() {
        let mut samples = vec![0.0; 4096];
        samples[2048..2560].fill(0.2);
        let gate = EnergyGate::default();
        assert!(gate.is_speech(&AudioClip::new(samples, 16000)));
    }

    #[test]
    fn test_quiet_noise_is_rejected() {
        let samples = vec![0.001; 4096];
        let gate = EnergyGate::default();
        assert!(!gate.is_speech(&AudioClip::new(samples, 16000)));
    }

    #[test]
    fn test_short_loud_clip_passes() {
        let gate = EnergyGate::default();
        assert!(gate.is_speech(&AudioClip::new(vec![0.3; 100], 16000)));
    }

    #[test]
    fn test_empty_clip_is_rejected() {
        let gate = EnergyGate::default();
        assert!(!gate.is_speech(&AudioClip::new(vec![], 16000)));
    }
}
