//! Coarse mood guess from short-term audio statistics.
//!
//! Not a model: two aggregate features (mean frame energy and mean
//! zero-crossing rate) bucket a clip into four moods, enough to color an
//! assistant's reply. Anything the heuristics cannot read is neutral.

use std::fmt;

use earshot_audio::{AudioClip, dsp};

/// The four moods the heuristics can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sad,
    Angry,
    Happy,
    Neutral,
}

impl Mood {
    /// Emoji shown next to the assistant's reply.
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Sad => "\u{1F622}",
            Mood::Angry => "\u{1F620}",
            Mood::Happy => "\u{1F604}",
            Mood::Neutral => "\u{1F642}",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision thresholds over the aggregate features.
///
/// Energy is mean squared amplitude of normalized samples; zero-crossing
/// rate is the fraction of adjacent sample pairs changing sign.
#[derive(Debug, Clone)]
pub struct MoodThresholds {
    /// Analysis frame length in milliseconds.
    pub frame_ms: u32,

    /// Hop between frames in milliseconds.
    pub hop_ms: u32,

    /// Mean energy below this reads as quiet, flat speech.
    pub sad_energy: f32,

    /// Mean zero-crossing rate above this reads as harsh, tense speech.
    pub angry_zcr: f32,

    /// Mean energy above this reads as loud, animated speech.
    pub happy_energy: f32,
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self {
            frame_ms: 50,
            hop_ms: 25,
            sad_energy: 0.01,
            angry_zcr: 0.1,
            happy_energy: 0.2,
        }
    }
}

/// Classify a clip with default thresholds.
pub fn classify(clip: &AudioClip) -> Mood {
    classify_with(clip, &MoodThresholds::default())
}

/// Classify a clip.
///
/// The rules fire in order: quiet is sad, high zero-crossing is angry,
/// loud is happy, everything else neutral. A clip too short for even one
/// frame is neutral.
pub fn classify_with(clip: &AudioClip, th: &MoodThresholds) -> Mood {
    let frame_len = (clip.sample_rate as usize * th.frame_ms as usize) / 1000;
    let hop = (clip.sample_rate as usize * th.hop_ms as usize) / 1000;

    let mut energy_sum = 0.0f64;
    let mut zcr_sum = 0.0f64;
    let mut count = 0usize;
    for frame in dsp::frames(&clip.samples, frame_len, hop) {
        energy_sum += dsp::mean_square(frame) as f64;
        zcr_sum += dsp::zero_crossing_rate(frame) as f64;
        count += 1;
    }
    if count == 0 {
        return Mood::Neutral;
    }

    let energy = (energy_sum / count as f64) as f32;
    let zcr = (zcr_sum / count as f64) as f32;

    if energy < th.sad_energy {
        Mood::Sad
    } else if zcr > th.angry_zcr {
        Mood::Angry
    } else if energy > th.happy_energy {
        Mood::Happy
    } else {
        Mood::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16000;

    fn tone(freq_hz: f32, amplitude: f32, seconds: f32) -> AudioClip {
        let n = (RATE as f32 * seconds) as usize;
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f32 / RATE as f32;
                (2.0 * std::f32::consts::PI * freq_hz * t).sin() * amplitude
            })
            .collect();
        AudioClip::new(samples, RATE)
    }

    #[test]
    fn test_silence_is_sad() {
        let clip = AudioClip::new(vec![0.0; RATE as usize], RATE);
        assert_eq!(classify(&clip), Mood::Sad);
    }

    #[test]
    fn test_harsh_signal_is_angry() {
        // Alternating signs cross on every sample pair; well above the
        // zero-crossing threshold and loud enough not to read as sad.
        let samples: Vec<f32> = (0..RATE as usize)
            .map(|i| if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();
        let clip = AudioClip::new(samples, RATE);
        assert_eq!(classify(&clip), Mood::Angry);
    }

    #[test]
    fn test_loud_tone_is_happy() {
        // Mean square of a 0.8-amplitude sine is 0.32; a 220 Hz tone at
        // 16 kHz crosses far below the angry threshold.
        assert_eq!(classify(&tone(220.0, 0.8, 1.0)), Mood::Happy);
    }

    #[test]
    fn test_moderate_tone_is_neutral() {
        assert_eq!(classify(&tone(220.0, 0.3, 1.0)), Mood::Neutral);
    }

    #[test]
    fn test_too_short_clip_is_neutral() {
        let clip = AudioClip::new(vec![0.5; 100], RATE);
        assert_eq!(classify(&clip), Mood::Neutral);
    }

    #[test]
    fn test_empty_clip_is_neutral() {
        let clip = AudioClip::new(Vec::new(), RATE);
        assert_eq!(classify(&clip), Mood::Neutral);
    }

    #[test]
    fn test_display_and_emoji() {
        assert_eq!(Mood::Happy.to_string(), "happy");
        assert_eq!(Mood::Sad.as_str(), "sad");
        assert!(!Mood::Angry.emoji().is_empty());
    }
}
