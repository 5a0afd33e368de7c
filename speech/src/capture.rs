//! Where utterances come from.

use std::path::PathBuf;

use earshot_audio::{AudioClip, AudioError, wav};
use tracing::debug;

/// Pull-based source of utterances for the session loop.
pub trait UtteranceSource {
    /// Returns the next utterance, or `None` when the source is drained.
    fn next_utterance(&mut self) -> Result<Option<AudioClip>, AudioError>;
}

/// Feeds utterances from a fixed list of WAV files, in order.
pub struct WavFileSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl WavFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }
}

impl UtteranceSource for WavFileSource {
    fn next_utterance(&mut self) -> Result<Option<AudioClip>, AudioError> {
        match self.paths.next() {
            Some(path) => {
                debug!("reading utterance from {}", path.display());
                Ok(Some(wav::read_file(&path)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod capture_tests {
    use super::*;
    use earshot_audio::wav;

    #[test]
    fn test_wav_file_source_drains_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.wav");
        let second = dir.path().join("b.wav");
        wav::write_file(&first, &AudioClip::new(vec![0.1; 10], 16000)).unwrap();
        wav::write_file(&second, &AudioClip::new(vec![0.1; 20], 16000)).unwrap();

        let mut source = WavFileSource::new(vec![first, second]);
        assert_eq!(source.next_utterance().unwrap().unwrap().len(), 10);
        assert_eq!(source.next_utterance().unwrap().unwrap().len(), 20);
        assert!(source.next_utterance().unwrap().is_none());
    }

    #[test]
    fn test_wav_file_source_propagates_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.wav");
        std::fs::write(&bad, b"not a wav").unwrap();

        let mut source = WavFileSource::new(vec![bad]);
        assert!(source.next_utterance().is_err());
    }
}
