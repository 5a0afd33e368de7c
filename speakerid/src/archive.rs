use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use earshot_audio::{AudioClip, wav};
use tracing::warn;
use uuid::Uuid;

use crate::error::SpeakerIdError;

/// Append-only archive of audio clips that failed identification.
///
/// Clips are stored as WAV files under one directory, named with a
/// timestamp and a random suffix so names sort by arrival and never
/// collide. Entries are only ever added, never rewritten.
pub struct UnknownArchive {
    dir: PathBuf,
}

impl UnknownArchive {
    /// Open an archive rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, SpeakerIdError> {
        fs::create_dir_all(dir).map_err(|e| SpeakerIdError::Io(e.to_string()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store a clip, returning its path when the write succeeded.
    ///
    /// Archival is best effort: failures are logged and swallowed so a
    /// full or read-only disk cannot break the identification path.
    pub fn store(&self, clip: &AudioClip) -> Option<PathBuf> {
        let name = format!(
            "unknown-{:010}-{}.wav",
            Utc::now().timestamp(),
            Uuid::new_v4()
        );
        let path = self.dir.join(name);
        match wav::write_file(&path, clip) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("failed to archive clip {}: {}", path.display(), e);
                None
            }
        }
    }

    /// List archived clip paths in arrival order.
    pub fn list(&self) -> Result<Vec<PathBuf>, SpeakerIdError> {
        let mut out = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| SpeakerIdError::Io(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| SpeakerIdError::Io(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("wav") {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }
}
