//! Flat-file profile store: one binary file per user.
//!
//! Files are named `<user_id>.vp` inside one directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-put
//! never leaves a torn profile behind.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use earshot_voiceprint::Voiceprint;

use crate::codec;
use crate::{ProfileError, ProfileResult, ProfileStore, validate_user_id};

const PROFILE_EXT: &str = "vp";

pub struct DirProfiles {
    dir: PathBuf,
    dimension: usize,
}

impl DirProfiles {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, dimension: usize) -> ProfileResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ProfileError::Storage(e.to_string()))?;
        Ok(Self { dir, dimension })
    }

    fn profile_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{user_id}.{PROFILE_EXT}"))
    }
}

impl ProfileStore for DirProfiles {
    fn put(&self, user_id: &str, print: &Voiceprint) -> ProfileResult<()> {
        validate_user_id(user_id)?;
        if print.dimension() != self.dimension {
            return Err(ProfileError::DimensionMismatch {
                got: print.dimension(),
                want: self.dimension,
            });
        }

        let bytes = codec::encode(print);
        let path = self.profile_path(user_id);
        let tmp = self.dir.join(format!("{user_id}.{PROFILE_EXT}.tmp"));

        if let Err(e) = fs::write(&tmp, &bytes) {
            return Err(ProfileError::Storage(e.to_string()));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(ProfileError::Storage(e.to_string()));
        }
        Ok(())
    }

    fn get(&self, user_id: &str) -> ProfileResult<Option<Voiceprint>> {
        if validate_user_id(user_id).is_err() {
            return Ok(None);
        }
        let bytes = match fs::read(self.profile_path(user_id)) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProfileError::Storage(e.to_string())),
        };
        codec::decode(&bytes, self.dimension)
            .map(Some)
            .map_err(|reason| ProfileError::Corrupt {
                user_id: user_id.to_string(),
                reason,
            })
    }

    fn delete(&self, user_id: &str) -> ProfileResult<()> {
        if validate_user_id(user_id).is_err() {
            return Ok(());
        }
        match fs::remove_file(self.profile_path(user_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProfileError::Storage(e.to_string())),
        }
    }

    fn list_ids(&self) -> ProfileResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| ProfileError::Storage(e.to_string()))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ProfileError::Storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_user_id(stem).is_ok() {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
