//! In-memory profile store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use earshot_voiceprint::Voiceprint;

use crate::{ProfileError, ProfileResult, ProfileStore, validate_user_id};

pub struct MemoryProfiles {
    dimension: usize,
    prints: RwLock<HashMap<String, Voiceprint>>,
}

impl MemoryProfiles {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            prints: RwLock::new(HashMap::new()),
        }
    }
}

impl ProfileStore for MemoryProfiles {
    fn put(&self, user_id: &str, print: &Voiceprint) -> ProfileResult<()> {
        validate_user_id(user_id)?;
        if print.dimension() != self.dimension {
            return Err(ProfileError::DimensionMismatch {
                got: print.dimension(),
                want: self.dimension,
            });
        }
        let mut prints = self.prints.write().unwrap();
        prints.insert(user_id.to_string(), print.clone());
        Ok(())
    }

    fn get(&self, user_id: &str) -> ProfileResult<Option<Voiceprint>> {
        if validate_user_id(user_id).is_err() {
            return Ok(None);
        }
        let prints = self.prints.read().unwrap();
        Ok(prints.get(user_id).cloned())
    }

    fn delete(&self, user_id: &str) -> ProfileResult<()> {
        if validate_user_id(user_id).is_err() {
            return Ok(());
        }
        let mut prints = self.prints.write().unwrap();
        prints.remove(user_id);
        Ok(())
    }

    fn list_ids(&self) -> ProfileResult<Vec<String>> {
        let prints = self.prints.read().unwrap();
        Ok(prints.keys().cloned().collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
