//! Redb-backed profile store: one embedded database file.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use earshot_voiceprint::Voiceprint;

use crate::codec;
use crate::{ProfileError, ProfileResult, ProfileStore, validate_user_id};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

pub struct RedbProfiles {
    db: Database,
    dimension: usize,
}

impl RedbProfiles {
    /// Opens or creates a profile database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, dimension: usize) -> ProfileResult<Self> {
        let db = Database::create(path).map_err(|e| ProfileError::Storage(e.to_string()))?;

        let tx = db
            .begin_write()
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(TABLE)
                .map_err(|e| ProfileError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| ProfileError::Storage(e.to_string()))?;

        Ok(Self { db, dimension })
    }
}

impl ProfileStore for RedbProfiles {
    fn put(&self, user_id: &str, print: &Voiceprint) -> ProfileResult<()> {
        validate_user_id(user_id)?;
        if print.dimension() != self.dimension {
            return Err(ProfileError::DimensionMismatch {
                got: print.dimension(),
                want: self.dimension,
            });
        }

        let bytes = codec::encode(print);
        let tx = self
            .db
            .begin_write()
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| ProfileError::Storage(e.to_string()))?;
            table
                .insert(user_id, bytes.as_slice())
                .map_err(|e| ProfileError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| ProfileError::Storage(e.to_string()))?;
        Ok(())
    }

    fn get(&self, user_id: &str) -> ProfileResult<Option<Voiceprint>> {
        if validate_user_id(user_id).is_err() {
            return Ok(None);
        }
        let tx = self
            .db
            .begin_read()
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        let table = tx
            .open_table(TABLE)
            .map_err(|e| ProfileError::Storage(e.to_string()))?;

        let bytes = match table
            .get(user_id)
            .map_err(|e| ProfileError::Storage(e.to_string()))?
        {
            Some(value) => value.value().to_vec(),
            None => return Ok(None),
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
        let tx = self
            .db
            .begin_write()
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| ProfileError::Storage(e.to_string()))?;
            table
                .remove(user_id)
                .map_err(|e| ProfileError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| ProfileError::Storage(e.to_string()))?;
        Ok(())
    }

    fn list_ids(&self) -> ProfileResult<Vec<String>> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        let table = tx
            .open_table(TABLE)
            .map_err(|e| ProfileError::Storage(e.to_string()))?;

        let mut ids = Vec::new();
        for item in table
            .iter()
            .map_err(|e| ProfileError::Storage(e.to_string()))?
        {
            let (key, _) = item.map_err(|e| ProfileError::Storage(e.to_string()))?;
            ids.push(key.value().to_string());
        }
        Ok(ids)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
