use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use earshot_audio::AudioClip;
use earshot_profile::ProfileStore;
use earshot_simindex::{FlatIndex, SimIndexError, snapshot};
use earshot_voiceprint::{Voiceprint, VoiceprintExtractor};
use tracing::{debug, info, warn};

use crate::archive::UnknownArchive;
use crate::config::SpeakerConfig;
use crate::error::SpeakerIdError;

/// Outcome of one identification attempt.
#[derive(Debug, Clone)]
pub enum Identification {
    /// The speaker matched an enrolled user with high confidence.
    Accepted { user_id: String, distance: f32 },

    /// The speaker resembles an enrolled user but not closely enough to
    /// act on. The caller decides whether to re-enroll or decline.
    Tentative { user_id: String, distance: f32 },

    /// No enrolled user is close enough. The clip has been archived.
    Rejected { distance: f32 },

    /// The store holds no enrolled users at all.
    NoEnrolledUsers,

    /// The extractor could not produce a voiceprint from the clip.
    EmbeddingFailure { reason: String },
}

/// Identifies speakers by voiceprint distance against enrolled users.
///
/// The registry owns a durable profile store, an in-memory similarity
/// index derived from it, and an archive of rejected audio. Mutations
/// (enroll, delete, consolidation) are serialized behind one lock and
/// each leaves the index freshly rebuilt, so search results never mix
/// old and new contents.
pub struct SpeakerRegistry {
    cfg: SpeakerConfig,
    profiles: Box<dyn ProfileStore>,
    extractor: Box<dyn VoiceprintExtractor>,
    archive: UnknownArchive,
    index: FlatIndex,
    snapshot_path: Option<PathBuf>,

    /// Consecutive confident matches per user. Process-local; doubles as
    /// the write gate for all engine mutations.
    streaks: Mutex<HashMap<String, u32>>,
}

impl std::fmt::Debug for SpeakerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeakerRegistry")
            .field("cfg", &self.cfg)
            .field("snapshot_path", &self.snapshot_path)
            .finish_non_exhaustive()
    }
}

impl SpeakerRegistry {
    /// Build a registry over the given collaborators.
    ///
    /// The similarity index is restored from `snapshot_path` when that
    /// snapshot still matches the store's membership; otherwise it is
    /// rebuilt from the store and the snapshot rewritten.
    pub fn open(
        cfg: SpeakerConfig,
        profiles: Box<dyn ProfileStore>,
        extractor: Box<dyn VoiceprintExtractor>,
        archive: UnknownArchive,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, SpeakerIdError> {
        cfg.validate()?;
        if extractor.dimension() != cfg.dimension {
            return Err(SpeakerIdError::Config(format!(
                "extractor dimension {} does not match configured {}",
                extractor.dimension(),
                cfg.dimension
            )));
        }
        if profiles.dimension() != cfg.dimension {
            return Err(SpeakerIdError::Config(format!(
                "profile store dimension {} does not match configured {}",
                profiles.dimension(),
                cfg.dimension
            )));
        }

        let reg = Self {
            index: FlatIndex::new(cfg.dimension),
            cfg,
            profiles,
            extractor,
            archive,
            snapshot_path,
            streaks: Mutex::new(HashMap::new()),
        };
        reg.restore_index()?;
        Ok(reg)
    }

    /// Identify the speaker in the clip against all enrolled users.
    ///
    /// Per-clip conditions come back as [`Identification`] variants;
    /// `Err` is reserved for store and index faults.
    pub fn identify(&self, clip: &AudioClip) -> Result<Identification, SpeakerIdError> {
        let live = match self.extractor.extract(clip) {
            Ok(print) => print,
            Err(e) => {
                debug!("voiceprint extraction failed: {}", e);
                return Ok(Identification::EmbeddingFailure {
                    reason: e.to_string(),
                });
            }
        };

        let mut streaks = self.streaks.lock().unwrap();

        let hit = match self.index.search(live.values()) {
            Ok(hit) => hit,
            Err(SimIndexError::EmptyIndex) => return Ok(Identification::NoEnrolledUsers),
            Err(e) => return Err(e.into()),
        };

        // The index is a derived cache; confirm the store still agrees
        // before acting on the hit.
        let stored = match self.profiles.get(&hit.id)? {
            Some(print) => print,
            None => {
                warn!(
                    "index hit {} (distance {:.3}) has no stored profile, rebuilding index",
                    hit.id, hit.distance
                );
                streaks.remove(&hit.id);
                match self.rebuild_index() {
                    Ok(()) => self.save_snapshot(),
                    Err(e) => warn!("index rebuild after stale hit failed: {}", e),
                }
                self.archive_rejected(clip);
                return Ok(Identification::Rejected {
                    distance: hit.distance,
                });
            }
        };

        if hit.distance <= self.cfg.accept_distance {
            let streak = {
                let s = streaks.entry(hit.id.clone()).or_insert(0);
                *s += 1;
                *s
            };
            debug!(
                "accepted {} at distance {:.3}, streak {}",
                hit.id, hit.distance, streak
            );

            if streak >= self.cfg.consolidate_after {
                match self.consolidate(&hit.id, &stored, &live) {
                    Ok(()) => {
                        streaks.insert(hit.id.clone(), 0);
                    }
                    Err(e) => {
                        warn!(
                            "consolidation for {} failed, keeping previous profile: {}",
                            hit.id, e
                        );
                        streaks.insert(hit.id.clone(), streak - 1);
                    }
                }
            }

            return Ok(Identification::Accepted {
                user_id: hit.id,
                distance: hit.distance,
            });
        }

        if hit.distance <= self.cfg.review_distance {
            debug!("tentative match {} at distance {:.3}", hit.id, hit.distance);
            return Ok(Identification::Tentative {
                user_id: hit.id,
                distance: hit.distance,
            });
        }

        debug!(
            "rejected at distance {:.3}, nearest was {}",
            hit.distance, hit.id
        );
        self.archive_rejected(clip);
        Ok(Identification::Rejected {
            distance: hit.distance,
        })
    }

    /// Extract a voiceprint from the clip and enroll it under `user_id`,
    /// replacing any previous enrollment for that user.
    pub fn enroll(&self, user_id: &str, clip: &AudioClip) -> Result<(), SpeakerIdError> {
        let print = self.extractor.extract(clip)?;

        let mut streaks = self.streaks.lock().unwrap();
        self.profiles.put(user_id, &print)?;
        streaks.remove(user_id);
        self.rebuild_index()?;
        self.save_snapshot();
        info!("enrolled {}", user_id);
        Ok(())
    }

    /// Remove a user's enrollment and identification streak.
    /// Deleting an unknown user succeeds.
    pub fn delete_user(&self, user_id: &str) -> Result<(), SpeakerIdError> {
        let mut streaks = self.streaks.lock().unwrap();
        self.profiles.delete(user_id)?;
        streaks.remove(user_id);
        self.rebuild_index()?;
        self.save_snapshot();
        info!("deleted {}", user_id);
        Ok(())
    }

    /// All enrolled user ids, sorted.
    pub fn list_users(&self) -> Result<Vec<String>, SpeakerIdError> {
        let mut ids = self.profiles.list_ids()?;
        ids.sort();
        Ok(ids)
    }

    /// Number of users currently searchable in the index.
    pub fn user_count(&self) -> usize {
        self.index.len()
    }

    /// The archive of clips that failed identification.
    pub fn archive(&self) -> &UnknownArchive {
        &self.archive
    }

    pub fn config(&self) -> &SpeakerConfig {
        &self.cfg
    }

    /// Replace the stored voiceprint with the average of stored and live,
    /// persist it and republish the index.
    fn consolidate(
        &self,
        user_id: &str,
        stored: &Voiceprint,
        live: &Voiceprint,
    ) -> Result<(), SpeakerIdError> {
        let merged = stored.average(live)?;
        self.profiles.put(user_id, &merged)?;
        match self.rebuild_index() {
            Ok(()) => self.save_snapshot(),
            Err(e) => warn!("index rebuild after consolidation failed: {}", e),
        }
        info!("consolidated voiceprint for {}", user_id);
        Ok(())
    }

    fn restore_index(&self) -> Result<(), SpeakerIdError> {
        if let Some(path) = &self.snapshot_path {
            if path.exists() {
                match snapshot::load_file(path, self.cfg.dimension) {
                    Ok(entries) => {
                        let mut snap_ids: Vec<String> =
                            entries.iter().map(|(id, _)| id.clone()).collect();
                        snap_ids.sort();
                        let mut stored_ids = self.profiles.list_ids()?;
                        stored_ids.sort();

                        if snap_ids == stored_ids {
                            self.index.rebuild(&entries)?;
                            debug!("restored index snapshot with {} users", entries.len());
                            return Ok(());
                        }
                        info!("index snapshot out of date, rebuilding from store");
                    }
                    Err(e) => {
                        warn!("unusable index snapshot {}: {}", path.display(), e);
                    }
                }
            }
        }

        self.rebuild_index()?;
        self.save_snapshot();
        Ok(())
    }

    fn rebuild_index(&self) -> Result<(), SpeakerIdError> {
        let ids = self.profiles.list_ids()?;
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.profiles.get(&id)? {
                Some(print) => entries.push((id, print.values().to_vec())),
                None => warn!("profile for {} vanished during index rebuild", id),
            }
        }
        self.index.rebuild(&entries)?;
        Ok(())
    }

    fn save_snapshot(&self) {
        if let Some(path) = &self.snapshot_path {
            if let Err(e) = snapshot::save_file(&self.index, path) {
                warn!("failed to save index snapshot {}: {}", path.display(), e);
            }
        }
    }

    fn archive_rejected(&self, clip: &AudioClip) {
        if let Some(path) = self.archive.store(clip) {
            debug!("archived unidentified clip to {}", path.display());
        }
    }
}
