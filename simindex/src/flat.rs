use std::sync::{RwLock, RwLockReadGuard};

use earshot_voiceprint::euclidean_distance;

use crate::error::SimIndexError;

/// Match is the result of a nearest-neighbor search.
#[derive(Debug, Clone)]
pub struct Match {
    /// Identifier of the matched vector.
    pub id: String,

    /// Euclidean distance between the query and the matched vector.
    /// Lower values indicate higher similarity.
    pub distance: f32,
}

pub(crate) struct Inner {
    pub(crate) ids: Vec<String>,
    pub(crate) vectors: Vec<Vec<f32>>,
}

/// FlatIndex is an in-memory exact nearest-neighbor index using
/// brute-force Euclidean distance. Intended for small collections
/// (tens to low thousands of vectors).
///
/// The index is never patched in place: `rebuild` constructs the new
/// contents aside and swaps them in under the write lock, so concurrent
/// searches observe either the old contents or the new, never a mix.
pub struct FlatIndex {
    dim: usize,
    inner: RwLock<Inner>,
}

impl FlatIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inner: RwLock::new(Inner {
                ids: Vec::new(),
                vectors: Vec::new(),
            }),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Replace the entire index contents with the given entries.
    ///
    /// All vectors are validated before anything is published; on error
    /// the previous contents remain searchable.
    pub fn rebuild(&self, entries: &[(String, Vec<f32>)]) -> Result<(), SimIndexError> {
        let mut ids = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());
        for (id, vector) in entries {
            if vector.len() != self.dim {
                return Err(SimIndexError::DimensionMismatch {
                    got: vector.len(),
                    want: self.dim,
                });
            }
            ids.push(id.clone());
            vectors.push(vector.clone());
        }

        *self.inner.write().unwrap() = Inner { ids, vectors };
        Ok(())
    }

    /// Return the single nearest vector to the query.
    pub fn search(&self, query: &[f32]) -> Result<Match, SimIndexError> {
        if query.len() != self.dim {
            return Err(SimIndexError::DimensionMismatch {
                got: query.len(),
                want: self.dim,
            });
        }

        let inner = self.inner.read().unwrap();
        if inner.ids.is_empty() {
            return Err(SimIndexError::EmptyIndex);
        }

        let mut best = 0usize;
        let mut best_dist = f32::INFINITY;
        for (i, vector) in inner.vectors.iter().enumerate() {
            let d = euclidean_distance(query, vector);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }

        Ok(Match {
            id: inner.ids[best].clone(),
            distance: best_dist,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the ids currently in the index, in rebuild order.
    pub fn ids(&self) -> Vec<String> {
        self.inner.read().unwrap().ids.clone()
    }

    pub(crate) fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap()
    }
}
