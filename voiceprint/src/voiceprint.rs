use std::fmt;

use crate::distance::euclidean_distance;
use crate::error::VoiceprintError;

/// A speaker embedding: a fixed-length f32 vector.
///
/// The vector length is the voiceprint's dimension. Stores and indexes
/// validate that every voiceprint they hold has one agreed dimension.
#[derive(Clone, PartialEq)]
pub struct Voiceprint {
    values: Vec<f32>,
}

impl Voiceprint {
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Euclidean distance to another voiceprint.
    /// Infinite for mismatched dimensions.
    pub fn distance(&self, other: &Voiceprint) -> f32 {
        euclidean_distance(&self.values, &other.values)
    }

    /// Componentwise average with another voiceprint of the same dimension.
    ///
    /// This is the consolidation step: a stored profile drifts toward a
    /// fresh sample while staying a single bounded vector.
    pub fn average(&self, other: &Voiceprint) -> Result<Voiceprint, VoiceprintError> {
        if self.dimension() != other.dimension() {
            return Err(VoiceprintError::DimensionMismatch {
                got: other.dimension(),
                want: self.dimension(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a + b) / 2.0)
            .collect();
        Ok(Voiceprint { values })
    }
}

impl fmt::Debug for Voiceprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voiceprint")
            .field("dimension", &self.values.len())
            .finish()
    }
}
