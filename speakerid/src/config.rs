use crate::error::SpeakerIdError;

/// Tunable thresholds for the identification engine.
///
/// Distances are Euclidean over the voiceprint space: 0 means identical,
/// larger means less similar.
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Voiceprint dimension shared by the extractor, store and index.
    pub dimension: usize,

    /// Upper distance bound for a confident match (inclusive).
    pub accept_distance: f32,

    /// Upper distance bound for a tentative match (inclusive).
    /// Must exceed `accept_distance`; anything further is rejected.
    pub review_distance: f32,

    /// Number of consecutive confident matches of one user that trigger
    /// consolidation of the stored voiceprint.
    pub consolidate_after: u32,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            accept_distance: 0.6,
            review_distance: 0.9,
            consolidate_after: 5,
        }
    }
}

impl SpeakerConfig {
    pub fn validate(&self) -> Result<(), SpeakerIdError> {
        if self.dimension == 0 {
            return Err(SpeakerIdError::Config(
                "dimension must be positive".to_string(),
            ));
        }
        if self.accept_distance <= 0.0 {
            return Err(SpeakerIdError::Config(
                "accept_distance must be positive".to_string(),
            ));
        }
        if self.review_distance <= self.accept_distance {
            return Err(SpeakerIdError::Config(format!(
                "review_distance {} must exceed accept_distance {}",
                self.review_distance, self.accept_distance
            )));
        }
        if self.consolidate_after == 0 {
            return Err(SpeakerIdError::Config(
                "consolidate_after must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SpeakerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let cfg = SpeakerConfig {
            accept_distance: 0.9,
            review_distance: 0.6,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let cfg = SpeakerConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
