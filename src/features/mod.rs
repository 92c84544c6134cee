pub mod accent;
pub mod duration;

use anyhow::Result;
use rand::Rng;

use crate::types::{FeatureExample, PhonemeSegment, UtteranceInput};

pub use accent::{assemble_accent_features, AccentFeatureExtractor, AlignedAccentFeatures};
pub use duration::DurationFeatureExtractor;

/// Extractor for one of the two example kinds, chosen once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureExtractor {
    Duration(DurationFeatureExtractor),
    Accent(AccentFeatureExtractor),
}

impl FeatureExtractor {
    /// Builds a fresh fixed-length example; every call redraws window, padding and masks.
    pub fn extract<R: Rng + ?Sized>(
        &self,
        input: &UtteranceInput,
        rng: &mut R,
    ) -> Result<FeatureExample> {
        match self {
            FeatureExtractor::Duration(extractor) => extractor.extract(input, rng),
            FeatureExtractor::Accent(extractor) => extractor.extract(input, rng),
        }
    }

    pub fn sampling_length(&self) -> usize {
        match self {
            FeatureExtractor::Duration(extractor) => extractor.sampling_length,
            FeatureExtractor::Accent(extractor) => extractor.sampling_length,
        }
    }
}

/// End times of all segments but the last: the split points between phonemes.
pub(crate) fn split_seconds(phonemes: &[PhonemeSegment]) -> Vec<f64> {
    let inner = phonemes.len().saturating_sub(1);
    phonemes[..inner].iter().map(|p| p.end).collect()
}

pub(crate) fn flags_to_ids(flags: &[bool]) -> Vec<i64> {
    flags.iter().map(|&flag| i64::from(flag)).collect()
}
