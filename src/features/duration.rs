use anyhow::{ensure, Result};
use rand::Rng;

use super::split_seconds;
use crate::sampling::WindowPlan;
use crate::signal::segment_mean;
use crate::types::{FeatureExample, UtteranceInput};

/// Prepares examples for the phoneme-duration model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationFeatureExtractor {
    pub sampling_length: usize,
}

impl DurationFeatureExtractor {
    pub fn new(sampling_length: usize) -> Self {
        Self { sampling_length }
    }

    /// Phoneme ids and durations, plus a per-phoneme pitch mean when pitch is present.
    pub fn extract<R: Rng + ?Sized>(
        &self,
        input: &UtteranceInput,
        rng: &mut R,
    ) -> Result<FeatureExample> {
        let phonemes = &input.phonemes;
        ensure!(!phonemes.is_empty(), "utterance has no phoneme segments");

        let ids: Vec<i64> = phonemes.iter().map(|p| p.id).collect();
        let lengths: Vec<f32> = phonemes.iter().map(|p| p.duration() as f32).collect();
        let f0: Option<Vec<f32>> = input.f0.as_ref().map(|signal| {
            segment_mean(signal, &split_seconds(phonemes), None)
                .into_iter()
                .map(|value| value as f32)
                .collect()
        });

        let plan = WindowPlan::sample(ids.len(), self.sampling_length, rng)?;
        Ok(FeatureExample {
            phoneme_list: plan.apply(&ids)?,
            consonant_phoneme_list: None,
            phoneme_length: Some(plan.apply(&lengths)?),
            accent: None,
            f0: f0.as_deref().map(|f0| plan.apply(f0)).transpose()?,
            voiced: None,
            padded: plan.padded_mask(),
            speaker_id: None,
        })
    }
}
