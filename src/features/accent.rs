use anyhow::{anyhow, ensure, Result};
use rand::Rng;

use super::{flags_to_ids, split_seconds};
use crate::config::F0ProcessMode;
use crate::mora::{split_mora, MoraSplit};
use crate::phoneme::is_voiced;
use crate::sampling::{mask_accents, mask_phonemes, MaskConfig, WindowPlan};
use crate::signal::{align_weight, segment_mean};
use crate::types::{AccentChannels, FeatureExample, MarkerLists, PhonemeSegment, UtteranceInput};

/// Consonant id used where a mora has no preceding consonant.
pub const NO_CONSONANT_ID: i64 = -1;

/// Full-length, unit-aligned arrays for one utterance, before windowing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedAccentFeatures {
    pub phoneme_list: Vec<i64>,
    /// Absent in phoneme mode
    pub consonant_phoneme_list: Option<Vec<i64>>,
    pub markers: MarkerLists,
    pub f0: Vec<f32>,
    pub voiced: Vec<bool>,
}

impl AlignedAccentFeatures {
    pub fn len(&self) -> usize {
        self.phoneme_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phoneme_list.is_empty()
    }
}

/// Prepares examples for the pitch/accent model.
#[derive(Debug, Clone, PartialEq)]
pub struct AccentFeatureExtractor {
    pub sampling_length: usize,
    pub f0_process_mode: F0ProcessMode,
    pub phoneme_mask: MaskConfig,
    pub accent_mask: MaskConfig,
}

impl AccentFeatureExtractor {
    /// Extractor without span masking, as used for evaluation.
    pub fn new(sampling_length: usize, f0_process_mode: F0ProcessMode) -> Self {
        Self {
            sampling_length,
            f0_process_mode,
            phoneme_mask: MaskConfig::disabled(),
            accent_mask: MaskConfig::disabled(),
        }
    }

    pub fn with_masks(mut self, phoneme_mask: MaskConfig, accent_mask: MaskConfig) -> Self {
        self.phoneme_mask = phoneme_mask;
        self.accent_mask = accent_mask;
        self
    }

    pub fn assemble(&self, input: &UtteranceInput) -> Result<AlignedAccentFeatures> {
        assemble_accent_features(input, self.f0_process_mode)
    }

    pub fn extract<R: Rng + ?Sized>(
        &self,
        input: &UtteranceInput,
        rng: &mut R,
    ) -> Result<FeatureExample> {
        let aligned = self.assemble(input)?;
        let plan = WindowPlan::sample(aligned.len(), self.sampling_length, rng)?;

        let mut phoneme_list = plan.apply(&aligned.phoneme_list)?;
        let mut consonant_phoneme_list = aligned
            .consonant_phoneme_list
            .as_deref()
            .map(|consonants| plan.apply(consonants))
            .transpose()?;
        let markers = &aligned.markers;
        let mut accent = AccentChannels {
            start_accent_list: plan.apply(&flags_to_ids(&markers.start_accent))?,
            end_accent_list: plan.apply(&flags_to_ids(&markers.end_accent))?,
            start_accent_phrase_list: plan.apply(&flags_to_ids(&markers.start_accent_phrase))?,
            end_accent_phrase_list: plan.apply(&flags_to_ids(&markers.end_accent_phrase))?,
        };

        mask_phonemes(
            &mut phoneme_list,
            consonant_phoneme_list.as_mut(),
            self.phoneme_mask,
            rng,
        )?;
        mask_accents(&mut accent, self.accent_mask, rng)?;

        Ok(FeatureExample {
            phoneme_list,
            consonant_phoneme_list,
            phoneme_length: None,
            accent: Some(accent),
            f0: Some(plan.apply(&aligned.f0)?),
            voiced: Some(plan.apply(&aligned.voiced)?),
            padded: plan.padded_mask(),
            speaker_id: None,
        })
    }
}

/// Segments, aggregates and voices one utterance at the granularity of `mode`.
///
/// Pitch is zero wherever the unit's phoneme is unvoiced, whatever the aggregate said.
pub fn assemble_accent_features(
    input: &UtteranceInput,
    mode: F0ProcessMode,
) -> Result<AlignedAccentFeatures> {
    let phonemes = &input.phonemes;
    ensure!(!phonemes.is_empty(), "utterance has no phoneme segments");
    let markers = input
        .markers
        .as_ref()
        .ok_or_else(|| anyhow!("accent features require accent marker lists"))?;
    for list in markers.lists() {
        ensure!(
            list.len() == phonemes.len(),
            "marker list has {} entries for {} phonemes",
            list.len(),
            phonemes.len()
        );
    }

    let phoneme_f0 = phoneme_f0(input)?;
    let split = split_mora(phonemes);

    let (units, consonants, markers, f0) = match mode {
        F0ProcessMode::Phoneme => (
            phonemes.iter().collect::<Vec<_>>(),
            None,
            markers.clone(),
            phoneme_f0,
        ),
        F0ProcessMode::Mora => (
            split.vowels.clone(),
            Some(&split.consonants),
            markers.select(&split.vowel_indexes),
            split
                .vowel_indexes
                .iter()
                .map(|&idx| phoneme_f0[idx])
                .collect(),
        ),
        F0ProcessMode::VoicedMora => (
            split.vowels.clone(),
            Some(&split.consonants),
            markers.select(&split.vowel_indexes),
            voiced_mora_f0(&split, &phoneme_f0),
        ),
    };

    let phoneme_list = units.iter().map(|p| p.id).collect();
    let consonant_phoneme_list = consonants.map(|consonants| {
        consonants
            .iter()
            .map(|consonant| consonant.map_or(NO_CONSONANT_ID, |p| p.id))
            .collect()
    });
    let voiced: Vec<bool> = units.iter().map(|p| is_voiced(&p.symbol)).collect();
    let f0 = f0
        .iter()
        .zip(voiced.iter())
        .map(|(&value, &voiced)| if voiced { value as f32 } else { 0.0 })
        .collect();

    Ok(AlignedAccentFeatures {
        phoneme_list,
        consonant_phoneme_list,
        markers,
        f0,
        voiced,
    })
}

/// Per-phoneme pitch, volume-weighted when a volume signal is present.
fn phoneme_f0(input: &UtteranceInput) -> Result<Vec<f64>> {
    let f0 = input
        .f0
        .as_ref()
        .ok_or_else(|| anyhow!("accent features require a pitch signal"))?;
    let splits = split_seconds(&input.phonemes);
    match &input.volume {
        Some(volume) => {
            let (f0, volume) = align_weight(f0, volume)?;
            Ok(segment_mean(&f0, &splits, Some(volume.samples.as_slice())))
        }
        None => Ok(segment_mean(f0, &splits, None)),
    }
}

/// Mora pitch, blending in a voiced preceding consonant by duration.
fn voiced_mora_f0(split: &MoraSplit<'_>, phoneme_f0: &[f64]) -> Vec<f64> {
    split
        .morae()
        .zip(split.vowel_indexes.iter())
        .map(|(mora, &idx)| match mora.consonant {
            Some(consonant) if is_voiced(&consonant.symbol) => {
                merge_by_duration(consonant, phoneme_f0[idx - 1], mora.vowel, phoneme_f0[idx])
            }
            _ => phoneme_f0[idx],
        })
        .collect()
}

fn merge_by_duration(
    consonant: &PhonemeSegment,
    consonant_f0: f64,
    vowel: &PhonemeSegment,
    vowel_f0: f64,
) -> f64 {
    let total = consonant.duration() + vowel.duration();
    if total <= 0.0 {
        return 0.0;
    }
    (consonant_f0 * consonant.duration() + vowel_f0 * vowel.duration()) / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phoneme::phoneme_id;
    use crate::types::Signal;
    use approx::assert_abs_diff_eq;

    fn segments(layout: &[(&str, f64, f64)]) -> Vec<PhonemeSegment> {
        layout.iter()
            .map(|&(symbol, start, end)| PhonemeSegment {
                symbol: symbol.to_string(),
                id: phoneme_id(symbol).unwrap(),
                start,
                end,
            })
            .collect()
    }

    fn markers(len: usize) -> MarkerLists {
        MarkerLists {
            start_accent: (0..len).map(|i| i % 2 == 0).collect(),
            end_accent: vec![false; len],
            start_accent_phrase: vec![true; len],
            end_accent_phrase: (0..len).map(|i| i == len - 1).collect(),
        }
    }

    /// 100 frames/s; each phoneme's frames carry one constant pitch value.
    fn stepped_f0(phonemes: &[PhonemeSegment], values: &[f32]) -> Signal {
        let mut samples = Vec::new();
        for (phoneme, &value) in phonemes.iter().zip(values) {
            let frames = ((phoneme.end - phoneme.start) * 100.0).round() as usize;
            samples.extend(std::iter::repeat(value).take(frames));
        }
        Signal::new(samples, 100.0)
    }

    fn input(phonemes: Vec<PhonemeSegment>, values: &[f32]) -> UtteranceInput {
        let f0 = stepped_f0(&phonemes, values);
        UtteranceInput {
            markers: Some(markers(phonemes.len())),
            phonemes,
            f0: Some(f0),
            volume: None,
        }
    }

    #[test]
    fn voiced_consonant_is_blended_into_mora() {
        let phonemes = segments(&[("pau", 0.0, 0.5), ("m", 0.5, 0.75), ("a", 0.75, 1.25)]);
        let input = input(phonemes, &[0.0, 120.0, 150.0]);

        let aligned = assemble_accent_features(&input, F0ProcessMode::VoicedMora).unwrap();

        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.f0[0], 0.0);
        assert_abs_diff_eq!(aligned.f0[1], 140.0, epsilon = 1e-3);
        assert_eq!(
            aligned.consonant_phoneme_list,
            Some(vec![NO_CONSONANT_ID, phoneme_id("m").unwrap()])
        );
    }

    #[test]
    fn unvoiced_consonant_keeps_vowel_pitch() {
        let phonemes = segments(&[("pau", 0.0, 0.5), ("k", 0.5, 0.75), ("a", 0.75, 1.25)]);
        let input = input(phonemes, &[0.0, 120.0, 150.0]);

        let aligned = assemble_accent_features(&input, F0ProcessMode::VoicedMora).unwrap();

        assert_abs_diff_eq!(aligned.f0[1], 150.0, epsilon = 1e-3);
    }

    #[test]
    fn mora_mode_subsamples_markers_at_vowels() {
        let phonemes = segments(&[
            ("pau", 0.0, 0.25),
            ("k", 0.25, 0.5),
            ("o", 0.5, 0.75),
            ("r", 0.75, 1.0),
            ("e", 1.0, 1.25),
            ("pau", 1.25, 1.5),
        ]);
        let input = input(phonemes, &[0.0, 0.0, 200.0, 180.0, 160.0, 0.0]);

        let aligned = assemble_accent_features(&input, F0ProcessMode::Mora).unwrap();

        assert_eq!(
            aligned.phoneme_list,
            vec![0, phoneme_id("o").unwrap(), phoneme_id("e").unwrap(), 0]
        );
        assert_eq!(aligned.markers.start_accent, vec![true, true, true, false]);
        assert_eq!(aligned.markers.end_accent_phrase, vec![false, false, false, true]);
        assert_abs_diff_eq!(aligned.f0[1], 200.0, epsilon = 1e-3);
        assert_abs_diff_eq!(aligned.f0[2], 160.0, epsilon = 1e-3);
        assert_eq!(aligned.voiced, vec![false, true, true, false]);
    }

    #[test]
    fn phoneme_mode_drops_consonants_and_keeps_phoneme_markers() {
        let phonemes = segments(&[("pau", 0.0, 0.25), ("s", 0.25, 0.5), ("a", 0.5, 0.75)]);
        let input = input(phonemes, &[0.0, 90.0, 110.0]);

        let aligned = assemble_accent_features(&input, F0ProcessMode::Phoneme).unwrap();

        assert_eq!(aligned.len(), 3);
        assert!(aligned.consonant_phoneme_list.is_none());
        assert_eq!(aligned.markers.start_accent.len(), 3);
        // "s" is unvoiced, so its stray pitch is discarded
        assert_eq!(aligned.f0, vec![0.0, 0.0, 110.0]);
    }

    #[test]
    fn volume_weights_the_pitch_mean() {
        let phonemes = segments(&[("a", 0.0, 0.04)]);
        let f0 = Signal::new(vec![100.0, 200.0, 0.0, 300.0], 100.0);
        let volume = Signal::new(vec![1.0, 3.0, 9.0, 0.0], 100.0);
        let input = UtteranceInput {
            markers: Some(markers(1)),
            phonemes,
            f0: Some(f0),
            volume: Some(volume),
        };

        let aligned = assemble_accent_features(&input, F0ProcessMode::Phoneme).unwrap();

        assert_abs_diff_eq!(aligned.f0[0], 175.0, epsilon = 1e-3);
    }

    #[test]
    fn rejects_marker_length_mismatch() {
        let phonemes = segments(&[("pau", 0.0, 0.25), ("a", 0.25, 0.5)]);
        let mut input = input(phonemes, &[0.0, 100.0]);
        if let Some(markers) = input.markers.as_mut() {
            markers.end_accent.push(true);
        }
        assert!(assemble_accent_features(&input, F0ProcessMode::Mora).is_err());
    }

    #[test]
    fn missing_pitch_is_an_error() {
        let phonemes = segments(&[("a", 0.0, 0.2)]);
        let mut input = input(phonemes, &[100.0]);
        input.f0 = None;
        assert!(assemble_accent_features(&input, F0ProcessMode::Phoneme).is_err());
    }
}
