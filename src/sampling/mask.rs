use std::ops::Range;

use anyhow::{anyhow, Result};
use ndarray::{s, Array1};
use rand::Rng;

use crate::types::AccentChannels;

/// Value written over masked phoneme and consonant ids.
pub const MASKED_PHONEME_ID: i64 = -1;

/// Span-masking settings for one augmentation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskConfig {
    /// Exclusive upper bound on a span's length
    pub max_length: usize,
    /// Number of spans drawn per example
    pub num: usize,
}

impl MaskConfig {
    pub fn new(max_length: usize, num: usize) -> Self {
        Self { max_length, num }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.max_length > 0 && self.num > 0
    }

    /// Draws `num` independent spans that fit in `array_length` units.
    ///
    /// Each span's length is drawn from `[0, max_length)`, then its start from
    /// `[0, array_length - length]`. Spans may overlap or be empty.
    pub fn draw_spans<R: Rng + ?Sized>(
        &self,
        array_length: usize,
        rng: &mut R,
    ) -> Result<Vec<Range<usize>>> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }
        (0..self.num)
            .map(|_| {
                let length = rng.gen_range(0..self.max_length);
                let max_offset = array_length.checked_sub(length).ok_or_else(|| {
                    anyhow!("mask span of {length} units does not fit in {array_length} units")
                })?;
                let offset = rng.gen_range(0..=max_offset);
                Ok(offset..offset + length)
            })
            .collect()
    }
}

/// Overwrites random spans of phoneme ids (and consonant ids) with [`MASKED_PHONEME_ID`].
pub fn mask_phonemes<R: Rng + ?Sized>(
    phoneme_list: &mut Array1<i64>,
    mut consonant_phoneme_list: Option<&mut Array1<i64>>,
    config: MaskConfig,
    rng: &mut R,
) -> Result<()> {
    for span in config.draw_spans(phoneme_list.len(), rng)? {
        phoneme_list
            .slice_mut(s![span.clone()])
            .fill(MASKED_PHONEME_ID);
        if let Some(consonants) = consonant_phoneme_list.as_deref_mut() {
            consonants.slice_mut(s![span]).fill(MASKED_PHONEME_ID);
        }
    }
    Ok(())
}

/// Zeroes random spans across all four accent channels at once.
pub fn mask_accents<R: Rng + ?Sized>(
    accent: &mut AccentChannels,
    config: MaskConfig,
    rng: &mut R,
) -> Result<()> {
    let length = accent.start_accent_list.len();
    for span in config.draw_spans(length, rng)? {
        for channel in accent.channels_mut() {
            channel.slice_mut(s![span.clone()]).fill(0);
        }
    }
    Ok(())
}
