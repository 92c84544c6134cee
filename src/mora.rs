//! Mora segmentation of phoneme sequences

use crate::phoneme::is_mora_phoneme;
use crate::types::PhonemeSegment;

/// A mora: the anchoring vowel plus the consonant immediately before it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mora<'a> {
    pub vowel: &'a PhonemeSegment,
    pub consonant: Option<&'a PhonemeSegment>,
}

/// Parallel views produced by [`split_mora`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoraSplit<'a> {
    /// Same length as `vowels`; the first entry is always `None`.
    pub consonants: Vec<Option<&'a PhonemeSegment>>,
    pub vowels: Vec<&'a PhonemeSegment>,
    /// Positions of `vowels` in the original sequence.
    pub vowel_indexes: Vec<usize>,
}

impl<'a> MoraSplit<'a> {
    pub fn len(&self) -> usize {
        self.vowels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vowels.is_empty()
    }

    pub fn morae(&self) -> impl Iterator<Item = Mora<'a>> + '_ {
        self.vowels
            .iter()
            .zip(self.consonants.iter())
            .map(|(&vowel, &consonant)| Mora { vowel, consonant })
    }
}

/// Partition `phonemes` into morae anchored on mora-vowel phonemes.
///
/// A consonant is attached only when exactly one non-vowel segment separates a vowel
/// from the previous one. An input with no vowels yields empty outputs.
pub fn split_mora(phonemes: &[PhonemeSegment]) -> MoraSplit<'_> {
    let vowel_indexes: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter_map(|(idx, phoneme)| is_mora_phoneme(&phoneme.symbol).then_some(idx))
        .collect();

    let vowels = vowel_indexes.iter().map(|&idx| &phonemes[idx]).collect();

    let mut consonants = Vec::with_capacity(vowel_indexes.len());
    if !vowel_indexes.is_empty() {
        consonants.push(None);
    }
    consonants.extend(vowel_indexes.windows(2).map(|pair| {
        let (prev, post) = (pair[0], pair[1]);
        (post - prev == 2).then(|| &phonemes[post - 1])
    }));

    MoraSplit {
        consonants,
        vowels,
        vowel_indexes,
    }
}
