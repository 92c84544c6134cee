//! Core types for the prosody dataset pipeline

use ndarray::Array1;
use serde::Serialize;

/// A labelled phoneme span inside an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct PhonemeSegment {
    pub symbol: String,
    /// Index into the phoneme inventory
    pub id: i64,
    pub start: f64, // seconds
    pub end: f64,   // seconds
}

impl PhonemeSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Frame-rate signal such as pitch or volume
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Non-positive samples are treated as unvoiced/unset
    pub samples: Vec<f32>,
    /// Samples per second
    pub rate: f64,
}

impl Signal {
    pub fn new(samples: Vec<f32>, rate: f64) -> Self {
        Self { samples, rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }
}

/// Boolean accent markers, one entry per unit (phoneme or mora)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerLists {
    pub start_accent: Vec<bool>,
    pub end_accent: Vec<bool>,
    pub start_accent_phrase: Vec<bool>,
    pub end_accent_phrase: Vec<bool>,
}

impl MarkerLists {
    pub fn lists(&self) -> [&[bool]; 4] {
        [
            &self.start_accent,
            &self.end_accent,
            &self.start_accent_phrase,
            &self.end_accent_phrase,
        ]
    }

    /// Keep only the entries at `indexes`, in order.
    pub fn select(&self, indexes: &[usize]) -> Self {
        let pick = |list: &[bool]| indexes.iter().map(|&i| list[i]).collect::<Vec<_>>();
        Self {
            start_accent: pick(&self.start_accent),
            end_accent: pick(&self.end_accent),
            start_accent_phrase: pick(&self.start_accent_phrase),
            end_accent_phrase: pick(&self.end_accent_phrase),
        }
    }
}

/// Raw annotation for one utterance, as handed over by an annotation source
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceInput {
    pub phonemes: Vec<PhonemeSegment>,
    pub markers: Option<MarkerLists>,
    pub f0: Option<Signal>,
    pub volume: Option<Signal>,
}

/// The four accent channels of a finished example
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccentChannels {
    pub start_accent_list: Array1<i64>,
    pub end_accent_list: Array1<i64>,
    pub start_accent_phrase_list: Array1<i64>,
    pub end_accent_phrase_list: Array1<i64>,
}

impl AccentChannels {
    pub fn channels_mut(&mut self) -> [&mut Array1<i64>; 4] {
        [
            &mut self.start_accent_list,
            &mut self.end_accent_list,
            &mut self.start_accent_phrase_list,
            &mut self.end_accent_phrase_list,
        ]
    }

    pub fn channels(&self) -> [&Array1<i64>; 4] {
        [
            &self.start_accent_list,
            &self.end_accent_list,
            &self.start_accent_phrase_list,
            &self.end_accent_phrase_list,
        ]
    }
}

/// Fixed-length training example. Every array channel has the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureExample {
    pub phoneme_list: Array1<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consonant_phoneme_list: Option<Array1<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phoneme_length: Option<Array1<f32>>,
    #[serde(flatten)]
    pub accent: Option<AccentChannels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f0: Option<Array1<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voiced: Option<Array1<bool>>,
    pub padded: Array1<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<i64>,
}

impl FeatureExample {
    /// Shared length of all channels.
    pub fn len(&self) -> usize {
        self.padded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.padded.is_empty()
    }

    /// Lengths of every present array channel, keyed by channel name.
    pub fn channel_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![
            ("phoneme_list", self.phoneme_list.len()),
            ("padded", self.padded.len()),
        ];
        if let Some(consonants) = &self.consonant_phoneme_list {
            lengths.push(("consonant_phoneme_list", consonants.len()));
        }
        if let Some(phoneme_length) = &self.phoneme_length {
            lengths.push(("phoneme_length", phoneme_length.len()));
        }
        if let Some(accent) = &self.accent {
            let names = [
                "start_accent_list",
                "end_accent_list",
                "start_accent_phrase_list",
                "end_accent_phrase_list",
            ];
            for (name, channel) in names.into_iter().zip(accent.channels()) {
                lengths.push((name, channel.len()));
            }
        }
        if let Some(f0) = &self.f0 {
            lengths.push(("f0", f0.len()));
        }
        if let Some(voiced) = &self.voiced {
            lengths.push(("voiced", voiced.len()));
        }
        lengths
    }
}
