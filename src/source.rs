//! Materialization of raw per-utterance annotation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::phoneme::load_phoneme_list;
use crate::signal::load_signal;
use crate::types::{MarkerLists, UtteranceInput};

/// Produces the raw annotation of one utterance on demand.
pub trait AnnotationSource: Send + Sync {
    fn load(&self) -> Result<UtteranceInput>;
}

impl AnnotationSource for UtteranceInput {
    fn load(&self) -> Result<UtteranceInput> {
        Ok(self.clone())
    }
}

/// Paths of the four accent marker files of one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFiles {
    pub start_accent: PathBuf,
    pub end_accent: PathBuf,
    pub start_accent_phrase: PathBuf,
    pub end_accent_phrase: PathBuf,
}

impl MarkerFiles {
    pub fn load(&self) -> Result<MarkerLists> {
        Ok(MarkerLists {
            start_accent: load_marker_list(&self.start_accent)?,
            end_accent: load_marker_list(&self.end_accent)?,
            start_accent_phrase: load_marker_list(&self.start_accent_phrase)?,
            end_accent_phrase: load_marker_list(&self.end_accent_phrase)?,
        })
    }
}

/// Lazy descriptor of one utterance's files; nothing is read until [`AnnotationSource::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceFiles {
    pub phoneme_list: PathBuf,
    pub markers: Option<MarkerFiles>,
    pub f0: Option<PathBuf>,
    pub volume: Option<PathBuf>,
}

impl AnnotationSource for UtteranceFiles {
    fn load(&self) -> Result<UtteranceInput> {
        Ok(UtteranceInput {
            phonemes: load_phoneme_list(&self.phoneme_list)?,
            markers: self.markers.as_ref().map(MarkerFiles::load).transpose()?,
            f0: self.f0.as_deref().map(load_signal).transpose()?,
            volume: self.volume.as_deref().map(load_signal).transpose()?,
        })
    }
}

/// Reads whitespace-separated integer flags; any nonzero value is `true`.
pub fn load_marker_list(path: &Path) -> Result<Vec<bool>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read marker list {:?}", path))?;
    parse_marker_list(&data).with_context(|| format!("invalid marker list {:?}", path))
}

pub fn parse_marker_list(data: &str) -> Result<Vec<bool>> {
    data.split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map(|value| value != 0)
                .with_context(|| format!("marker '{token}' is not an integer"))
        })
        .collect()
}
