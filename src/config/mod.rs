use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::sampling::MaskConfig;

/// Which model the examples are prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Phoneme ids, per-phoneme durations and optional pitch
    Duration,
    /// Phoneme/mora ids, accent markers, aggregated pitch and voicing
    Accent,
}

/// Granularity at which pitch is aggregated for accent examples.
///
/// `mora_vowel` is a reserved name and is rejected when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum F0ProcessMode {
    Phoneme,
    Mora,
    VoicedMora,
}

/// File patterns of the four accent marker lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccentGlobs {
    pub start_accent_list_glob: String,
    pub end_accent_list_glob: String,
    pub start_accent_phrase_list_glob: String,
    pub end_accent_phrase_list_glob: String,
}

/// Dataset configuration parsed from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetConfig {
    pub kind: DatasetKind,
    pub phoneme_list_glob: String,
    #[serde(default)]
    pub f0_glob: Option<String>,
    #[serde(default)]
    pub volume_glob: Option<String>,
    #[serde(default)]
    pub accent: Option<AccentGlobs>,
    pub sampling_length: usize,
    #[serde(default = "default_f0_process_mode")]
    pub f0_process_mode: F0ProcessMode,
    #[serde(default)]
    pub phoneme_mask_max_length: usize,
    #[serde(default)]
    pub phoneme_mask_num: usize,
    #[serde(default)]
    pub accent_mask_max_length: usize,
    #[serde(default)]
    pub accent_mask_num: usize,
    #[serde(default)]
    pub speaker_dict_path: Option<PathBuf>,
    #[serde(default)]
    pub speaker_size: Option<usize>,
    pub seed: u64,
    pub test_num: usize,
    #[serde(default = "default_test_trial_num")]
    pub test_trial_num: usize,
}

fn default_f0_process_mode() -> F0ProcessMode {
    F0ProcessMode::Phoneme
}

fn default_test_trial_num() -> usize {
    1
}

impl DatasetConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset config {:?}", path))?;
        let config = Self::from_json(&data)
            .with_context(|| format!("invalid dataset config {:?}", path))?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.sampling_length > 0, "sampling_length must be positive");
        ensure!(self.test_trial_num > 0, "test_trial_num must be positive");
        if self.kind == DatasetKind::Accent {
            ensure!(
                self.accent.is_some(),
                "accent datasets require the accent marker globs"
            );
            ensure!(self.f0_glob.is_some(), "accent datasets require f0_glob");
        }
        ensure!(
            self.speaker_dict_path.is_some() == self.speaker_size.is_some(),
            "speaker_dict_path and speaker_size must be given together"
        );
        for (name, max_length) in [
            ("phoneme_mask_max_length", self.phoneme_mask_max_length),
            ("accent_mask_max_length", self.accent_mask_max_length),
        ] {
            ensure!(
                max_length <= self.sampling_length + 1,
                "{} ({}) must not exceed sampling_length + 1 ({})",
                name,
                max_length,
                self.sampling_length + 1
            );
        }
        Ok(())
    }

    pub fn phoneme_mask(&self) -> MaskConfig {
        MaskConfig::new(self.phoneme_mask_max_length, self.phoneme_mask_num)
    }

    pub fn accent_mask(&self) -> MaskConfig {
        MaskConfig::new(self.accent_mask_max_length, self.accent_mask_num)
    }
}
