use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde_json::{Map, Value};

/// Maps each utterance key to the id of its speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerAssignment {
    ids: HashMap<String, i64>,
    speaker_size: usize,
}

impl SpeakerAssignment {
    /// Reads a `{"speaker": ["key", ...]}` dictionary; ids follow declaration order.
    pub fn load(path: &Path, speaker_size: usize) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read speaker dictionary {:?}", path))?;
        Self::from_json(&data, speaker_size)
            .with_context(|| format!("invalid speaker dictionary {:?}", path))
    }

    pub fn from_json(raw: &str, speaker_size: usize) -> Result<Self> {
        let speakers: Map<String, Value> =
            serde_json::from_str(raw).context("speaker dictionary must be a JSON object")?;
        ensure!(
            speakers.len() == speaker_size,
            "speaker dictionary has {} speakers, expected {}",
            speakers.len(),
            speaker_size
        );

        let mut ids = HashMap::new();
        for (speaker_id, (speaker, keys)) in speakers.into_iter().enumerate() {
            let keys: Vec<String> = serde_json::from_value(keys)
                .with_context(|| format!("speaker {speaker:?} must list utterance keys"))?;
            for key in keys {
                if ids.insert(key.clone(), speaker_id as i64).is_some() {
                    bail!("utterance {key:?} is assigned to more than one speaker");
                }
            }
        }

        Ok(Self { ids, speaker_size })
    }

    pub fn speaker_size(&self) -> usize {
        self.speaker_size
    }

    pub fn speaker_id(&self, key: &str) -> Option<i64> {
        self.ids.get(key).copied()
    }

    /// Fails if any of `keys` has no speaker.
    pub fn ensure_covers(&self, keys: &BTreeSet<String>) -> Result<()> {
        let missing: Vec<&String> = keys
            .iter()
            .filter(|key| !self.ids.contains_key(key.as_str()))
            .collect();
        ensure!(
            missing.is_empty(),
            "speaker dictionary does not cover keys {:?}",
            missing
        );
        Ok(())
    }
}
