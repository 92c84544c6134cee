//! Utterance index, train/test split and example materialization.

pub mod discovery;
pub mod speaker;
pub mod split;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use rand::Rng;
use tracing::info;

use crate::config::{DatasetConfig, DatasetKind};
use crate::features::{AccentFeatureExtractor, DurationFeatureExtractor, FeatureExtractor};
use crate::source::{AnnotationSource, MarkerFiles, UtteranceFiles};
use crate::types::FeatureExample;

pub use discovery::{discover, ensure_same_keys, ensure_superset};
pub use speaker::SpeakerAssignment;
pub use split::{shuffle_split, DatasetSplit};

/// One indexed utterance: its key, where to load it from, and its speaker.
#[derive(Clone)]
pub struct DatasetItem {
    pub key: String,
    pub source: Arc<dyn AnnotationSource>,
    pub speaker_id: Option<i64>,
}

impl std::fmt::Debug for DatasetItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetItem")
            .field("key", &self.key)
            .field("speaker_id", &self.speaker_id)
            .finish_non_exhaustive()
    }
}

/// Indexable collection of lazily loaded utterances.
///
/// Immutable after construction. Each [`FeatureDataset::get`] reloads the utterance and
/// draws a new window and masks from the caller's generator.
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    items: Arc<[DatasetItem]>,
    extractor: FeatureExtractor,
    trial_num: usize,
}

impl FeatureDataset {
    pub fn new(items: Vec<DatasetItem>, extractor: FeatureExtractor) -> Self {
        Self {
            items: items.into(),
            extractor,
            trial_num: 1,
        }
    }

    /// Repeats every utterance `trial_num` times without copying the index.
    pub fn repeated(mut self, trial_num: usize) -> Result<Self> {
        ensure!(trial_num > 0, "trial count must be positive");
        self.trial_num = trial_num;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len() * self.trial_num
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct utterances, ignoring repetition.
    pub fn utterance_count(&self) -> usize {
        self.items.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<FeatureExample> {
        ensure!(
            index < self.len(),
            "index {} out of range for dataset of {} examples",
            index,
            self.len()
        );
        let item = &self.items[index % self.items.len()];
        let input = item
            .source
            .load()
            .with_context(|| format!("failed to load utterance {:?}", item.key))?;
        let mut example = self
            .extractor
            .extract(&input, rng)
            .with_context(|| format!("failed to build features for {:?}", item.key))?;
        example.speaker_id = item.speaker_id;
        Ok(example)
    }

    /// [`FeatureDataset::get`] using the calling thread's generator.
    pub fn get_with_thread_rng(&self, index: usize) -> Result<FeatureExample> {
        self.get(index, &mut rand::thread_rng())
    }
}

/// The train and test views built from one configuration.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub train: FeatureDataset,
    pub test: FeatureDataset,
}

impl Datasets {
    pub fn key_count(&self) -> usize {
        self.train.utterance_count() + self.test.utterance_count()
    }
}

/// Discovers the configured files, checks they line up, and splits them.
pub fn create_dataset(config: &DatasetConfig) -> Result<Datasets> {
    config.validate()?;

    let phoneme_files = discover(&config.phoneme_list_glob)?;
    ensure!(
        !phoneme_files.is_empty(),
        "no phoneme lists match {:?}",
        config.phoneme_list_glob
    );
    let keys: BTreeSet<String> = phoneme_files.keys().cloned().collect();

    let f0_files = config.f0_glob.as_deref().map(discover).transpose()?;
    if let Some(f0_files) = &f0_files {
        ensure_same_keys("f0", &keys, f0_files)?;
    }
    let volume_files = config.volume_glob.as_deref().map(discover).transpose()?;
    if let Some(volume_files) = &volume_files {
        ensure_superset("volume", &keys, volume_files)?;
    }
    let marker_files = match (&config.accent, config.kind) {
        (Some(globs), DatasetKind::Accent) => Some(MarkerPaths {
            start_accent: discover_same("start_accent_list", &globs.start_accent_list_glob, &keys)?,
            end_accent: discover_same("end_accent_list", &globs.end_accent_list_glob, &keys)?,
            start_accent_phrase: discover_same(
                "start_accent_phrase_list",
                &globs.start_accent_phrase_list_glob,
                &keys,
            )?,
            end_accent_phrase: discover_same(
                "end_accent_phrase_list",
                &globs.end_accent_phrase_list_glob,
                &keys,
            )?,
        }),
        _ => None,
    };

    let speakers = match (&config.speaker_dict_path, config.speaker_size) {
        (Some(path), Some(size)) => {
            let speakers = SpeakerAssignment::load(path, size)?;
            speakers.ensure_covers(&keys)?;
            Some(speakers)
        }
        _ => None,
    };

    let mut items: BTreeMap<String, DatasetItem> = BTreeMap::new();
    for (key, phoneme_list) in phoneme_files {
        let files = UtteranceFiles {
            phoneme_list,
            markers: marker_files.as_ref().and_then(|markers| markers.get(&key)),
            f0: f0_files.as_ref().and_then(|files| files.get(&key).cloned()),
            volume: volume_files.as_ref().and_then(|files| files.get(&key).cloned()),
        };
        let speaker_id = speakers
            .as_ref()
            .and_then(|speakers| speakers.speaker_id(&key));
        items.insert(
            key.clone(),
            DatasetItem {
                key,
                source: Arc::new(files),
                speaker_id,
            },
        );
    }

    let split = shuffle_split(keys, config.seed, config.test_num);
    let (train_extractor, test_extractor) = extractors(config);
    let train = FeatureDataset::new(take_items(&mut items, &split.train), train_extractor);
    let test = FeatureDataset::new(take_items(&mut items, &split.test), test_extractor)
        .repeated(config.test_trial_num)?;

    info!(
        keys = train.utterance_count() + test.utterance_count(),
        train = train.len(),
        test = test.len(),
        "built dataset index"
    );
    Ok(Datasets { train, test })
}

/// Training uses the configured masks; evaluation never masks.
fn extractors(config: &DatasetConfig) -> (FeatureExtractor, FeatureExtractor) {
    match config.kind {
        DatasetKind::Duration => {
            let extractor = FeatureExtractor::Duration(DurationFeatureExtractor::new(
                config.sampling_length,
            ));
            (extractor.clone(), extractor)
        }
        DatasetKind::Accent => {
            let test = AccentFeatureExtractor::new(config.sampling_length, config.f0_process_mode);
            let train = test
                .clone()
                .with_masks(config.phoneme_mask(), config.accent_mask());
            (
                FeatureExtractor::Accent(train),
                FeatureExtractor::Accent(test),
            )
        }
    }
}

fn take_items(items: &mut BTreeMap<String, DatasetItem>, keys: &[String]) -> Vec<DatasetItem> {
    keys.iter().filter_map(|key| items.remove(key)).collect()
}

fn discover_same(
    name: &str,
    pattern: &str,
    keys: &BTreeSet<String>,
) -> Result<BTreeMap<String, PathBuf>> {
    let files = discover(pattern)?;
    ensure_same_keys(name, keys, &files)?;
    Ok(files)
}

struct MarkerPaths {
    start_accent: BTreeMap<String, PathBuf>,
    end_accent: BTreeMap<String, PathBuf>,
    start_accent_phrase: BTreeMap<String, PathBuf>,
    end_accent_phrase: BTreeMap<String, PathBuf>,
}

impl MarkerPaths {
    fn get(&self, key: &str) -> Option<MarkerFiles> {
        Some(MarkerFiles {
            start_accent: self.start_accent.get(key)?.clone(),
            end_accent: self.end_accent.get(key)?.clone(),
            start_accent_phrase: self.start_accent_phrase.get(key)?.clone(),
            end_accent_phrase: self.end_accent_phrase.get(key)?.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phoneme::parse_phoneme_list;
    use crate::types::UtteranceInput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(key: &str, speaker_id: Option<i64>) -> DatasetItem {
        let input = UtteranceInput {
            phonemes: parse_phoneme_list("0.0 0.5 pau\n0.5 1.0 a\n").unwrap(),
            markers: None,
            f0: None,
            volume: None,
        };
        DatasetItem {
            key: key.to_string(),
            source: Arc::new(input),
            speaker_id,
        }
    }

    fn dataset() -> FeatureDataset {
        FeatureDataset::new(
            vec![item("a", Some(2)), item("b", None)],
            FeatureExtractor::Duration(DurationFeatureExtractor::new(4)),
        )
    }

    #[test]
    fn get_attaches_speaker_and_fixed_length() {
        let mut rng = StdRng::seed_from_u64(0);
        let example = dataset().get(0, &mut rng).unwrap();
        assert_eq!(example.len(), 4);
        assert_eq!(example.speaker_id, Some(2));
        assert_eq!(dataset().get(1, &mut rng).unwrap().speaker_id, None);
    }

    #[test]
    fn repetition_wraps_indexes() {
        let repeated = dataset().repeated(3).unwrap();
        assert_eq!(repeated.len(), 6);
        assert_eq!(repeated.utterance_count(), 2);

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(repeated.get(4, &mut rng).unwrap().speaker_id, Some(2));
        assert!(repeated.get(6, &mut rng).is_err());
        assert!(dataset().repeated(0).is_err());
    }

    #[test]
    fn thread_rng_lookup_works() {
        let example = dataset().get_with_thread_rng(1).unwrap();
        assert_eq!(example.padded.iter().filter(|&&p| p).count(), 2);
    }
}
