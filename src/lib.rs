pub mod cli;
pub mod config;
pub mod dataset;
pub mod features;
pub mod mora;
pub mod phoneme;
pub mod sampling;
pub mod signal;
pub mod source;
pub mod types;

pub use config::{DatasetConfig, DatasetKind, F0ProcessMode};
pub use dataset::{create_dataset, Datasets, FeatureDataset};
pub use features::FeatureExtractor;
pub use source::AnnotationSource;
pub use types::{FeatureExample, PhonemeSegment, Signal, UtteranceInput};
