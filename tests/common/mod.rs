#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use prosody_dataset::phoneme::parse_phoneme_list;
use prosody_dataset::types::{MarkerLists, Signal, UtteranceInput};

/// Four-phoneme utterance: pau, k, a, pau with quarter-second segments.
pub const LAB: &str = "0.0 0.25 pau\n0.25 0.5 k\n0.5 0.75 a\n0.75 1.0 pau\n";

const MARKER_DIRS: [&str; 4] = ["sa", "ea", "sap", "eap"];

/// Builds an in-memory utterance whose pitch is constant within each phoneme.
pub fn utterance(lab: &str, pitch: &[f32]) -> UtteranceInput {
    let phonemes = parse_phoneme_list(lab).expect("valid lab fixture");
    let mut samples = Vec::new();
    for (phoneme, &value) in phonemes.iter().zip(pitch) {
        let frames = (phoneme.duration() * 100.0).round() as usize;
        samples.extend(std::iter::repeat(value).take(frames));
    }
    let len = phonemes.len();
    UtteranceInput {
        markers: Some(MarkerLists {
            start_accent: (0..len).map(|i| i == 1).collect(),
            end_accent: (0..len).map(|i| i == 2).collect(),
            start_accent_phrase: (0..len).map(|i| i == 0).collect(),
            end_accent_phrase: (0..len).map(|i| i + 1 == len).collect(),
        }),
        phonemes,
        f0: Some(Signal::new(samples, 100.0)),
        volume: None,
    }
}

/// A longer utterance with a mix of voiced and unvoiced consonants.
pub fn long_utterance() -> UtteranceInput {
    let symbols = [
        "pau", "k", "o", "N", "n", "i", "ch", "i", "w", "a", "cl", "t", "e", "m", "o", "s", "u",
        "pau",
    ];
    let lab: String = symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| format!("{} {} {}\n", i as f64 * 0.25, (i + 1) as f64 * 0.25, symbol))
        .collect();
    let pitch: Vec<f32> = (0..symbols.len()).map(|i| 100.0 + 5.0 * i as f32).collect();
    utterance(&lab, &pitch)
}

/// On-disk accent dataset with `n` identical utterances keyed `u00`, `u01`, ...
pub struct DatasetFixture {
    pub root: PathBuf,
}

impl DatasetFixture {
    pub fn write(root: &Path, n: usize) -> Self {
        for dir in ["lab", "f0"].iter().chain(MARKER_DIRS.iter()) {
            fs::create_dir_all(root.join(dir)).expect("create fixture dir");
        }
        for i in 0..n {
            let key = format!("u{i:02}");
            fs::write(root.join("lab").join(format!("{key}.lab")), LAB).expect("write lab");
            let pitch: Vec<&str> = (0..100)
                .map(|frame| if (50..75).contains(&frame) { "150.0" } else { "0.0" })
                .collect();
            fs::write(
                root.join("f0").join(format!("{key}.json")),
                format!(r#"{{"rate": 100.0, "array": [{}]}}"#, pitch.join(", ")),
            )
            .expect("write f0");
            let marker_flags = ["0 0 1 0", "0 0 1 0", "1 0 0 0", "0 0 0 1"];
            for (dir, flags) in MARKER_DIRS.iter().zip(marker_flags) {
                let path = root.join(dir).join(format!("{key}.txt"));
                fs::write(path, flags).expect("write markers");
            }
        }
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn config_json(&self, seed: u64, test_num: usize, extra: &str) -> String {
        let glob = |dir: &str, ext: &str| {
            serde_json::to_string(&format!("{}/{}/*.{}", self.root.display(), dir, ext))
                .expect("serialize glob")
        };
        format!(
            r#"{{
                "kind": "accent",
                "phoneme_list_glob": {},
                "f0_glob": {},
                "accent": {{
                    "start_accent_list_glob": {},
                    "end_accent_list_glob": {},
                    "start_accent_phrase_list_glob": {},
                    "end_accent_phrase_list_glob": {}
                }},
                "sampling_length": 6,
                "f0_process_mode": "mora",
                "seed": {},
                "test_num": {}{}
            }}"#,
            glob("lab", "lab"),
            glob("f0", "json"),
            glob("sa", "txt"),
            glob("ea", "txt"),
            glob("sap", "txt"),
            glob("eap", "txt"),
            seed,
            test_num,
            extra
        )
    }

    pub fn write_config(&self, seed: u64, test_num: usize, extra: &str) -> PathBuf {
        let path = self.root.join("config.json");
        fs::write(&path, self.config_json(seed, test_num, extra)).expect("write config");
        path
    }
}
