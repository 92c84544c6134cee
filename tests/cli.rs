mod common;

use assert_cmd::Command;
use common::DatasetFixture;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn summary_reports_split_sizes() {
    let dir = tempdir().expect("tempdir");
    let fixture = DatasetFixture::write(dir.path(), 5);
    let config = fixture.write_config(0, 2, r#", "test_trial_num": 2"#);

    Command::cargo_bin("prosody-dataset")
        .expect("binary builds")
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("keys: 5"))
        .stdout(predicate::str::contains("train: 3"))
        .stdout(predicate::str::contains("test: 4 (2 utterances)"));
}

#[test]
fn sample_prints_example_json() {
    let dir = tempdir().expect("tempdir");
    let fixture = DatasetFixture::write(dir.path(), 3);
    let config = fixture.write_config(0, 1, "");

    let output = Command::cargo_bin("prosody-dataset")
        .expect("binary builds")
        .arg("--config")
        .arg(&config)
        .args(["sample", "--split", "test", "--index", "0", "--seed", "5"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());

    let example: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    for channel in ["phoneme_list", "consonant_phoneme_list", "start_accent_list", "f0", "padded"] {
        assert!(example.get(channel).is_some(), "missing {channel}");
    }
}

#[test]
fn missing_config_fails() {
    Command::cargo_bin("prosody-dataset")
        .expect("binary builds")
        .args(["--config", "/nonexistent/config.json", "summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.json"));
}
