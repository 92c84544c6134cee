use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use tracing::debug;

/// Lists the files matching the glob `pattern`, keyed by file stem.
///
/// Wildcards may appear in any path component, so per-speaker layouts such as
/// `root/*/lab/*.lab` work. Two matches with the same stem are an error.
pub fn discover(pattern: &str) -> Result<BTreeMap<String, PathBuf>> {
    let paths =
        glob::glob(pattern).with_context(|| format!("invalid file pattern {pattern:?}"))?;

    let mut files = BTreeMap::new();
    for entry in paths {
        let path = entry.with_context(|| format!("failed to read a match of {pattern:?}"))?;
        if !path.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if let Some(previous) = files.insert(stem.to_string(), path.clone()) {
            bail!(
                "pattern {pattern:?} matched {:?} and {:?} with the same key",
                previous,
                path
            );
        }
    }

    debug!(pattern, keys = files.len(), "discovered files");
    Ok(files)
}

/// Fails unless `found` has exactly the `expected` keys.
pub fn ensure_same_keys<V>(
    name: &str,
    expected: &BTreeSet<String>,
    found: &BTreeMap<String, V>,
) -> Result<()> {
    let found_keys: BTreeSet<&String> = found.keys().collect();
    let missing: Vec<&String> = expected
        .iter()
        .filter(|key| !found_keys.contains(key))
        .collect();
    let extra: Vec<&&String> = found_keys
        .iter()
        .filter(|key| !expected.contains(key.as_str()))
        .collect();
    ensure!(
        missing.is_empty() && extra.is_empty(),
        "{name} keys differ from phoneme list keys (missing: {:?}, extra: {:?})",
        missing,
        extra
    );
    Ok(())
}

/// Fails unless every `expected` key is present in `found`.
pub fn ensure_superset<V>(
    name: &str,
    expected: &BTreeSet<String>,
    found: &BTreeMap<String, V>,
) -> Result<()> {
    let missing: Vec<&String> = expected
        .iter()
        .filter(|key| !found.contains_key(key.as_str()))
        .collect();
    ensure!(
        missing.is_empty(),
        "{name} is missing keys {:?}",
        missing
    );
    Ok(())
}
