use std::fs;
use std::path::Path;

use anyhow::{anyhow, ensure, Context, Result};

use super::{phoneme_id, PAUSE};
use crate::types::PhonemeSegment;

/// Allowed drift between one segment's end and the next one's start.
const CONTIGUITY_TOLERANCE: f64 = 1e-6;

/// Reads a Julius-style label file (`start end symbol` per line).
pub fn load_phoneme_list(path: &Path) -> Result<Vec<PhonemeSegment>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read phoneme list {:?}", path))?;
    parse_phoneme_list(&data).with_context(|| format!("invalid phoneme list {:?}", path))
}

/// Parses label text into a contiguous, non-empty segment list.
pub fn parse_phoneme_list(data: &str) -> Result<Vec<PhonemeSegment>> {
    let mut segments = Vec::new();

    for (idx, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let (Some(start), Some(end), Some(raw_symbol)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(anyhow!(
                "line {idx} must contain start, end and phoneme: {trimmed}"
            ));
        };

        let start: f64 = start
            .parse()
            .with_context(|| format!("line {idx} has invalid start time '{start}'"))?;
        let end: f64 = end
            .parse()
            .with_context(|| format!("line {idx} has invalid end time '{end}'"))?;
        ensure!(end >= start, "line {idx} ends before it starts");

        let symbol = normalize_symbol(raw_symbol);
        let id = phoneme_id(symbol)
            .ok_or_else(|| anyhow!("line {idx} has unknown phoneme '{raw_symbol}'"))?;

        segments.push(PhonemeSegment {
            symbol: symbol.to_string(),
            id,
            start,
            end,
        });
    }

    ensure!(!segments.is_empty(), "phoneme list contains no segments");
    for (idx, pair) in segments.windows(2).enumerate() {
        ensure!(
            (pair[0].end - pair[1].start).abs() <= CONTIGUITY_TOLERANCE,
            "segment {} ends at {} but segment {} starts at {}",
            idx,
            pair[0].end,
            idx + 1,
            pair[1].start
        );
    }

    Ok(segments)
}

fn normalize_symbol(raw: &str) -> &str {
    match raw {
        "sil" | "silB" | "silE" | "sp" => PAUSE,
        other => other,
    }
}
