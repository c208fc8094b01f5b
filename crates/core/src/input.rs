//! Loads already-fetched API documents from disk into domain values.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::types::{ClassificationInput, RepositorySnapshot};

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub sources: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

pub fn load_snapshots(
    input: &Path,
    max_total_bytes_scanned: u64,
) -> anyhow::Result<Loaded<RepositorySnapshot>> {
    load_json_documents(input, max_total_bytes_scanned)
}

pub fn load_issues(
    input: &Path,
    max_total_bytes_scanned: u64,
) -> anyhow::Result<Loaded<ClassificationInput>> {
    load_json_documents(input, max_total_bytes_scanned)
}

/// Reads every `*.json` file under `input` (or `input` itself), each holding
/// one document or an array of them. Files are visited in name order and
/// scanning stops once the byte budget would be exceeded.
fn load_json_documents<T: DeserializeOwned>(
    input: &Path,
    max_total_bytes_scanned: u64,
) -> anyhow::Result<Loaded<T>> {
    if !input.exists() {
        anyhow::bail!("input not found: {}", input.display());
    }

    let mut items: Vec<T> = Vec::new();
    let mut sources: Vec<String> = Vec::new();
    let mut scanned: u64 = 0;

    for entry in WalkDir::new(input).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "json" {
            continue;
        }

        let len = std::fs::metadata(path)?.len();
        if scanned.saturating_add(len) > max_total_bytes_scanned {
            tracing::warn!(path = %path.display(), scanned, "byte budget reached, skipping remaining files");
            break;
        }
        scanned += len;

        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let doc: OneOrMany<T> =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;

        let before = items.len();
        match doc {
            OneOrMany::Many(v) => items.extend(v),
            OneOrMany::One(one) => items.push(one),
        }
        tracing::debug!(path = %path.display(), documents = items.len() - before, "loaded");
        sources.push(path.display().to_string());
    }

    Ok(Loaded { items, sources })
}
