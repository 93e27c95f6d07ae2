use crate::telemetry::logging;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One help topic as exported from the `help_entries` store. Read-only input;
/// the resolver never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub tag: String,
    pub raw_text: String,
    pub min_level: i32,
    pub last_updated: String,
    pub keywords: String,
}

/// On-disk snapshot row. `entry` is base64 because help text is stored in a
/// single-byte encoding and need not be valid UTF-8, while the snapshot file
/// itself must be.
#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    tag: String,
    entry: String,
    #[serde(default)]
    min_level: i32,
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    keywords: String,
}

/// The fully materialized help corpus, keyed by lower-cased tag.
#[derive(Debug, Default)]
pub struct HelpCorpus {
    entries: BTreeMap<String, HelpEntry>,
}

impl HelpCorpus {
    pub fn insert(&mut self, entry: HelpEntry) {
        self.entries.insert(entry.tag.to_ascii_lowercase(), entry);
    }

    pub fn lookup(&self, key: &str) -> Option<&HelpEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads a corpus snapshot (YAML list of entries). Decoding failures on a
/// single entry keep the entry with its text taken verbatim; older exporters
/// wrote plain text instead of base64.
pub fn load_snapshot(path: &Path) -> Result<HelpCorpus, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read help snapshot {}: {}", path.display(), err))?;
    let rows: Vec<SnapshotEntry> = serde_yaml::from_str(&raw)
        .map_err(|err| format!("failed to parse help snapshot {}: {}", path.display(), err))?;

    let mut corpus = HelpCorpus::default();
    for row in rows {
        let raw_text = match BASE64_ENGINE.decode(row.entry.trim()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => row.entry,
        };
        corpus.insert(HelpEntry {
            tag: row.tag,
            raw_text,
            min_level: row.min_level,
            last_updated: row.last_updated,
            keywords: row.keywords,
        });
    }
    Ok(corpus)
}

/// Snapshot loading that degrades to an empty corpus. Resolution must still
/// produce class-only records when the store is unreachable, so corpus
/// failures never propagate.
pub fn load_snapshot_or_empty(path: &Path) -> HelpCorpus {
    match load_snapshot(path) {
        Ok(corpus) => corpus,
        Err(err) => {
            eprintln!("grimoire: help corpus unavailable: {}", err);
            logging::log_error(&format!("help corpus unavailable: {}", err));
            HelpCorpus::default()
        }
    }
}
