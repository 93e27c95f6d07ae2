use crate::catalog::source::{read_source, scan_calls};
use crate::keys::catalog_key;
use crate::telemetry::logging;
use std::collections::BTreeMap;
use std::path::Path;

/// Marker used by the MUD sources for reserved slots that never became spells.
pub const UNUSED_MARKER: &str = "!UNUSED!";

const SPELLO_CALLEE: &str = "spello";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCatalogEntry {
    pub identifier: String,
    pub display_name: String,
}

/// The base catalog: canonical key -> declared spell. BTreeMap keeps every
/// downstream pass in sorted key order, so resolution stays deterministic.
#[derive(Debug, Default)]
pub struct SpellCatalog {
    pub entries: BTreeMap<String, SpellCatalogEntry>,
}

impl SpellCatalog {
    pub fn get(&self, key: &str) -> Option<&SpellCatalogEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CatalogScanReport {
    pub calls: usize,
    pub entries: usize,
    pub skipped_unused: usize,
    pub malformed: usize,
}

/// Scans declarative source text for `spello(IDENT, "display name", ...)`.
pub fn extract_spell_catalog(source: &str) -> (SpellCatalog, CatalogScanReport) {
    let mut catalog = SpellCatalog::default();
    let mut report = CatalogScanReport::default();

    for call in scan_calls(source, SPELLO_CALLEE) {
        report.calls += 1;
        let identifier = match call.args.first().and_then(|arg| arg.as_ident()) {
            Some(identifier) => identifier.to_string(),
            None => {
                report.malformed += 1;
                continue;
            }
        };
        let display_name = match call.args.get(1).and_then(|arg| arg.as_text()) {
            Some(name) => name.to_string(),
            None => {
                report.malformed += 1;
                continue;
            }
        };
        if display_name.contains(UNUSED_MARKER) {
            report.skipped_unused += 1;
            continue;
        }
        let key = catalog_key(&display_name);
        catalog.entries.insert(
            key,
            SpellCatalogEntry {
                identifier,
                display_name,
            },
        );
    }

    report.entries = catalog.len();
    (catalog, report)
}

/// Loads and scans a spell declaration source. A missing or unreadable file
/// is not fatal: the catalog comes back empty and the failure is logged, so
/// generation continues on whatever the other sources still provide.
pub fn load_spell_catalog(path: &Path) -> (SpellCatalog, CatalogScanReport) {
    match read_source(path) {
        Ok(source) => extract_spell_catalog(&source),
        Err(err) => {
            eprintln!("grimoire: spell catalog unavailable: {}", err);
            logging::log_error(&format!("spell catalog unavailable: {}", err));
            (SpellCatalog::default(), CatalogScanReport::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        spello(SPELL_MAGIC_MISSILE, "magic missile", 30, 15, 1, POS_FIGHTING,
               TAR_CHAR_ROOM | TAR_FIGHT_VICT, TRUE, MAG_DAMAGE);
        spello(SPELL_RESERVED_DND, "!UNUSED!", 0, 0, 0, 0, 0, FALSE, 0);
        spello(SPELL_CHAIN_LIGHTNING, "chain lightning", 40, 25, 2, POS_FIGHTING,
               TAR_IGNORE, TRUE, MAG_AREAS);
    "#;

    #[test]
    fn extract_builds_keyed_catalog() {
        let (catalog, report) = extract_spell_catalog(SOURCE);
        assert_eq!(report.calls, 3);
        assert_eq!(report.entries, 2);
        assert_eq!(report.skipped_unused, 1);

        let entry = catalog.get("magic missile").expect("magic missile");
        assert_eq!(entry.identifier, "SPELL_MAGIC_MISSILE");
        assert_eq!(entry.display_name, "magic missile");
        assert!(catalog.get("chain lightning").is_some());
    }

    #[test]
    fn unused_slots_never_enter_the_catalog() {
        let (catalog, _) = extract_spell_catalog(SOURCE);
        assert!(catalog
            .entries
            .values()
            .all(|entry| !entry.display_name.contains(UNUSED_MARKER)));
    }

    #[test]
    fn unreadable_source_degrades_to_empty_catalog() {
        let (catalog, report) = load_spell_catalog(Path::new("/nonexistent/spell_parser.c"));
        assert!(catalog.is_empty());
        assert_eq!(report.calls, 0);
    }
}
