use crate::catalog::classes::AssignmentIndex;
use crate::catalog::spells::SpellCatalog;
use crate::circles::{resolve_circle, Circle};
use crate::help::corpus::{HelpCorpus, HelpEntry};
use crate::help::fields::parse_help_text;
use crate::keys::candidate_keys;
use std::collections::BTreeMap;

/// One class's access to a spell: the declared character level and the circle
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCircleLevel {
    pub class_name: String,
    pub circle: Circle,
    pub level: u32,
}

/// The resolved, render-ready record for one spell. Built once during the
/// batch pass and read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSpellRecord {
    pub display_name: String,
    pub identifier: String,
    pub matched_help: Option<HelpEntry>,
    pub class_levels: Vec<ClassCircleLevel>,
    pub structured_fields: BTreeMap<String, String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct ResolveReport {
    pub resolved: usize,
    pub unassigned: usize,
    pub with_help: usize,
    pub dropped_levels: usize,
}

/// Finds the first candidate key that hits `lookup`, trying the catalog key
/// before the display-name variants. One ordered list of transforms, applied
/// everywhere a cross-dataset join happens.
fn first_hit<'a, T: ?Sized>(
    catalog_key: &str,
    display_name: &str,
    help_prefix: &str,
    lookup: impl Fn(&str) -> Option<&'a T>,
) -> Option<&'a T> {
    if let Some(found) = lookup(catalog_key) {
        return Some(found);
    }
    for key in candidate_keys(display_name, help_prefix) {
        if let Some(found) = lookup(&key) {
            return Some(found);
        }
    }
    None
}

/// Joins the spell catalog against class assignments and the help corpus and
/// emits the canonical record set, in catalog key order.
///
/// Spells with no class assignment are excluded entirely, help or not:
/// a spell no class can learn is not a usable record. Assignments whose level
/// opens no circle for that class are silently dropped.
pub fn resolve_records(
    catalog: &SpellCatalog,
    assignments: &AssignmentIndex,
    corpus: &HelpCorpus,
    help_prefix: &str,
) -> (Vec<CanonicalSpellRecord>, ResolveReport) {
    let mut records = Vec::new();
    let mut report = ResolveReport::default();

    for (key, entry) in &catalog.entries {
        let assigned = first_hit(key, &entry.display_name, help_prefix, |candidate| {
            assignments.get(candidate)
        });
        let Some(assigned) = assigned else {
            report.unassigned += 1;
            continue;
        };

        let mut class_levels = Vec::with_capacity(assigned.len());
        for assignment in assigned {
            match resolve_circle(&assignment.class_name, assignment.level) {
                Some(circle) => class_levels.push(ClassCircleLevel {
                    class_name: assignment.class_name.clone(),
                    circle,
                    level: assignment.level,
                }),
                None => report.dropped_levels += 1,
            }
        }
        class_levels.sort_by(|a, b| {
            (a.circle.rank(), a.class_name.as_str()).cmp(&(b.circle.rank(), b.class_name.as_str()))
        });

        let matched_help = first_hit(key, &entry.display_name, help_prefix, |candidate| {
            corpus.lookup(candidate)
        })
        .cloned();

        let (structured_fields, description) = match &matched_help {
            Some(help) => {
                report.with_help += 1;
                let parsed = parse_help_text(&help.raw_text);
                (parsed.fields, parsed.description)
            }
            None => (BTreeMap::new(), None),
        };

        records.push(CanonicalSpellRecord {
            display_name: entry.display_name.clone(),
            identifier: entry.identifier.clone(),
            matched_help,
            class_levels,
            structured_fields,
            description,
        });
    }

    report.resolved = records.len();
    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::classes::extract_assignments;
    use crate::catalog::spells::extract_spell_catalog;
    use crate::keys::DEFAULT_HELP_PREFIX;

    const SPELLS: &str = r#"
        spello(SPELL_CHAIN_LIGHTNING, "chain lightning", 0, 0);
        spello(SPELL_MAGIC_MISSILE, "magic missile", 0, 0);
        spello(SPELL_FORGOTTEN_RITE, "forgotten rite", 0, 0);
    "#;

    const CLASSES: &str = r#"
        spell_assignment(CLASS_WIZARD, SPELL_CHAIN_LIGHTNING, 21);
        spell_assignment(CLASS_SORCERER, SPELL_CHAIN_LIGHTNING, 13);
        spell_assignment(CLASS_WIZARD, SPELL_MAGIC_MISSILE, 1);
        spell_assignment(CLASS_PALADIN, SPELL_MAGIC_MISSILE, 5);
    "#;

    fn help_entry(tag: &str, text: &str) -> HelpEntry {
        HelpEntry {
            tag: tag.to_string(),
            raw_text: text.to_string(),
            min_level: 0,
            last_updated: "2024-01-01".to_string(),
            keywords: String::new(),
        }
    }

    fn resolve_fixture() -> (Vec<CanonicalSpellRecord>, ResolveReport) {
        let (catalog, _) = extract_spell_catalog(SPELLS);
        let (assignments, _) = extract_assignments(CLASSES);
        let mut corpus = HelpCorpus::default();
        corpus.insert(help_entry(
            "spell-chain-lightning",
            ">Description: You cast a bolt.\\n>See also: shock",
        ));
        corpus.insert(help_entry("forgotten rite", "lost lore"));
        resolve_records(&catalog, &assignments, &corpus, DEFAULT_HELP_PREFIX)
    }

    #[test]
    fn unassigned_spell_is_excluded_even_with_help() {
        let (records, report) = resolve_fixture();
        assert!(records.iter().all(|r| r.display_name != "forgotten rite"));
        assert_eq!(report.unassigned, 1);
        assert_eq!(report.resolved, 2);
    }

    #[test]
    fn help_matches_through_hyphenated_prefixed_tag() {
        let (records, _) = resolve_fixture();
        let chain = records
            .iter()
            .find(|r| r.display_name == "chain lightning")
            .expect("chain lightning");
        let help = chain.matched_help.as_ref().expect("matched help");
        assert_eq!(help.tag, "spell-chain-lightning");
        assert_eq!(chain.description.as_deref(), Some("You cast a bolt."));
    }

    #[test]
    fn epic_entries_sort_after_numbered_circles() {
        let (records, _) = resolve_fixture();
        let chain = records
            .iter()
            .find(|r| r.display_name == "chain lightning")
            .expect("chain lightning");
        assert_eq!(chain.class_levels.len(), 2);
        assert_eq!(chain.class_levels[0].class_name, "Sorcerer");
        assert!(!chain.class_levels[0].circle.is_epic());
        assert_eq!(chain.class_levels[1].class_name, "Wizard");
        assert!(chain.class_levels[1].circle.is_epic());
    }

    #[test]
    fn no_circle_assignments_are_dropped() {
        let (records, report) = resolve_fixture();
        let missile = records
            .iter()
            .find(|r| r.display_name == "magic missile")
            .expect("magic missile");
        // the paladin picks magic missile up at level 5, below the first tier
        assert_eq!(missile.class_levels.len(), 1);
        assert_eq!(missile.class_levels[0].class_name, "Wizard");
        assert_eq!(report.dropped_levels, 1);
    }

    #[test]
    fn recorded_circles_match_fresh_derivation() {
        let (records, _) = resolve_fixture();
        for record in &records {
            for entry in &record.class_levels {
                assert_eq!(
                    resolve_circle(&entry.class_name, entry.level),
                    Some(entry.circle),
                    "{} level {}",
                    entry.class_name,
                    entry.level
                );
            }
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let (first, _) = resolve_fixture();
        let (second, _) = resolve_fixture();
        assert_eq!(first, second);
    }
}
