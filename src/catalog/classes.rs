use crate::catalog::source::{read_source, scan_calls};
use crate::keys::catalog_key;
use crate::telemetry::logging;
use std::collections::BTreeMap;
use std::path::Path;

const ASSIGNMENT_CALLEE: &str = "spell_assignment";

/// Class constants as they appear in the declarative source, paired with the
/// display names used everywhere downstream. Constants not in this table pass
/// through verbatim so a newly added class still shows up in the output.
const CLASS_NAMES: [(&str, &str); 11] = [
    ("CLASS_WIZARD", "Wizard"),
    ("CLASS_CLERIC", "Cleric"),
    ("CLASS_DRUID", "Druid"),
    ("CLASS_SORCERER", "Sorcerer"),
    ("CLASS_BARD", "Bard"),
    ("CLASS_PALADIN", "Paladin"),
    ("CLASS_RANGER", "Ranger"),
    ("CLASS_ROGUE", "Rogue"),
    ("CLASS_MONK", "Monk"),
    ("CLASS_WARRIOR", "Warrior"),
    ("CLASS_BERSERKER", "Berserker"),
];

pub fn class_display_name(constant: &str) -> String {
    for (known, name) in CLASS_NAMES {
        if constant == known {
            return name.to_string();
        }
    }
    constant.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAssignment {
    pub class_name: String,
    pub level: u32,
}

/// spell key -> every (class, level) declaration for that spell. Repeated
/// declarations for the same class/spell pair are all retained; ordering is
/// imposed later, duplicates are never collapsed.
#[derive(Debug, Default)]
pub struct AssignmentIndex {
    pub by_spell: BTreeMap<String, Vec<ClassAssignment>>,
}

impl AssignmentIndex {
    pub fn get(&self, key: &str) -> Option<&[ClassAssignment]> {
        self.by_spell.get(key).map(|list| list.as_slice())
    }

    pub fn spell_count(&self) -> usize {
        self.by_spell.len()
    }

    pub fn assignment_count(&self) -> usize {
        self.by_spell.values().map(|list| list.len()).sum()
    }
}

#[derive(Debug, Default)]
pub struct AssignmentScanReport {
    pub calls: usize,
    pub assignments: usize,
    pub malformed: usize,
}

/// Derives the join key from a spell constant: the `SPELL_`/`PSIONIC_` prefix
/// goes, the rest is flattened like a catalog key.
fn spell_key_from_constant(constant: &str) -> String {
    let trimmed = constant
        .strip_prefix("SPELL_")
        .or_else(|| constant.strip_prefix("PSIONIC_"))
        .unwrap_or(constant);
    catalog_key(trimmed)
}

/// Scans for `spell_assignment(CLASS_X, SPELL_Y, level)` triples.
pub fn extract_assignments(source: &str) -> (AssignmentIndex, AssignmentScanReport) {
    let mut index = AssignmentIndex::default();
    let mut report = AssignmentScanReport::default();

    for call in scan_calls(source, ASSIGNMENT_CALLEE) {
        report.calls += 1;
        let class_constant = call.args.first().and_then(|arg| arg.as_ident());
        let spell_constant = call.args.get(1).and_then(|arg| arg.as_ident());
        let level = call.args.get(2).and_then(|arg| arg.as_number());
        let (Some(class_constant), Some(spell_constant), Some(level)) =
            (class_constant, spell_constant, level)
        else {
            report.malformed += 1;
            continue;
        };
        if level < 1 {
            report.malformed += 1;
            continue;
        }
        index
            .by_spell
            .entry(spell_key_from_constant(spell_constant))
            .or_default()
            .push(ClassAssignment {
                class_name: class_display_name(class_constant),
                level: level as u32,
            });
    }

    report.assignments = index.assignment_count();
    (index, report)
}

/// Loads and scans the class assignment source, degrading to an empty index
/// on read failure.
pub fn load_assignments(path: &Path) -> (AssignmentIndex, AssignmentScanReport) {
    match read_source(path) {
        Ok(source) => extract_assignments(&source),
        Err(err) => {
            eprintln!("grimoire: class assignments unavailable: {}", err);
            logging::log_error(&format!("class assignments unavailable: {}", err));
            (AssignmentIndex::default(), AssignmentScanReport::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        spell_assignment(CLASS_WIZARD, SPELL_MAGIC_MISSILE, 1);
        spell_assignment(CLASS_SORCERER, SPELL_MAGIC_MISSILE, 1);
        spell_assignment(CLASS_WIZARD, SPELL_CHAIN_LIGHTNING, 11);
        spell_assignment(CLASS_MYSTIC, SPELL_CHAIN_LIGHTNING, 11);
        spell_assignment(CLASS_WIZARD, SPELL_CHAIN_LIGHTNING, 11);
    "#;

    #[test]
    fn extract_maps_constants_to_display_names() {
        let (index, report) = extract_assignments(SOURCE);
        assert_eq!(report.calls, 5);
        assert_eq!(report.assignments, 5);

        let missile = index.get("magic missile").expect("magic missile");
        assert_eq!(missile.len(), 2);
        assert_eq!(missile[0].class_name, "Wizard");
        assert_eq!(missile[1].class_name, "Sorcerer");
        assert_eq!(missile[0].level, 1);
    }

    #[test]
    fn unknown_class_constant_passes_through() {
        let (index, _) = extract_assignments(SOURCE);
        let chain = index.get("chain lightning").expect("chain lightning");
        assert!(chain.iter().any(|a| a.class_name == "CLASS_MYSTIC"));
    }

    #[test]
    fn duplicate_declarations_are_retained() {
        let (index, _) = extract_assignments(SOURCE);
        let chain = index.get("chain lightning").expect("chain lightning");
        let wizard_count = chain.iter().filter(|a| a.class_name == "Wizard").count();
        assert_eq!(wizard_count, 2);
    }

    #[test]
    fn zero_level_declaration_is_malformed() {
        let (_, report) =
            extract_assignments("spell_assignment(CLASS_WIZARD, SPELL_BROKEN, 0);");
        assert_eq!(report.malformed, 1);
        assert_eq!(report.assignments, 0);
    }
}
