use grimoire::catalog::classes::load_assignments;
use grimoire::catalog::spells::load_spell_catalog;
use grimoire::help::corpus::HelpCorpus;
use grimoire::keys::DEFAULT_HELP_PREFIX;
use grimoire::resolve::resolve_records;
use std::path::Path;

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err("usage: spell_audit <mud-src-root>".to_string());
    }
    let root = Path::new(&args[1]);

    let (catalog, catalog_report) = load_spell_catalog(&root.join("spell_parser.c"));
    let (assignments, assignment_report) = load_assignments(&root.join("class.c"));
    let corpus = HelpCorpus::default();
    let (records, resolve_report) =
        resolve_records(&catalog, &assignments, &corpus, DEFAULT_HELP_PREFIX);

    let mut unassigned: Vec<&str> = Vec::new();
    for entry in catalog.entries.values() {
        if !records.iter().any(|r| r.identifier == entry.identifier) {
            unassigned.push(&entry.display_name);
        }
    }

    println!("spell extraction audit:");
    println!("- spello calls: {}", catalog_report.calls);
    println!("- catalog entries: {}", catalog_report.entries);
    println!("- unused slots skipped: {}", catalog_report.skipped_unused);
    println!("- malformed spello calls: {}", catalog_report.malformed);
    println!("- assignment calls: {}", assignment_report.calls);
    println!("- assignments: {}", assignment_report.assignments);
    println!("- malformed assignments: {}", assignment_report.malformed);
    println!("- resolvable records: {}", resolve_report.resolved);
    println!("- assignments below any circle: {}", resolve_report.dropped_levels);
    if !unassigned.is_empty() {
        println!("spells with no class assignment:");
        for name in &unassigned {
            println!("- {}", name);
        }
    }

    if catalog.is_empty() {
        return Err("no spells extracted; check the source root".to_string());
    }
    Ok(())
}
