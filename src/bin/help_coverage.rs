use grimoire::catalog::classes::load_assignments;
use grimoire::catalog::spells::load_spell_catalog;
use grimoire::help::corpus::load_snapshot_or_empty;
use grimoire::keys::DEFAULT_HELP_PREFIX;
use grimoire::resolve::resolve_records;
use std::path::{Path, PathBuf};

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err("usage: help_coverage <mud-src-root> [snapshot.yaml]".to_string());
    }
    let root = Path::new(&args[1]);
    let snapshot = if args.len() > 2 {
        PathBuf::from(&args[2])
    } else {
        root.join("help_snapshot.yaml")
    };

    let (catalog, _) = load_spell_catalog(&root.join("spell_parser.c"));
    let (assignments, _) = load_assignments(&root.join("class.c"));
    let corpus = load_snapshot_or_empty(&snapshot);
    let (records, report) = resolve_records(&catalog, &assignments, &corpus, DEFAULT_HELP_PREFIX);

    let missing: Vec<&str> = records
        .iter()
        .filter(|record| record.matched_help.is_none())
        .map(|record| record.display_name.as_str())
        .collect();

    println!("help coverage:");
    println!("- help entries: {}", corpus.len());
    println!("- records: {}", report.resolved);
    println!("- records with help: {}", report.with_help);
    println!("- records without help: {}", missing.len());
    if !missing.is_empty() {
        println!("missing help entries:");
        for name in missing {
            println!("- {}", name);
        }
    }
    Ok(())
}
