pub mod catalog;
pub mod circles;
mod config;
pub mod help;
pub mod keys;
pub mod net;
pub mod render;
pub mod resolve;
pub mod telemetry;

pub use circles::{resolve_circle, Circle, ClassFamily};
pub use keys::{candidate_keys, catalog_key};
pub use resolve::{resolve_records, CanonicalSpellRecord, ClassCircleLevel};

pub fn run(args: &[String]) -> Result<(), String> {
    let config = config::AppConfig::from_args(args)?;
    std::fs::create_dir_all(&config.output_dir).map_err(|err| {
        format!(
            "failed to create output dir {}: {}",
            config.output_dir.display(),
            err
        )
    })?;
    telemetry::logging::init(&config.output_dir)?;

    let (spell_catalog, catalog_report) = catalog::spells::load_spell_catalog(&config.spell_source);
    let (assignments, assignment_report) = catalog::classes::load_assignments(&config.class_source);
    let corpus = help::corpus::load_snapshot_or_empty(&config.help_snapshot);
    let (records, resolve_report) =
        resolve::resolve_records(&spell_catalog, &assignments, &corpus, &config.help_prefix);

    let mut meta = render::PageMeta {
        generated_at: telemetry::logging::timestamp(),
        fingerprints: Vec::new(),
        server_line: None,
    };
    for source in [&config.spell_source, &config.class_source] {
        if let Some(fingerprint) = render::source_fingerprint(source) {
            meta.fingerprints.push(fingerprint);
        }
    }
    if let Some(addr) = &config.mud_addr {
        meta.server_line = net::query::InfoClient::new(addr.clone()).server_info();
    }

    let alpha_page = render::render_alphabetical(&records, &meta);
    let class_page = render::render_by_class(&records, &meta);
    let alpha_path = config.output_dir.join(render::ALPHA_PAGE);
    let class_path = config.output_dir.join(render::CLASS_PAGE);
    std::fs::write(&alpha_path, alpha_page)
        .map_err(|err| format!("failed to write {}: {}", alpha_path.display(), err))?;
    std::fs::write(&class_path, class_page)
        .map_err(|err| format!("failed to write {}: {}", class_path.display(), err))?;

    telemetry::logging::log_generate(&format!(
        "generated: spells={}, assignments={}, help={}, resolved={}, unassigned={}, dropped_levels={}",
        catalog_report.entries,
        assignment_report.assignments,
        corpus.len(),
        resolve_report.resolved,
        resolve_report.unassigned,
        resolve_report.dropped_levels
    ));
    println!("grimoire: spell documentation");
    println!("- source root: {}", config.source_root.display());
    println!("- spells declared: {}", catalog_report.entries);
    println!("- unused slots skipped: {}", catalog_report.skipped_unused);
    println!("- class assignments: {}", assignment_report.assignments);
    println!("- help entries: {}", corpus.len());
    println!("- records resolved: {}", resolve_report.resolved);
    println!("- records with help: {}", resolve_report.with_help);
    println!("- spells without assignments: {}", resolve_report.unassigned);
    println!("- assignments below any circle: {}", resolve_report.dropped_levels);
    println!("- wrote: {}", alpha_path.display());
    println!("- wrote: {}", class_path.display());

    Ok(())
}
