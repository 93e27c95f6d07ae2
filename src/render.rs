use crate::circles::Circle;
use crate::resolve::CanonicalSpellRecord;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::path::Path;

pub const ALPHA_PAGE: &str = "spells.html";
pub const CLASS_PAGE: &str = "spells_by_class.html";

/// Page-level context shared by both views: when the docs were generated,
/// which source revisions produced them, and (when the server answered) a
/// live status line.
#[derive(Debug, Default, Clone)]
pub struct PageMeta {
    pub generated_at: String,
    pub fingerprints: Vec<(String, String)>,
    pub server_line: Option<String>,
}

/// SHA-1 fingerprint of a scanned source file, hex-encoded for the footer.
/// Unreadable files simply contribute no fingerprint.
pub fn source_fingerprint(path: &Path) -> Option<(String, String)> {
    let bytes = std::fs::read(path).ok()?;
    let digest = Sha1::digest(&bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    let label = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("source")
        .to_string();
    Some((label, hex))
}

pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn anchor_for(display_name: &str) -> String {
    display_name.trim().to_ascii_lowercase().replace(' ', "-")
}

/// Comma-split keyword tags from a help entry, trimmed, empties skipped.
fn keyword_list(record: &CanonicalSpellRecord) -> Vec<&str> {
    match &record.matched_help {
        Some(help) => help
            .keywords
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

fn circle_label(circle: Circle) -> String {
    match circle {
        Circle::Numbered(value) => format!("Circle {}", value),
        Circle::Epic => "Epic".to_string(),
    }
}

fn page_header(title: &str, other_href: &str, other_label: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
<style>body{{background:#333;color:#e69710;font-family:serif;margin:2em}}\
a{{color:#e6d8a0}}table{{border-collapse:collapse}}td,th{{padding:2px 8px;text-align:left}}\
h2{{border-bottom:1px solid #e69710}}.meta{{color:#999;font-size:small}}</style>\n\
</head>\n<body>\n<h1>{}</h1>\n<p><a href=\"{}\">{}</a></p>\n",
        html_escape(title),
        html_escape(title),
        other_href,
        html_escape(other_label)
    )
}

fn page_footer(meta: &PageMeta) -> String {
    let mut footer = String::from("<hr>\n<p class=\"meta\">");
    footer.push_str(&format!("Generated {}", html_escape(&meta.generated_at)));
    if let Some(line) = &meta.server_line {
        footer.push_str(&format!(" | {}", html_escape(line)));
    }
    for (label, hex) in &meta.fingerprints {
        footer.push_str(&format!(" | {} {}", html_escape(label), html_escape(hex)));
    }
    footer.push_str("</p>\n</body>\n</html>\n");
    footer
}

fn spell_section(record: &CanonicalSpellRecord) -> String {
    let anchor = anchor_for(&record.display_name);
    let mut section = format!(
        "<h3 id=\"{}\">{}</h3>\n",
        anchor,
        html_escape(&record.display_name)
    );

    if !record.class_levels.is_empty() {
        section.push_str("<table>\n<tr><th>Class</th><th>Circle</th><th>Level</th></tr>\n");
        for entry in &record.class_levels {
            section.push_str(&format!(
                "<tr><td><a href=\"{}#class-{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
                CLASS_PAGE,
                anchor_for(&entry.class_name),
                html_escape(&entry.class_name),
                circle_label(entry.circle),
                entry.level
            ));
        }
        section.push_str("</table>\n");
    }

    if !record.structured_fields.is_empty() {
        section.push_str("<dl>\n");
        for (label, value) in &record.structured_fields {
            section.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                html_escape(label),
                html_escape(value)
            ));
        }
        section.push_str("</dl>\n");
    }

    match &record.description {
        Some(description) => {
            section.push_str(&format!(
                "<p>{}</p>\n",
                html_escape(description).replace('\n', "<br>\n")
            ));
        }
        None => section.push_str("<p class=\"meta\">No help available.</p>\n"),
    }

    let keywords = keyword_list(record);
    if !keywords.is_empty() {
        let tags: Vec<String> = keywords.iter().map(|k| html_escape(k)).collect();
        section.push_str(&format!(
            "<p class=\"meta\">Keywords: {}</p>\n",
            tags.join(", ")
        ));
    }

    if let Some(help) = &record.matched_help {
        section.push_str(&format!(
            "<p class=\"meta\">Help tag: {} | Updated: {}</p>\n",
            html_escape(&help.tag),
            html_escape(&help.last_updated)
        ));
    }
    section
}

/// The alphabetical view: spells grouped by the leading letter of their
/// display name.
pub fn render_alphabetical(records: &[CanonicalSpellRecord], meta: &PageMeta) -> String {
    let mut groups: BTreeMap<char, Vec<&CanonicalSpellRecord>> = BTreeMap::new();
    for record in records {
        let letter = record
            .display_name
            .chars()
            .next()
            .map(|ch| ch.to_ascii_uppercase())
            .unwrap_or('?');
        groups.entry(letter).or_default().push(record);
    }

    let mut page = page_header("Spells", CLASS_PAGE, "View by class and circle");
    for (letter, group) in &groups {
        page.push_str(&format!("<h2>{}</h2>\n", letter));
        for record in group {
            page.push_str(&spell_section(record));
        }
    }
    page.push_str(&page_footer(meta));
    page
}

/// The by-class view: class -> circle -> spells, cross-linked back to the
/// alphabetical page.
pub fn render_by_class(records: &[CanonicalSpellRecord], meta: &PageMeta) -> String {
    let mut classes: BTreeMap<&str, BTreeMap<u32, Vec<(&CanonicalSpellRecord, Circle, u32)>>> =
        BTreeMap::new();
    for record in records {
        for entry in &record.class_levels {
            classes
                .entry(entry.class_name.as_str())
                .or_default()
                .entry(entry.circle.rank())
                .or_default()
                .push((record, entry.circle, entry.level));
        }
    }

    let mut page = page_header("Spells by Class", ALPHA_PAGE, "View alphabetically");
    for (class_name, circles) in &classes {
        page.push_str(&format!(
            "<h2 id=\"class-{}\">{}</h2>\n",
            anchor_for(class_name),
            html_escape(class_name)
        ));
        for tiers in circles.values() {
            let label = tiers
                .first()
                .map(|(_, circle, _)| circle_label(*circle))
                .unwrap_or_default();
            page.push_str(&format!("<h3>{}</h3>\n<ul>\n", html_escape(&label)));
            for (record, _, level) in tiers {
                let keywords = keyword_list(record);
                let tag_suffix = if keywords.is_empty() {
                    String::new()
                } else {
                    let tags: Vec<String> = keywords.iter().map(|k| html_escape(k)).collect();
                    format!(" <span class=\"meta\">[{}]</span>", tags.join(", "))
                };
                page.push_str(&format!(
                    "<li><a href=\"{}#{}\">{}</a> (level {}){}</li>\n",
                    ALPHA_PAGE,
                    anchor_for(&record.display_name),
                    html_escape(&record.display_name),
                    level,
                    tag_suffix
                ));
            }
            page.push_str("</ul>\n");
        }
    }
    page.push_str(&page_footer(meta));
    page
}
