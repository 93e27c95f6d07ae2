use std::collections::BTreeMap;

/// Field labels recognized in help text. A line must contain a colon and one
/// of these substrings to be treated as a structured field.
const FIELD_LABELS: [&str; 9] = [
    "Usage",
    "School",
    "Target",
    "Duration",
    "Saving",
    "Magic",
    "Damage",
    "Accumulative",
    "Discipline",
];

const DESCRIPTION_MARKER: &str = ">Description";
const SEE_ALSO_MARKER: &str = "See also";

/// Structured output of one parsed help entry. Both parts default to empty;
/// unparseable input is never an error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedHelp {
    pub fields: BTreeMap<String, String>,
    pub description: Option<String>,
}

/// Decodes the escape conventions of stored help text in one pass: literal
/// `\n` and `\t` become a line break and indentation, any other backslash +
/// ASCII letter is a color code and is dropped entirely.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some(code) if code.is_ascii_alphabetic() => {
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Trims every line and drops blank lines entirely; stored help text pads
/// sections with blank runs that carry no meaning once rendered.
pub fn normalize_whitespace(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

fn trim_label(label: &str) -> String {
    label
        .trim_matches(|ch: char| {
            ch.is_whitespace() || ch == '>' || ch == '<' || ch == '-'
        })
        .to_string()
}

fn is_field_line(line: &str) -> bool {
    line.contains(':') && FIELD_LABELS.iter().any(|label| line.contains(label))
}

/// Extracts structured fields and the free-text description from one raw
/// help entry.
pub fn parse_help_text(raw: &str) -> ParsedHelp {
    let decoded = decode_escapes(raw);
    let mut parsed = ParsedHelp::default();
    let mut description_lines: Vec<String> = Vec::new();
    let mut in_description = false;
    let mut description_done = false;
    let mut saw_description = false;

    for line in decoded.lines() {
        if in_description {
            // the first "See also" ends the description for good; later
            // markers never reopen it
            if line.contains(SEE_ALSO_MARKER) {
                in_description = false;
                description_done = true;
                continue;
            }
            description_lines.push(line.to_string());
            continue;
        }
        if !description_done && line.contains(DESCRIPTION_MARKER) {
            if let Some((_, rest)) = line.split_once(':') {
                in_description = true;
                saw_description = true;
                if !rest.trim().is_empty() {
                    description_lines.push(rest.to_string());
                }
                continue;
            }
        }
        if is_field_line(line) {
            if let Some((label, value)) = line.split_once(':') {
                let label = trim_label(label);
                if !label.is_empty() {
                    parsed
                        .fields
                        .insert(label, normalize_whitespace(value));
                }
            }
        }
    }

    if saw_description {
        let body = normalize_whitespace(&description_lines.join("\n"));
        if !body.is_empty() {
            parsed.description = Some(body);
        }
    }
    parsed
}
