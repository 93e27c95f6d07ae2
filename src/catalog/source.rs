use std::path::Path;

/// One argument of a scanned declaration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Number(i64),
    Text(String),
    Ident(String),
}

impl ArgValue {
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            ArgValue::Ident(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ArgValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// A single `callee(arg, arg, ...)` occurrence found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCall {
    pub args: Vec<ArgValue>,
}

/// Reads a declarative source file, tolerating single-byte encodings that are
/// not valid UTF-8 (the MUD sources predate Unicode).
pub fn read_source(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path)
        .map_err(|err| format!("failed to read source {}: {}", path.display(), err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Scans `source` for every call of `callee` and parses its argument list.
///
/// The scan honors string literals and C comments, so a callee name inside a
/// comment or a quoted string does not count. Calls with unbalanced argument
/// lists are skipped rather than failing the whole scan.
pub fn scan_calls(source: &str, callee: &str) -> Vec<ScannedCall> {
    let stripped = strip_comments(source);
    let bytes = stripped.as_bytes();
    let mut calls = Vec::new();
    let mut index = 0usize;

    while let Some(found) = stripped[index..].find(callee) {
        let start = index + found;
        let end = start + callee.len();
        index = end;

        // Reject partial identifier matches like `my_spello(`.
        if start > 0 && is_ident_byte(bytes[start - 1]) {
            continue;
        }
        let mut cursor = end;
        while cursor < bytes.len() && (bytes[cursor] == b' ' || bytes[cursor] == b'\t') {
            cursor += 1;
        }
        if cursor >= bytes.len() || bytes[cursor] != b'(' {
            continue;
        }
        let Some(close) = matching_paren(&stripped, cursor) else {
            continue;
        };
        let inner = &stripped[cursor + 1..close];
        calls.push(ScannedCall {
            args: split_args(inner).into_iter().map(parse_arg).collect(),
        });
        index = close + 1;
    }

    calls
}

fn is_ident_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric()
}

fn matching_paren(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut prev_escape = false;
    for (offset, ch) in source[open..].char_indices() {
        if in_quotes {
            if ch == '"' && !prev_escape {
                in_quotes = false;
            }
            prev_escape = ch == '\\' && !prev_escape;
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                prev_escape = false;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_args(inner: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut prev_escape = false;

    for ch in inner.chars() {
        if in_quotes {
            if ch == '"' && !prev_escape {
                in_quotes = false;
            }
            prev_escape = ch == '\\' && !prev_escape;
            current.push(ch);
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                prev_escape = false;
                current.push(ch);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn parse_arg(raw: String) -> ArgValue {
    let value = raw.trim();
    if value.starts_with('"') {
        return ArgValue::Text(unquote(value));
    }
    if let Ok(number) = value.parse::<i64>() {
        return ArgValue::Number(number);
    }
    ArgValue::Ident(value.to_string())
}

/// Joins adjacent C string literals and resolves the escapes that occur in
/// display names; unknown escapes keep their literal character.
fn unquote(value: &str) -> String {
    let mut text = String::new();
    let mut in_quotes = false;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if !in_quotes {
            if ch == '"' {
                in_quotes = true;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = false,
            '\\' => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(other) => text.push(other),
                None => {}
            },
            _ => text.push(ch),
        }
    }
    text
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_quotes = false;
    let mut prev_escape = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' && !prev_escape {
                in_quotes = false;
            }
            prev_escape = ch == '\\' && !prev_escape;
            out.push(ch);
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                prev_escape = false;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                out.push(' ');
            }
            '/' if chars.peek() == Some(&'/') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
