/// Default prefix tried when matching hyphenated help tags, e.g. the
/// corpus keys "spell-chain-lightning" while the catalog says "chain lightning".
pub const DEFAULT_HELP_PREFIX: &str = "spell-";

/// Candidate lookup keys for a display name, in fixed priority order.
///
/// The three source datasets were authored independently with different
/// naming conventions (constant-style, hyphenated-tag-style, compact-style),
/// so exact-match joins silently drop most entries. Callers try the already
/// normalized catalog key first, then each candidate here until one hits.
pub fn candidate_keys(display_name: &str, help_prefix: &str) -> Vec<String> {
    let lowered = display_name.trim().to_ascii_lowercase();
    let hyphenated = lowered.replace(' ', "-");
    let compact = lowered.replace(' ', "");
    let prefixed = format!("{}{}", help_prefix, hyphenated);

    let mut keys = Vec::with_capacity(4);
    for key in [lowered, hyphenated, prefixed, compact] {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        keys.push(String::new());
    }
    keys
}

/// The canonical catalog key for a display name or constant-style token:
/// lower-cased, underscores replaced by spaces.
pub fn catalog_key(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_keys_cover_known_conventions() {
        let keys = candidate_keys("Chain Lightning", DEFAULT_HELP_PREFIX);
        assert_eq!(keys[0], "chain lightning");
        assert!(keys.contains(&"chain-lightning".to_string()));
        assert!(keys.contains(&"chainlightning".to_string()));
        assert!(keys.contains(&"spell-chain-lightning".to_string()));
    }

    #[test]
    fn candidate_keys_deduplicate_single_words() {
        let keys = candidate_keys("Fireball", DEFAULT_HELP_PREFIX);
        // hyphenated and compact collapse into the identity form
        assert_eq!(keys, vec!["fireball".to_string(), "spell-fireball".to_string()]);
    }

    #[test]
    fn candidate_keys_never_empty() {
        let keys = candidate_keys("", DEFAULT_HELP_PREFIX);
        assert!(!keys.is_empty());
    }

    #[test]
    fn catalog_key_flattens_constants() {
        assert_eq!(catalog_key("CHAIN_LIGHTNING"), "chain lightning");
        assert_eq!(catalog_key("  Magic Missile "), "magic missile");
    }
}
