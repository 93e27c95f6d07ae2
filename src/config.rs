use crate::keys::DEFAULT_HELP_PREFIX;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct AppConfig {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub spell_source: PathBuf,
    pub class_source: PathBuf,
    pub help_snapshot: PathBuf,
    pub help_prefix: String,
    pub mud_addr: Option<String>,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        if args.len() < 2 {
            return Err(
                "usage: grimoire <mud-src-root> [output-dir]".to_string(),
            );
        }

        let source_root = Path::new(&args[1]).to_path_buf();
        let output_dir = if args.len() > 2 {
            Path::new(&args[2]).to_path_buf()
        } else {
            PathBuf::from("docs")
        };
        let spell_source = source_root.join("spell_parser.c");
        let class_source = source_root.join("class.c");
        let help_snapshot = match env_value("GRIMOIRE_SNAPSHOT") {
            Some(path) => PathBuf::from(path),
            None => source_root.join("help_snapshot.yaml"),
        };
        let help_prefix =
            env_value("GRIMOIRE_HELP_PREFIX").unwrap_or_else(|| DEFAULT_HELP_PREFIX.to_string());
        let mud_addr = env_value("GRIMOIRE_MUD_ADDR");

        Ok(Self {
            source_root,
            output_dir,
            spell_source,
            class_source,
            help_snapshot,
            help_prefix,
            mud_addr,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_args_requires_source_root() {
        let args = vec!["grimoire".to_string()];
        assert!(AppConfig::from_args(&args).is_err());
    }

    #[test]
    fn from_args_derives_source_paths() {
        let args = vec!["grimoire".to_string(), "/mud/src".to_string()];
        let config = AppConfig::from_args(&args).expect("config");
        assert_eq!(config.spell_source, PathBuf::from("/mud/src/spell_parser.c"));
        assert_eq!(config.class_source, PathBuf::from("/mud/src/class.c"));
        assert_eq!(config.output_dir, PathBuf::from("docs"));
    }

    #[test]
    fn from_args_accepts_output_dir() {
        let args = vec![
            "grimoire".to_string(),
            "/mud/src".to_string(),
            "/srv/www/spells".to_string(),
        ];
        let config = AppConfig::from_args(&args).expect("config");
        assert_eq!(config.output_dir, PathBuf::from("/srv/www/spells"));
    }
}
