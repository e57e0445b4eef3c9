use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::device::Model;

const FILE_NAME: &str = "rm-stylus-button.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub toggle: bool,
    pub pen_device: Option<String>,
    pub model: Option<Model>,
}

fn parse(content: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(content)
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match parse(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(FILE_NAME)];

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join(FILE_NAME));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"
            toggle = true
            pen_device = "/dev/input/event3"
            model = "rmpp"
            "#,
        )
        .unwrap();
        assert!(config.toggle);
        assert_eq!(config.pen_device.as_deref(), Some("/dev/input/event3"));
        assert_eq!(config.model, Some(Model::Rmpp));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(parse("press_timeout = 0.5").is_err());
        assert!(parse("model = \"kobo\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_from_path(Path::new("/nonexistent/rm-stylus-button.toml")).is_none());
    }
}
