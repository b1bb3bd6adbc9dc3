/// Site configuration loaded from a TOML file
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            output_dir: PathBuf::from("public"),
        }
    }
}

impl SiteConfig {
    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = SiteConfig::load(Path::new("/nonexistent/site.toml"));
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, "content_dir = \"posts\"\n").unwrap();

        let config = SiteConfig::load(&path);
        assert_eq!(config.content_dir, PathBuf::from("posts"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, "not valid toml [[[").unwrap();

        let config = SiteConfig::load(&path);
        assert_eq!(config, SiteConfig::default());
    }
}
