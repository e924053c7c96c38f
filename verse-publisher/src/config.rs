//! Publisher configuration: default paths, signature, and repository root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::text::DEFAULT_SIGNATURE;

const DEFAULT_INPUT: &str = "inbox/temp.txt";
const DEFAULT_OUTDIR: &str = "raw_data/mvr/vishnu";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Inbox file holding the latest messages, relative to the repository root
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Directory receiving verse-NNN.txt and name-NNN.txt files
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,

    /// Author signature that closes every message (matched case-insensitively)
    #[serde(default = "default_signature")]
    pub signature: String,

    /// Repository root override. None means search upward for `.git`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

fn default_input() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT)
}

fn default_outdir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTDIR)
}

fn default_signature() -> String {
    DEFAULT_SIGNATURE.to_string()
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            outdir: default_outdir(),
            signature: default_signature(),
            root: None,
        }
    }
}

impl PublisherConfig {
    /// Get the config file path: ~/.config/cli-programs/verse-publisher.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("verse-publisher.toml"))
    }

    /// Load config from the default location, returning defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: PublisherConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Find the repository root: the nearest ancestor of `start` holding a `.git`
/// entry, or `start` itself when there is none.
pub fn find_repo_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}

/// Resolve a possibly-relative path against the repository root.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PublisherConfig::default();
        assert_eq!(config.input, PathBuf::from("inbox/temp.txt"));
        assert_eq!(config.outdir, PathBuf::from("raw_data/mvr/vishnu"));
        assert_eq!(config.signature, DEFAULT_SIGNATURE);
        assert!(config.root.is_none());
    }

    #[test]
    fn test_config_path() {
        let path = PublisherConfig::config_path().unwrap();
        assert!(path.ends_with("cli-programs/verse-publisher.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
input = "inbox/latest.txt"
outdir = "raw_data/mvr/shiva"
signature = "Om tat sat"
root = "/srv/verses"
"#;
        let config: PublisherConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input, PathBuf::from("inbox/latest.txt"));
        assert_eq!(config.outdir, PathBuf::from("raw_data/mvr/shiva"));
        assert_eq!(config.signature, "Om tat sat");
        assert_eq!(config.root, Some(PathBuf::from("/srv/verses")));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: PublisherConfig = toml::from_str("").unwrap();
        assert_eq!(config.input, PathBuf::from("inbox/temp.txt"));
        assert_eq!(config.signature, DEFAULT_SIGNATURE);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = PublisherConfig::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.outdir, PathBuf::from("raw_data/mvr/vishnu"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("verse-publisher.toml");

        let mut config = PublisherConfig::default();
        config.signature = "Hari Om".to_string();
        config.save_to(&path).unwrap();

        let loaded = PublisherConfig::load_from(&path).unwrap();
        assert_eq!(loaded.signature, "Hari Om");
        assert!(loaded.root.is_none());
    }

    #[test]
    fn test_find_repo_root() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("repo");
        let nested = repo.join("scripts").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(find_repo_root(&nested), repo);
    }

    #[test]
    fn test_find_repo_root_without_git() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("plain");
        fs::create_dir_all(&start).unwrap();

        // The temp dir may itself live under a checkout; only require a prefix of start.
        let root = find_repo_root(&start);
        assert!(start.starts_with(&root));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_path(root, Path::new("inbox/temp.txt")),
            PathBuf::from("/repo/inbox/temp.txt")
        );
        assert_eq!(
            resolve_path(root, Path::new("/abs/out")),
            PathBuf::from("/abs/out")
        );
    }
}
