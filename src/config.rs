use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

/// `[user]` table: identity stamped on every entry
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UserConfig {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) teams: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) user: UserConfig,
    #[serde(default)]
    pub(crate) projects_csv: Option<PathBuf>,
    #[serde(default)]
    pub(crate) projects_json: Option<PathBuf>,
    #[serde(default)]
    pub(crate) profiles_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) time_off_project: Option<String>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,

    /// File this config was read from
    #[serde(skip)]
    pub(crate) path: Option<PathBuf>,

    /// Default-location files that were skipped; logged once tracing is up
    #[serde(skip)]
    pub(crate) skipped: Vec<ConfigError>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Otherwise the default
    /// locations are tried in order; a file that fails to parse is
    /// skipped and recorded in `skipped`.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        Ok(Self::first_readable(&Self::get_config_paths()))
    }

    /// First existing path that parses, carrying the failures before it
    fn first_readable(paths: &[PathBuf]) -> Self {
        let mut skipped = Vec::new();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::read(path) {
                Ok(config) => return Self { skipped, ..config },
                Err(e) => skipped.push(e),
            }
        }
        Self {
            skipped,
            ..Self::default()
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/noko-helper/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("noko-helper").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("noko-helper").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.noko-helper.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".noko-helper.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("noko-helper")));
    }

    #[test]
    fn parses_all_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
projects_json = "/etc/noko/projects.json"
profiles_dir = "saved"
time_off_project = "pto"
debug = true
color = "never"

[user]
name = "Ada Lovelace"
email = "ada@example.com"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.user.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(config.user.teams, None);
        assert_eq!(
            config.projects_json.as_deref(),
            Some(Path::new("/etc/noko/projects.json"))
        );
        assert_eq!(config.profiles_dir.as_deref(), Some(Path::new("saved")));
        assert_eq!(config.time_off_project.as_deref(), Some("pto"));
        assert!(config.debug);
        assert!(matches!(config.color, Some(ConfigColorMode::Never)));
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn broken_default_file_is_skipped_and_kept_for_logging() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        fs::write(&broken, "debug = \"maybe\"").unwrap();
        fs::write(&good, "time_off_project = \"pto\"").unwrap();
        let paths = vec![dir.path().join("absent.toml"), broken.clone(), good.clone()];

        let config = Config::first_readable(&paths);
        assert_eq!(config.path.as_deref(), Some(good.as_path()));
        assert_eq!(config.time_off_project.as_deref(), Some("pto"));
        assert_eq!(config.skipped.len(), 1);
        assert!(matches!(&config.skipped[0], ConfigError::Toml { path, .. } if *path == broken));

        let config = Config::first_readable(&paths[..2]);
        assert!(config.path.is_none());
        assert_eq!(config.skipped.len(), 1);
    }

    #[test]
    fn explicit_path_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "debug = \"maybe\"").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Toml { .. })
        ));
        assert!(matches!(
            Config::load(Some(&dir.path().join("missing.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }
}
