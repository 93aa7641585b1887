//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};
use crate::source::ProjectSources;

use super::commands::Commands;

const DEFAULT_PROJECTS_CSV: &str = "noko_projects.csv";
const DEFAULT_PROJECTS_JSON: &str = "projects.json";
const DEFAULT_PROFILES_DIR: &str = "profiles";

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "noko-helper")]
#[command(
    about = "Turn weekly project percentages into a Noko time import file",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Enable debug output (show allocation details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Noko projects CSV export
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) projects_csv: Option<PathBuf>,

    /// Project configuration JSON
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) projects_json: Option<PathBuf>,

    /// Directory holding saved profiles
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) profiles_dir: Option<PathBuf>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        // Paths: only apply if CLI didn't set them
        if self.projects_csv.is_none() {
            self.projects_csv.clone_from(&config.projects_csv);
        }
        if self.projects_json.is_none() {
            self.projects_json.clone_from(&config.projects_json);
        }
        if self.profiles_dir.is_none() {
            self.profiles_dir.clone_from(&config.profiles_dir);
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn project_sources(&self) -> ProjectSources {
        ProjectSources {
            csv: self
                .projects_csv
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECTS_CSV)),
            json: self
                .projects_json
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECTS_JSON)),
        }
    }

    pub(crate) fn profiles_dir(&self) -> &Path {
        self.profiles_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_PROFILES_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let cli = parse(&["noko-helper", "profile", "list"]).with_config(&Config::default());
        let sources = cli.project_sources();
        assert_eq!(sources.csv, PathBuf::from("noko_projects.csv"));
        assert_eq!(sources.json, PathBuf::from("projects.json"));
        assert_eq!(cli.profiles_dir(), Path::new("profiles"));
        assert!(!cli.debug);
    }

    #[test]
    fn config_fills_unset_values() {
        let config = Config {
            projects_json: Some(PathBuf::from("/conf/projects.json")),
            profiles_dir: Some(PathBuf::from("/conf/profiles")),
            debug: true,
            color: Some(ConfigColorMode::Never),
            ..Config::default()
        };
        let cli = parse(&["noko-helper", "profile", "list"]).with_config(&config);
        assert_eq!(cli.project_sources().json, PathBuf::from("/conf/projects.json"));
        assert_eq!(cli.profiles_dir(), Path::new("/conf/profiles"));
        assert!(cli.debug);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(!cli.use_color());
    }

    #[test]
    fn cli_values_win_over_config() {
        let config = Config {
            profiles_dir: Some(PathBuf::from("/conf/profiles")),
            color: Some(ConfigColorMode::Never),
            ..Config::default()
        };
        let cli = parse(&[
            "noko-helper",
            "--profiles-dir",
            "mine",
            "--color",
            "always",
            "profile",
            "list",
        ])
        .with_config(&config);
        assert_eq!(cli.profiles_dir(), Path::new("mine"));
        assert!(cli.use_color());
    }

    #[test]
    fn no_color_overrides_always() {
        let cli = parse(&["noko-helper", "--color", "always", "--no-color", "month", "2026-01"]);
        assert!(!cli.use_color());
    }
}
