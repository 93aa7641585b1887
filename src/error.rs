use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid month \"{input}\" (expected YYYY-MM)")]
    InvalidMonth { input: String },

    #[error("{0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Profile(#[from] ProfileError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A request document that cannot be turned into allocation input.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid month {0} (expected 1-12)")]
    Month(i64),

    #[error("Invalid year {0}")]
    Year(i64),

    #[error("Invalid week key \"{0}\" (expected week_N)")]
    WeekKey(String),

    #[error("Invalid metadata key \"{0}\" (expected week_N_project)")]
    MetadataKey(String),

    #[error("Invalid time-off date \"{0}\" (expected YYYY-MM-DD)")]
    TimeOffDate(String),

    #[error("Time-off hours for {date} must be 0-8 in half-hour steps, got {hours}")]
    TimeOffHours { date: String, hours: f64 },

    #[error("Percentage for {project} in week_{week} is not a finite number")]
    Percentage { week: usize, project: String },
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No time-off project configured (looked for: {0})")]
    MissingTimeOffProject(String),
}

#[derive(Debug, Error)]
pub(crate) enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile name \"{0}\"")]
    InvalidName(String),

    #[error("Profile I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse profile {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
