//! Named month profiles saved as JSON for backup and restore

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::consts::{DATE_FORMAT, UNKNOWN};
use crate::core::{AllocationInput, TimeOffRecord, WeeklyAllocation, month_name};
use crate::error::ProfileError;

/// A saved month of allocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Profile {
    pub(crate) profile_name: String,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) created_date: String,
    #[serde(default)]
    pub(crate) weekly_data: BTreeMap<String, WeeklyAllocation>,
    #[serde(default)]
    pub(crate) time_off_data: BTreeMap<String, TimeOffRecord>,
}

impl Profile {
    pub(crate) fn from_input(name: &str, input: &AllocationInput) -> Self {
        Profile {
            profile_name: name.to_string(),
            year: input.year,
            month: input.month,
            created_date: Local::now().to_rfc3339(),
            weekly_data: input
                .weeks
                .iter()
                .map(|(week, alloc)| (format!("week_{week}"), alloc.clone()))
                .collect(),
            time_off_data: input
                .time_off
                .iter()
                .map(|(date, record)| (date.format(DATE_FORMAT).to_string(), record.clone()))
                .collect(),
        }
    }

    pub(crate) fn file_name(&self) -> String {
        format!("{}_{}_{:02}.json", self.profile_name, self.year, self.month)
    }
}

/// Listing row; fields are optional so hand-edited files still show up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProfileSummary {
    #[serde(default)]
    pub(crate) filename: String,
    #[serde(default)]
    pub(crate) profile_name: Option<String>,
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) month: Option<u32>,
    #[serde(default)]
    pub(crate) created_date: Option<String>,
    #[serde(default)]
    pub(crate) month_name: String,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ProfileError + '_ {
    move |source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn validate_name(name: &str) -> Result<(), ProfileError> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == "..";
    if bad {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Save `input` as `{dir}/{name}_{year}_{MM}.json`, replacing any older copy
pub(crate) fn save_profile(
    dir: &Path,
    name: &str,
    input: &AllocationInput,
) -> Result<PathBuf, ProfileError> {
    validate_name(name)?;
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    let profile = Profile::from_input(name, input);
    let path = dir.join(profile.file_name());
    let json = serde_json::to_string_pretty(&profile).map_err(|source| ProfileError::Parse {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(io_error(&path))?;
    debug!(path = %path.display(), "saved profile");
    Ok(path)
}

/// Load a profile by file name relative to `dir`
pub(crate) fn load_profile(dir: &Path, filename: &str) -> Result<Profile, ProfileError> {
    if filename.contains(['/', '\\']) {
        return Err(ProfileError::InvalidName(filename.to_string()));
    }
    let path = dir.join(filename);
    let content = fs::read_to_string(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ProfileError::NotFound(filename.to_string()),
        _ => ProfileError::Io {
            path: path.clone(),
            source,
        },
    })?;
    serde_json::from_str(&content).map_err(|source| ProfileError::Parse { path, source })
}

fn read_summary(path: &Path) -> Option<ProfileSummary> {
    let content = fs::read_to_string(path).ok()?;
    let mut summary: ProfileSummary = serde_json::from_str(&content).ok()?;
    summary.filename = path.file_name()?.to_string_lossy().into_owned();
    summary.month_name = month_name(summary.month.unwrap_or(1)).to_string();
    if summary.profile_name.is_none() {
        summary.profile_name = Some(UNKNOWN.to_string());
    }
    Some(summary)
}

/// All readable profiles in `dir`, newest first
pub(crate) fn list_profiles(dir: &Path) -> Result<Vec<ProfileSummary>, ProfileError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
    let paths = glob::glob(&pattern).map_err(|e| ProfileError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(ErrorKind::InvalidInput, e.msg),
    })?;

    let mut profiles = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "skipping unreadable profile entry");
                continue;
            }
        };
        match read_summary(&path) {
            Some(summary) => profiles.push(summary),
            None => warn!(path = %path.display(), "skipping invalid profile"),
        }
    }

    profiles.sort_by(|a, b| b.created_date.cmp(&a.created_date));
    Ok(profiles)
}
