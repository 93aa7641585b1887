//! JSON renderings for every command

use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;

use crate::consts::DATE_FORMAT;
use crate::core::{MonthInfo, ProjectConfig, TimeEntry, TimeOffRecord};
use crate::source::ProfileSummary;
use crate::source::profiles::Profile;

/// Entries keyed by the import file's column names
pub(crate) fn output_entries_json(entries: &[TimeEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

pub(crate) fn output_month_json(info: &MonthInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(info)
}

pub(crate) fn output_projects_json(config: &ProjectConfig) -> Result<String, serde_json::Error> {
    let output = json!({
        "user_info": config.user,
        "time_off_project": config.time_off_key(),
        "projects": config.projects,
    });
    serde_json::to_string_pretty(&output)
}

pub(crate) fn output_holidays_json(
    year: i32,
    holidays: &BTreeMap<NaiveDate, TimeOffRecord>,
) -> Result<String, serde_json::Error> {
    let days: Vec<serde_json::Value> = holidays
        .iter()
        .map(|(date, record)| {
            json!({
                "date": date.format(DATE_FORMAT).to_string(),
                "description": record.description,
                "hours": record.hours,
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "year": year, "holidays": days }))
}

pub(crate) fn output_profiles_json(
    profiles: &[ProfileSummary],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(profiles)
}

pub(crate) fn output_profile_json(profile: &Profile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(profile)
}
