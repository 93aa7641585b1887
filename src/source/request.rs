//! Allocation request documents
//!
//! A request is the JSON the month form produces: year, month, per-week
//! project percentages, time off and optional per-entry overrides. Saved
//! profiles use the same fields, so either can be fed to `generate`.
//! Everything is validated here so the resolver only sees typed input.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::consts::{DATE_FORMAT, HOUR_STEP, HOURS_PER_DAY};
use crate::core::{AllocationInput, EntryOverride, TimeOffRecord, WeeklyAllocation};
use crate::error::InputError;

#[derive(Debug, Deserialize)]
struct RequestDocument {
    #[serde(deserialize_with = "lenient_int")]
    year: i64,
    #[serde(deserialize_with = "lenient_int")]
    month: i64,
    #[serde(default)]
    weekly_data: BTreeMap<String, WeeklyAllocation>,
    #[serde(default)]
    time_off_data: BTreeMap<String, TimeOffRecord>,
    #[serde(default)]
    project_metadata: BTreeMap<String, EntryOverride>,
}

/// Accept `2026` as well as `"2026"`; form fields often arrive as strings
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Int(n) => Ok(n),
        Repr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer \"{s}\""))),
    }
}

/// Week number written the one way `week_N` keys are generated: plain
/// digits, no sign, no leading zero. Anything looser would let two keys
/// name the same week.
fn parse_week_number(text: &str) -> Option<usize> {
    if text.is_empty() || text.starts_with('0') || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse `week_3` into 3
pub(crate) fn parse_week_key(key: &str) -> Option<usize> {
    parse_week_number(key.strip_prefix("week_")?)
}

/// Parse `week_3_gcp_migration` into (3, "gcp_migration")
pub(crate) fn parse_metadata_key(key: &str) -> Option<(usize, &str)> {
    let (week, project) = key.strip_prefix("week_")?.split_once('_')?;
    let week = parse_week_number(week)?;
    (!project.is_empty()).then_some((week, project))
}

fn validate_month(month: i64) -> Result<u32, InputError> {
    u32::try_from(month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or(InputError::Month(month))
}

fn validate_year(year: i64) -> Result<i32, InputError> {
    // chrono's NaiveDate range is far wider, but a timesheet year is not
    i32::try_from(year)
        .ok()
        .filter(|y| (1900..=9999).contains(y))
        .ok_or(InputError::Year(year))
}

/// Apply command-line `--year`/`--month` to a parsed request, with the
/// same checks the document values went through
pub(crate) fn override_period(
    input: &mut AllocationInput,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<(), InputError> {
    if let Some(year) = year {
        input.year = validate_year(i64::from(year))?;
    }
    if let Some(month) = month {
        input.month = validate_month(i64::from(month))?;
    }
    Ok(())
}

/// Build resolver input from already-deserialized request parts
fn build_input(
    year: i32,
    month: u32,
    weekly_data: &BTreeMap<String, WeeklyAllocation>,
    time_off_data: &BTreeMap<String, TimeOffRecord>,
    project_metadata: &BTreeMap<String, EntryOverride>,
) -> Result<AllocationInput, InputError> {
    if !(1..=12).contains(&month) {
        return Err(InputError::Month(i64::from(month)));
    }

    let mut weeks = BTreeMap::new();
    for (key, allocation) in weekly_data {
        let week = parse_week_key(key).ok_or_else(|| InputError::WeekKey(key.clone()))?;
        if let Some((project, _)) = allocation.iter().find(|(_, pct)| !pct.is_finite()) {
            return Err(InputError::Percentage {
                week,
                project: project.to_string(),
            });
        }
        weeks.insert(week, allocation.clone());
    }

    let mut time_off = BTreeMap::new();
    for (key, record) in time_off_data {
        let date = NaiveDate::parse_from_str(key, DATE_FORMAT)
            .map_err(|_| InputError::TimeOffDate(key.clone()))?;
        let hours = record.hours;
        let in_steps = (hours / HOUR_STEP).fract() == 0.0;
        if !hours.is_finite() || !(0.0..=HOURS_PER_DAY).contains(&hours) || !in_steps {
            return Err(InputError::TimeOffHours {
                date: key.clone(),
                hours,
            });
        }
        time_off.insert(date, record.clone());
    }

    let mut overrides = BTreeMap::new();
    for (key, value) in project_metadata {
        let (week, project) =
            parse_metadata_key(key).ok_or_else(|| InputError::MetadataKey(key.clone()))?;
        overrides.insert((week, project.to_string()), value.clone());
    }

    Ok(AllocationInput {
        year,
        month,
        weeks,
        time_off,
        overrides,
    })
}

/// Parse and validate a request document
pub(crate) fn parse_request(text: &str) -> Result<AllocationInput, InputError> {
    let doc: RequestDocument = serde_json::from_str(text)?;
    let year = validate_year(doc.year)?;
    let month = validate_month(doc.month)?;
    build_input(
        year,
        month,
        &doc.weekly_data,
        &doc.time_off_data,
        &doc.project_metadata,
    )
}

pub(crate) fn read_request(path: &Path) -> Result<AllocationInput, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_request(&text)
}
