//! Core data types shared by the partitioner, the resolver and the outputs
//!
//! Inputs arrive here already validated; nothing in this module does I/O.

use chrono::{Duration, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::consts::{DATE_FORMAT, TIME_OFF_KEYS};
use crate::error::ConfigError;

/// Billable / invoiced / paid / approved flags as Noko spells them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Flag {
    #[default]
    Yes,
    No,
}

impl Flag {
    /// Interpret a loose yes/no value from a CSV or JSON project file
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Flag::Yes,
            _ => Flag::No,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Flag::Yes => "yes",
            Flag::No => "no",
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(true) => Flag::Yes,
            Repr::Bool(false) => Flag::No,
            Repr::Text(s) => Flag::parse(&s),
        })
    }
}

/// A project time can be booked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Project {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) group_client: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) tags: String,
    #[serde(default)]
    pub(crate) billable: Flag,
}

/// Person identity stamped on every exported entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserInfo {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) teams: String,
    #[serde(default)]
    pub(crate) email: String,
}

/// Fully resolved project configuration for one run
#[derive(Debug, Clone)]
pub(crate) struct ProjectConfig {
    pub(crate) user: UserInfo,
    pub(crate) projects: BTreeMap<String, Project>,
    time_off_key: String,
}

impl ProjectConfig {
    /// Build a configuration, resolving which project records time off.
    ///
    /// With no explicit key the first of [`TIME_OFF_KEYS`] present wins.
    pub(crate) fn new(
        user: UserInfo,
        projects: BTreeMap<String, Project>,
        time_off_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let key = match time_off_key {
            Some(key) => projects.contains_key(key).then(|| key.to_string()),
            None => TIME_OFF_KEYS
                .iter()
                .find(|key| projects.contains_key(**key))
                .map(|key| (*key).to_string()),
        };
        let Some(time_off_key) = key else {
            let wanted = time_off_key.map_or_else(|| TIME_OFF_KEYS.join(", "), str::to_string);
            return Err(ConfigError::MissingTimeOffProject(wanted));
        };

        Ok(Self {
            user,
            projects,
            time_off_key,
        })
    }

    pub(crate) fn project(&self, key: &str) -> Option<&Project> {
        self.projects.get(key)
    }

    pub(crate) fn time_off_key(&self) -> &str {
        &self.time_off_key
    }

    pub(crate) fn time_off(&self) -> Option<&Project> {
        self.projects.get(&self.time_off_key)
    }
}

/// Hours taken off on a single date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TimeOffRecord {
    pub(crate) hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

/// A Monday-aligned week intersecting the target month
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeekWindow {
    /// 1-based position in the month partition, the N of `week_N`
    pub(crate) index: usize,
    pub(crate) start: NaiveDate,
    /// In-month weekdays of this week, Monday first
    pub(crate) workdays: Vec<NaiveDate>,
    /// Latest in-month weekday; `None` when the week has no workdays
    pub(crate) registration_day: Option<NaiveDate>,
}

impl WeekWindow {
    pub(crate) fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub(crate) fn key(&self) -> String {
        format!("week_{}", self.index)
    }
}

/// Project percentages for one week, kept in the order they were written.
///
/// Order matters: reconciliation breaks ties on the first project seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WeeklyAllocation {
    shares: Vec<(String, f64)>,
}

impl WeeklyAllocation {
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.shares.iter().map(|(key, pct)| (key.as_str(), *pct))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for WeeklyAllocation {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut allocation = WeeklyAllocation::default();
        for (key, pct) in iter {
            let key = key.into();
            // a repeated key replaces the earlier value but keeps its slot
            match allocation.shares.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = pct,
                None => allocation.shares.push((key, pct)),
            }
        }
        allocation
    }
}

impl Serialize for WeeklyAllocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shares.len()))?;
        for (key, pct) in &self.shares {
            map.serialize_entry(key, pct)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklyAllocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AllocationVisitor;

        impl<'de> Visitor<'de> for AllocationVisitor {
            type Value = WeeklyAllocation;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of project key to percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut shares = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, pct)) = access.next_entry::<String, f64>()? {
                    shares.push((key, pct));
                }
                Ok(shares.into_iter().collect())
            }
        }

        deserializer.deserialize_map(AllocationVisitor)
    }
}

/// Per-(week, project) replacement for the configured tags/description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct EntryOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

impl EntryOverride {
    /// Override tags with any leading `#` removed; `None` if nothing is left
    pub(crate) fn tags(&self) -> Option<&str> {
        self.tags
            .as_deref()
            .map(|tags| tags.strip_prefix('#').unwrap_or(tags))
            .filter(|tags| !tags.is_empty())
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Everything the resolver needs for one month, validated at the boundary
#[derive(Debug, Clone, Default)]
pub(crate) struct AllocationInput {
    pub(crate) year: i32,
    pub(crate) month: u32,
    /// Keyed by 1-based week index
    pub(crate) weeks: BTreeMap<usize, WeeklyAllocation>,
    pub(crate) time_off: BTreeMap<NaiveDate, TimeOffRecord>,
    /// Keyed by (week index, project key)
    pub(crate) overrides: BTreeMap<(usize, String), EntryOverride>,
}

/// One row of the Noko import file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TimeEntry {
    #[serde(rename = "Date", serialize_with = "serialize_date")]
    pub(crate) date: NaiveDate,
    #[serde(rename = "Person")]
    pub(crate) person: String,
    #[serde(rename = "Teams")]
    pub(crate) teams: String,
    #[serde(rename = "Email")]
    pub(crate) email: String,
    #[serde(rename = "Group/Client")]
    pub(crate) group_client: String,
    #[serde(rename = "Project")]
    pub(crate) project: String,
    #[serde(rename = "Minutes")]
    pub(crate) minutes: i64,
    #[serde(rename = "Hours")]
    pub(crate) hours: f64,
    #[serde(rename = "Tags")]
    pub(crate) tags: String,
    #[serde(rename = "Description")]
    pub(crate) description: String,
    #[serde(rename = "Billable")]
    pub(crate) billable: Flag,
    #[serde(rename = "Invoiced")]
    pub(crate) invoiced: Flag,
    #[serde(rename = "Invoice Reference")]
    pub(crate) invoice_reference: String,
    #[serde(rename = "Paid")]
    pub(crate) paid: Flag,
    #[serde(rename = "Approved")]
    pub(crate) approved: Flag,
    #[serde(rename = "Approved By")]
    pub(crate) approved_by: String,
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

impl TimeEntry {
    /// New entry with the workflow columns left for Noko to fill in
    pub(crate) fn new(
        date: NaiveDate,
        user: &UserInfo,
        project: &Project,
        hours: f64,
        tags: &str,
        description: &str,
    ) -> Self {
        TimeEntry {
            date,
            person: user.name.clone(),
            teams: user.teams.clone(),
            email: user.email.clone(),
            group_client: project.group_client.clone(),
            project: project.name.clone(),
            minutes: (hours * 60.0).round() as i64,
            hours,
            tags: tags.to_string(),
            description: description.to_string(),
            billable: project.billable,
            invoiced: Flag::No,
            invoice_reference: String::new(),
            paid: Flag::No,
            approved: Flag::No,
            approved_by: String::new(),
        }
    }

    /// Field values in [`crate::consts::CSV_HEADER`] order
    pub(crate) fn to_record(&self) -> [String; 16] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.person.clone(),
            self.teams.clone(),
            self.email.clone(),
            self.group_client.clone(),
            self.project.clone(),
            self.minutes.to_string(),
            format!("{:.1}", self.hours),
            self.tags.clone(),
            self.description.clone(),
            self.billable.as_str().to_string(),
            self.invoiced.as_str().to_string(),
            self.invoice_reference.clone(),
            self.paid.as_str().to_string(),
            self.approved.as_str().to_string(),
            self.approved_by.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project {
            name: name.to_string(),
            group_client: String::new(),
            description: String::new(),
            tags: String::new(),
            billable: Flag::Yes,
        }
    }

    #[test]
    fn flag_parse_is_lenient() {
        assert_eq!(Flag::parse("Yes"), Flag::Yes);
        assert_eq!(Flag::parse(" true "), Flag::Yes);
        assert_eq!(Flag::parse("no"), Flag::No);
        assert_eq!(Flag::parse(""), Flag::No);
    }

    #[test]
    fn flag_deserializes_from_bool_or_text() {
        let flags: Vec<Flag> = serde_json::from_str(r#"[true, false, "yes", "NO"]"#).unwrap();
        assert_eq!(flags, vec![Flag::Yes, Flag::No, Flag::Yes, Flag::No]);
    }

    #[test]
    fn weekly_allocation_keeps_document_order() {
        let alloc: WeeklyAllocation =
            serde_json::from_str(r#"{"zeta": 10, "alpha": 60, "mid": 30}"#).unwrap();
        let keys: Vec<&str> = alloc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&alloc).unwrap(),
            r#"{"zeta":10.0,"alpha":60.0,"mid":30.0}"#
        );
    }

    #[test]
    fn weekly_allocation_rejects_non_numeric_percentage() {
        let result: Result<WeeklyAllocation, _> = serde_json::from_str(r#"{"a": "fifty"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn weekly_allocation_duplicate_key_keeps_first_slot() {
        let alloc: WeeklyAllocation = [("a", 10.0), ("b", 20.0), ("a", 30.0)].into_iter().collect();
        let pairs: Vec<(&str, f64)> = alloc.iter().collect();
        assert_eq!(pairs, vec![("a", 30.0), ("b", 20.0)]);
    }

    #[test]
    fn override_tags_strip_hash() {
        let ov = EntryOverride {
            tags: Some("#meetings".to_string()),
            description: Some(String::new()),
        };
        assert_eq!(ov.tags(), Some("meetings"));
        assert_eq!(ov.description(), None);

        let bare_hash = EntryOverride {
            tags: Some("#".to_string()),
            description: None,
        };
        assert_eq!(bare_hash.tags(), None);
    }

    #[test]
    fn project_config_prefers_ooo_time_off_key() {
        let mut projects = BTreeMap::new();
        projects.insert("time_off".to_string(), project("Time Off"));
        projects.insert("time_off_ooo".to_string(), project("Time-Off (OOO)"));
        let config = ProjectConfig::new(UserInfo::default(), projects, None).unwrap();
        assert_eq!(config.time_off_key(), "time_off_ooo");
        assert_eq!(config.time_off().unwrap().name, "Time-Off (OOO)");
    }

    #[test]
    fn project_config_requires_time_off_project() {
        let mut projects = BTreeMap::new();
        projects.insert("administration".to_string(), project("Administration"));
        let err = ProjectConfig::new(UserInfo::default(), projects.clone(), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTimeOffProject(_)));

        let err = ProjectConfig::new(UserInfo::default(), projects, Some("vacation")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No time-off project configured (looked for: vacation)"
        );
    }

    #[test]
    fn week_window_span_is_seven_days() {
        let start = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
        let week = WeekWindow {
            index: 1,
            start,
            workdays: Vec::new(),
            registration_day: None,
        };
        assert_eq!(week.end(), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
        assert!(week.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!week.contains(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));
        assert_eq!(week.key(), "week_1");
    }

    #[test]
    fn time_entry_record_matches_header_order() {
        let user = UserInfo {
            name: "Ada".to_string(),
            teams: "Eng".to_string(),
            email: "ada@example.com".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let entry = TimeEntry::new(date, &user, &project("Administration"), 13.5, "ops", "");
        let record = entry.to_record();
        assert_eq!(record[0], "2026-01-02");
        assert_eq!(record[5], "Administration");
        assert_eq!(record[6], "810");
        assert_eq!(record[7], "13.5");
        assert_eq!(record[10], "yes");
        assert_eq!(record[11], "no");
        assert_eq!(record[15], "");
    }

    #[test]
    fn time_entry_json_uses_import_column_names() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let entry = TimeEntry::new(date, &UserInfo::default(), &project("Admin"), 16.0, "", "");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["Date"], "2026-01-02");
        assert_eq!(value["Minutes"], 960);
        assert_eq!(value["Invoice Reference"], "");
        assert_eq!(value["Approved"], "no");
    }
}
