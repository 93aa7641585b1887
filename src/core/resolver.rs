//! Allocation resolver: weekly percentages to half-hour Noko entries
//!
//! For every week with a registration day the resolver works out how many
//! hours were available, splits them by percentage, rounds each share to
//! half hours and pushes the leftover rounding error onto the dominant
//! project. Time off is booked separately and never blocks project rows.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::consts::{DATE_FORMAT, HOUR_STEP, HOURS_PER_DAY, TIME_OFF_TAG};
use crate::core::calendar::registration_days;
use crate::core::types::{
    AllocationInput, Project, ProjectConfig, TimeEntry, TimeOffRecord, WeekWindow,
    WeeklyAllocation,
};

/// One project's slice of a week before it becomes an entry
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Share<'a> {
    pub(crate) key: &'a str,
    pub(crate) project: &'a Project,
    pub(crate) raw_hours: f64,
    pub(crate) hours: f64,
}

/// Round to the nearest half hour, ties to even
pub(crate) fn round_half_hours(hours: f64) -> f64 {
    (hours * 2.0).round_ties_even() / 2.0
}

/// Hours available in a week after subtracting time off from its workdays
pub(crate) fn available_hours(
    week: &WeekWindow,
    time_off: &BTreeMap<NaiveDate, TimeOffRecord>,
) -> f64 {
    week.workdays
        .iter()
        .map(|day| match time_off.get(day) {
            Some(record) => HOURS_PER_DAY - record.hours,
            None => HOURS_PER_DAY,
        })
        .sum()
}

/// Turn percentages into rounded shares, skipping zero/negative values and
/// projects the configuration does not know.
pub(crate) fn allocate<'a>(
    week_index: usize,
    allocation: &'a WeeklyAllocation,
    available: f64,
    config: &'a ProjectConfig,
) -> Vec<Share<'a>> {
    let mut shares = Vec::new();
    for (key, percentage) in allocation.iter() {
        if percentage <= 0.0 {
            continue;
        }
        let Some(project) = config.project(key) else {
            warn!(project = key, week = week_index, "project not found in configuration, skipping");
            continue;
        };
        let raw_hours = (percentage / 100.0) * available;
        shares.push(Share {
            key,
            project,
            raw_hours,
            hours: round_half_hours(raw_hours),
        });
    }
    shares
}

/// Index of the first share holding the largest raw hours
fn dominant_share(shares: &[Share<'_>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, share) in shares.iter().enumerate() {
        match best {
            Some(b) if shares[b].raw_hours >= share.raw_hours => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Move rounding error onto the dominant share in whole half-hour steps.
///
/// Returns the index and adjustment applied, if any.
pub(crate) fn reconcile(shares: &mut [Share<'_>], available: f64) -> Option<(usize, f64)> {
    let total: f64 = shares.iter().map(|s| s.hours).sum();
    let diff = available - total;
    if diff.abs() < HOUR_STEP {
        return None;
    }

    let index = dominant_share(shares)?;
    let adjustment = (diff / HOUR_STEP).trunc() * HOUR_STEP;
    let share = &mut shares[index];
    share.hours = (share.hours + adjustment).max(0.0);
    Some((index, adjustment))
}

fn time_off_entry(
    date: NaiveDate,
    record: &TimeOffRecord,
    config: &ProjectConfig,
) -> Option<TimeEntry> {
    let Some(project) = config.time_off() else {
        warn!(project = config.time_off_key(), "time-off project missing, dropping time off");
        return None;
    };
    let description = record.description.as_deref().unwrap_or(project.description.as_str());
    Some(TimeEntry::new(
        date,
        &config.user,
        project,
        record.hours,
        TIME_OFF_TAG,
        description,
    ))
}

/// Build the month's import entries.
///
/// Per registration day: the time-off row (if any), then one row per
/// project share with hours left after reconciliation. Time off that never
/// landed on a registration day is appended at the end in date order.
pub(crate) fn resolve(
    input: &AllocationInput,
    weeks: &[WeekWindow],
    config: &ProjectConfig,
) -> Vec<TimeEntry> {
    let mut entries = Vec::new();
    let mut booked_time_off = BTreeSet::new();

    for (week, key) in input.overrides.keys() {
        if config.project(key).is_none() {
            warn!(project = key.as_str(), week, "override for unknown project ignored");
        }
    }

    debug!(
        days = ?registration_days(weeks)
            .iter()
            .map(|(_, d)| d.format(DATE_FORMAT).to_string())
            .collect::<Vec<_>>(),
        "week registration days"
    );

    for week in weeks {
        let Some(day) = week.registration_day else {
            continue;
        };

        if let Some(record) = input.time_off.get(&day)
            && let Some(entry) = time_off_entry(day, record, config)
        {
            entries.push(entry);
            booked_time_off.insert(day);
        }

        let Some(allocation) = input.weeks.get(&week.index) else {
            debug!(week = %week.key(), "no allocation for week");
            continue;
        };

        let available = available_hours(week, &input.time_off);
        debug!(week = %week.key(), available, "available work hours");

        let mut shares = allocate(week.index, allocation, available, config);
        if let Some((index, adjustment)) = reconcile(&mut shares, available) {
            debug!(
                project = shares[index].key,
                adjustment,
                weekly_total = available,
                "adjusted project to match weekly total"
            );
        }

        for share in shares.iter().filter(|s| s.hours > 0.0) {
            let overrides = input.overrides.get(&(week.index, share.key.to_string()));
            let tags = overrides
                .and_then(|o| o.tags())
                .unwrap_or(share.project.tags.as_str());
            let description = overrides
                .and_then(|o| o.description())
                .unwrap_or(share.project.description.as_str());
            entries.push(TimeEntry::new(
                day,
                &config.user,
                share.project,
                share.hours,
                tags,
                description,
            ));
        }
    }

    for (date, record) in &input.time_off {
        if booked_time_off.contains(date) {
            continue;
        }
        if let Some(entry) = time_off_entry(*date, record, config) {
            debug!(date = %date.format(DATE_FORMAT), "added remaining time-off entry");
            entries.push(entry);
        }
    }

    entries
}
