//! Month partitioning into Monday-aligned registration weeks

use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use serde::Serialize;

use crate::consts::UNKNOWN;
use crate::core::types::WeekWindow;

/// Monday through Friday
pub(crate) fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First and last day of a month, `None` for an invalid year/month
pub(crate) fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
    };
    Some((first, last))
}

/// Split a month into every Monday-start week that has at least one day in it.
///
/// Weeks without an in-month weekday still take an index so `week_N`
/// lookups stay positional. Returns an empty list for an invalid month.
pub(crate) fn partition(year: i32, month: u32) -> Vec<WeekWindow> {
    let Some((first_day, last_day)) = month_bounds(year, month) else {
        return Vec::new();
    };

    let offset = first_day.weekday().num_days_from_monday();
    let mut monday = first_day - Duration::days(i64::from(offset));
    let mut weeks = Vec::new();

    while monday <= last_day {
        let sunday = monday + Duration::days(6);
        if sunday >= first_day {
            let workdays: Vec<NaiveDate> = (0..7)
                .map(|d| monday + Duration::days(d))
                .filter(|d| *d >= first_day && *d <= last_day && is_weekday(*d))
                .collect();
            weeks.push(WeekWindow {
                index: weeks.len() + 1,
                start: monday,
                registration_day: workdays.last().copied(),
                workdays,
            });
        }
        monday += Duration::days(7);
    }

    weeks
}

/// Registration days of the month with the week index they belong to
pub(crate) fn registration_days(weeks: &[WeekWindow]) -> Vec<(usize, NaiveDate)> {
    weeks
        .iter()
        .filter_map(|w| w.registration_day.map(|d| (w.index, d)))
        .collect()
}

/// English month name, `Unknown` outside 1-12
pub(crate) fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or(UNKNOWN, |m| m.name())
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MonthWeek {
    pub(crate) week: usize,
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
    pub(crate) work_days: usize,
    pub(crate) registration_day: NaiveDate,
}

/// Calendar summary used to fill in a month's request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MonthInfo {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) month_name: &'static str,
    pub(crate) total_days: u32,
    pub(crate) weeks: Vec<MonthWeek>,
}

/// Weeks with at least one in-month workday, numbered as `week_N` expects
pub(crate) fn month_info(year: i32, month: u32) -> Option<MonthInfo> {
    let (_, last_day) = month_bounds(year, month)?;
    let weeks = partition(year, month)
        .into_iter()
        .filter_map(|w| {
            Some(MonthWeek {
                week: w.index,
                start: w.start,
                end: w.end(),
                work_days: w.workdays.len(),
                registration_day: w.registration_day?,
            })
        })
        .collect();
    Some(MonthInfo {
        year,
        month,
        month_name: month_name(month),
        total_days: last_day.day(),
        weeks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_handles_december_and_leap_years() {
        assert_eq!(
            month_bounds(2026, 12),
            Some((date(2026, 12, 1), date(2026, 12, 31)))
        );
        assert_eq!(
            month_bounds(2024, 2),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(month_bounds(2026, 13), None);
        assert_eq!(month_bounds(2026, 0), None);
    }

    #[test]
    fn january_2026_starts_mid_week() {
        // 2026-01-01 is a Thursday
        let weeks = partition(2026, 1);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0].start, date(2025, 12, 29));
        assert_eq!(weeks[0].workdays, vec![date(2026, 1, 1), date(2026, 1, 2)]);
        assert_eq!(weeks[0].registration_day, Some(date(2026, 1, 2)));
        assert_eq!(weeks[4].start, date(2026, 1, 26));
        assert_eq!(weeks[4].registration_day, Some(date(2026, 1, 30)));
    }

    #[test]
    fn month_starting_saturday_reserves_empty_first_week() {
        // 2025-11-01 is a Saturday
        let weeks = partition(2025, 11);
        assert_eq!(weeks[0].index, 1);
        assert_eq!(weeks[0].start, date(2025, 10, 27));
        assert!(weeks[0].workdays.is_empty());
        assert_eq!(weeks[0].registration_day, None);
        assert_eq!(weeks[1].index, 2);
        assert_eq!(weeks[1].registration_day, Some(date(2025, 11, 7)));
    }

    #[test]
    fn registration_day_stops_at_month_end() {
        // 2026-03-31 is a Tuesday
        let weeks = partition(2026, 3);
        let last = weeks.last().unwrap();
        assert_eq!(last.start, date(2026, 3, 30));
        assert_eq!(last.registration_day, Some(date(2026, 3, 31)));
        assert_eq!(last.workdays.len(), 2);
    }

    #[test]
    fn month_ending_on_sunday_has_no_trailing_week() {
        // 2026-05-31 is a Sunday
        let weeks = partition(2026, 5);
        assert_eq!(weeks.last().unwrap().end(), date(2026, 5, 31));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn february_starting_monday_fits_four_weeks() {
        // 2027-02-01 is a Monday and February 2027 has 28 days
        let weeks = partition(2027, 2);
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().all(|w| w.workdays.len() == 5));
    }

    #[test]
    fn invalid_month_yields_no_weeks() {
        assert!(partition(2026, 13).is_empty());
    }

    #[test]
    fn every_month_partition_covers_all_weekdays() {
        for year in [2024, 2025, 2026, 2027] {
            for month in 1..=12 {
                let weeks = partition(year, month);
                let (first, last) = month_bounds(year, month).unwrap();

                for (i, w) in weeks.iter().enumerate() {
                    assert_eq!(w.index, i + 1);
                    assert_eq!(w.start.weekday(), Weekday::Mon);
                    assert_eq!(w.end() - w.start, Duration::days(6));
                    assert!(w.end() >= first && w.start <= last);
                }

                let covered: BTreeSet<NaiveDate> =
                    weeks.iter().flat_map(|w| w.workdays.iter().copied()).collect();
                let expected: BTreeSet<NaiveDate> = first
                    .iter_days()
                    .take_while(|d| *d <= last)
                    .filter(|d| is_weekday(*d))
                    .collect();
                assert_eq!(covered, expected, "{year}-{month:02}");
            }
        }
    }

    #[test]
    fn registration_days_skip_empty_weeks() {
        let weeks = partition(2025, 11);
        let days = registration_days(&weeks);
        assert_eq!(days[0], (2, date(2025, 11, 7)));
        assert_eq!(days.len(), weeks.len() - 1);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn month_info_for_february_2026() {
        let info = month_info(2026, 2).unwrap();
        assert_eq!(info.month_name, "February");
        assert_eq!(info.total_days, 28);
        // Feb 1 2026 is a Sunday; its week has no workdays and is left out
        let numbers: Vec<usize> = info.weeks.iter().map(|w| w.week).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5]);
        assert_eq!(info.weeks[0].start, date(2026, 2, 2));
        assert_eq!(info.weeks[0].end, date(2026, 2, 8));
        assert_eq!(info.weeks[0].work_days, 5);
        let total: usize = info.weeks.iter().map(|w| w.work_days).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn month_info_rejects_invalid_month() {
        assert!(month_info(2026, 13).is_none());
    }
}
