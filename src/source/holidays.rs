//! Built-in company holiday calendars

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::consts::HOURS_PER_DAY;
use crate::core::TimeOffRecord;

const US_2026: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (1, 2, "New Year's Day"),
    (1, 19, "Martin Luther King Jr Day"),
    (2, 16, "Presidents' Day"),
    (4, 3, "Good Friday"),
    (5, 22, "Memorial Day"),
    (5, 25, "Memorial Day"),
    (6, 19, "Juneteenth"),
    (7, 2, "Fourth of July"),
    (7, 3, "Fourth of July"),
    (9, 4, "Labor Day"),
    (9, 7, "Labor Day"),
    (11, 25, "Thanksgiving"),
    (11, 26, "Thanksgiving"),
    (11, 27, "Thanksgiving"),
    (12, 24, "Christmas Eve"),
    (12, 25, "Christmas"),
    (12, 28, "Holiday Break"),
    (12, 29, "Holiday Break"),
    (12, 30, "Holiday Break"),
    (12, 31, "New Year's Eve"),
];

fn table(year: i32) -> Option<&'static [(u32, u32, &'static str)]> {
    match year {
        2026 => Some(US_2026),
        _ => None,
    }
}

/// Years that have a built-in calendar
pub(crate) fn known_years() -> &'static [i32] {
    &[2026]
}

/// Full-day holidays for `year`, or None when no calendar is built in
pub(crate) fn holidays(year: i32) -> Option<BTreeMap<NaiveDate, TimeOffRecord>> {
    let days = table(year)?;
    Some(
        days.iter()
            .filter_map(|&(month, day, name)| {
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                Some((
                    date,
                    TimeOffRecord {
                        hours: HOURS_PER_DAY,
                        description: Some(name.to_string()),
                    },
                ))
            })
            .collect(),
    )
}

/// Add the holidays falling in `year`/`month` to `time_off`.
///
/// Dates already present keep their explicit entry. Returns how many
/// holidays were added.
pub(crate) fn merge_holidays(
    time_off: &mut BTreeMap<NaiveDate, TimeOffRecord>,
    year: i32,
    month: u32,
) -> usize {
    let Some(all) = holidays(year) else {
        return 0;
    };
    let mut added = 0;
    for (date, record) in all.into_iter().filter(|(d, _)| d.month() == month) {
        if let std::collections::btree_map::Entry::Vacant(slot) = time_off.entry(date) {
            slot.insert(record);
            added += 1;
        }
    }
    added
}
