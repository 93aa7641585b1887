use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Color};
use std::collections::BTreeMap;

use crate::consts::DATE_FORMAT;
use crate::core::{MonthInfo, ProjectConfig, TimeEntry, TimeOffRecord, WeekWindow, month_name};
use crate::output::format::{
    create_styled_table, format_hours, header_cell, right_cell, styled_cell,
};
use crate::source::ProfileSummary;
use crate::source::profiles::Profile;

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Hours per week index, in week order, plus the overall total.
///
/// Dates outside `year`-`month` land under index 0 even when a partition
/// week spans them.
fn week_totals(
    entries: &[TimeEntry],
    weeks: &[WeekWindow],
    year: i32,
    month: u32,
) -> (Vec<(usize, f64)>, f64) {
    let mut per_week: BTreeMap<usize, f64> = BTreeMap::new();
    for entry in entries {
        let in_month = entry.date.year() == year && entry.date.month() == month;
        let index = weeks
            .iter()
            .find(|w| in_month && w.contains(entry.date))
            .map_or(0, |w| w.index);
        *per_week.entry(index).or_default() += entry.hours;
    }
    let total = per_week.values().sum();
    (per_week.into_iter().collect(), total)
}

/// Preview of the generated entries with week and month totals
pub(crate) fn print_entries_table(
    entries: &[TimeEntry],
    weeks: &[WeekWindow],
    year: i32,
    month: u32,
    use_color: bool,
) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", use_color),
        header_cell("Project", use_color),
        header_cell("Hours", use_color),
        header_cell("Minutes", use_color),
        header_cell("Tags", use_color),
        header_cell("Description", use_color),
        header_cell("Billable", use_color),
    ]);

    let hours_color = use_color.then_some(Color::Green);
    for entry in entries {
        table.add_row(vec![
            Cell::new(date_text(entry.date)),
            Cell::new(&entry.project),
            right_cell(&format_hours(entry.hours), hours_color, false),
            right_cell(&entry.minutes.to_string(), None, false),
            Cell::new(&entry.tags),
            Cell::new(&entry.description),
            Cell::new(entry.billable.as_str()),
        ]);
    }

    let (per_week, total) = week_totals(entries, weeks, year, month);
    println!("{table}");
    println!();
    for (index, hours) in per_week {
        match weeks.iter().find(|w| w.index == index) {
            Some(week) => println!(
                "  Week {index} ({} to {}): {} h",
                date_text(week.start),
                date_text(week.end()),
                format_hours(hours)
            ),
            None => println!("  Outside month weeks: {} h", format_hours(hours)),
        }
    }
    println!(
        "\n  {} entries, {} hours total\n",
        entries.len(),
        format_hours(total)
    );
}

pub(crate) fn print_month_table(info: &MonthInfo, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Week", use_color),
        header_cell("Start", use_color),
        header_cell("End", use_color),
        header_cell("Work Days", use_color),
        header_cell("Registration Day", use_color),
    ]);

    for week in &info.weeks {
        table.add_row(vec![
            Cell::new(format!("week_{}", week.week)),
            Cell::new(date_text(week.start)),
            Cell::new(date_text(week.end)),
            right_cell(&week.work_days.to_string(), None, false),
            Cell::new(format!(
                "{} ({})",
                date_text(week.registration_day),
                week.registration_day.weekday()
            )),
        ]);
    }

    let work_days: usize = info.weeks.iter().map(|w| w.work_days).sum();
    let total_color = use_color.then_some(Color::Yellow);
    table.add_row(vec![
        styled_cell("TOTAL", total_color, true),
        Cell::new(""),
        Cell::new(""),
        right_cell(&work_days.to_string(), total_color, true),
        Cell::new(""),
    ]);

    println!("\n  {} {}\n", info.month_name, info.year);
    println!("{table}");
    println!("\n  {} days, {} work days\n", info.total_days, work_days);
}

pub(crate) fn print_projects_table(config: &ProjectConfig, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Key", use_color),
        header_cell("Project", use_color),
        header_cell("Group/Client", use_color),
        header_cell("Tags", use_color),
        header_cell("Billable", use_color),
        header_cell("Description", use_color),
    ]);

    let time_off_color = use_color.then_some(Color::Magenta);
    for (key, project) in &config.projects {
        let color = (key == config.time_off_key()).then_some(time_off_color).flatten();
        table.add_row(vec![
            styled_cell(key, color, false),
            Cell::new(&project.name),
            Cell::new(&project.group_client),
            Cell::new(&project.tags),
            Cell::new(project.billable.as_str()),
            Cell::new(&project.description),
        ]);
    }

    let user = &config.user;
    println!("\n  {} <{}> {}\n", user.name, user.email, user.teams);
    println!("{table}");
    println!(
        "\n  {} projects, time off recorded on {}\n",
        config.projects.len(),
        config.time_off_key()
    );
}

pub(crate) fn print_holidays_table(
    year: i32,
    holidays: &BTreeMap<NaiveDate, TimeOffRecord>,
    use_color: bool,
) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", use_color),
        header_cell("Day", use_color),
        header_cell("Holiday", use_color),
        header_cell("Hours", use_color),
    ]);

    for (date, record) in holidays {
        table.add_row(vec![
            Cell::new(date_text(*date)),
            Cell::new(date.weekday().to_string()),
            Cell::new(record.description.as_deref().unwrap_or_default()),
            right_cell(&format_hours(record.hours), None, false),
        ]);
    }

    println!("\n  Holidays {year}\n");
    println!("{table}");
    println!("\n  {} days\n", holidays.len());
}

pub(crate) fn print_profiles_table(profiles: &[ProfileSummary], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("File", use_color),
        header_cell("Profile", use_color),
        header_cell("Month", use_color),
        header_cell("Created", use_color),
    ]);

    for profile in profiles {
        let month = match profile.year {
            Some(year) => format!("{} {year}", profile.month_name),
            None => profile.month_name.clone(),
        };
        table.add_row(vec![
            Cell::new(&profile.filename),
            Cell::new(profile.profile_name.as_deref().unwrap_or_default()),
            Cell::new(month),
            Cell::new(profile.created_date.as_deref().unwrap_or_default()),
        ]);
    }

    println!("{table}");
    println!("\n  {} profiles\n", profiles.len());
}

/// Contents of one saved profile: allocations per week, then time off
pub(crate) fn print_profile_table(profile: &Profile, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Week", use_color),
        header_cell("Project", use_color),
        header_cell("Share", use_color),
    ]);
    for (week, allocation) in &profile.weekly_data {
        for (project, percentage) in allocation.iter() {
            table.add_row(vec![
                Cell::new(week),
                Cell::new(project),
                right_cell(&format!("{percentage}%"), None, false),
            ]);
        }
    }

    println!(
        "\n  {} ({} {})\n",
        profile.profile_name,
        month_name(profile.month),
        profile.year
    );
    println!("{table}");

    if !profile.time_off_data.is_empty() {
        let mut time_off = create_styled_table();
        time_off.set_header(vec![
            header_cell("Date", use_color),
            header_cell("Hours", use_color),
            header_cell("Description", use_color),
        ]);
        for (date, record) in &profile.time_off_data {
            time_off.add_row(vec![
                Cell::new(date),
                right_cell(&format_hours(record.hours), None, false),
                Cell::new(record.description.as_deref().unwrap_or_default()),
            ]);
        }
        println!("\n  Time off\n");
        println!("{time_off}");
    }
    println!("\n  Created {}\n", profile.created_date);
}
