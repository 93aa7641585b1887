//! Core module - month partitioning and allocation, free of I/O

mod calendar;
mod resolver;
mod types;

pub(crate) use calendar::{MonthInfo, month_info, month_name, partition};
pub(crate) use resolver::resolve;
pub(crate) use types::{
    AllocationInput, EntryOverride, Flag, Project, ProjectConfig, TimeEntry, TimeOffRecord,
    UserInfo, WeekWindow, WeeklyAllocation,
};
