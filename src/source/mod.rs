//! Input sources
//!
//! Everything the resolver consumes comes from here: project definitions,
//! allocation requests, saved profiles and holiday calendars.

pub(crate) mod holidays;
pub(crate) mod profiles;
pub(crate) mod projects;
pub(crate) mod request;

pub(crate) use holidays::{holidays, known_years, merge_holidays};
pub(crate) use profiles::{ProfileSummary, list_profiles, load_profile, save_profile};
pub(crate) use projects::{
    IdentityOverride, ProjectSources, load_project_config, save_default_projects,
};
pub(crate) use request::{override_period, read_request};
