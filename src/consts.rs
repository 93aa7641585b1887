/// Standard date format used throughout the codebase: "2026-01-02"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hours in a full working day; days without time off count this much
pub(crate) const HOURS_PER_DAY: f64 = 8.0;

/// Smallest unit of time Noko accepts on an import row
pub(crate) const HOUR_STEP: f64 = 0.5;

/// Tag forced onto every time-off entry
pub(crate) const TIME_OFF_TAG: &str = "other";

/// Candidate keys for the time-off project, in lookup order
pub(crate) const TIME_OFF_KEYS: &[&str] = &["time_off_ooo", "time_off"];

/// Column order of the Noko import file
pub(crate) const CSV_HEADER: [&str; 16] = [
    "Date",
    "Person",
    "Teams",
    "Email",
    "Group/Client",
    "Project",
    "Minutes",
    "Hours",
    "Tags",
    "Description",
    "Billable",
    "Invoiced",
    "Invoice Reference",
    "Paid",
    "Approved",
    "Approved By",
];

/// Fallback profile name when a saved profile has none
pub(crate) const UNKNOWN: &str = "Unknown";
