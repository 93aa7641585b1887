mod csv;
mod format;
mod json;
mod table;

pub(crate) use csv::write_entries_csv;
pub(crate) use json::{
    output_entries_json, output_holidays_json, output_month_json, output_profile_json,
    output_profiles_json, output_projects_json,
};
pub(crate) use table::{
    print_entries_table, print_holidays_table, print_month_table, print_profile_table,
    print_profiles_table, print_projects_table,
};
