//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a Noko import file from a request or profile
    Generate(GenerateArgs),
    /// Show the weeks of a month and their work days
    Month {
        /// Month as YYYY-MM
        month: String,
    },
    /// Show the configured projects
    Projects {
        #[command(subcommand)]
        command: Option<ProjectsCommand>,
    },
    /// Show the built-in holiday calendar
    Holidays {
        /// Calendar year (default: current year)
        year: Option<i32>,
    },
    /// Save, load and list month profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Request document (JSON)
    pub(crate) input: PathBuf,

    /// Override the request's year
    #[arg(long)]
    pub(crate) year: Option<i32>,

    /// Override the request's month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub(crate) month: Option<u32>,

    /// Add built-in holidays for the month as time off
    #[arg(long)]
    pub(crate) holidays: bool,

    /// Output file, "-" for stdout
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<String>,

    /// Print the entries as a table instead of writing a file
    #[arg(long)]
    pub(crate) preview: bool,
}

#[derive(Subcommand)]
pub(crate) enum ProjectsCommand {
    /// Write the built-in project list to the projects JSON file
    Init,
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    /// Save a request document as a named profile
    Save {
        /// Profile name
        name: String,
        /// Request document (JSON)
        input: PathBuf,
    },
    /// Show a saved profile
    Load {
        /// Profile file name, e.g. spring_2026_03.json
        file: String,
    },
    /// List saved profiles, newest first
    List,
}
