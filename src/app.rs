use chrono::{Datelike, Local};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands, GenerateArgs, ProfileCommand, ProjectsCommand};
use crate::config::Config;
use crate::core::{ProjectConfig, month_info, partition, resolve};
use crate::error::AppError;
use crate::output::{
    output_entries_json, output_holidays_json, output_month_json, output_profile_json,
    output_profiles_json, output_projects_json, print_entries_table, print_holidays_table,
    print_month_table, print_profile_table, print_profiles_table, print_projects_table,
    write_entries_csv,
};
use crate::source::{
    IdentityOverride, holidays, known_years, list_profiles, load_profile, load_project_config,
    merge_holidays, override_period, read_request, save_default_projects, save_profile,
};
use crate::utils::parse_month;

/// Where `generate` sends the CSV
const STDOUT_MARKER: &str = "-";

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
}

impl CommandContext<'_> {
    fn project_config(&self) -> Result<ProjectConfig, AppError> {
        let user = &self.config.user;
        let identity = IdentityOverride {
            name: user.name.clone(),
            teams: user.teams.clone(),
            email: user.email.clone(),
        };
        let config = load_project_config(
            &self.cli.project_sources(),
            &identity,
            self.config.time_off_project.as_deref(),
        )?;
        Ok(config)
    }
}

fn default_output_path(config: &Config, year: i32, month: u32) -> PathBuf {
    let name = format!("noko-import-{year}-{month:02}.csv");
    match &config.output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn handle_generate(args: &GenerateArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let mut input = read_request(&args.input)?;
    override_period(&mut input, args.year, args.month)?;

    let weeks = partition(input.year, input.month);
    if weeks.is_empty() {
        return Err(AppError::InvalidMonth {
            input: format!("{}-{:02}", input.year, input.month),
        });
    }

    if args.holidays {
        if holidays(input.year).is_none() {
            warn!(year = input.year, "no built-in holiday calendar for year");
        }
        let added = merge_holidays(&mut input.time_off, input.year, input.month);
        debug!(added, "merged holidays into time off");
    }

    let project_config = ctx.project_config()?;
    let entries = resolve(&input, &weeks, &project_config);

    if ctx.cli.json {
        println!("{}", output_entries_json(&entries)?);
        return Ok(());
    }
    if args.preview {
        print_entries_table(
            &entries,
            &weeks,
            input.year,
            input.month,
            ctx.cli.use_color(),
        );
        return Ok(());
    }

    match args.output.as_deref() {
        Some(STDOUT_MARKER) => write_entries_csv(io::stdout().lock(), &entries)?,
        output => {
            let path = output.map_or_else(
                || default_output_path(ctx.config, input.year, input.month),
                PathBuf::from,
            );
            let write_error = |source| AppError::Write {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
            let file = File::create(&path).map_err(write_error)?;
            write_entries_csv(BufWriter::new(file), &entries)?;
            println!("Wrote {} entries to {}", entries.len(), path.display());
        }
    }
    Ok(())
}

fn handle_month(month: &str, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (year, month_number) = parse_month(month)?;
    let info = month_info(year, month_number).ok_or_else(|| AppError::InvalidMonth {
        input: month.to_string(),
    })?;

    if ctx.cli.json {
        println!("{}", output_month_json(&info)?);
    } else {
        print_month_table(&info, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_projects(
    command: Option<&ProjectsCommand>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    if let Some(ProjectsCommand::Init) = command {
        let path = ctx.cli.project_sources().json;
        if save_default_projects(&path)? {
            println!("Created {}", path.display());
        } else {
            println!("{} already exists, left unchanged", path.display());
        }
        return Ok(());
    }

    let config = ctx.project_config()?;
    if ctx.cli.json {
        println!("{}", output_projects_json(&config)?);
    } else {
        print_projects_table(&config, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_holidays(year: Option<i32>, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let year = year.unwrap_or_else(|| Local::now().year());
    let days = holidays(year).unwrap_or_default();

    if ctx.cli.json {
        println!("{}", output_holidays_json(year, &days)?);
    } else if days.is_empty() {
        let known: Vec<String> = known_years().iter().map(i32::to_string).collect();
        println!(
            "No built-in holidays for {year} (available: {}).",
            known.join(", ")
        );
    } else {
        print_holidays_table(year, &days, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_profile(command: &ProfileCommand, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let dir = ctx.cli.profiles_dir();
    match command {
        ProfileCommand::Save { name, input } => {
            let input = read_request(input)?;
            let path = save_profile(dir, name, &input)?;
            println!("Saved profile to {}", path.display());
        }
        ProfileCommand::Load { file } => {
            let profile = load_profile(dir, file)?;
            if ctx.cli.json {
                println!("{}", output_profile_json(&profile)?);
            } else {
                print_profile_table(&profile, ctx.cli.use_color());
            }
        }
        ProfileCommand::List => {
            let profiles = list_profiles(dir)?;
            if ctx.cli.json {
                println!("{}", output_profiles_json(&profiles)?);
            } else if profiles.is_empty() {
                println!("No saved profiles in {}.", dir.display());
            } else {
                print_profiles_table(&profiles, ctx.cli.use_color());
            }
        }
    }
    Ok(())
}

/// Dispatch the parsed command
pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        Commands::Generate(args) => handle_generate(args, ctx),
        Commands::Month { month } => handle_month(month, ctx),
        Commands::Projects { command } => handle_projects(command.as_ref(), ctx),
        Commands::Holidays { year } => handle_holidays(*year, ctx),
        Commands::Profile { command } => handle_profile(command, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_name_is_zero_padded() {
        let config = Config::default();
        assert_eq!(
            default_output_path(&config, 2026, 3),
            PathBuf::from("noko-import-2026-03.csv")
        );
    }

    #[test]
    fn default_output_uses_output_dir() {
        let config = Config {
            output_dir: Some(PathBuf::from("exports")),
            ..Config::default()
        };
        assert_eq!(
            default_output_path(&config, 2026, 11),
            PathBuf::from("exports").join("noko-import-2026-11.csv")
        );
    }
}
