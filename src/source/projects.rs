//! Project configuration loading
//!
//! Sources are tried in order: the Noko projects CSV export, a
//! `projects.json` file, then the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::{Flag, Project, ProjectConfig, UserInfo};
use crate::error::ConfigError;

/// Where project definitions are read from
#[derive(Debug, Clone)]
pub(crate) struct ProjectSources {
    pub(crate) csv: PathBuf,
    pub(crate) json: PathBuf,
}

/// Identity values that take precedence over any file
#[derive(Debug, Clone, Default)]
pub(crate) struct IdentityOverride {
    pub(crate) name: Option<String>,
    pub(crate) teams: Option<String>,
    pub(crate) email: Option<String>,
}

impl IdentityOverride {
    fn apply(&self, user: &mut UserInfo) {
        let fields = [
            (&self.name, &mut user.name),
            (&self.teams, &mut user.teams),
            (&self.email, &mut user.email),
        ];
        for (value, slot) in fields {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                slot.clone_from(value);
            }
        }
    }
}

/// On-disk shape of `projects.json`
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProjectsDocument {
    #[serde(default)]
    pub(crate) user_info: UserInfo,
    pub(crate) projects: BTreeMap<String, Project>,
}

#[derive(Debug, Deserialize)]
struct CsvProjectRow {
    #[serde(rename = "Project Name")]
    name: String,
    #[serde(rename = "Project Group/Client Name", default)]
    group_client: String,
    #[serde(rename = "Billable", default)]
    billable: String,
    #[serde(rename = "Notes", default)]
    notes: String,
}

/// Derive a stable project key from a display name.
///
/// `Time-Off (OOO)` becomes `time_off_ooo`, `Cinesys+ (C+)` becomes
/// `cinesysplus_cplus`.
pub(crate) fn project_key(name: &str) -> String {
    let replaced = name
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .replace('/', "_")
        .replace('+', "plus")
        .replace('-', "_");
    let cleaned: String = replaced
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    cleaned
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn read_csv_projects(path: &Path) -> Result<BTreeMap<String, Project>, ConfigError> {
    let csv_error = |source| ConfigError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut projects = BTreeMap::new();

    for row in reader.deserialize::<CsvProjectRow>() {
        let row = row.map_err(csv_error)?;
        projects.insert(
            project_key(&row.name),
            Project {
                group_client: row.group_client,
                description: row.notes.trim().to_string(),
                tags: String::new(),
                billable: Flag::parse(&row.billable),
                name: row.name,
            },
        );
    }

    Ok(projects)
}

fn read_json_projects(path: &Path) -> Result<ProjectsDocument, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_document(sources: &ProjectSources) -> Result<ProjectsDocument, ConfigError> {
    if sources.csv.exists() {
        match read_csv_projects(&sources.csv) {
            Ok(projects) if !projects.is_empty() => {
                debug!(path = %sources.csv.display(), count = projects.len(), "loaded projects");
                return Ok(ProjectsDocument {
                    user_info: UserInfo::default(),
                    projects,
                });
            }
            Ok(_) => warn!(path = %sources.csv.display(), "no projects in CSV, falling back"),
            Err(e) => warn!(error = %e, "failed to load projects CSV, falling back"),
        }
    }

    if sources.json.exists() {
        let document = read_json_projects(&sources.json)?;
        debug!(path = %sources.json.display(), count = document.projects.len(), "loaded projects");
        return Ok(document);
    }

    debug!("no project files found, using built-in defaults");
    Ok(default_projects())
}

/// Resolve the project configuration handed to the resolver
pub(crate) fn load_project_config(
    sources: &ProjectSources,
    identity: &IdentityOverride,
    time_off_key: Option<&str>,
) -> Result<ProjectConfig, ConfigError> {
    let ProjectsDocument {
        mut user_info,
        projects,
    } = load_document(sources)?;
    identity.apply(&mut user_info);
    if user_info.name.is_empty() {
        warn!("no user name configured, entries will have an empty Person column");
    }
    ProjectConfig::new(user_info, projects, time_off_key)
}

/// Write the built-in defaults to `path` unless a file is already there.
///
/// Returns whether a file was written.
pub(crate) fn save_default_projects(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(&default_projects()).map_err(|source| {
        ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(write_error)?;
    Ok(true)
}

fn default_project(name: &str, group_client: &str, description: &str, tags: &str) -> Project {
    Project {
        name: name.to_string(),
        group_client: group_client.to_string(),
        description: description.to_string(),
        tags: tags.to_string(),
        billable: Flag::Yes,
    }
}

/// Built-in project list used when no project file exists
pub(crate) fn default_projects() -> ProjectsDocument {
    const OPEX: &str = "OpEx Projects";
    const CAPEX: &str = "CapEx Projects";

    let projects = [
        ("administration", default_project("Administration", OPEX, "Admin Meetings & Tasks", "")),
        ("cinesys_plus", default_project("Cinesys+ (C+)", CAPEX, "", "")),
        ("gcp_migration", default_project("GCP Migration", CAPEX, "GCP Tasks/Meetings with SADA", "")),
        ("general_support", default_project("General Support (IT)", OPEX, "", "")),
        ("google_safety_tracker", default_project("Google Safety Tracker (GST)", CAPEX, "", "")),
        ("linear_iq", default_project("Linear IQ (LIQ)", CAPEX, "", "")),
        ("mindwave", default_project("Mindwave (Mw)", CAPEX, "Mindwave Translations discussion", "")),
        ("nrg_website", default_project("NRG Website", OPEX, "", "")),
        ("syndicate_tracking", default_project("Syndicate Tracking Product (STP)", OPEX, "", "")),
        ("time_off", default_project("Time-Off (OOO)", "", "", "other")),
    ]
    .into_iter()
    .map(|(key, project)| (key.to_string(), project))
    .collect();

    ProjectsDocument {
        user_info: UserInfo::default(),
        projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sources(dir: &TempDir) -> ProjectSources {
        ProjectSources {
            csv: dir.path().join("noko_projects.csv"),
            json: dir.path().join("projects.json"),
        }
    }

    #[test]
    fn project_key_examples() {
        assert_eq!(project_key("Time-Off (OOO)"), "time_off_ooo");
        assert_eq!(project_key("Cinesys+ (C+)"), "cinesysplus_cplus");
        assert_eq!(project_key("General Support (IT)"), "general_support_it");
        assert_eq!(project_key("GCP Tasks/Meetings"), "gcp_tasks_meetings");
        assert_eq!(project_key("  Odd -- Name!  "), "odd_name");
        assert_eq!(project_key("Café Ops"), "café_ops");
    }

    #[test]
    fn csv_takes_precedence_over_json() {
        let dir = TempDir::new().unwrap();
        let src = sources(&dir);
        fs::write(
            &src.csv,
            "Project Name,Project Group/Client Name,Billable,Notes\n\
             Administration,OpEx Projects,yes, Admin stuff \n\
             Time-Off (OOO),,no,\n",
        )
        .unwrap();
        fs::write(&src.json, r#"{"projects": {}}"#).unwrap();

        let config = load_project_config(&src, &IdentityOverride::default(), None).unwrap();
        assert_eq!(config.time_off_key(), "time_off_ooo");
        let admin = config.project("administration").unwrap();
        assert_eq!(admin.group_client, "OpEx Projects");
        assert_eq!(admin.description, "Admin stuff");
        assert_eq!(admin.billable, Flag::Yes);
        assert_eq!(config.time_off().unwrap().billable, Flag::No);
    }

    #[test]
    fn broken_csv_falls_back_to_json() {
        let dir = TempDir::new().unwrap();
        let src = sources(&dir);
        fs::write(&src.csv, "Name,Other\nfoo,bar\n").unwrap();
        fs::write(
            &src.json,
            r#"{"user_info": {"name": "Ada", "teams": "Eng", "email": "ada@example.com"},
                "projects": {"time_off": {"name": "Time Off", "tags": "other", "billable": "yes"}}}"#,
        )
        .unwrap();

        let config = load_project_config(&src, &IdentityOverride::default(), None).unwrap();
        assert_eq!(config.user.name, "Ada");
        assert_eq!(config.time_off_key(), "time_off");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = sources(&dir);
        fs::write(&src.json, "{not json").unwrap();
        let err = load_project_config(&src, &IdentityOverride::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn missing_files_use_defaults_and_identity_override() {
        let dir = TempDir::new().unwrap();
        let identity = IdentityOverride {
            name: Some("Grace Hopper".to_string()),
            teams: None,
            email: Some(String::new()),
        };
        let config = load_project_config(&sources(&dir), &identity, None).unwrap();
        assert_eq!(config.projects.len(), 10);
        assert_eq!(config.time_off_key(), "time_off");
        assert_eq!(config.user.name, "Grace Hopper");
        assert_eq!(config.user.email, "");
    }

    #[test]
    fn explicit_time_off_key_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_project_config(&sources(&dir), &IdentityOverride::default(), Some("pto"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTimeOffProject(_)));
    }

    #[test]
    fn save_default_projects_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("projects.json");
        assert!(save_default_projects(&path).unwrap());
        let doc: ProjectsDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.projects["time_off"].tags, "other");

        fs::write(&path, "{}").unwrap();
        assert!(!save_default_projects(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
