//! degreetrack configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::semester::DEFAULT_SEMESTER_COUNT;

/// Top-level degreetrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreetrackConfig {
    /// Course catalog TOML file.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Student plan TOML file (or a directory of plans).
    #[serde(default = "default_plan")]
    pub plan: PathBuf,
    /// Output directory for generated reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Semesters shown by the semester planner.
    #[serde(default = "default_semester_count")]
    pub semester_count: usize,
    /// Max students evaluated concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("catalog.toml")
}
fn default_plan() -> PathBuf {
    PathBuf::from("plan.toml")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./degreetrack-reports")
}
fn default_semester_count() -> usize {
    DEFAULT_SEMESTER_COUNT
}
fn default_parallelism() -> usize {
    4
}

impl Default for DegreetrackConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            plan: default_plan(),
            output_dir: default_output_dir(),
            semester_count: default_semester_count(),
            parallelism: default_parallelism(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `degreetrack.toml` in the current directory
/// 2. `~/.config/degreetrack/config.toml`
///
/// Environment variable overrides: `DEGREETRACK_CATALOG`, `DEGREETRACK_PLAN`.
pub fn load_config() -> Result<DegreetrackConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DegreetrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("degreetrack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => DegreetrackConfig::default(),
    };

    // Apply env var overrides
    if let Ok(catalog) = std::env::var("DEGREETRACK_CATALOG") {
        config.catalog = PathBuf::from(catalog);
    }
    if let Ok(plan) = std::env::var("DEGREETRACK_PLAN") {
        config.plan = PathBuf::from(plan);
    }

    config.catalog = resolve_path(&config.catalog);
    config.plan = resolve_path(&config.plan);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

fn parse_config(path: &Path) -> Result<DegreetrackConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<DegreetrackConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("degreetrack"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_DEGREETRACK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_DEGREETRACK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("data/${_DEGREETRACK_TEST_VAR}/plan.toml"),
            "data/hello/plan.toml"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_DEGREETRACK_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = DegreetrackConfig::default();
        assert_eq!(config.catalog, PathBuf::from("catalog.toml"));
        assert_eq!(config.semester_count, 8);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
catalog = "data/catalog.toml"
semester_count = 6
"#;
        let config: DegreetrackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog, PathBuf::from("data/catalog.toml"));
        assert_eq!(config.plan, PathBuf::from("plan.toml"));
        assert_eq!(config.semester_count, 6);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("degreetrack.toml");
        std::fs::write(&path, "output_dir = \"${_DEGREETRACK_OUT}/reports\"\n").unwrap();
        std::env::set_var("_DEGREETRACK_OUT", "/tmp/dt");

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/dt/reports"));
        std::env::remove_var("_DEGREETRACK_OUT");
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/degreetrack.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
