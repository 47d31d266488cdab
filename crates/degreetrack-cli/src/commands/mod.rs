//! Subcommand implementations.

pub mod catalog;
pub mod evaluate;
pub mod init;
pub mod records;
pub mod render;
pub mod semesters;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use degreetrack_core::config::{load_config_from, DegreetrackConfig};
use degreetrack_core::store::FileStore;
use degreetrack_core::traits::RecordStore;

/// Where the catalog and plan live. Flags override the config file.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Course catalog TOML file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Student plan TOML file (or directory of plans where supported)
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

/// Config with the catalog and plan paths settled.
pub struct DataPaths {
    pub config: DegreetrackConfig,
    pub catalog: PathBuf,
    pub plan: PathBuf,
}

impl DataArgs {
    pub fn resolve(&self) -> Result<DataPaths> {
        let config = load_config_from(self.config.as_deref())?;
        Ok(DataPaths {
            catalog: self.catalog.clone().unwrap_or_else(|| config.catalog.clone()),
            plan: self.plan.clone().unwrap_or_else(|| config.plan.clone()),
            config,
        })
    }

    /// Open the plan file for editing, returning the store and its student.
    pub async fn open_store(&self) -> Result<(FileStore, String)> {
        let paths = self.resolve()?;
        let store = FileStore::open(&paths.catalog, &paths.plan)?;
        let student = store
            .students()
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("no student in {}", paths.plan.display()))?;
        Ok((store, student))
    }
}
