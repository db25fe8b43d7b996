//! Where `facetview` looks for configuration and keeps search state.
//!
//! Each location can be pinned with an environment variable. Without one the
//! platform layout from [`ProjectDirs`] applies, and search state lives in a
//! `state` folder under the data directory.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const STATE_SUBDIR: &str = "state";

/// A directory the application reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
	/// Holds `config.toml`.
	Config,
	Data,
	/// Holds one JSON file per persistence namespace.
	State,
}

impl AppDir {
	pub const ALL: [Self; 3] = [Self::Config, Self::Data, Self::State];

	/// Environment variable that overrides this location.
	#[must_use]
	pub fn override_var(self) -> &'static str {
		match self {
			Self::Config => "FACETVIEW_CONFIG_DIR",
			Self::Data => "FACETVIEW_DATA_DIR",
			Self::State => "FACETVIEW_STATE_DIR",
		}
	}

	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Self::Config => "config directory",
			Self::Data => "data directory",
			Self::State => "state directory",
		}
	}

	/// Resolve the directory, preferring its override variable.
	pub fn resolve(self) -> Result<PathBuf> {
		if let Some(dir) = dir_from_env(self.override_var()) {
			return Ok(dir);
		}
		match self {
			Self::Config => Ok(project_dirs()?.config_local_dir().to_path_buf()),
			Self::Data => Ok(project_dirs()?.data_local_dir().to_path_buf()),
			Self::State => Ok(Self::Data.resolve()?.join(STATE_SUBDIR)),
		}
	}
}

fn project_dirs() -> Result<ProjectDirs> {
	ProjectDirs::from("io", "albo", "facetview")
		.ok_or_else(|| anyhow!("no home directory to place facetview files in"))
}

/// Blank or whitespace-only values count as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	let value = env::var_os(name)?;
	if value.to_str().is_some_and(|text| text.trim().is_empty()) {
		return None;
	}
	Some(PathBuf::from(value))
}
