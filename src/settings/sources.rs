use std::env;
use std::path::PathBuf;

use anyhow::{Result, ensure};
use config::{Config, Environment, File, FileFormat};
use facetview::app_dirs::AppDir;

use crate::cli::CliArgs;

const ENV_PREFIX: &str = "facetview";
/// Keys whose environment value is a comma-separated list.
const LIST_KEYS: [&str; 1] = ["engine.searchable_fields"];
/// Project-local files, checked in the working directory.
const LOCAL_FILES: [&str; 2] = [".facetview.toml", "facetview.toml"];

/// Stack every configuration layer, lowest precedence first: discovered
/// files, then `--config` files in the order given, then the environment.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(toml_file(path).required(false));
		}
	}

	for path in &cli.config {
		ensure!(path.is_file(), "config file {} does not exist", path.display());
		builder = builder.add_source(toml_file(path.clone()).required(true));
	}

	Ok(builder.add_source(environment()).build()?)
}

/// `FACETVIEW__ENGINE__DEBOUNCE_MS=150` maps to `engine.debounce_ms`.
fn environment() -> Environment {
	LIST_KEYS.into_iter().fold(
		Environment::with_prefix(ENV_PREFIX)
			.separator("__")
			.try_parsing(true)
			.list_separator(","),
		Environment::with_list_parse_key,
	)
}

fn toml_file(path: PathBuf) -> File<config::FileSourceFile, FileFormat> {
	File::from(path).format(FileFormat::Toml)
}

/// Files read unless `--no-config` is given.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	let user = AppDir::Config.resolve().ok().map(|dir| dir.join("config.toml"));
	let local = env::current_dir()
		.map(|cwd| LOCAL_FILES.map(|name| cwd.join(name)).to_vec())
		.unwrap_or_default();
	user.into_iter().chain(local).collect()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;
	use tempfile::tempdir;

	use super::*;

	#[test]
	fn local_files_follow_the_user_file() {
		let files = default_config_files();
		let local: Vec<_> = files.iter().rev().take(2).rev().collect();
		assert!(local[0].ends_with(".facetview.toml"));
		assert!(local[1].ends_with("facetview.toml"));
	}

	#[test]
	fn later_config_files_win() {
		let dir = tempdir().expect("tempdir");
		let base = dir.path().join("base.toml");
		let site = dir.path().join("site.toml");
		fs::write(&base, "[engine]\ndebounce_ms = 100\nhistory_capacity = 5\n")
			.expect("write base");
		fs::write(&site, "[engine]\ndebounce_ms = 250\n").expect("write site");

		let cli = CliArgs::parse_from([
			"facetview",
			"--no-config",
			"--config",
			base.to_str().expect("utf-8 path"),
			"--config",
			site.to_str().expect("utf-8 path"),
			"history",
		]);
		let config = build_config(&cli).expect("config");
		assert_eq!(config.get_int("engine.debounce_ms").expect("debounce"), 250);
		assert_eq!(config.get_int("engine.history_capacity").expect("capacity"), 5);
	}

	#[test]
	fn missing_config_file_names_the_path() {
		let cli = CliArgs::parse_from([
			"facetview",
			"--no-config",
			"--config",
			"/nonexistent/facetview.toml",
			"history",
		]);
		let err = build_config(&cli).unwrap_err();
		assert_eq!(err.to_string(), "config file /nonexistent/facetview.toml does not exist");
	}
}
