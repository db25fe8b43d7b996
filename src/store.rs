//! File-backed [`Persistence`] for the CLI.
//!
//! Each key maps to `<root>/<key>.json`. Writes go to a sibling temp file
//! first and are then renamed over the target, so a crash mid-write leaves
//! the previous state intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use facetview_engine::{Persistence, PersistenceError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileStore {
	root: PathBuf,
}

impl FileStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path of the file holding `key`.
	pub fn path_for(&self, key: &str) -> PathBuf {
		self.root.join(format!("{}.json", sanitize_key(key)))
	}
}

impl Persistence for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
		let path = self.path_for(key);
		match fs::read_to_string(&path) {
			Ok(raw) => Ok(Some(raw)),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
			Err(err) => Err(PersistenceError::Read {
				key: key.to_string(),
				reason: format!("{}: {err}", path.display()),
			}),
		}
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
		let path = self.path_for(key);
		let write_err = |err: std::io::Error| PersistenceError::Write {
			key: key.to_string(),
			reason: format!("{}: {err}", path.display()),
		};

		fs::create_dir_all(&self.root).map_err(write_err)?;
		let staging = path.with_extension("json.tmp");
		fs::write(&staging, value).map_err(write_err)?;
		fs::rename(&staging, &path).map_err(write_err)?;
		debug!(path = %path.display(), bytes = value.len(), "wrote state");
		Ok(())
	}
}

/// Keep keys to a single path component.
fn sanitize_key(key: &str) -> String {
	let cleaned: String = key
		.chars()
		.map(|ch| {
			if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
				ch
			} else {
				'_'
			}
		})
		.collect();
	let cleaned = cleaned.trim_start_matches('.');
	if cleaned.is_empty() {
		"_".to_string()
	} else {
		cleaned.to_string()
	}
}
