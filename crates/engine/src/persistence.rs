//! The key/value boundary through which engine state reaches durable storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::filter::FilterValueMap;
use crate::saved::SavedFilter;

/// A string key/value store.
///
/// Implementations may be synchronous or fire-and-forget; the engine treats
/// every failure as recoverable.
pub trait Persistence {
	/// Read the value stored under `key`, or `None` when nothing is stored.
	///
	/// # Errors
	///
	/// Returns [`PersistenceError::Read`] when the backing store fails.
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

	/// Store `value` under `key`, replacing any previous value.
	///
	/// # Errors
	///
	/// Returns [`PersistenceError::Write`] when the backing store fails.
	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
		(**self).set(key, value)
	}
}

/// In-memory store. Clones share the same map, so a caller can keep a handle
/// to inspect what the engine wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
	values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed the store with an existing value.
	#[must_use]
	pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.values.borrow_mut().insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn value(&self, key: &str) -> Option<String> {
		self.values.borrow().get(key).cloned()
	}
}

impl Persistence for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
		Ok(self.value(key))
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
		self.values
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}
}

/// The blob stored under the engine's namespace key.
///
/// Unknown keys are ignored and missing keys default to empty so older and
/// newer blobs load without migration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
	#[serde(default)]
	pub filters: FilterValueMap,
	#[serde(default)]
	pub history: Vec<String>,
	#[serde(default)]
	pub saved_filters: Vec<SavedFilter>,
}

impl PersistedState {
	/// Load and decode the blob under `key`. A missing key is an empty state.
	///
	/// # Errors
	///
	/// Returns read failures from the store and [`PersistenceError::Decode`]
	/// for malformed blobs.
	pub fn load(store: &dyn Persistence, key: &str) -> Result<Self, PersistenceError> {
		let Some(raw) = store.get(key)? else {
			return Ok(Self::default());
		};
		serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
			key: key.to_string(),
			source,
		})
	}

	/// Encode and write the blob under `key`.
	///
	/// # Errors
	///
	/// Returns [`PersistenceError::Encode`] or the store's write failure.
	pub fn store(&self, store: &mut dyn Persistence, key: &str) -> Result<(), PersistenceError> {
		let raw = serde_json::to_string(self).map_err(|source| PersistenceError::Encode {
			key: key.to_string(),
			source,
		})?;
		store.set(key, &raw)
	}
}
