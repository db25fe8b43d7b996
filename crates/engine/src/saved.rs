//! Named snapshots of a query and its filter values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::FilterValueMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub filters: FilterValueMap,
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub is_default: bool,
	pub created_at: DateTime<Utc>,
	#[serde(default)]
	pub usage_count: u64,
}

/// Saved filters in creation order. At most one entry is the default.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SavedFilterStore {
	entries: Vec<SavedFilter>,
}

impl SavedFilterStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Restore entries from storage. Entries with a repeated id are dropped,
	/// and only the first default flag survives.
	#[must_use]
	pub fn from_entries(entries: impl IntoIterator<Item = SavedFilter>) -> Self {
		let mut store = Self::new();
		let mut seen_default = false;
		for mut entry in entries {
			if store.get(&entry.id).is_some() {
				continue;
			}
			if entry.is_default {
				entry.is_default = !seen_default;
				seen_default = true;
			}
			store.entries.push(entry);
		}
		store
	}

	/// Snapshot `query` and `filters` under a new, unique id.
	pub fn save(
		&mut self,
		name: &str,
		query: &str,
		filters: &FilterValueMap,
		is_default: bool,
		now: DateTime<Utc>,
	) -> &SavedFilter {
		if is_default {
			self.clear_default();
		}
		let id = self.next_id(now);
		self.entries.push(SavedFilter {
			id,
			name: name.trim().to_string(),
			filters: filters.clone(),
			query: query.to_string(),
			is_default,
			created_at: now,
			usage_count: 0,
		});
		&self.entries[self.entries.len() - 1]
	}

	/// Bump the usage counter and return the entry.
	pub fn mark_used(&mut self, id: &str) -> Option<&SavedFilter> {
		let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
		entry.usage_count = entry.usage_count.saturating_add(1);
		Some(&*entry)
	}

	pub fn delete(&mut self, id: &str) -> Option<SavedFilter> {
		let position = self.entries.iter().position(|entry| entry.id == id)?;
		Some(self.entries.remove(position))
	}

	/// Returns whether the entry exists.
	pub fn rename(&mut self, id: &str, name: &str) -> bool {
		match self.entries.iter_mut().find(|entry| entry.id == id) {
			Some(entry) => {
				entry.name = name.trim().to_string();
				true
			}
			None => false,
		}
	}

	/// Make `id` the only default, or clear the default with `None`.
	/// Returns `false` when `id` is unknown; nothing changes in that case.
	pub fn set_default(&mut self, id: Option<&str>) -> bool {
		if let Some(id) = id
			&& self.get(id).is_none()
		{
			return false;
		}
		for entry in &mut self.entries {
			entry.is_default = Some(entry.id.as_str()) == id;
		}
		true
	}

	#[must_use]
	pub fn default_entry(&self) -> Option<&SavedFilter> {
		self.entries.iter().find(|entry| entry.is_default)
	}

	#[must_use]
	pub fn get(&self, id: &str) -> Option<&SavedFilter> {
		self.entries.iter().find(|entry| entry.id == id)
	}

	#[must_use]
	pub fn entries(&self) -> &[SavedFilter] {
		&self.entries
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn clear_default(&mut self) {
		for entry in &mut self.entries {
			entry.is_default = false;
		}
	}

	/// Millisecond timestamp in base 36, with a numeric suffix on collision.
	fn next_id(&self, now: DateTime<Utc>) -> String {
		let base = to_base36(now.timestamp_millis().unsigned_abs());
		if self.get(&base).is_none() {
			return base;
		}
		(1u32..)
			.map(|suffix| format!("{base}-{suffix}"))
			.find(|candidate| self.get(candidate).is_none())
			.unwrap_or(base)
	}
}

fn to_base36(mut value: u64) -> String {
	const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if value == 0 {
		return "0".to_string();
	}
	let mut out = Vec::new();
	while value > 0 {
		out.push(DIGITS[(value % 36) as usize]);
		value /= 36;
	}
	out.reverse();
	String::from_utf8_lossy(&out).into_owned()
}
