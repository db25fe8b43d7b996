use std::collections::VecDeque;

/// Default number of past queries kept.
pub const HISTORY_CAPACITY: usize = 20;

/// Past queries, most recent first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHistory {
	entries: VecDeque<String>,
	capacity: usize,
}

impl Default for QueryHistory {
	fn default() -> Self {
		Self::with_capacity(HISTORY_CAPACITY)
	}
}

impl QueryHistory {
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Restore entries from storage, dropping blanks and duplicates and
	/// truncating to capacity.
	#[must_use]
	pub fn from_entries(entries: impl IntoIterator<Item = String>, capacity: usize) -> Self {
		let mut history = Self::with_capacity(capacity);
		for entry in entries {
			let entry = entry.trim();
			if entry.is_empty() || history.entries.iter().any(|existing| existing == entry) {
				continue;
			}
			if history.entries.len() == capacity {
				break;
			}
			history.entries.push_back(entry.to_string());
		}
		history
	}

	/// Move `query` to the front, inserting it if new. Blank queries are
	/// ignored. Returns whether the history changed.
	pub fn record(&mut self, query: &str) -> bool {
		let query = query.trim();
		if query.is_empty() || self.capacity == 0 {
			return false;
		}
		if self.entries.front().is_some_and(|front| front == query) {
			return false;
		}

		self.entries.retain(|entry| entry != query);
		self.entries.push_front(query.to_string());
		self.entries.truncate(self.capacity);
		true
	}

	/// Returns whether the entry existed.
	pub fn remove(&mut self, query: &str) -> bool {
		let before = self.entries.len();
		self.entries.retain(|entry| entry != query);
		self.entries.len() != before
	}

	/// Returns whether anything was removed.
	pub fn clear(&mut self) -> bool {
		let had_entries = !self.entries.is_empty();
		self.entries.clear();
		had_entries
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(String::as_str)
	}

	#[must_use]
	pub fn to_vec(&self) -> Vec<String> {
		self.entries.iter().cloned().collect()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn capacity(&self) -> usize {
		self.capacity
	}
}
