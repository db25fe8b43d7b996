use std::time::Duration;

use crate::history::HISTORY_CAPACITY;

/// Default quiet period before a query or filter change triggers a pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Default namespace key for persisted state.
pub const DEFAULT_NAMESPACE: &str = "facetview";

/// Behavioural knobs for a [`SearchEngine`](super::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
	/// Quiet period applied to query and filter changes.
	pub debounce: Duration,
	/// Maximum number of remembered queries.
	pub history_capacity: usize,
	/// Fields searched by the free-text query and used for autocomplete.
	/// Empty means every field is searched and autocomplete is off.
	pub searchable_fields: Vec<String>,
	/// Load the saved filter flagged as default when the engine starts.
	pub apply_default_filter: bool,
	/// Key under which state is persisted.
	pub namespace: String,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self {
			debounce: DEFAULT_DEBOUNCE,
			history_capacity: HISTORY_CAPACITY,
			searchable_fields: Vec::new(),
			apply_default_filter: true,
			namespace: DEFAULT_NAMESPACE.to_string(),
		}
	}
}

impl EngineOptions {
	#[must_use]
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}

	#[must_use]
	pub fn with_searchable_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.searchable_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();
		self
	}

	#[must_use]
	pub fn with_history_capacity(mut self, capacity: usize) -> Self {
		self.history_capacity = capacity;
		self
	}

	#[must_use]
	pub fn with_default_filter(mut self, apply: bool) -> Self {
		self.apply_default_filter = apply;
		self
	}
}
