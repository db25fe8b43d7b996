//! The stateful search engine that ties the filter, facet, history and
//! saved-filter pieces to a persistence port and a debounced pass.

mod options;
mod result;
#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

pub use options::{DEFAULT_DEBOUNCE, DEFAULT_NAMESPACE, EngineOptions};
pub use result::{SearchResult, SearchStatus};

use crate::error::EngineError;
use crate::facets::{Facet, compute_facets};
use crate::filter::{FilterSpec, FilterSpecs, FilterValue, FilterValueMap, Predicate};
use crate::history::QueryHistory;
use crate::item::Item;
use crate::persistence::{MemoryStore, PersistedState, Persistence};
use crate::saved::{SavedFilter, SavedFilterStore};
use crate::schedule::{Clock, Debouncer, SystemClock};
use crate::suggestions::{SearchSuggestion, suggest};

type Listener = Box<dyn FnMut(&SearchResult)>;

/// Handle returned by [`SearchEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The query and filter values a pass is evaluated against.
#[derive(Debug, Clone, PartialEq)]
struct SearchRequest {
	query: String,
	filters: FilterValueMap,
}

/// Builder for [`SearchEngine`].
pub struct SearchEngineBuilder {
	items: Arc<[Item]>,
	specs: Vec<FilterSpec>,
	options: EngineOptions,
	store: Option<Box<dyn Persistence>>,
	clock: Option<Box<dyn Clock>>,
}

impl SearchEngineBuilder {
	#[must_use]
	pub fn items(mut self, items: impl Into<Arc<[Item]>>) -> Self {
		self.items = items.into();
		self
	}

	#[must_use]
	pub fn specs(mut self, specs: impl IntoIterator<Item = FilterSpec>) -> Self {
		self.specs = specs.into_iter().collect();
		self
	}

	#[must_use]
	pub fn filter(mut self, spec: FilterSpec) -> Self {
		self.specs.push(spec);
		self
	}

	#[must_use]
	pub fn options(mut self, options: EngineOptions) -> Self {
		self.options = options;
		self
	}

	#[must_use]
	pub fn persistence(mut self, store: impl Persistence + 'static) -> Self {
		self.store = Some(Box::new(store));
		self
	}

	#[must_use]
	pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
		self.clock = Some(Box::new(clock));
		self
	}

	/// Validate the configuration, load persisted state and run the first pass.
	///
	/// # Errors
	///
	/// Returns [`EngineError::DuplicateFilterId`] when two specs share an id.
	pub fn build(self) -> Result<SearchEngine, EngineError> {
		let specs = FilterSpecs::new(self.specs)?;
		let store = self
			.store
			.unwrap_or_else(|| Box::new(MemoryStore::new()));
		let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

		let mut engine = SearchEngine {
			result: SearchResult::empty(Arc::clone(&self.items)),
			items: self.items,
			specs,
			query: String::new(),
			filters: FilterValueMap::new(),
			history: QueryHistory::with_capacity(self.options.history_capacity),
			saved: SavedFilterStore::new(),
			pending: Debouncer::new(self.options.debounce),
			options: self.options,
			store,
			clock,
			status: SearchStatus::Idle,
			listeners: Vec::new(),
			next_subscription: 0,
			passes: 0,
			disposed: false,
		};
		engine.restore();
		engine.refresh();
		Ok(engine)
	}
}

/// Incremental search and filter engine over a caller-owned item collection.
///
/// Query and filter changes are debounced: each mutation schedules a pass
/// and supersedes any pass still waiting. The host drives time by calling
/// [`tick`](Self::tick) from its event loop (see
/// [`next_deadline`](Self::next_deadline)); passes run synchronously on the
/// calling thread and publish a [`SearchResult`] to subscribers.
pub struct SearchEngine {
	items: Arc<[Item]>,
	specs: FilterSpecs,
	options: EngineOptions,
	query: String,
	filters: FilterValueMap,
	history: QueryHistory,
	saved: SavedFilterStore,
	store: Box<dyn Persistence>,
	clock: Box<dyn Clock>,
	pending: Debouncer<SearchRequest>,
	status: SearchStatus,
	result: SearchResult,
	listeners: Vec<(SubscriptionId, Listener)>,
	next_subscription: u64,
	passes: u64,
	disposed: bool,
}

impl SearchEngine {
	#[must_use]
	pub fn builder() -> SearchEngineBuilder {
		SearchEngineBuilder {
			items: Arc::from(Vec::new()),
			specs: Vec::new(),
			options: EngineOptions::default(),
			store: None,
			clock: None,
		}
	}

	// Query and filters

	/// Replace the free-text query and schedule a pass.
	pub fn set_query(&mut self, query: impl Into<String>) {
		let query = query.into();
		if query == self.query {
			return;
		}
		self.query = query;
		self.schedule();
	}

	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Set a filter value. `None`, empty strings and empty lists remove the
	/// filter instead of storing an empty constraint.
	pub fn set_filter(&mut self, id: &str, value: Option<FilterValue>) {
		if self.filters.set(id, value) {
			self.persist();
			self.schedule();
		}
	}

	/// Parse `raw` according to the filter's kind and set it.
	/// Returns `false` when the id is unknown or the text does not parse.
	pub fn set_filter_text(&mut self, id: &str, raw: &str) -> bool {
		let Some(value) = self.specs.get(id).and_then(|spec| spec.kind().parse_value(raw))
		else {
			return false;
		};
		self.set_filter(id, Some(value));
		true
	}

	pub fn clear_filter(&mut self, id: &str) {
		self.set_filter(id, None);
	}

	/// Remove every filter value; the query is kept.
	pub fn clear_filters(&mut self) {
		if self.filters.clear() {
			self.persist();
			self.schedule();
		}
	}

	/// Remove every filter value and reset the query.
	pub fn clear_all(&mut self) {
		let cleared = self.filters.clear();
		if cleared {
			self.persist();
		}
		if cleared || !self.query.is_empty() {
			self.query.clear();
			self.schedule();
		}
	}

	#[must_use]
	pub fn filters(&self) -> &FilterValueMap {
		&self.filters
	}

	#[must_use]
	pub fn filter_value(&self, id: &str) -> Option<&FilterValue> {
		self.filters.get(id)
	}

	/// Number of filters currently constraining the result.
	#[must_use]
	pub fn active_filter_count(&self) -> usize {
		self.filters.len()
	}

	// Configuration and data

	#[must_use]
	pub fn specs(&self) -> &FilterSpecs {
		&self.specs
	}

	#[must_use]
	pub fn options(&self) -> &EngineOptions {
		&self.options
	}

	/// Swap the filter configuration atomically and re-run the pass.
	///
	/// # Errors
	///
	/// Returns [`EngineError::DuplicateFilterId`]; the old configuration stays
	/// in place.
	pub fn set_specs(
		&mut self,
		specs: impl IntoIterator<Item = FilterSpec>,
	) -> Result<(), EngineError> {
		self.specs = FilterSpecs::new(specs)?;
		self.refresh();
		Ok(())
	}

	/// Replace the item collection and re-run the pass.
	pub fn set_items(&mut self, items: impl Into<Arc<[Item]>>) {
		self.items = items.into();
		self.refresh();
	}

	#[must_use]
	pub fn items(&self) -> &Arc<[Item]> {
		&self.items
	}

	// Scheduling

	/// Run the pending pass if its quiet period has elapsed.
	/// Returns whether a pass ran.
	pub fn tick(&mut self) -> bool {
		if self.disposed {
			return false;
		}
		let now = self.clock.now();
		match self.pending.poll(now) {
			Some(request) => {
				self.run_pass(request);
				true
			}
			None => false,
		}
	}

	/// Run the pending pass now, without waiting for the quiet period.
	/// Returns whether a pass ran.
	pub fn flush(&mut self) -> bool {
		if self.disposed {
			return false;
		}
		match self.pending.flush() {
			Some(request) => {
				self.run_pass(request);
				true
			}
			None => false,
		}
	}

	/// Cancel anything pending and run a pass over the current state.
	pub fn refresh(&mut self) {
		if self.disposed {
			return;
		}
		self.pending.cancel();
		let request = self.request();
		self.run_pass(request);
	}

	/// When the pending pass becomes due, if one is scheduled.
	#[must_use]
	pub fn next_deadline(&self) -> Option<Instant> {
		self.pending.deadline()
	}

	#[must_use]
	pub fn has_pending_pass(&self) -> bool {
		self.pending.is_pending()
	}

	/// Cancel any pending pass and drop all subscribers. Further ticks are
	/// no-ops; reads keep returning the last published state.
	pub fn dispose(&mut self) {
		self.pending.cancel();
		self.listeners.clear();
		self.disposed = true;
	}

	#[must_use]
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	// Results

	#[must_use]
	pub fn result(&self) -> &SearchResult {
		&self.result
	}

	#[must_use]
	pub fn facet(&self, id: &str) -> Option<&Facet> {
		self.result.facet(id)
	}

	/// Pass state. Passes run synchronously inside [`tick`](Self::tick),
	/// [`flush`](Self::flush) and [`refresh`](Self::refresh), so this reads
	/// [`SearchStatus::Idle`] whenever the caller holds the engine.
	#[must_use]
	pub fn status(&self) -> SearchStatus {
		self.status
	}

	/// Number of passes run since the engine was built.
	#[must_use]
	pub fn passes(&self) -> u64 {
		self.passes
	}

	/// Register a callback invoked with every published result.
	pub fn subscribe(&mut self, listener: impl FnMut(&SearchResult) + 'static) -> SubscriptionId {
		self.next_subscription += 1;
		let id = SubscriptionId(self.next_subscription);
		self.listeners.push((id, Box::new(listener)));
		id
	}

	/// Returns whether the subscription existed.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(existing, _)| *existing != id);
		self.listeners.len() != before
	}

	// History and suggestions

	/// Remember a submitted query. Blank queries are ignored.
	pub fn record_query(&mut self, query: &str) {
		if self.history.record(query) {
			self.persist();
		}
	}

	/// Remember the current query.
	pub fn record_current_query(&mut self) {
		let query = self.query.clone();
		self.record_query(&query);
	}

	pub fn remove_history_entry(&mut self, query: &str) {
		if self.history.remove(query) {
			self.persist();
		}
	}

	pub fn clear_history(&mut self) {
		if self.history.clear() {
			self.persist();
		}
	}

	#[must_use]
	pub fn history(&self) -> &QueryHistory {
		&self.history
	}

	/// Suggestions for `current`, drawn from history and the full collection.
	#[must_use]
	pub fn suggestions(&self, current: &str) -> Vec<SearchSuggestion> {
		suggest(current, &self.history, &self.items, &self.options.searchable_fields)
	}

	// Saved filters

	/// Snapshot the current query and filters under `name`.
	pub fn save_filter(&mut self, name: &str, is_default: bool) -> SavedFilter {
		let saved = self
			.saved
			.save(name, &self.query, &self.filters, is_default, Utc::now())
			.clone();
		debug!(id = %saved.id, name = %saved.name, is_default, "saved filter");
		self.persist();
		saved
	}

	/// Restore a saved filter into the live state and run the pass.
	/// Returns `false` when `id` is unknown.
	pub fn load_filter(&mut self, id: &str) -> bool {
		let Some(saved) = self.saved.mark_used(id) else {
			return false;
		};
		self.filters = saved.filters.clone();
		self.query = saved.query.clone();
		self.persist();
		self.refresh();
		true
	}

	/// Remove a saved filter. The live filters are left untouched.
	pub fn delete_filter(&mut self, id: &str) -> Option<SavedFilter> {
		let deleted = self.saved.delete(id)?;
		self.persist();
		Some(deleted)
	}

	pub fn rename_filter(&mut self, id: &str, name: &str) -> bool {
		let renamed = self.saved.rename(id, name);
		if renamed {
			self.persist();
		}
		renamed
	}

	/// Make `id` the default saved filter, or clear the default with `None`.
	pub fn set_default_filter(&mut self, id: Option<&str>) -> bool {
		let changed = self.saved.set_default(id);
		if changed {
			self.persist();
		}
		changed
	}

	#[must_use]
	pub fn default_filter(&self) -> Option<&SavedFilter> {
		self.saved.default_entry()
	}

	#[must_use]
	pub fn saved_filters(&self) -> &[SavedFilter] {
		self.saved.entries()
	}

	// Internals

	fn request(&self) -> SearchRequest {
		SearchRequest {
			query: self.query.clone(),
			filters: self.filters.clone(),
		}
	}

	fn schedule(&mut self) {
		if self.disposed {
			return;
		}
		let now = self.clock.now();
		self.pending.push(self.request(), now);
	}

	fn run_pass(&mut self, request: SearchRequest) {
		self.status = SearchStatus::Searching;
		let started = Instant::now();

		let predicate = Predicate::new(
			&request.query,
			&request.filters,
			&self.specs,
			&self.options.searchable_fields,
		);
		let indices: Vec<usize> = if predicate.is_unconstrained() {
			(0..self.items.len()).collect()
		} else {
			self.items
				.iter()
				.enumerate()
				.filter(|(_, item)| predicate.matches(item))
				.map(|(index, _)| index)
				.collect()
		};
		let facets = compute_facets(
			&self.specs,
			indices.iter().map(|&index| &self.items[index]),
		);
		let elapsed = started.elapsed();

		self.result = SearchResult::new(
			Arc::clone(&self.items),
			indices,
			request.query,
			elapsed,
			facets,
		);
		self.passes += 1;
		debug!(
			filtered = self.result.filtered_count(),
			total = self.result.total_count(),
			elapsed_ms = self.result.search_time_ms(),
			"search pass complete"
		);

		for (_, listener) in &mut self.listeners {
			listener(&self.result);
		}
		self.status = SearchStatus::Idle;
	}

	fn persist(&mut self) {
		let state = PersistedState {
			filters: self.filters.clone(),
			history: self.history.to_vec(),
			saved_filters: self.saved.entries().to_vec(),
		};
		if let Err(err) = state.store(self.store.as_mut(), &self.options.namespace) {
			warn!(error = %err, "dropping state write; in-memory state remains authoritative");
		}
	}

	/// Load persisted state, falling back to a first-run state on failure.
	fn restore(&mut self) {
		let state = match PersistedState::load(self.store.as_ref(), &self.options.namespace) {
			Ok(state) => state,
			Err(err) => {
				warn!(error = %err, "starting with empty search state");
				PersistedState::default()
			}
		};

		self.filters = state.filters;
		self.history = QueryHistory::from_entries(state.history, self.options.history_capacity);
		self.saved = SavedFilterStore::from_entries(state.saved_filters);

		// Spec defaults and the default saved filter only seed a session with no
		// persisted filters.
		let fresh = self.filters.is_empty();
		if fresh {
			for spec in self.specs.iter() {
				if let Some(value) = spec.default_value() {
					self.filters.set(spec.id(), Some(value.clone()));
				}
			}
		}

		if fresh
			&& self.options.apply_default_filter
			&& let Some(id) = self.saved.default_entry().map(|entry| entry.id.clone())
			&& let Some(saved) = self.saved.mark_used(&id)
		{
			debug!(id = %saved.id, "applying default saved filter");
			self.filters = saved.filters.clone();
			self.query = saved.query.clone();
			self.persist();
		}
	}
}

impl Drop for SearchEngine {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for SearchEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchEngine")
			.field("items", &self.items.len())
			.field("query", &self.query)
			.field("filters", &self.filters)
			.field("status", &self.status)
			.field("passes", &self.passes)
			.field("pending", &self.pending.is_pending())
			.finish_non_exhaustive()
	}
}
