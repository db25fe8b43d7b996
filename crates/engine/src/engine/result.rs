use std::sync::Arc;
use std::time::Duration;

use crate::facets::{Facet, FacetMap};
use crate::item::Item;
use crate::window::WindowDescriptor;

/// Where the engine is in its search cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
	#[default]
	Idle,
	Searching,
}

/// Output of one filter pass.
///
/// Holds the matching positions into the shared item collection rather than
/// copies of the items themselves.
#[derive(Debug, Clone)]
pub struct SearchResult {
	source: Arc<[Item]>,
	indices: Vec<usize>,
	query: String,
	search_time: Duration,
	facets: FacetMap,
}

impl SearchResult {
	pub(crate) fn new(
		source: Arc<[Item]>,
		indices: Vec<usize>,
		query: String,
		search_time: Duration,
		facets: FacetMap,
	) -> Self {
		Self {
			source,
			indices,
			query,
			search_time,
			facets,
		}
	}

	/// An empty result over `source`, used before the first pass.
	pub(crate) fn empty(source: Arc<[Item]>) -> Self {
		Self::new(source, Vec::new(), String::new(), Duration::ZERO, FacetMap::new())
	}

	/// Matching items in collection order.
	pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
		self.indices.iter().map(|&index| &self.source[index])
	}

	/// Positions of the matching items in the full collection.
	#[must_use]
	pub fn indices(&self) -> &[usize] {
		&self.indices
	}

	/// The `position`-th matching item.
	#[must_use]
	pub fn get(&self, position: usize) -> Option<&Item> {
		self.indices.get(position).map(|&index| &self.source[index])
	}

	/// Matching items inside a window computed over [`filtered_count`](Self::filtered_count).
	pub fn visible(&self, window: &WindowDescriptor) -> impl Iterator<Item = (usize, &Item)> + '_ {
		let end = window.end_index.min(self.indices.len());
		let start = window.start_index.min(end);
		(start..end).map(|position| (position, &self.source[self.indices[position]]))
	}

	#[must_use]
	pub fn total_count(&self) -> usize {
		self.source.len()
	}

	#[must_use]
	pub fn filtered_count(&self) -> usize {
		self.indices.len()
	}

	/// The query the pass was evaluated against.
	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	#[must_use]
	pub fn search_time(&self) -> Duration {
		self.search_time
	}

	#[must_use]
	pub fn search_time_ms(&self) -> f64 {
		self.search_time.as_secs_f64() * 1_000.0
	}

	#[must_use]
	pub fn facets(&self) -> &FacetMap {
		&self.facets
	}

	#[must_use]
	pub fn facet(&self, id: &str) -> Option<&Facet> {
		self.facets.get(id)
	}
}

/// Results compare by content; timing is excluded.
impl PartialEq for SearchResult {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.source, &other.source)
			&& self.indices == other.indices
			&& self.query == other.query
			&& self.facets == other.facets
	}
}
