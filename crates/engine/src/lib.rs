//! Headless engine behind `facetview`: incremental search and faceted
//! filtering over an in-memory collection, plus the windowing math for
//! rendering long result lists.
//!
//! The root module re-exports the types most hosts need so they can build a
//! [`SearchEngine`] and a [`VirtualList`] without digging through the module
//! hierarchy.

pub mod engine;
pub mod error;
pub mod facets;
pub mod filter;
pub mod history;
pub mod item;
pub mod persistence;
pub mod saved;
pub mod schedule;
pub mod suggestions;
pub mod window;

pub use crate::engine::{
	DEFAULT_DEBOUNCE, DEFAULT_NAMESPACE, EngineOptions, SearchEngine, SearchEngineBuilder,
	SearchResult, SearchStatus, SubscriptionId,
};
pub use crate::error::{EngineError, PersistenceError};
pub use crate::facets::{Facet, FacetMap, FacetValue, compute_facet, compute_facets};
pub use crate::filter::{
	FilterKind, FilterOption, FilterSpec, FilterSpecs, FilterValue, FilterValueMap,
};
pub use crate::history::{HISTORY_CAPACITY, QueryHistory};
pub use crate::item::Item;
pub use crate::persistence::{MemoryStore, PersistedState, Persistence};
pub use crate::saved::{SavedFilter, SavedFilterStore};
pub use crate::schedule::{Clock, Debouncer, ManualClock, SystemClock, Throttler, delay_from_millis};
pub use crate::suggestions::{SearchSuggestion, SuggestionKind, suggest};
pub use crate::window::{Align, ViewportState, VirtualList, WindowDescriptor, compute_window};
