//! Ranked query suggestions from history and field values.

use indexmap::IndexSet;
use serde::Serialize;

use crate::history::QueryHistory;
use crate::item::{Item, field_values};

/// Maximum suggestions returned in total.
pub const MAX_SUGGESTIONS: usize = 10;
/// Maximum history entries offered.
pub const MAX_RECENT: usize = 5;
/// Maximum autocomplete values offered per searchable field.
pub const MAX_PER_FIELD: usize = 3;
/// Autocomplete only kicks in from this many characters.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
	Recent,
	Autocomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSuggestion {
	pub text: String,
	pub kind: SuggestionKind,
	/// Field the value was drawn from, for autocomplete entries.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<String>,
}

impl SearchSuggestion {
	fn recent(text: &str) -> Self {
		Self {
			text: text.to_string(),
			kind: SuggestionKind::Recent,
			field: None,
		}
	}

	fn autocomplete(text: String, field: &str) -> Self {
		Self {
			text,
			kind: SuggestionKind::Autocomplete,
			field: Some(field.to_string()),
		}
	}
}

/// Build suggestions for the text currently typed.
///
/// History entries containing `current` come first (most recent first),
/// followed by distinct values of each searchable field across `items`.
/// Matching ignores case. With an empty `current` only history is offered.
#[must_use]
pub fn suggest(
	current: &str,
	history: &QueryHistory,
	items: &[Item],
	searchable: &[String],
) -> Vec<SearchSuggestion> {
	let current = current.trim();
	let needle = current.to_lowercase();

	let mut suggestions: Vec<SearchSuggestion> = history
		.iter()
		.filter(|entry| needle.is_empty() || entry.to_lowercase().contains(&needle))
		.take(MAX_RECENT)
		.map(SearchSuggestion::recent)
		.collect();

	if current.chars().count() < MIN_AUTOCOMPLETE_CHARS {
		return suggestions;
	}

	for field in searchable {
		if suggestions.len() >= MAX_SUGGESTIONS {
			break;
		}
		let room = (MAX_SUGGESTIONS - suggestions.len()).min(MAX_PER_FIELD);
		suggestions.extend(
			distinct_matches(items, field, &needle, room)
				.into_iter()
				.map(|value| SearchSuggestion::autocomplete(value, field)),
		);
	}

	suggestions
}

fn distinct_matches(items: &[Item], field: &str, needle: &str, limit: usize) -> Vec<String> {
	let mut found = IndexSet::new();
	for value in items
		.iter()
		.filter_map(|item| item.field(field))
		.flat_map(field_values)
	{
		if found.len() == limit {
			break;
		}
		if value.to_lowercase().contains(needle) {
			found.insert(value);
		}
	}
	found.into_iter().collect()
}
