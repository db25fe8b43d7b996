use std::fmt::Write;

use anyhow::Result;
use facetview::engine::{
	FilterValueMap, SavedFilter, SearchSuggestion, SuggestionKind, WindowDescriptor,
};
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use crate::workflow::{Outcome, SearchReport};

/// Print a plain-text rendering of the outcome.
pub(crate) fn print_plain(outcome: &Outcome) {
	print!("{}", format_plain(outcome));
}

/// Print the JSON representation of the outcome.
pub(crate) fn print_json(outcome: &Outcome) -> Result<()> {
	println!("{}", format_json(outcome)?);
	Ok(())
}

pub(crate) fn format_plain(outcome: &Outcome) -> String {
	let mut out = String::new();
	match outcome {
		Outcome::Search(report) => write_search(&mut out, report),
		Outcome::Suggestions(suggestions) => write_suggestions(&mut out, suggestions),
		Outcome::Window(window) => {
			let _ = writeln!(out, "{}", describe_window(window));
		}
		Outcome::History(history) if history.is_empty() => {
			let _ = writeln!(out, "No remembered queries");
		}
		Outcome::History(history) => {
			for entry in history {
				let _ = writeln!(out, "{entry}");
			}
		}
		Outcome::SavedList(entries) => write_saved(&mut out, entries),
		Outcome::Saved(saved) => {
			let marker = if saved.is_default { " (default)" } else { "" };
			let _ = writeln!(out, "Saved '{}' as {}{marker}", saved.name, saved.id);
		}
		Outcome::Message(message) => {
			let _ = writeln!(out, "{message}");
		}
	}
	out
}

pub(crate) fn format_json(outcome: &Outcome) -> Result<String> {
	let payload = match outcome {
		Outcome::Search(report) => json!({
			"query": report.query,
			"filters": report.filters,
			"totalCount": report.total,
			"filteredCount": report.filtered,
			"searchTimeMs": report.search_time_ms,
			"window": report.window,
			"facets": report.facets,
			"items": report
				.rows
				.iter()
				.map(|(position, item)| json!({ "position": position, "item": item }))
				.collect::<Vec<_>>(),
		}),
		Outcome::Suggestions(suggestions) => serde_json::to_value(suggestions)?,
		Outcome::Window(window) => serde_json::to_value(window)?,
		Outcome::History(history) => json!({ "history": history }),
		Outcome::SavedList(entries) => serde_json::to_value(entries)?,
		Outcome::Saved(saved) => serde_json::to_value(saved)?,
		Outcome::Message(message) => json!({ "message": message }),
	};

	Ok(serde_json::to_string_pretty(&payload)?)
}

fn write_search(out: &mut String, report: &SearchReport) {
	let query = if report.query.trim().is_empty() {
		String::new()
	} else {
		format!(" \"{}\"", report.query.trim())
	};
	let _ = writeln!(
		out,
		"{} of {} items match{query} ({:.2} ms)",
		report.filtered, report.total, report.search_time_ms
	);
	if !report.filters.is_empty() {
		let _ = writeln!(out, "Filters: {}", describe_filters(&report.filters));
	}
	let _ = writeln!(out, "{}", describe_window(&report.window));

	for (id, facet) in &report.facets {
		if facet.is_empty() {
			continue;
		}
		let _ = writeln!(out);
		let _ = writeln!(out, "{id}");
		let width = facet
			.values()
			.iter()
			.map(|value| value.label.width())
			.max()
			.unwrap_or(0);
		for value in facet.values() {
			let _ = writeln!(out, "  {}  {}", pad(&value.label, width), value.count);
		}
	}

	if !report.rows.is_empty() {
		let _ = writeln!(out);
		let width = report
			.rows
			.iter()
			.map(|(position, _)| position.to_string().len())
			.max()
			.unwrap_or(1);
		for (position, item) in &report.rows {
			let _ = writeln!(out, "{position:>width$}  {}", item.to_value());
		}
	}
}

fn write_suggestions(out: &mut String, suggestions: &[SearchSuggestion]) {
	if suggestions.is_empty() {
		let _ = writeln!(out, "No suggestions");
		return;
	}
	let width = suggestions.iter().map(|s| s.text.width()).max().unwrap_or(0);
	for suggestion in suggestions {
		let source = match (suggestion.kind, &suggestion.field) {
			(SuggestionKind::Recent, _) => "recent".to_string(),
			(SuggestionKind::Autocomplete, Some(field)) => field.clone(),
			(SuggestionKind::Autocomplete, None) => "autocomplete".to_string(),
		};
		let _ = writeln!(out, "{}  {source}", pad(&suggestion.text, width));
	}
}

fn write_saved(out: &mut String, entries: &[SavedFilter]) {
	if entries.is_empty() {
		let _ = writeln!(out, "No saved filters");
		return;
	}
	let id_width = entries.iter().map(|entry| entry.id.width()).max().unwrap_or(0);
	let name_width = entries.iter().map(|entry| entry.name.width()).max().unwrap_or(0);
	for entry in entries {
		let marker = if entry.is_default { '*' } else { ' ' };
		let mut summary = describe_filters(&entry.filters);
		if !entry.query.is_empty() {
			if !summary.is_empty() {
				summary.insert_str(0, ", ");
			}
			summary.insert_str(0, &format!("\"{}\"", entry.query));
		}
		let line = format!(
			"{marker} {}  {}  {:>3} uses  {summary}",
			pad(&entry.id, id_width),
			pad(&entry.name, name_width),
			entry.usage_count,
		);
		let _ = writeln!(out, "{}", line.trim_end());
	}
}

fn describe_filters(filters: &FilterValueMap) -> String {
	filters
		.iter()
		.map(|(id, value)| format!("{id}={value}"))
		.collect::<Vec<_>>()
		.join(", ")
}

fn describe_window(window: &WindowDescriptor) -> String {
	format!(
		"Rows {}..{} at offset {} of {}",
		window.start_index, window.end_index, window.render_offset, window.total_extent
	)
}

/// Pad to a display width; East Asian wide characters count double.
fn pad(text: &str, width: usize) -> String {
	let fill = width.saturating_sub(text.width());
	format!("{text}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
	use facetview::engine::{FilterKind, FilterSpec, FilterSpecs, FilterValue, Item, compute_facets};
	use serde_json::Value;

	use super::*;

	fn report() -> SearchReport {
		let items = vec![
			Item::new().with("id", 1).with("type", "Cámara"),
			Item::new().with("id", 3).with("type", "Cámara"),
			Item::new().with("id", 4).with("type", "センサー"),
		];
		let specs =
			FilterSpecs::new([FilterSpec::new("type", FilterKind::Select)]).expect("specs");
		let filters: FilterValueMap =
			[("status", FilterValue::from("Inactivo"))].into_iter().collect();

		SearchReport {
			query: "c".into(),
			filters,
			total: 5,
			filtered: 3,
			search_time_ms: 0.0,
			facets: compute_facets(&specs, items.iter()),
			window: WindowDescriptor {
				start_index: 0,
				end_index: 3,
				total_extent: 240.0,
				render_offset: 0.0,
			},
			rows: items.into_iter().enumerate().collect(),
		}
	}

	fn saved(json: Value) -> SavedFilter {
		serde_json::from_value(json).expect("saved filter")
	}

	#[test]
	fn plain_search_aligns_facets_by_display_width() {
		insta::assert_snapshot!(format_plain(&Outcome::Search(report())), @r#"
		3 of 5 items match "c" (0.00 ms)
		Filters: status=Inactivo
		Rows 0..3 at offset 0 of 240

		type
		  Cámara    2
		  センサー  1

		0  {"id":1,"type":"Cámara"}
		1  {"id":3,"type":"Cámara"}
		2  {"id":4,"type":"センサー"}
		"#);
	}

	#[test]
	fn plain_saved_list_marks_the_default() {
		let entries = vec![
			saved(serde_json::json!({
				"id": "lq3k2a",
				"name": "Cameras",
				"filters": {"type": "Cámara"},
				"query": "lobby",
				"isDefault": true,
				"createdAt": "2024-05-01T10:00:00Z",
				"usageCount": 12
			})),
			saved(serde_json::json!({
				"id": "lq3k2a-1",
				"name": "All",
				"createdAt": "2024-05-02T10:00:00Z"
			})),
		];
		insta::assert_snapshot!(format_plain(&Outcome::SavedList(entries)), @r#"
		* lq3k2a    Cameras   12 uses  "lobby", type=Cámara
		  lq3k2a-1  All        0 uses
		"#);
	}

	#[test]
	fn json_search_uses_camel_case_keys() {
		let json = format_json(&Outcome::Search(report())).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["filteredCount"], 3);
		assert_eq!(value["window"]["endIndex"], 3);
		assert_eq!(value["facets"]["type"][0]["value"], "Cámara");
		assert_eq!(value["facets"]["type"][0]["count"], 2);
		assert_eq!(value["items"][2]["position"], 2);
		assert_eq!(value["items"][2]["item"]["id"], 4);
		assert_eq!(value["filters"]["status"], "Inactivo");
	}

	#[test]
	fn empty_outcomes_say_so() {
		assert_eq!(format_plain(&Outcome::History(Vec::new())), "No remembered queries\n");
		assert_eq!(format_plain(&Outcome::Suggestions(Vec::new())), "No suggestions\n");
		assert_eq!(format_plain(&Outcome::SavedList(Vec::new())), "No saved filters\n");
	}

	#[test]
	fn json_message_is_wrapped() {
		let json = format_json(&Outcome::Message("done".into())).expect("json");
		assert_eq!(json, "{\n  \"message\": \"done\"\n}");
	}
}
