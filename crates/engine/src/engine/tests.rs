use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::filter::{FilterKind, FilterOption};
use crate::schedule::ManualClock;

fn catalog() -> Vec<Item> {
	vec![
		Item::new()
			.with("name", "Camera Pro")
			.with("type", "Cámara")
			.with("active", true)
			.with("price", 120),
		Item::new()
			.with("name", "Sensor One")
			.with("type", "Sensor")
			.with("active", false)
			.with("price", 40),
		Item::new()
			.with("name", "Camera Mini")
			.with("type", "Cámara")
			.with("active", true)
			.with("price", 80),
	]
}

fn specs() -> Vec<FilterSpec> {
	vec![
		FilterSpec::new("type", FilterKind::Select).with_options(vec![
			FilterOption::new("Cámara", "Camera"),
			FilterOption::new("Sensor", "Sensor"),
		]),
		FilterSpec::new("active", FilterKind::Boolean),
		FilterSpec::new("price", FilterKind::Range),
	]
}

fn options() -> EngineOptions {
	EngineOptions::default().with_searchable_fields(["name", "type"])
}

fn engine(clock: &ManualClock, store: &MemoryStore) -> SearchEngine {
	SearchEngine::builder()
		.items(catalog())
		.specs(specs())
		.options(options())
		.clock(clock.clone())
		.persistence(store.clone())
		.build()
		.expect("engine")
}

fn names(engine: &SearchEngine) -> Vec<String> {
	engine
		.result()
		.items()
		.filter_map(|item| item.text("name"))
		.collect()
}

#[test]
fn initial_pass_returns_everything() {
	let engine = engine(&ManualClock::new(), &MemoryStore::new());
	assert_eq!(engine.passes(), 1);
	assert_eq!(engine.result().filtered_count(), 3);
	assert_eq!(engine.result().total_count(), 3);
	assert_eq!(engine.status(), SearchStatus::Idle);
	assert_eq!(engine.facet("type").map(|facet| facet.count_of("Cámara")), Some(2));
}

#[test]
fn duplicate_spec_ids_are_rejected() {
	let err = SearchEngine::builder()
		.filter(FilterSpec::new("type", FilterKind::Select))
		.filter(FilterSpec::new("type", FilterKind::Text))
		.build()
		.unwrap_err();
	assert_eq!(err, EngineError::DuplicateFilterId { id: "type".into() });
}

#[test]
fn query_changes_wait_for_the_quiet_period() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());

	engine.set_query("c");
	clock.advance_millis(100);
	engine.set_query("ca");
	clock.advance_millis(100);
	engine.set_query("camera");
	assert!(!engine.tick());
	assert_eq!(engine.passes(), 1);

	clock.advance_millis(299);
	assert!(!engine.tick());
	clock.advance_millis(1);
	assert!(engine.tick());
	assert_eq!(engine.passes(), 2);
	assert_eq!(engine.result().query(), "camera");
	assert_eq!(names(&engine), vec!["Camera Pro", "Camera Mini"]);
	assert!(!engine.tick());
}

#[test]
fn next_deadline_tracks_the_latest_change() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	assert_eq!(engine.next_deadline(), None);

	let start = clock.now();
	engine.set_query("s");
	assert_eq!(engine.next_deadline(), Some(start + DEFAULT_DEBOUNCE));
	clock.advance_millis(50);
	engine.set_query("se");
	assert_eq!(
		engine.next_deadline(),
		Some(start + Duration::from_millis(50) + DEFAULT_DEBOUNCE)
	);
}

#[test]
fn flush_runs_the_pending_pass_immediately() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_query("sensor");
	assert!(engine.has_pending_pass());
	assert!(engine.flush());
	assert_eq!(names(&engine), vec!["Sensor One"]);
	assert!(!engine.flush());
}

#[test]
fn setting_the_same_query_schedules_nothing() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_query("");
	assert!(!engine.has_pending_pass());
}

#[test]
fn filters_combine_with_and() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_filter("type", Some("Cámara".into()));
	engine.set_filter("price", Some((100.0, 200.0).into()));
	engine.flush();

	assert_eq!(names(&engine), vec!["Camera Pro"]);
	assert_eq!(engine.active_filter_count(), 2);
	assert_eq!(engine.facet("type").map(Facet::total), Some(1));
}

#[test]
fn empty_values_clear_filters() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_filter("type", Some("Sensor".into()));
	engine.set_filter("type", Some("".into()));
	assert_eq!(engine.active_filter_count(), 0);
	engine.flush();
	assert_eq!(engine.result().filtered_count(), 3);
}

#[test]
fn set_filter_text_parses_by_kind() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	assert!(engine.set_filter_text("active", "no"));
	assert!(!engine.set_filter_text("active", "maybe"));
	assert!(!engine.set_filter_text("missing", "x"));
	engine.flush();
	assert_eq!(names(&engine), vec!["Sensor One"]);
}

#[test]
fn clear_all_resets_query_and_filters() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_query("camera");
	engine.set_filter("active", Some(true.into()));
	engine.flush();
	assert_eq!(engine.result().filtered_count(), 2);

	engine.clear_all();
	engine.flush();
	assert_eq!(engine.query(), "");
	assert!(engine.filters().is_empty());
	assert_eq!(engine.result().filtered_count(), 3);
}

#[test]
fn clear_filters_keeps_the_query() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_query("camera");
	engine.set_filter("price", Some((0.0, 100.0).into()));
	engine.clear_filters();
	engine.flush();
	assert_eq!(engine.query(), "camera");
	assert_eq!(engine.result().filtered_count(), 2);
}

#[test]
fn subscribers_see_every_pass_until_unsubscribed() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	let id = engine.subscribe(move |result| sink.borrow_mut().push(result.filtered_count()));

	engine.set_query("sensor");
	engine.flush();
	engine.refresh();
	assert!(engine.unsubscribe(id));
	assert!(!engine.unsubscribe(id));
	engine.set_query("");
	engine.flush();

	assert_eq!(*seen.borrow(), vec![1, 1]);
}

#[test]
fn status_returns_to_idle_after_every_pass() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());

	engine.set_query("sensor");
	assert!(engine.has_pending_pass());
	assert_eq!(engine.status(), SearchStatus::Idle);

	clock.advance_millis(300);
	assert!(engine.tick());
	assert_eq!(engine.status(), SearchStatus::Idle);
	assert_eq!(engine.passes(), 2);
}

#[test]
fn set_items_and_specs_refresh_immediately() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.set_items(vec![Item::new().with("name", "Lens").with("type", "Óptica")]);
	assert_eq!(engine.passes(), 2);
	assert_eq!(engine.result().total_count(), 1);

	engine
		.set_specs(vec![FilterSpec::new("type", FilterKind::Multiselect)])
		.expect("specs");
	assert_eq!(engine.passes(), 3);
	assert!(engine.facet("active").is_none());
	assert_eq!(engine.facet("type").map(|facet| facet.count_of("Óptica")), Some(1));

	let err = engine
		.set_specs(vec![
			FilterSpec::new("a", FilterKind::Text),
			FilterSpec::new("a", FilterKind::Text),
		])
		.unwrap_err();
	assert!(err.is_invalid_argument());
	assert_eq!(engine.specs().len(), 1);
}

#[test]
fn spec_defaults_apply_on_first_run_only() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	let build = |store: &MemoryStore| {
		SearchEngine::builder()
			.items(catalog())
			.filter(FilterSpec::new("active", FilterKind::Boolean).with_default(true))
			.options(options())
			.clock(clock.clone())
			.persistence(store.clone())
			.build()
			.expect("engine")
	};

	let mut first = build(&store);
	assert_eq!(first.result().filtered_count(), 2);
	first.set_filter("active", Some(false.into()));
	drop(first);

	let second = build(&store);
	assert_eq!(second.filter_value("active"), Some(&FilterValue::Bool(false)));
	assert_eq!(second.result().filtered_count(), 1);
}

#[test]
fn history_records_and_persists() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &store);
	engine.set_query("  camera ");
	engine.record_current_query();
	engine.record_query("sensor");
	engine.record_query("   ");
	assert_eq!(engine.history().to_vec(), vec!["sensor", "camera"]);

	let restored = self::engine(&clock, &store);
	assert_eq!(restored.history().to_vec(), vec!["sensor", "camera"]);

	engine.remove_history_entry("sensor");
	assert_eq!(engine.history().to_vec(), vec!["camera"]);
	engine.clear_history();
	assert!(engine.history().is_empty());
}

#[test]
fn suggestions_mix_history_and_field_values() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	engine.record_query("cam lens");
	let suggestions = engine.suggestions("ca");

	assert_eq!(suggestions[0].text, "cam lens");
	assert_eq!(suggestions[0].kind, crate::suggestions::SuggestionKind::Recent);
	assert!(
		suggestions
			.iter()
			.any(|s| s.text == "Camera Pro" && s.field.as_deref() == Some("name"))
	);
}

#[test]
fn saved_filters_round_trip_through_the_engine() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &store);
	engine.set_query("camera");
	engine.set_filter("price", Some((0.0, 100.0).into()));
	let saved = engine.save_filter("Cheap cameras", false);
	assert_eq!(saved.query, "camera");
	assert_eq!(saved.filters.len(), 1);

	engine.clear_all();
	engine.flush();
	assert_eq!(engine.result().filtered_count(), 3);

	assert!(engine.load_filter(&saved.id));
	assert_eq!(names(&engine), vec!["Camera Mini"]);
	assert_eq!(engine.saved_filters()[0].usage_count, 1);
	assert!(!engine.load_filter("missing"));

	assert!(engine.rename_filter(&saved.id, "Budget"));
	assert!(engine.set_default_filter(Some(&saved.id)));
	assert_eq!(engine.default_filter().map(|entry| entry.name.as_str()), Some("Budget"));

	let deleted = engine.delete_filter(&saved.id).expect("deleted");
	assert_eq!(deleted.name, "Budget");
	assert!(engine.saved_filters().is_empty());
	assert_eq!(engine.query(), "camera");
}

#[test]
fn default_saved_filter_loads_at_startup() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	{
		let mut engine = engine(&clock, &store);
		engine.set_filter("type", Some("Sensor".into()));
		engine.save_filter("Sensors", true);
		engine.clear_filters();
	}

	let engine = engine(&clock, &store);
	assert_eq!(names(&engine), vec!["Sensor One"]);
	assert_eq!(engine.default_filter().map(|entry| entry.usage_count), Some(1));

	let plain = SearchEngine::builder()
		.items(catalog())
		.specs(specs())
		.options(options().with_default_filter(false))
		.clock(clock.clone())
		.persistence(store.clone())
		.build()
		.expect("engine");
	assert_eq!(plain.default_filter().map(|entry| entry.usage_count), Some(1));
	drop(plain);

	for _ in 0..2 {
		let again = self::engine(&clock, &store);
		assert_eq!(names(&again), vec!["Sensor One"]);
		assert_eq!(again.default_filter().map(|entry| entry.usage_count), Some(1));
	}
}

#[test]
fn rebuilding_keeps_the_persisted_selection_over_the_default() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	{
		let mut engine = engine(&clock, &store);
		engine.set_filter("type", Some("Sensor".into()));
		engine.save_filter("Sensors", true);
		engine.set_filter("type", Some("Cámara".into()));
		engine.flush();
	}

	for _ in 0..3 {
		let engine = engine(&clock, &store);
		assert_eq!(engine.filter_value("type"), Some(&FilterValue::from("Cámara")));
		assert_eq!(names(&engine), vec!["Camera Pro", "Camera Mini"]);
		assert_eq!(engine.default_filter().map(|entry| entry.usage_count), Some(0));
	}
}

#[test]
fn spec_defaults_do_not_override_persisted_filters() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	let with_default = || {
		SearchEngine::builder()
			.items(catalog())
			.specs(vec![
				FilterSpec::new("type", FilterKind::Select).with_default("Sensor"),
				FilterSpec::new("active", FilterKind::Boolean),
			])
			.options(options())
			.clock(clock.clone())
			.persistence(store.clone())
			.build()
			.expect("engine")
	};

	{
		let mut engine = with_default();
		assert_eq!(names(&engine), vec!["Sensor One"]);
		engine.clear_filter("type");
		engine.set_filter("active", Some(true.into()));
		engine.flush();
	}

	let engine = with_default();
	assert_eq!(engine.filter_value("type"), None);
	assert_eq!(names(&engine), vec!["Camera Pro", "Camera Mini"]);
}

#[test]
fn malformed_state_starts_fresh() {
	let store = MemoryStore::new().with_value(DEFAULT_NAMESPACE, "{broken");
	let engine = engine(&ManualClock::new(), &store);
	assert!(engine.filters().is_empty());
	assert!(engine.history().is_empty());
	assert_eq!(engine.result().filtered_count(), 3);
}

#[test]
fn failing_store_does_not_interrupt_work() {
	struct Broken;

	impl Persistence for Broken {
		fn get(&self, key: &str) -> Result<Option<String>, crate::error::PersistenceError> {
			Err(crate::error::PersistenceError::Read {
				key: key.to_string(),
				reason: "offline".into(),
			})
		}

		fn set(&mut self, key: &str, _value: &str) -> Result<(), crate::error::PersistenceError> {
			Err(crate::error::PersistenceError::Write {
				key: key.to_string(),
				reason: "offline".into(),
			})
		}
	}

	let mut engine = SearchEngine::builder()
		.items(catalog())
		.specs(specs())
		.options(options())
		.clock(ManualClock::new())
		.persistence(Broken)
		.build()
		.expect("engine");
	engine.set_filter("type", Some("Sensor".into()));
	engine.record_query("sensor");
	engine.flush();
	assert_eq!(engine.result().filtered_count(), 1);
	assert_eq!(engine.history().len(), 1);
}

#[test]
fn namespaces_keep_state_apart() {
	let store = MemoryStore::new();
	let clock = ManualClock::new();
	let mut engine = SearchEngine::builder()
		.items(catalog())
		.options(options().with_namespace("products"))
		.clock(clock.clone())
		.persistence(store.clone())
		.build()
		.expect("engine");
	engine.record_query("camera");

	assert!(store.value("products").is_some());
	assert!(store.value(DEFAULT_NAMESPACE).is_none());
}

#[test]
fn dispose_cancels_pending_work() {
	let clock = ManualClock::new();
	let mut engine = engine(&clock, &MemoryStore::new());
	let calls = Rc::new(RefCell::new(0));
	let sink = Rc::clone(&calls);
	engine.subscribe(move |_| *sink.borrow_mut() += 1);

	engine.set_query("camera");
	engine.dispose();
	clock.advance_millis(1_000);
	assert!(!engine.tick());
	assert!(!engine.flush());
	assert_eq!(*calls.borrow(), 0);
	assert!(engine.is_disposed());
	assert_eq!(engine.result().filtered_count(), 3);
}
