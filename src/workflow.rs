use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail, ensure};
use facetview::FileStore;
use facetview::engine::{
	FacetMap, FilterValueMap, Item, MemoryStore, SavedFilter, SearchEngine, SearchSuggestion,
	VirtualList, WindowDescriptor,
};
use serde_json::Value;
use tracing::info;

use crate::cli::{Command, SavedCommand, SearchArgs, Selection, WindowArgs};
use crate::settings::ResolvedConfig;

/// Counts, facets and the rendered rows of one search.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchReport {
	pub(crate) query: String,
	pub(crate) filters: FilterValueMap,
	pub(crate) total: usize,
	pub(crate) filtered: usize,
	pub(crate) search_time_ms: f64,
	pub(crate) facets: FacetMap,
	pub(crate) window: WindowDescriptor,
	/// Position in the filtered list, and the item.
	pub(crate) rows: Vec<(usize, Item)>,
}

/// What a command produced, ready for plain or JSON rendering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
	Search(SearchReport),
	Suggestions(Vec<SearchSuggestion>),
	Window(WindowDescriptor),
	History(Vec<String>),
	SavedList(Vec<SavedFilter>),
	Saved(SavedFilter),
	Message(String),
}

/// Runs one CLI command against an engine built from the resolved config.
pub(crate) struct SearchWorkflow {
	engine: SearchEngine,
	config: ResolvedConfig,
}

impl SearchWorkflow {
	/// Build the engine for `command`. Only a plain `search` may start from
	/// the default saved filter; every other command leaves stored state as is.
	pub(crate) fn from_config(mut config: ResolvedConfig, command: &Command) -> Result<Self> {
		config.engine.apply_default_filter &= loads_default_filter(command);
		let items = match &config.items {
			Some(path) => load_items(path)?,
			None => Vec::new(),
		};
		info!(items = items.len(), specs = config.specs.len(), "building engine");

		let builder = SearchEngine::builder()
			.items(items)
			.specs(config.specs.clone())
			.options(config.engine.clone());
		let builder = match &config.state_dir {
			Some(dir) => builder.persistence(FileStore::new(dir)),
			None => builder.persistence(MemoryStore::new()),
		};
		let engine = builder.build().context("invalid filter configuration")?;

		Ok(Self { engine, config })
	}

	pub(crate) fn run(mut self, command: Command) -> Result<Outcome> {
		match command {
			Command::Search(args) => self.search(args),
			Command::Suggest { prefix } => {
				Ok(Outcome::Suggestions(self.engine.suggestions(&prefix)))
			}
			Command::Window(args) => Ok(Outcome::Window(self.window(&args))),
			Command::History { clear } => {
				if clear {
					self.engine.clear_history();
				}
				Ok(Outcome::History(self.engine.history().to_vec()))
			}
			Command::Saved { action } => self.saved(action),
		}
	}

	fn search(&mut self, args: SearchArgs) -> Result<Outcome> {
		self.apply(&args.selection)?;
		self.engine.flush();
		if args.record {
			self.engine.record_current_query();
		}
		Ok(Outcome::Search(self.report(args.scroll, args.limit)))
	}

	fn saved(&mut self, action: SavedCommand) -> Result<Outcome> {
		match action {
			SavedCommand::List => Ok(Outcome::SavedList(self.engine.saved_filters().to_vec())),
			SavedCommand::Save {
				name,
				is_default,
				selection,
			} => {
				ensure!(!name.trim().is_empty(), "saved filter name must not be empty");
				self.apply(&selection)?;
				Ok(Outcome::Saved(self.engine.save_filter(&name, is_default)))
			}
			SavedCommand::Load { id } => {
				ensure!(self.engine.load_filter(&id), "no saved filter with id '{id}'");
				Ok(Outcome::Search(self.report(0.0, None)))
			}
			SavedCommand::Delete { id } => {
				let deleted = self
					.engine
					.delete_filter(&id)
					.with_context(|| format!("no saved filter with id '{id}'"))?;
				Ok(Outcome::Message(format!("Deleted '{}' ({id})", deleted.name)))
			}
			SavedCommand::Rename { id, name } => {
				ensure!(!name.trim().is_empty(), "saved filter name must not be empty");
				ensure!(self.engine.rename_filter(&id, &name), "no saved filter with id '{id}'");
				Ok(Outcome::Message(format!("Renamed {id} to '{}'", name.trim())))
			}
			SavedCommand::Default { id } => {
				ensure!(
					self.engine.set_default_filter(id.as_deref()),
					"no saved filter with id '{}'",
					id.as_deref().unwrap_or_default()
				);
				let message = match id {
					Some(id) => format!("{id} now loads on startup"),
					None => "Cleared the startup filter".to_string(),
				};
				Ok(Outcome::Message(message))
			}
		}
	}

	/// Push the query and filters from the command line into the engine.
	fn apply(&mut self, selection: &Selection) -> Result<()> {
		if selection.reset {
			self.engine.clear_all();
		}
		if let Some(query) = &selection.query {
			self.engine.set_query(query.clone());
		}
		for (id, raw) in &selection.filters {
			if raw.is_empty() {
				self.engine.clear_filter(id);
				continue;
			}
			let Some(kind) = self.engine.specs().get(id).map(|spec| spec.kind()) else {
				bail!("unknown filter '{id}'");
			};
			ensure!(
				self.engine.set_filter_text(id, raw),
				"'{raw}' is not a valid {} value for filter '{id}'",
				kind.name()
			);
		}
		Ok(())
	}

	fn report(&self, scroll: f64, limit: Option<usize>) -> SearchReport {
		let result = self.engine.result();
		let mut list = VirtualList::new(
			self.config.viewport.with_item_count(result.filtered_count()),
			self.config.throttle,
		);
		list.scroll(scroll, Instant::now());
		let window = list.window();

		SearchReport {
			query: result.query().to_string(),
			filters: self.engine.filters().clone(),
			total: result.total_count(),
			filtered: result.filtered_count(),
			search_time_ms: result.search_time_ms(),
			facets: result.facets().clone(),
			window,
			rows: result
				.visible(&window)
				.take(limit.unwrap_or(usize::MAX))
				.map(|(position, item)| (position, item.clone()))
				.collect(),
		}
	}

	fn window(&self, args: &WindowArgs) -> WindowDescriptor {
		let mut list = VirtualList::new(
			self.config.viewport.with_item_count(args.count),
			self.config.throttle,
		);
		match args.to_index {
			Some(index) => {
				list.scroll_to_index(index, args.align.into());
			}
			None => {
				list.scroll(args.scroll, Instant::now());
			}
		}
		list.window()
	}
}

fn loads_default_filter(command: &Command) -> bool {
	matches!(command, Command::Search(args) if !args.selection.reset)
}

/// Read a JSON array of objects from `path`, or stdin when `path` is `-`.
pub(crate) fn load_items(path: &Path) -> Result<Vec<Item>> {
	let raw = if path.as_os_str() == "-" {
		let mut raw = String::new();
		io::stdin()
			.read_to_string(&mut raw)
			.context("failed to read items from stdin")?;
		raw
	} else {
		fs::read_to_string(path)
			.with_context(|| format!("failed to read items from {}", path.display()))?
	};
	parse_items(&raw).with_context(|| format!("invalid items in {}", path.display()))
}

fn parse_items(raw: &str) -> Result<Vec<Item>> {
	let value: Value = serde_json::from_str(raw)?;
	let Value::Array(values) = value else {
		bail!("expected a JSON array of objects");
	};
	values
		.into_iter()
		.enumerate()
		.map(|(index, value)| {
			Item::from_value(value).with_context(|| format!("item {index} is not a JSON object"))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use facetview::engine::{EngineOptions, FilterKind, FilterSpec, FilterValue, ViewportState};
	use tempfile::tempdir;

	use super::*;

	const ITEMS: &str = r#"[
		{"id": 1, "type": "Cámara", "status": "Activo"},
		{"id": 2, "type": "Sensor", "status": "Inactivo"},
		{"id": 3, "type": "Cámara", "status": "Inactivo"}
	]"#;

	fn config(dir: &Path) -> ResolvedConfig {
		let items = dir.join("items.json");
		fs::write(&items, ITEMS).expect("write items");
		ResolvedConfig {
			engine: EngineOptions::default(),
			throttle: Duration::from_millis(16),
			viewport: ViewportState::new(80.0, 600.0, 5).expect("viewport"),
			specs: vec![
				FilterSpec::new("type", FilterKind::Select),
				FilterSpec::new("status", FilterKind::Select),
			],
			state_dir: Some(dir.join("state")),
			items: Some(items),
		}
	}

	fn search(selection: Selection) -> Command {
		Command::Search(SearchArgs {
			selection,
			..SearchArgs::default()
		})
	}

	fn run(dir: &Path, command: Command) -> Outcome {
		SearchWorkflow::from_config(config(dir), &command)
			.expect("workflow")
			.run(command)
			.expect("run")
	}

	#[test]
	fn search_filters_and_windows_the_result() {
		let dir = tempdir().expect("tempdir");
		let outcome = run(
			dir.path(),
			search(Selection {
				filters: vec![("type".into(), "Cámara".into())],
				..Selection::default()
			}),
		);
		let Outcome::Search(report) = outcome else {
			panic!("expected a search report");
		};
		assert_eq!(report.filtered, 2);
		assert_eq!(report.total, 3);
		assert_eq!(report.window.range(), 0..2);
		assert_eq!(
			report.rows.iter().map(|(position, _)| *position).collect::<Vec<_>>(),
			vec![0, 1]
		);
		assert_eq!(report.facets["type"].count_of("Cámara"), 2);
		assert_eq!(report.facets["status"].len(), 2);
	}

	#[test]
	fn filters_persist_between_runs() {
		let dir = tempdir().expect("tempdir");
		run(
			dir.path(),
			search(Selection {
				filters: vec![("status".into(), "Inactivo".into())],
				..Selection::default()
			}),
		);
		let Outcome::Search(report) = run(dir.path(), search(Selection::default())) else {
			panic!("expected a search report");
		};
		assert_eq!(report.filtered, 2);

		let Outcome::Search(report) = run(
			dir.path(),
			search(Selection {
				reset: true,
				..Selection::default()
			}),
		) else {
			panic!("expected a search report");
		};
		assert_eq!(report.filtered, 3);
	}

	#[test]
	fn unknown_and_malformed_filters_are_errors() {
		let dir = tempdir().expect("tempdir");
		let mut config = config(dir.path());
		config.specs.push(FilterSpec::new("price", FilterKind::Range));

		let command = search(Selection {
			filters: vec![("colour".into(), "red".into())],
			..Selection::default()
		});
		let err = SearchWorkflow::from_config(config.clone(), &command)
			.expect("workflow")
			.run(command)
			.unwrap_err();
		assert_eq!(err.to_string(), "unknown filter 'colour'");

		let command = search(Selection {
			filters: vec![("price".into(), "cheap".into())],
			..Selection::default()
		});
		let err = SearchWorkflow::from_config(config, &command)
			.expect("workflow")
			.run(command)
			.unwrap_err();
		assert_eq!(err.to_string(), "'cheap' is not a valid range value for filter 'price'");
	}

	#[test]
	fn saved_filters_round_trip_through_commands() {
		let dir = tempdir().expect("tempdir");
		let Outcome::Saved(saved) = run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::Save {
					name: "Sensors".into(),
					is_default: false,
					selection: Selection {
						filters: vec![("type".into(), "Sensor".into())],
						reset: true,
						..Selection::default()
					},
				},
			},
		) else {
			panic!("expected a saved filter");
		};

		let Outcome::Search(report) = run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::Load { id: saved.id.clone() },
			},
		) else {
			panic!("expected a search report");
		};
		assert_eq!(report.filtered, 1);

		let Outcome::SavedList(entries) = run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::List,
			},
		) else {
			panic!("expected a list");
		};
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].usage_count, 1);

		let outcome = run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::Delete { id: saved.id.clone() },
			},
		);
		assert_eq!(outcome, Outcome::Message(format!("Deleted 'Sensors' ({})", saved.id)));
	}

	fn saved_list(dir: &Path) -> Vec<SavedFilter> {
		let Outcome::SavedList(entries) = run(
			dir,
			Command::Saved {
				action: SavedCommand::List,
			},
		) else {
			panic!("expected a list");
		};
		entries
	}

	fn filtered(dir: &Path, selection: Selection) -> SearchReport {
		let Outcome::Search(report) = run(dir, search(selection)) else {
			panic!("expected a search report");
		};
		report
	}

	#[test]
	fn default_filter_leaves_later_runs_alone() {
		let dir = tempdir().expect("tempdir");
		run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::Save {
					name: "Sensors".into(),
					is_default: true,
					selection: Selection {
						filters: vec![("type".into(), "Sensor".into())],
						..Selection::default()
					},
				},
			},
		);

		for _ in 0..2 {
			let entries = saved_list(dir.path());
			assert_eq!(entries.len(), 1);
			assert_eq!(entries[0].usage_count, 0);
		}
		run(dir.path(), Command::History { clear: false });
		run(dir.path(), Command::Suggest { prefix: "c".into() });

		let report = filtered(
			dir.path(),
			Selection {
				filters: vec![("type".into(), "Cámara".into())],
				..Selection::default()
			},
		);
		assert_eq!(report.filtered, 2);

		let report = filtered(dir.path(), Selection::default());
		assert_eq!(report.filtered, 2);
		assert_eq!(report.filters.get("type"), Some(&FilterValue::from("Cámara")));
		assert_eq!(saved_list(dir.path())[0].usage_count, 0);
	}

	#[test]
	fn default_filter_seeds_a_search_after_reset() {
		let dir = tempdir().expect("tempdir");
		run(
			dir.path(),
			Command::Saved {
				action: SavedCommand::Save {
					name: "Sensors".into(),
					is_default: true,
					selection: Selection {
						filters: vec![("type".into(), "Sensor".into())],
						..Selection::default()
					},
				},
			},
		);

		let report = filtered(
			dir.path(),
			Selection {
				reset: true,
				..Selection::default()
			},
		);
		assert_eq!(report.filtered, 3);
		assert_eq!(saved_list(dir.path())[0].usage_count, 0);

		let report = filtered(dir.path(), Selection::default());
		assert_eq!(report.filtered, 1);
		assert_eq!(saved_list(dir.path())[0].usage_count, 1);

		filtered(dir.path(), Selection::default());
		assert_eq!(saved_list(dir.path())[0].usage_count, 1);
	}

	#[test]
	fn window_command_scrolls_to_a_row() {
		let dir = tempdir().expect("tempdir");
		let Outcome::Window(window) = run(
			dir.path(),
			Command::Window(WindowArgs {
				count: 100,
				scroll: 0.0,
				to_index: Some(50),
				align: Default::default(),
			}),
		) else {
			panic!("expected a window");
		};
		assert_eq!(window.range(), 45..63);
		assert_eq!(window.render_offset, 3_600.0);
	}

	#[test]
	fn items_must_be_an_array_of_objects() {
		assert!(parse_items(r#"{"id": 1}"#).is_err());
		let err = parse_items(r#"[{"id": 1}, 3]"#).unwrap_err();
		assert_eq!(err.to_string(), "item 1 is not a JSON object");
		assert_eq!(parse_items("[]").expect("empty").len(), 0);
	}
}
