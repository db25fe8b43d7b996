use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use facetview::app_dirs::AppDir;
use facetview::engine::{
	DEFAULT_NAMESPACE, EngineOptions, FilterSpec, FilterSpecs, HISTORY_CAPACITY, ViewportState,
	delay_from_millis,
};
use serde::Deserialize;

use super::resolved::ResolvedConfig;
use crate::cli::CliArgs;


const DEFAULT_DEBOUNCE_MS: i64 = 300;
const DEFAULT_THROTTLE_MS: i64 = 16;
const DEFAULT_ITEM_EXTENT: f64 = 80.0;
const DEFAULT_VIEWPORT_EXTENT: f64 = 600.0;
const DEFAULT_OVERSCAN: usize = 5;

/// Mirror of the configuration file before CLI overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	items: Option<PathBuf>,
	engine: EngineSection,
	viewport: ViewportSection,
	persistence: PersistenceSection,
	filters: Vec<FilterSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EngineSection {
	debounce_ms: Option<i64>,
	throttle_ms: Option<i64>,
	history_capacity: Option<usize>,
	searchable_fields: Option<Vec<String>>,
	apply_default_filter: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ViewportSection {
	item_extent: Option<f64>,
	viewport_extent: Option<f64>,
	overscan: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PersistenceSection {
	namespace: Option<String>,
	dir: Option<PathBuf>,
	enabled: Option<bool>,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(items) = cli.items.clone() {
			self.items = Some(items);
		}
		if let Some(value) = cli.debounce_ms {
			self.engine.debounce_ms = Some(value);
		}
		if let Some(fields) = &cli.searchable_fields {
			self.engine.searchable_fields = Some(fields.clone());
		}
		if let Some(value) = cli.item_extent {
			self.viewport.item_extent = Some(value);
		}
		if let Some(value) = cli.viewport_extent {
			self.viewport.viewport_extent = Some(value);
		}
		if let Some(value) = cli.overscan {
			self.viewport.overscan = Some(value);
		}
		if let Some(namespace) = cli.namespace.clone() {
			self.persistence.namespace = Some(namespace);
		}
		if let Some(dir) = cli.state_dir.clone() {
			self.persistence.dir = Some(dir);
		}
		if cli.no_persist {
			self.persistence.enabled = Some(false);
		}
	}

	/// Validate the raw values and fill in defaults.
	pub(super) fn resolve(self) -> Result<ResolvedConfig> {
		let debounce = delay_from_millis(self.engine.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
			.context("invalid engine.debounce_ms")?;
		let throttle = delay_from_millis(self.engine.throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS))
			.context("invalid engine.throttle_ms")?;
		let history_capacity = self.engine.history_capacity.unwrap_or(HISTORY_CAPACITY);
		ensure!(history_capacity > 0, "engine.history_capacity must be at least 1");

		let viewport = ViewportState::new(
			self.viewport.item_extent.unwrap_or(DEFAULT_ITEM_EXTENT),
			self.viewport.viewport_extent.unwrap_or(DEFAULT_VIEWPORT_EXTENT),
			self.viewport.overscan.unwrap_or(DEFAULT_OVERSCAN),
		)
		.context("invalid [viewport] settings")?;

		FilterSpecs::new(self.filters.clone()).context("invalid [[filters]] settings")?;

		let namespace = self
			.persistence
			.namespace
			.map(|namespace| namespace.trim().to_string())
			.filter(|namespace| !namespace.is_empty())
			.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

		let state_dir = if self.persistence.enabled.unwrap_or(true) {
			let dir = match self.persistence.dir {
				Some(dir) => dir,
				None => AppDir::State.resolve()?,
			};
			Some(dir)
		} else {
			None
		};

		let engine = EngineOptions::default()
			.with_debounce(debounce)
			.with_history_capacity(history_capacity)
			.with_searchable_fields(
				self.engine
					.searchable_fields
					.map(sanitize_fields)
					.unwrap_or_default(),
			)
			.with_default_filter(self.engine.apply_default_filter.unwrap_or(true))
			.with_namespace(namespace);

		Ok(ResolvedConfig {
			engine,
			throttle,
			viewport,
			specs: self.filters,
			state_dir,
			items: self.items,
		})
	}
}

/// Trim field names and drop blanks and repeats, keeping order.
fn sanitize_fields(fields: Vec<String>) -> Vec<String> {
	let mut cleaned: Vec<String> = Vec::new();
	for field in fields {
		let field = field.trim();
		if !field.is_empty() && !cleaned.iter().any(|seen| seen == field) {
			cleaned.push(field.to_string());
		}
	}
	cleaned
}
