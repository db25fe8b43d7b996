use std::path::PathBuf;
use std::time::Duration;

use facetview::engine::{EngineOptions, FilterSpec, ViewportState};

/// Application-ready configuration derived from config files, environment
/// variables, CLI flags and defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	pub engine: EngineOptions,
	/// Minimum spacing between applied scroll offsets.
	pub throttle: Duration,
	pub viewport: ViewportState,
	pub specs: Vec<FilterSpec>,
	/// Where state is persisted; `None` keeps it in memory.
	pub state_dir: Option<PathBuf>,
	pub items: Option<PathBuf>,
}

impl ResolvedConfig {
	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		print!("{}", self.summary());
	}

	fn summary(&self) -> String {
		let mut lines = vec![
			"Effective configuration:".to_string(),
			format!(
				"  Items: {}",
				self.items
					.as_ref()
					.map_or_else(|| "(none)".to_string(), |path| path.display().to_string())
			),
			format!("  Debounce: {} ms", self.engine.debounce.as_millis()),
			format!("  Scroll throttle: {} ms", self.throttle.as_millis()),
			format!("  History capacity: {}", self.engine.history_capacity),
			format!(
				"  Searchable fields: {}",
				if self.engine.searchable_fields.is_empty() {
					"(all)".to_string()
				} else {
					self.engine.searchable_fields.join(", ")
				}
			),
			format!(
				"  Apply default saved filter: {}",
				bool_to_word(self.engine.apply_default_filter)
			),
			format!(
				"  Viewport: {} px rows, {} px visible, overscan {}",
				self.viewport.item_extent(),
				self.viewport.viewport_extent(),
				self.viewport.overscan()
			),
			format!("  Namespace: {}", self.engine.namespace),
			format!(
				"  State: {}",
				self.state_dir
					.as_ref()
					.map_or_else(|| "(memory only)".to_string(), |dir| dir.display().to_string())
			),
		];
		if self.specs.is_empty() {
			lines.push("  Filters: (none)".to_string());
		} else {
			lines.push("  Filters:".to_string());
			for spec in &self.specs {
				lines.push(format!("    {} ({}): {}", spec.id(), spec.kind().name(), spec.label()));
			}
		}

		let mut out = lines.join("\n");
		out.push('\n');
		out
	}
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
