use std::path::PathBuf;

use clap::{ArgAction, Args, ColorChoice, Parser, Subcommand};

use super::options::{AlignArg, OutputFormat, parse_filter_assignment};
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `facetview` binary.
#[derive(Parser, Debug)]
#[command(
	name = "facetview",
	version,
	long_version = long_version(),
	about = "Search, filter and facet a JSON collection from the terminal",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "FACETVIEW_CONFIG",
		action = ArgAction::Append,
		global = true,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'p',
		long = "print-config",
		global = true,
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		global = true,
		help = "Choose how to print the result"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		short = 'v',
		long = "verbose",
		action = ArgAction::Count,
		global = true,
		help = "Raise log verbosity; repeat for more (default: warnings only)"
	)]
	pub(crate) verbose: u8,
	#[arg(
		short = 'i',
		long = "items",
		value_name = "FILE",
		global = true,
		help = "JSON array of objects to search; '-' reads stdin (default: empty collection)"
	)]
	pub(crate) items: Option<PathBuf>,
	#[arg(
		long = "debounce-ms",
		value_name = "MS",
		allow_negative_numbers = true,
		global = true,
		help = "Quiet period before a query or filter change runs (default: 300)"
	)]
	pub(crate) debounce_ms: Option<i64>,
	#[arg(
		long = "searchable",
		value_delimiter = ',',
		value_name = "FIELD",
		global = true,
		help = "Comma-separated fields the query searches (default: every field)"
	)]
	pub(crate) searchable_fields: Option<Vec<String>>,
	#[arg(
		long = "namespace",
		value_name = "KEY",
		global = true,
		help = "Key under which search state is stored (default: facetview)"
	)]
	pub(crate) namespace: Option<String>,
	#[arg(
		long = "state-dir",
		value_name = "DIR",
		global = true,
		help = "Directory for persisted state (default: data directory)"
	)]
	pub(crate) state_dir: Option<PathBuf>,
	#[arg(
		long = "no-persist",
		global = true,
		help = "Keep state in memory only (default: disabled)"
	)]
	pub(crate) no_persist: bool,
	#[arg(
		long = "item-extent",
		value_name = "PX",
		global = true,
		help = "Height of one row (default: 80)"
	)]
	pub(crate) item_extent: Option<f64>,
	#[arg(
		long = "viewport-extent",
		value_name = "PX",
		global = true,
		help = "Height of the visible area (default: 600)"
	)]
	pub(crate) viewport_extent: Option<f64>,
	#[arg(
		long = "overscan",
		value_name = "ROWS",
		global = true,
		help = "Extra rows rendered beyond each edge (default: 5)"
	)]
	pub(crate) overscan: Option<usize>,
	#[command(subcommand)]
	pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Command {
	/// Apply a query and filters, then print counts, facets and visible rows.
	Search(SearchArgs),
	/// Suggest queries for a prefix from history and field values.
	Suggest {
		#[arg(value_name = "PREFIX", default_value = "")]
		prefix: String,
	},
	/// Compute the render window for a list without loading items.
	Window(WindowArgs),
	/// Show or clear remembered queries.
	History {
		#[arg(long, help = "Forget every remembered query")]
		clear: bool,
	},
	/// Manage saved filters.
	Saved {
		#[command(subcommand)]
		action: SavedCommand,
	},
}

/// Query and filter selection shared by `search` and `saved save`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub(crate) struct Selection {
	#[arg(short = 'q', long = "query", value_name = "QUERY", help = "Free-text query")]
	pub(crate) query: Option<String>,
	#[arg(
		short = 'f',
		long = "filter",
		value_name = "ID=VALUE",
		value_parser = parse_filter_assignment,
		action = ArgAction::Append,
		help = "Set a filter; an empty VALUE clears it"
	)]
	pub(crate) filters: Vec<(String, String)>,
	#[arg(long = "reset", help = "Start from an empty query and no filters")]
	pub(crate) reset: bool,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub(crate) struct SearchArgs {
	#[command(flatten)]
	pub(crate) selection: Selection,
	#[arg(long, help = "Remember the query in history")]
	pub(crate) record: bool,
	#[arg(long, value_name = "PX", default_value_t = 0.0, help = "Scroll offset of the list")]
	pub(crate) scroll: f64,
	#[arg(long, value_name = "N", help = "Print at most N rows of the window")]
	pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub(crate) struct WindowArgs {
	#[arg(long, value_name = "N", help = "Number of items in the list")]
	pub(crate) count: usize,
	#[arg(long, value_name = "PX", default_value_t = 0.0, help = "Scroll offset of the list")]
	pub(crate) scroll: f64,
	#[arg(
		long = "to",
		value_name = "INDEX",
		conflicts_with = "scroll",
		help = "Scroll so this row is in view"
	)]
	pub(crate) to_index: Option<usize>,
	#[arg(long, value_enum, default_value_t = AlignArg::Start, help = "Where --to places the row")]
	pub(crate) align: AlignArg,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum SavedCommand {
	/// List saved filters.
	List,
	/// Save the current (or given) query and filters.
	Save {
		name: String,
		#[arg(long = "default", help = "Load this filter on startup")]
		is_default: bool,
		#[command(flatten)]
		selection: Selection,
	},
	/// Apply a saved filter and search with it.
	Load { id: String },
	Delete { id: String },
	Rename { id: String, name: String },
	/// Mark a saved filter as the startup default; without ID, clear it.
	Default { id: Option<String> },
}
