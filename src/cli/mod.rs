mod args;
mod output;

pub(crate) use args::{
	CliArgs, Command, OutputFormat, SavedCommand, SearchArgs, Selection, WindowArgs, parse_cli,
};
pub(crate) use output::{print_json, print_plain};
