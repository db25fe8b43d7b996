use clap::ValueEnum;
use facetview::engine::Align;

/// Output formats supported by the CLI utility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
	Plain,
	Json,
}

/// Row alignment for `window --to`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum AlignArg {
	#[default]
	Start,
	Center,
	End,
}

impl From<AlignArg> for Align {
	fn from(value: AlignArg) -> Self {
		match value {
			AlignArg::Start => Align::Start,
			AlignArg::Center => Align::Center,
			AlignArg::End => Align::End,
		}
	}
}

/// Parse `ID=VALUE` into its parts. The value may be empty, which clears the
/// filter.
pub(crate) fn parse_filter_assignment(raw: &str) -> Result<(String, String), String> {
	let (id, value) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
	let id = id.trim();
	if id.is_empty() {
		return Err(format!("missing filter id in '{raw}'"));
	}
	Ok((id.to_string(), value.trim().to_string()))
}
