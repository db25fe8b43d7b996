use std::fmt::Write;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use facetview::app_dirs::AppDir;

/// `--version` output: the release plus every directory facetview uses and
/// the variable that moves it.
pub(super) fn long_version() -> &'static str {
	Box::leak(version_banner().into_boxed_str())
}

fn version_banner() -> String {
	let mut banner = format!("facetview {}\n", env!("CARGO_PKG_VERSION"));
	for dir in AppDir::ALL {
		let location = dir
			.resolve()
			.map_or_else(|err| format!("unavailable ({err})"), |path| path.display().to_string());
		let _ = writeln!(banner, "{}: {location} [{}]", dir.label(), dir.override_var());
	}
	banner
}

pub(super) fn cli_styles() -> Styles {
	let accent = AnsiColor::Green.on_default().effects(Effects::BOLD);
	Styles::styled()
		.header(accent)
		.usage(accent)
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
		.invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
}
