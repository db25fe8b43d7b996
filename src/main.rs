mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{Command, OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;
use tracing::debug;
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	facetview::logging::initialize(cli.verbose);

	let resolved = settings::load(&cli)?;
	debug!(?resolved, "configuration resolved");

	if cli.print_config {
		resolved.print_summary();
	}

	run_command(cli.output, resolved, cli.command)
}

/// Execute one subcommand and print its outcome in the chosen format.
fn run_command(format: OutputFormat, settings: ResolvedConfig, command: Command) -> Result<()> {
	let workflow = SearchWorkflow::from_config(settings, &command)?;
	let outcome = workflow.run(command)?;

	match format {
		OutputFormat::Plain => print_plain(&outcome),
		OutputFormat::Json => print_json(&outcome)?,
	}

	Ok(())
}
