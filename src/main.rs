use anyhow::Result;
use clap::Command;

use vajra::commands;

fn build_cli() -> Command {
    Command::new("vajra")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Vajra - System Monitor & Cleaner")
        .subcommand(
            Command::new("start")
                .about("Start the live dashboard (Default)")
        )
        .subcommand(
            Command::new("logs")
                .about("Follow the tail of vajra.log")
        )
}

/// Command names are matched case-insensitively
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| if index == 1 { arg.to_lowercase() } else { arg })
        .collect()
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches_from(normalize_args(std::env::args()));

    match matches.subcommand() {
        Some(("logs", _)) => commands::logs(),
        _ => commands::start(),
    }
}
