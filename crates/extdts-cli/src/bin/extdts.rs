#![allow(clippy::print_stderr)]

use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::process::ExitCode;

use extdts_cli::args::CliArgs;
use extdts_cli::driver;

fn main() -> ExitCode {
    // Initialize tracing if EXTDTS_LOG or RUST_LOG is set (zero cost otherwise).
    extdts::tracing_config::init_tracing();

    let args = CliArgs::parse();
    if !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    match driver::run(&args) {
        Ok(result) => {
            if args.output.is_some() {
                eprintln!(
                    "{} {} namespaces from {} files",
                    "compiled".green().bold(),
                    result.namespaces,
                    result.files
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {err:#}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}
