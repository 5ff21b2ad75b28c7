//! pagestamp - Page content change tracker
//!
//! Entry point for the pagestamp CLI application.

use std::io::IsTerminal;

use clap::Parser;
use pagestamp::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging::init_logging,
};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);
    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    match pagestamp::run_app(&cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;

            if cli.json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
