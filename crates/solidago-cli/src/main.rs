//! `solidago`: runs the scoring pipeline, step by step or all at once, on
//! a directory of CSV tables.

use std::process::ExitCode;

use clap::Parser;
use solidago_cli::Cli;
use solidago_core::tracing::init_tracing;
use solidago_core::SolidagoErrorCode;
use tracing::error;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match solidago_cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            eprintln!("{}", e.coded_string());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
