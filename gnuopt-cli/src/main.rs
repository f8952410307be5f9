mod arguments;
mod error;
mod map;
mod report;

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use crate::arguments::{Action, Cmdline, USAGE};
use crate::error::Result;

const EXIT_PARSE_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cmdline = match arguments::parse_args() {
        Ok(Action::Help) => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Action::Version) => {
            println!("gnuopt {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Ok(Action::Run(cmdline)) => cmdline,
        Err(e) => {
            eprintln!("gnuopt: {}", e);
            eprintln!("Try 'gnuopt --help' for more information.");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_tracing(cmdline.verbose);

    match run(&cmdline) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gnuopt: {}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cmdline: &Cmdline) -> Result<ExitCode> {
    let optmap = map::load(cmdline)?;
    tracing::info!(args = cmdline.args.len(), "parsing");

    match gnuopt::parse(&cmdline.args, &optmap) {
        Ok(parsed) => {
            println!("{}", report::render(&parsed, cmdline.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(kind = e.kind(), option = e.option(), "arguments rejected");
            println!("{}", report::render_error(&e, cmdline.pretty)?);
            eprintln!("gnuopt: {}", e);
            Ok(ExitCode::from(EXIT_PARSE_FAILED))
        }
    }
}

fn init_tracing(verbose: u64) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("GNUOPT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
