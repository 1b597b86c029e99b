use clap::Parser;
use extsort::cli::{Args, run_cli};
use extsort::output::OutputFormatter;
use std::process::ExitCode;

mod logging;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(args.verbose, args.quiet) {
        eprintln!("Warning: could not initialize logging: {e:#}");
    }
    OutputFormatter::configure_colors();

    ExitCode::from(run_cli(&args))
}
