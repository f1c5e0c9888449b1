use nodescout::cli::{Args, Command};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    init_logging(args.quiet, args.verbose);

    let command = Command::from_args(args);
    process::exit(command.run());
}

/// Install the stderr log subscriber; `RUST_LOG` wins over the flags
fn init_logging(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
