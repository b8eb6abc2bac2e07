use clap::Parser;

use objfunc::cli::Cli;
use objfunc::objective_output;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Failures are reported as the sentinel on stdout; the exit status stays 0.
    println!("{}", objective_output(&cli.request()));
}

/// Stderr logging; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
