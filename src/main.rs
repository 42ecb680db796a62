use clap::Parser;
use tradesweep::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
