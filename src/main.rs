use clap::Parser;
use quantflow::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
