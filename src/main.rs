mod assets;
mod cli;
mod config;
mod domain;
mod error;
mod render;
mod session;

use clap::Parser;

fn main() -> std::process::ExitCode {
    let args = cli::CliArgs::parse();
    let filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    cli::run(args)
}
