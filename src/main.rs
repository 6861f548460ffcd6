//! skej command line entry point.

use clap::Parser;

mod cli;

use cli::Args;

fn main() {
    env_logger::init();

    let args = Args::parse();
    log::debug!("Parsed arguments: {:?}", args);

    if let Err(err) = cli::run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
