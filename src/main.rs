use anyhow::Result;
use clap::Parser;
use quote_engine::cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        // logging may not be initialized yet when config loading fails
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
