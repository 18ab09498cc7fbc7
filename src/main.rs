#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod error;
mod io;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Run(args) => args.run()?,
        Command::Curve(args) => args.run()?,
        Command::EfficiencyCurves(args) => args.run()?,
    }

    info!("done!");
    Ok(())
}
