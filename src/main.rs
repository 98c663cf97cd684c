mod app;
mod cli;
mod data;
mod preview;
mod prompt;
mod report;

use std::io;

use app::Session;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = cli::Args::parse().into_config();
    log::info!("data directory: {}", config.data_dir.display());

    let mut session = Session::new(config, io::stdin().lock(), io::stdout().lock());
    session.run()
}
