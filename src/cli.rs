//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::app::Config;

/// Explore US bikeshare trip data interactively.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding chicago / new_york_city / washington data files
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Rows shown per preview page
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            data_dir: self.data_dir,
            page_size: usize::from(self.page_size),
        }
    }
}
