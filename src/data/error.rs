use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a city's source file into a [`TripTable`](super::model::TripTable).
#[derive(Debug, Error)]
pub enum DataError {
    #[error(
        "no data file for {city} in {} (looked for {stem}.csv, {stem}.parquet, {stem}.json)",
        .dir.display()
    )]
    SourceNotFound {
        city: &'static str,
        stem: &'static str,
        dir: PathBuf,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse '{value}' as a timestamp")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: '{value}' is not a valid trip duration")]
    BadDuration { row: usize, value: f64 },

    #[error("row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: &'static str },
}
