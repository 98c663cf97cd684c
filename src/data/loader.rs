use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::filter::{apply_filters, resolve_month, resolve_weekday, FilterNotice};
use super::model::{City, OptionalColumns, Trip, TripTable};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

/// Extensions tried, in order, when resolving a city's source file.
const SOURCE_EXTENSIONS: [&str; 3] = ["csv", "parquet", "json"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a city's trips and apply the month/day answers.
///
/// Returns the filtered table plus the notices describing each applied (or
/// skipped) filter.
pub fn load_data(
    data_dir: &Path,
    city: City,
    month: &str,
    day: &str,
) -> Result<(TripTable, Vec<FilterNotice>)> {
    let table = load_city(data_dir, city)?;
    Ok(apply_filters(
        table,
        &resolve_month(month),
        &resolve_weekday(day),
    ))
}

/// Load every trip for `city` from `data_dir`.
pub fn load_city(data_dir: &Path, city: City) -> Result<TripTable> {
    let path = resolve_source(data_dir, city)?;
    log::info!("loading {} trips from {}", city.display_name(), path.display());
    let table = load_file(&path).with_context(|| format!("loading {}", path.display()))?;
    log::info!("loaded {} trips", table.len());
    Ok(table)
}

/// Find the first existing `<stem>.<ext>` for the city.
pub fn resolve_source(data_dir: &Path, city: City) -> Result<PathBuf, DataError> {
    let stem = city.source_stem();
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| data_dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| DataError::SourceNotFound {
            city: city.display_name(),
            stem,
            dir: data_dir.to_path_buf(),
        })
}

/// Load a trip table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the standard bikeshare column names
/// * `.parquet` – same column names, any type castable to text / float
/// * `.json`    – `[{ "Start Time": "...", "Trip Duration": 600, ... }, ...]`
pub fn load_file(path: &Path) -> Result<TripTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Row conversion shared by all formats
// ---------------------------------------------------------------------------

/// One source row before timestamp parsing.  Every field is optional so a
/// blank cell can be reported with its row number instead of a serde error.
#[derive(Debug, Default, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time", default)]
    start_time: Option<String>,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(
        rename = "Birth Year",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    birth_year: Option<f64>,
}

impl RawTrip {
    fn into_trip(self, row: usize) -> Result<Trip, DataError> {
        let start_time = required(self.start_time, row, START_TIME)?;
        let end_time = required(self.end_time, row, END_TIME)?;
        let duration_secs = self
            .trip_duration
            .ok_or(DataError::MissingValue { row, column: TRIP_DURATION })?;
        if !duration_secs.is_finite() {
            return Err(DataError::BadDuration { row, value: duration_secs });
        }
        Ok(Trip {
            start_time: parse_timestamp(&start_time)
                .ok_or(DataError::BadTimestamp { row, value: start_time })?,
            end_time: parse_timestamp(&end_time)
                .ok_or(DataError::BadTimestamp { row, value: end_time })?,
            duration_secs,
            start_station: required(self.start_station, row, START_STATION)?,
            end_station: required(self.end_station, row, END_STATION)?,
            user_type: non_blank(self.user_type),
            gender: non_blank(self.gender),
            birth_year: self.birth_year,
        })
    }
}

fn required(val: Option<String>, row: usize, column: &'static str) -> Result<String, DataError> {
    non_blank(val).ok_or(DataError::MissingValue { row, column })
}

fn non_blank(val: Option<String>) -> Option<String> {
    val.filter(|s| !s.trim().is_empty())
}

/// Parse `YYYY-MM-DD HH:MM:SS[.fff]` or the `T`-separated ISO form.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Check the required columns and note which optional ones are present.
fn check_columns<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<OptionalColumns, DataError> {
    let names: BTreeSet<&str> = names.into_iter().collect();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !names.contains(*c)) {
        return Err(DataError::MissingColumn(*missing));
    }
    Ok(OptionalColumns {
        gender: names.contains(&GENDER),
        birth_year: names.contains(&BIRTH_YEAR),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one trip per row.  Unknown
/// columns (such as a leading unnamed index) are ignored.
fn load_csv(path: &Path) -> Result<TripTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let columns = check_columns(headers.iter())?;

    let mut trips = Vec::new();
    for (row_no, result) in reader.deserialize::<RawTrip>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        trips.push(raw.into_trip(row_no)?);
    }

    Ok(TripTable::new(trips, columns))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Start Time": "2017-01-01 09:07:57", "Trip Duration": 1039, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TripTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut keys = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        keys.extend(obj.keys().map(String::as_str));
    }
    let columns = if records.is_empty() {
        OptionalColumns::default()
    } else {
        check_columns(keys)?
    };

    let mut trips = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let raw: RawTrip =
            serde_json::from_value(rec.clone()).with_context(|| format!("JSON row {i}"))?;
        trips.push(raw.into_trip(i)?);
    }

    Ok(TripTable::new(trips, columns))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of trips.
///
/// Text and timestamp columns are cast to Utf8, numeric columns to Float64,
/// so files written by both **Pandas** and **Polars** work regardless of the
/// exact integer / timestamp types they chose.
fn load_parquet(path: &Path) -> Result<TripTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let columns = check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

    let reader = builder.build().context("building parquet reader")?;

    let mut trips = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let start = string_column(&batch, START_TIME)?;
        let end = string_column(&batch, END_TIME)?;
        let duration = float_column(&batch, TRIP_DURATION)?;
        let start_station = string_column(&batch, START_STATION)?;
        let end_station = string_column(&batch, END_STATION)?;
        let user_type = string_column(&batch, USER_TYPE)?;
        let gender = string_column(&batch, GENDER)?;
        let birth_year = float_column(&batch, BIRTH_YEAR)?;

        for row in 0..batch.num_rows() {
            let raw = RawTrip {
                start_time: cell(&start, row),
                end_time: cell(&end, row),
                trip_duration: cell(&duration, row),
                start_station: cell(&start_station, row),
                end_station: cell(&end_station, row),
                user_type: cell(&user_type, row),
                gender: cell(&gender, row),
                birth_year: cell(&birth_year, row),
            };
            trips.push(raw.into_trip(trips.len())?);
        }
    }

    Ok(TripTable::new(trips, columns))
}

// -- Parquet / Arrow helpers --

/// A column's values, or `None` when the batch has no such column.
type Column<T> = Option<Vec<Option<T>>>;

fn cell<T: Clone>(col: &Column<T>, row: usize) -> Option<T> {
    col.as_ref()
        .and_then(|values| values.get(row))
        .cloned()
        .flatten()
}

/// Read a column as text, casting from whatever Arrow type it was stored as.
fn string_column(batch: &RecordBatch, name: &str) -> Result<Column<String>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let text = cast(batch.column(idx).as_ref(), &DataType::Utf8)
        .with_context(|| format!("casting '{name}' to text"))?;
    Ok(Some(
        text.as_string::<i32>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect(),
    ))
}

/// Read a column as `f64`; unparseable values become missing.
fn float_column(batch: &RecordBatch, name: &str) -> Result<Column<f64>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let floats = cast(batch.column(idx).as_ref(), &DataType::Float64)
        .with_context(|| format!("casting '{name}' to float"))?;
    Ok(Some(floats.as_primitive::<Float64Type>().iter().collect()))
}
