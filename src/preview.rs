use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::loader::{
    BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME, TRIP_DURATION, USER_TYPE,
};
use crate::data::model::{Trip, TripTable};
use crate::prompt::Prompter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Page rendering
// ---------------------------------------------------------------------------

/// Build an Arrow batch for rows `start..end` of the table.
///
/// Includes the row number, the source columns (optional ones only when the
/// source had them) and the derived `month` / `weekday` fields.
pub fn page_batch(table: &TripTable, start: usize, end: usize) -> Result<RecordBatch> {
    let end = end.min(table.len());
    let start = start.min(end);
    let rows: &[Trip] = &table.trips[start..end];

    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();
    let mut push = |field: Field, array: ArrayRef| {
        fields.push(field);
        columns.push(array);
    };

    push(
        Field::new("row", DataType::UInt64, false),
        Arc::new(UInt64Array::from_iter_values((start..end).map(|i| i as u64))),
    );
    push(
        Field::new(START_TIME, DataType::Utf8, false),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|t| t.start_time.format(TIMESTAMP_FORMAT).to_string()),
        )),
    );
    push(
        Field::new(END_TIME, DataType::Utf8, false),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|t| t.end_time.format(TIMESTAMP_FORMAT).to_string()),
        )),
    );
    push(
        Field::new(TRIP_DURATION, DataType::Float64, false),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|t| t.duration_secs))),
    );
    push(
        Field::new(START_STATION, DataType::Utf8, false),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|t| &t.start_station))),
    );
    push(
        Field::new(END_STATION, DataType::Utf8, false),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|t| &t.end_station))),
    );
    push(
        Field::new(USER_TYPE, DataType::Utf8, true),
        Arc::new(StringArray::from_iter(rows.iter().map(|t| t.user_type.as_deref()))),
    );
    if table.columns.gender {
        push(
            Field::new(GENDER, DataType::Utf8, true),
            Arc::new(StringArray::from_iter(rows.iter().map(|t| t.gender.as_deref()))),
        );
    }
    if table.columns.birth_year {
        push(
            Field::new(BIRTH_YEAR, DataType::Float64, true),
            Arc::new(Float64Array::from_iter(rows.iter().map(|t| t.birth_year))),
        );
    }
    push(
        Field::new("month", DataType::UInt32, false),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(Trip::month))),
    );
    push(
        Field::new("weekday", DataType::UInt32, false),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(Trip::weekday))),
    );

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).context("building preview batch")
}

/// Render rows `start..end` as a text table.
pub fn render_page(table: &TripTable, start: usize, end: usize) -> Result<String> {
    let batch = page_batch(table, start, end)?;
    let rendered = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(rendered.to_string())
}

// ---------------------------------------------------------------------------
// Interactive pagination
// ---------------------------------------------------------------------------

/// Show the first page, then keep showing `page_size` more rows while the user
/// answers "yes" and rows remain.
pub fn paginate<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    table: &TripTable,
    page_size: usize,
) -> Result<()> {
    let page_size = page_size.max(1);
    let mut shown = 0;
    while shown < table.len() {
        let end = (shown + page_size).min(table.len());
        let page = render_page(table, shown, end)?;
        writeln!(prompter.output(), "{page}")?;
        shown = end;

        if shown >= table.len() {
            break;
        }
        let more = prompter.confirm(&format!(
            "Would you like to see {page_size} more lines of data? (yes/no) "
        ))?;
        if !more {
            break;
        }
    }
    log::debug!("previewed {shown} of {} rows", table.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::data::model::tests::trip;
    use crate::data::model::OptionalColumns;

    fn numbered(n: usize, columns: OptionalColumns) -> TripTable {
        TripTable::new(
            (0..n)
                .map(|i| trip((2017, 1, 2), 8, 60.0, &format!("Station-{i:02}"), "Dock"))
                .collect(),
            columns,
        )
    }

    fn run(table: &TripTable, input: &str) -> String {
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        paginate(&mut prompter, table, 5).unwrap();
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn batch_includes_only_present_optional_columns() {
        let without = page_batch(&numbered(3, OptionalColumns::default()), 0, 5).unwrap();
        assert_eq!(without.num_rows(), 3);
        assert!(without.schema().index_of(GENDER).is_err());
        assert!(without.schema().index_of("weekday").is_ok());

        let with = page_batch(
            &numbered(3, OptionalColumns {
                gender: true,
                birth_year: true,
            }),
            1,
            3,
        )
        .unwrap();
        assert_eq!(with.num_rows(), 2);
        assert!(with.schema().index_of(GENDER).is_ok());
        assert!(with.schema().index_of(BIRTH_YEAR).is_ok());
    }

    #[test]
    fn first_page_is_shown_without_asking() {
        let table = numbered(12, OptionalColumns::default());
        let text = run(&table, "no\n");
        assert!(text.contains("Station-04"));
        assert!(!text.contains("Station-05"));
        assert_eq!(text.matches("Would you like to see 5 more lines").count(), 1);
    }

    #[test]
    fn yes_pages_forward_until_exhausted() {
        let table = numbered(12, OptionalColumns::default());
        let text = run(&table, "yes\nyes\n");
        assert!(text.contains("Station-11"));
        // No question after the final page.
        assert_eq!(text.matches("Would you like to see 5 more lines").count(), 2);
    }

    #[test]
    fn empty_table_prints_nothing() {
        let table = numbered(0, OptionalColumns::default());
        assert_eq!(run(&table, ""), "");
    }
}
