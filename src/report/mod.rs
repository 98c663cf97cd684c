//! Statistics reporters.
//!
//! Each reporter is a stateless pair: a pure `*_stats` function computing the
//! figures from a [`TripTable`], and a `report` function printing them in a
//! timed section. All four run in a fixed order via [`report_all`].

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use anyhow::Result;

use crate::data::model::TripTable;

pub mod duration;
pub mod station;
pub mod time;
pub mod user;

/// Printed after every major phase.
pub const SEPARATOR: &str = "----------------------------------------";

/// Time, station, duration, then user statistics.
pub fn report_all<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    time::report(table, out)?;
    station::report(table, out)?;
    duration::report(table, out)?;
    user::report(table, out)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Count occurrences, most frequent first; equal counts are ordered by value.
pub fn value_counts<T: Ord>(values: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut counts: Vec<(T, usize)> = counts.into_iter().collect();
    // Stable sort keeps the ascending value order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value; ties go to the lowest value.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    value_counts(values).into_iter().next().map(|(v, _)| v)
}

/// Print `heading`, run `body`, then the elapsed time and a separator.
fn section<W: Write>(
    out: &mut W,
    heading: &str,
    body: impl FnOnce(&mut W) -> Result<()>,
) -> Result<()> {
    writeln!(out, "\n{heading}\n")?;
    let started = Instant::now();
    body(out)?;
    let elapsed = started.elapsed().as_secs_f64();
    log::debug!("{heading} took {elapsed:.6}s");
    writeln!(out, "\nThis took {elapsed} seconds.")?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// Print a value-count table with names left-aligned in one column.
fn write_counts<W: Write>(out: &mut W, counts: &[(String, usize)]) -> Result<()> {
    let width = counts
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (name, count) in counts {
        writeln!(out, "    {name:<width$}    {count}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_orders_by_count_then_value() {
        let counts = value_counts(["b", "a", "c", "b", "c", "d"]);
        assert_eq!(counts, vec![("b", 2), ("c", 2), ("a", 1), ("d", 1)]);
    }

    #[test]
    fn mode_breaks_ties_to_lowest() {
        assert_eq!(mode([7, 3, 7, 3, 9]), Some(3));
        assert_eq!(mode([5, 6, 6]), Some(6));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn count_table_aligns_non_ascii_names() {
        let counts = vec![("Café Éclair".to_string(), 3), ("Dock".to_string(), 1)];
        let mut out = Vec::new();
        write_counts(&mut out, &counts).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "    Café Éclair    3\n    Dock           1\n");
    }

    #[test]
    fn separator_is_forty_dashes() {
        assert_eq!(SEPARATOR.len(), 40);
        assert!(SEPARATOR.chars().all(|c| c == '-'));
    }

    #[test]
    fn section_wraps_body_with_timing() {
        let mut out = Vec::new();
        section(&mut out, "Calculating Things...", |out| {
            writeln!(out, "body line")?;
            Ok(())
        })
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nCalculating Things...\n\nbody line\n"));
        assert!(text.contains("\nThis took "));
        assert!(text.ends_with(&format!("{SEPARATOR}\n")));
    }
}
