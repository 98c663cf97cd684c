use std::io::Write;

use anyhow::Result;
use chrono::TimeDelta;

use super::section;
use crate::data::model::TripTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub total_secs: f64,
    pub mean_minutes: f64,
}

/// `None` for an empty table.
pub fn duration_stats(table: &TripTable) -> Option<DurationStats> {
    if table.is_empty() {
        return None;
    }
    let total_secs: f64 = table.trips.iter().map(|t| t.duration_secs).sum();
    let total_minutes = total_secs / 60.0;
    Some(DurationStats {
        total_secs,
        mean_minutes: total_minutes / table.len() as f64,
    })
}

const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

/// Format seconds as `<d> days HH:MM:SS[.ffffff]`.
///
/// Negative spans keep the sign on the day count only and show the
/// time-of-day part as a positive offset: `-90.0` → `-1 days +23:58:30`.
pub fn format_span(secs: f64) -> String {
    let total_us = (secs * 1_000_000.0).round() as i64;
    let days = total_us.div_euclid(MICROS_PER_DAY);
    let rest = TimeDelta::microseconds(total_us.rem_euclid(MICROS_PER_DAY));

    let hours = rest.num_hours();
    let minutes = rest.num_minutes() - hours * 60;
    let seconds = rest.num_seconds() - rest.num_minutes() * 60;
    let micros = rest.num_microseconds().unwrap_or(0) - rest.num_seconds() * 1_000_000;

    let sign = if days < 0 { "+" } else { "" };
    let mut out = format!("{days} days {sign}{hours:02}:{minutes:02}:{seconds:02}");
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

/// Displays statistics on the total and average trip duration.
pub fn report<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    section(out, "Calculating Trip Duration...", |out| {
        let Some(stats) = duration_stats(table) else {
            writeln!(out, "No trips to analyse.")?;
            return Ok(());
        };
        writeln!(
            out,
            "The total time traveled during this period was: {}",
            format_span(stats.total_secs)
        )?;
        writeln!(
            out,
            "The average trip length was: {:.2} minutes",
            stats.mean_minutes
        )?;
        Ok(())
    })
}
