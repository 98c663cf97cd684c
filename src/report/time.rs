use std::io::Write;

use anyhow::Result;

use super::{mode, section};
use crate::data::model::{month_name, weekday_name, TripTable};

/// Most frequent travel times. Ties resolve to the lowest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    /// Calendar month, 1–12.
    pub month: u32,
    /// Monday = 1 … Sunday = 7.
    pub weekday: u32,
    /// Start hour, 0–23.
    pub hour: u32,
}

/// `None` for an empty table.
pub fn time_stats(table: &TripTable) -> Option<TimeStats> {
    Some(TimeStats {
        month: mode(table.trips.iter().map(|t| t.month()))?,
        weekday: mode(table.trips.iter().map(|t| t.weekday()))?,
        hour: mode(table.trips.iter().map(|t| t.start_hour()))?,
    })
}

/// Displays statistics on the most frequent times of travel.
pub fn report<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    section(out, "Calculating The Most Frequent Times of Travel...", |out| {
        let Some(stats) = time_stats(table) else {
            writeln!(out, "No trips to analyse.")?;
            return Ok(());
        };
        writeln!(
            out,
            "The most common month is: {}",
            month_name(stats.month).unwrap_or_default()
        )?;
        writeln!(
            out,
            "The most common day of the week is: {}",
            weekday_name(stats.weekday).unwrap_or_default()
        )?;
        writeln!(out, "The most common start hour is: {}:00hrs", stats.hour)?;
        Ok(())
    })
}
