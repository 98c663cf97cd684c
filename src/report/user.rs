use std::io::Write;

use anyhow::Result;

use super::{mode, section, value_counts, write_counts};
use crate::data::model::TripTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYears {
    pub earliest: i64,
    pub latest: i64,
    pub most_common: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    /// `None` when the source has no gender column.
    pub genders: Option<Vec<(String, usize)>>,
    /// `None` when the source has no birth-year column or no row carries one.
    pub birth_years: Option<BirthYears>,
}

pub fn user_stats(table: &TripTable) -> UserStats {
    let user_types = owned(value_counts(
        table.trips.iter().filter_map(|t| t.user_type.as_deref()),
    ));

    let genders = table.columns.gender.then(|| {
        owned(value_counts(
            table.trips.iter().filter_map(|t| t.gender.as_deref()),
        ))
    });

    let birth_years = if table.columns.birth_year {
        let years: Vec<i64> = table
            .trips
            .iter()
            .filter_map(|t| t.birth_year)
            .filter(|y| y.is_finite())
            .map(|y| y.trunc() as i64)
            .collect();
        match (years.iter().min(), years.iter().max(), mode(years.iter().copied())) {
            (Some(&earliest), Some(&latest), Some(most_common)) => Some(BirthYears {
                earliest,
                latest,
                most_common,
            }),
            _ => None,
        }
    } else {
        None
    };

    UserStats {
        user_types,
        genders,
        birth_years,
    }
}

fn owned(counts: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect()
}

/// Displays statistics on bikeshare users.
pub fn report<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    section(out, "Calculating User Stats...", |out| {
        let stats = user_stats(table);

        writeln!(
            out,
            "This is the breakdown of users and subscribers for this period:"
        )?;
        write_counts(out, &stats.user_types)?;
        writeln!(out)?;

        match &stats.genders {
            Some(genders) => {
                writeln!(
                    out,
                    "This is the breakdown male and female riders for this period:"
                )?;
                write_counts(out, genders)?;
                writeln!(out)?;
            }
            None => writeln!(out, "There is no gender data for this city")?,
        }

        match stats.birth_years {
            Some(years) => {
                writeln!(
                    out,
                    "The earliest year of birth for riders during this period is: {}",
                    years.earliest
                )?;
                writeln!(
                    out,
                    "The latest year of birth for riders during this period is: {}",
                    years.latest
                )?;
                writeln!(
                    out,
                    "The most common year of birth for riders during this period is: {}",
                    years.most_common
                )?;
            }
            None => writeln!(out, "There is no birth year data for this city")?,
        }
        Ok(())
    })
}
