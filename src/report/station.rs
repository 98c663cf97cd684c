use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;

use super::{mode, section};
use crate::data::model::{Trip, TripTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    /// Every `"start // end"` pair sharing the highest count, in order of
    /// first appearance.
    pub top_pairs: Vec<String>,
    pub top_pair_count: usize,
}

/// `None` for an empty table.
pub fn station_stats(table: &TripTable) -> Option<StationStats> {
    let start_station = mode(table.trips.iter().map(|t| t.start_station.as_str()))?;
    let end_station = mode(table.trips.iter().map(|t| t.end_station.as_str()))?;
    let (top_pairs, top_pair_count) = most_common_pairs(&table.trips);
    Some(StationStats {
        start_station: start_station.to_string(),
        end_station: end_station.to_string(),
        top_pairs,
        top_pair_count,
    })
}

/// All start/end combinations tied at the maximum frequency.
pub fn most_common_pairs(trips: &[Trip]) -> (Vec<String>, usize) {
    let mut freq: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for trip in trips {
        let key = trip.station_pair();
        match freq.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                freq.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    let max = freq.values().copied().max().unwrap_or(0);
    let top = order
        .into_iter()
        .filter(|key| freq.get(key) == Some(&max))
        .collect();
    (top, max)
}

/// Render names as a bracketed, quoted list: `['A // B', 'C // D']`.
fn list_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|s| {
            if s.contains('\'') && !s.contains('"') {
                format!("\"{s}\"")
            } else {
                format!("'{}'", s.replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Displays statistics on the most popular stations and trip.
pub fn report<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    section(out, "Calculating The Most Popular Stations and Trip...", |out| {
        let Some(stats) = station_stats(table) else {
            writeln!(out, "No trips to analyse.")?;
            return Ok(());
        };
        writeln!(out, "The most common start station is {}.", stats.start_station)?;
        writeln!(out, "The most common end station is {}.", stats.end_station)?;
        writeln!(
            out,
            "The most common combination of start and end stations are:\n    {}",
            list_literal(&stats.top_pairs)
        )?;
        log::debug!(
            "{} station pair(s) tied at {} trips",
            stats.top_pairs.len(),
            stats.top_pair_count
        );
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::trip;
    use crate::data::model::OptionalColumns;

    fn table(pairs: &[(&str, &str)]) -> TripTable {
        TripTable::new(
            pairs
                .iter()
                .map(|(s, e)| trip((2017, 1, 2), 8, 60.0, s, e))
                .collect(),
            OptionalColumns::default(),
        )
    }

    #[test]
    fn tied_pairs_are_all_reported() {
        let mut pairs = vec![("A", "B"); 6];
        pairs.extend(vec![("C", "D"); 6]);
        pairs.push(("E", "F"));
        let t = table(&pairs);

        let (top, count) = most_common_pairs(&t.trips);
        assert_eq!(top, vec!["A // B".to_string(), "C // D".to_string()]);
        assert_eq!(count, 6);

        let mut out = Vec::new();
        report(&t, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "The most common combination of start and end stations are:\n    ['A // B', 'C // D']\n"
        ));
    }

    #[test]
    fn single_winner_stations() {
        let t = table(&[("Canal St", "Clark St"), ("Canal St", "Wells St"), ("Wells St", "Wells St")]);
        let stats = station_stats(&t).unwrap();
        assert_eq!(stats.start_station, "Canal St");
        assert_eq!(stats.end_station, "Wells St");
        assert_eq!(stats.top_pairs.len(), 3);
        assert_eq!(stats.top_pair_count, 1);
    }

    #[test]
    fn start_station_ties_go_to_lowest_name() {
        let t = table(&[("Zeta", "X"), ("Alpha", "Y")]);
        assert_eq!(station_stats(&t).unwrap().start_station, "Alpha");
    }

    #[test]
    fn list_literal_quotes_like_a_list() {
        assert_eq!(list_literal(&[]), "[]");
        assert_eq!(
            list_literal(&["Children's Museum // Park".to_string()]),
            "[\"Children's Museum // Park\"]"
        );
    }
}
