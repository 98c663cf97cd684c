use super::model::{title_case, TripTable, MONTHS, WEEKDAYS};

// ---------------------------------------------------------------------------
// Name resolution: user input → list index
// ---------------------------------------------------------------------------

/// Outcome of resolving a month or weekday answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `"all"`: no filtering on this field.
    All,
    /// Zero-based index into [`MONTHS`] / [`WEEKDAYS`].
    Index(usize),
    /// Unrecognised name; treated like [`Selection::All`].
    Unknown(String),
}

fn resolve(name: &str, names: &[&str]) -> Selection {
    if name == "all" {
        return Selection::All;
    }
    match names.iter().position(|n| *n == name) {
        Some(idx) => Selection::Index(idx),
        None => Selection::Unknown(name.to_string()),
    }
}

/// Resolve a normalised month answer.
pub fn resolve_month(name: &str) -> Selection {
    resolve(name, &MONTHS)
}

/// Resolve a normalised weekday answer.
pub fn resolve_weekday(name: &str) -> Selection {
    resolve(name, &WEEKDAYS)
}

// ---------------------------------------------------------------------------
// Applying the selections
// ---------------------------------------------------------------------------

/// Human-readable line describing what happened to one filter.
pub type FilterNotice = String;

/// Apply month then weekday filters.
///
/// A selected index `i` keeps trips whose derived field equals `i + 1`
/// (months are 1–12, weekdays Monday = 1 … Sunday = 7). Unknown names leave the
/// table untouched. Returns the filtered table and one notice per filter that
/// was not `"all"`, in the order they were applied.
pub fn apply_filters(
    table: TripTable,
    month: &Selection,
    weekday: &Selection,
) -> (TripTable, Vec<FilterNotice>) {
    let mut notices = Vec::new();
    let mut table = table;

    match month {
        Selection::All => {}
        Selection::Index(idx) => {
            let wanted = *idx as u32 + 1;
            table = table.retain_where(|t| t.month() == wanted);
            notices.push(format!("Filtering by month: {}", title_case(MONTHS[*idx])));
        }
        Selection::Unknown(name) => {
            log::warn!("unknown month '{name}', month filter skipped");
            notices.push("You entered an invalid month, continuing without filtering.".to_string());
        }
    }

    match weekday {
        Selection::All => {}
        Selection::Index(idx) => {
            let wanted = *idx as u32 + 1;
            table = table.retain_where(|t| t.weekday() == wanted);
            notices.push(format!("Filtering by weekday: {}", title_case(WEEKDAYS[*idx])));
        }
        Selection::Unknown(name) => {
            log::warn!("unknown weekday '{name}', weekday filter skipped");
            notices.push(
                "You entered an invalid day of the week, continuing without filtering.".to_string(),
            );
        }
    }

    log::debug!("{} trips after filtering", table.len());
    (table, notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::trip;
    use crate::data::model::OptionalColumns;

    fn sample() -> TripTable {
        TripTable::new(
            vec![
                trip((2017, 1, 2), 8, 60.0, "A", "B"),  // Jan, Monday
                trip((2017, 1, 3), 9, 60.0, "A", "C"),  // Jan, Tuesday
                trip((2017, 2, 6), 10, 60.0, "B", "C"), // Feb, Monday
                trip((2017, 3, 5), 17, 60.0, "C", "A"), // Mar, Sunday
            ],
            OptionalColumns::default(),
        )
    }

    #[test]
    fn resolves_names_and_all() {
        assert_eq!(resolve_month("all"), Selection::All);
        assert_eq!(resolve_month("march"), Selection::Index(2));
        assert_eq!(resolve_weekday("sunday"), Selection::Index(6));
        assert_eq!(
            resolve_month("smarch"),
            Selection::Unknown("smarch".to_string())
        );
    }

    #[test]
    fn all_and_all_is_identity() {
        let (filtered, notices) = apply_filters(sample(), &Selection::All, &Selection::All);
        assert_eq!(filtered, sample());
        assert!(notices.is_empty());
    }

    #[test]
    fn month_filter_keeps_index_plus_one() {
        let (filtered, notices) =
            apply_filters(sample(), &resolve_month("january"), &Selection::All);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.trips.iter().all(|t| t.month() == 1));
        assert_eq!(notices, vec!["Filtering by month: January".to_string()]);
    }

    #[test]
    fn weekday_filter_matches_calendar_day() {
        let (filtered, notices) =
            apply_filters(sample(), &Selection::All, &resolve_weekday("monday"));
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .trips
            .iter()
            .all(|t| t.start_time.format("%A").to_string() == "Monday"));
        assert_eq!(notices, vec!["Filtering by weekday: Monday".to_string()]);
    }

    #[test]
    fn invalid_month_falls_back_to_day_only() {
        let day = resolve_weekday("monday");
        let (with_bad_month, notices) =
            apply_filters(sample(), &resolve_month("smarch"), &day);
        let (day_only, _) = apply_filters(sample(), &Selection::All, &day);
        assert_eq!(with_bad_month, day_only);
        assert_eq!(
            notices[0],
            "You entered an invalid month, continuing without filtering."
        );
    }

    #[test]
    fn invalid_day_is_reported_and_ignored() {
        let (filtered, notices) =
            apply_filters(sample(), &Selection::All, &resolve_weekday("funday"));
        assert_eq!(filtered.len(), 4);
        assert_eq!(
            notices,
            vec!["You entered an invalid day of the week, continuing without filtering.".to_string()]
        );
    }

    #[test]
    fn combined_filters_can_empty_the_table() {
        let (filtered, _) = apply_filters(
            sample(),
            &resolve_month("february"),
            &resolve_weekday("sunday"),
        );
        assert!(filtered.is_empty());
    }
}
