use chrono::{Datelike, NaiveDateTime, Timelike};

// ---------------------------------------------------------------------------
// Static lookup tables
// ---------------------------------------------------------------------------

/// Month names in calendar order; index `i` is calendar month `i + 1`.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Weekday names starting on Monday; index `i` is weekday number `i + 1`.
pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Upper-case the first character: `"january"` → `"January"`.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-cased name of a 1-based month number.
pub fn month_name(month: u32) -> Option<String> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(idx).map(|m| title_case(m))
}

/// Title-cased name of a 1-based weekday number (Monday = 1).
pub fn weekday_name(weekday: u32) -> Option<String> {
    let idx = usize::try_from(weekday).ok()?.checked_sub(1)?;
    WEEKDAYS.get(idx).map(|d| title_case(d))
}

// ---------------------------------------------------------------------------
// City – the fixed set of supported datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

/// City name (as typed, lowercased) → city.
const CITY_DATA: [(&str, City); 3] = [
    ("chicago", City::Chicago),
    ("new york city", City::NewYorkCity),
    ("washington", City::Washington),
];

impl City {
    /// Look up a normalised (trimmed, lowercased) city name.
    pub fn from_name(name: &str) -> Option<City> {
        CITY_DATA
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, city)| *city)
    }

    /// File stem of the city's data source, without extension.
    pub fn source_stem(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

// ---------------------------------------------------------------------------
// Trip – one row of the source table
// ---------------------------------------------------------------------------

/// A single bike trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Trip duration in seconds.
    pub duration_secs: f64,
    pub start_station: String,
    pub end_station: String,
    /// `None` when the cell was blank.
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
}

impl Trip {
    /// Calendar month of the start time, 1–12.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    /// Day of week of the start time, Monday = 1 … Sunday = 7.
    pub fn weekday(&self) -> u32 {
        self.start_time.weekday().number_from_monday()
    }

    /// Hour of the start time, 0–23.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Key used to count start/end station combinations.
    pub fn station_pair(&self) -> String {
        format!("{} // {}", self.start_station, self.end_station)
    }
}

// ---------------------------------------------------------------------------
// TripTable – the loaded dataset
// ---------------------------------------------------------------------------

/// Which optional columns the source carried.
///
/// Tracked separately from per-row blanks: a column that exists but is empty
/// for every filtered row is still "present".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalColumns {
    pub gender: bool,
    pub birth_year: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    pub trips: Vec<Trip>,
    pub columns: OptionalColumns,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>, columns: OptionalColumns) -> Self {
        TripTable { trips, columns }
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keep only the trips matching `pred`, preserving the column set.
    pub fn retain_where(self, pred: impl Fn(&Trip) -> bool) -> Self {
        let TripTable { trips, columns } = self;
        TripTable {
            trips: trips.into_iter().filter(|t| pred(t)).collect(),
            columns,
        }
    }
}
