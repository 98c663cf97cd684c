use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::data::loader::load_data;
use crate::data::model::City;
use crate::preview::paginate;
use crate::prompt::{FilterInput, Prompter};
use crate::report::{report_all, SEPARATOR};

// ---------------------------------------------------------------------------
// Session driver
// ---------------------------------------------------------------------------

/// Settings that stay fixed for the whole session.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub page_size: usize,
}

/// Prompt → load/filter → preview → report, repeated until the user stops.
pub struct Session<R, W> {
    config: Config,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Self {
            config,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run iterations until the user declines to restart or input ends.
    pub fn run(&mut self) -> Result<()> {
        let mut iterations = 0usize;
        loop {
            let Some(input) = self.prompter.collect_filters()? else {
                break;
            };
            iterations += 1;
            self.run_iteration(&input)?;

            if !self
                .prompter
                .confirm("\nWould you like to restart? Enter yes or no.\n")?
            {
                break;
            }
        }
        log::info!("session finished after {iterations} iteration(s)");
        Ok(())
    }

    /// One pass over the data. Bad city names and load failures are reported
    /// and end the pass early; only I/O errors on the terminal propagate.
    fn run_iteration(&mut self, input: &FilterInput) -> Result<()> {
        let Some(city) = City::from_name(&input.city) else {
            log::warn!("unknown city '{}'", input.city);
            writeln!(self.prompter.output(), "You entered an invalid city name.\n")?;
            return Ok(());
        };

        let (table, notices) =
            match load_data(&self.config.data_dir, city, &input.month, &input.day) {
                Ok(loaded) => loaded,
                Err(err) => {
                    log::error!("{err:#}");
                    writeln!(self.prompter.output(), "Could not load data: {err:#}\n")?;
                    return Ok(());
                }
            };

        let out = self.prompter.output();
        for notice in &notices {
            writeln!(out, "{notice}")?;
        }
        writeln!(out, "{SEPARATOR}")?;

        if table.is_empty() {
            writeln!(out, "No trips match the selected filters.")?;
            return Ok(());
        }

        paginate(&mut self.prompter, &table, self.config.page_size)?;
        report_all(&table, self.prompter.output())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use super::*;

    const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St,Damen Ave,Subscriber,Male,1992.0
2,2017-06-25 18:19:03,2017-06-25 18:45:53,1610,Lake Shore,Damen Ave,Customer,Female,1985.0
3,2017-01-04 08:27:49,2017-01-04 08:34:45,416,Wood St,Damen Ave,Subscriber,,
";

    const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1,2017-06-21 08:36:34,2017-06-21 08:44:43,60,14th & Belmont St NW,15th & K St NW,Subscriber
2,2017-06-22 08:36:34,2017-06-22 08:44:43,120,15th & K St NW,14th & Belmont St NW,Customer
3,2017-06-23 08:36:34,2017-06-23 08:44:43,180,14th & Belmont St NW,15th & K St NW,Subscriber
";

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chicago.csv"), CHICAGO_CSV).unwrap();
        std::fs::write(dir.path().join("washington.csv"), WASHINGTON_CSV).unwrap();
        dir
    }

    fn run(dir: &Path, input: &str) -> String {
        let config = Config {
            data_dir: dir.to_path_buf(),
            page_size: 5,
        };
        let mut session = Session::new(config, Cursor::new(input.as_bytes().to_vec()), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn full_pass_prints_every_report_in_order() {
        let dir = data_dir();
        let text = run(dir.path(), "Chicago\nall\nall\nno\n");

        let order = [
            "Calculating The Most Frequent Times of Travel...",
            "Calculating The Most Popular Stations and Trip...",
            "Calculating Trip Duration...",
            "Calculating User Stats...",
            "Would you like to restart?",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(text.contains("The most common month is: June\n"));
        assert!(text.contains("The most common start station is Wood St.\n"));
        assert!(text.contains("['Wood St // Damen Ave']"));
        assert!(text.contains("The earliest year of birth for riders during this period is: 1985\n"));
    }

    #[test]
    fn invalid_city_skips_to_restart_prompt() {
        let dir = data_dir();
        let text = run(dir.path(), "gotham\nall\nall\nno\n");
        assert!(text.contains("You entered an invalid city name.\n"));
        assert!(!text.contains("Calculating"));
        assert!(text.contains("Would you like to restart?"));
    }

    #[test]
    fn restart_runs_another_iteration() {
        let dir = data_dir();
        let text = run(
            dir.path(),
            "boston\nall\nall\nYes\n  Washington \njune\nfunday\nno\n",
        );
        assert_eq!(text.matches("Hello! Let's explore").count(), 2);
        assert!(text.contains("Filtering by month: June\n"));
        assert!(text.contains(
            "You entered an invalid day of the week, continuing without filtering.\n"
        ));
        assert!(text.contains("The average trip length was: 2.00 minutes\n"));
        assert!(text.contains("There is no gender data for this city\n"));
        assert!(text.contains("There is no birth year data for this city\n"));
    }

    #[test]
    fn empty_filter_result_skips_reports() {
        let dir = data_dir();
        let text = run(dir.path(), "chicago\nmarch\nall\nno\n");
        assert!(text.contains("Filtering by month: March\n"));
        assert!(text.contains("No trips match the selected filters.\n"));
        assert!(!text.contains("Calculating"));
    }

    #[test]
    fn missing_source_is_reported_not_fatal() {
        let dir = data_dir();
        let text = run(dir.path(), "new york city\nall\nall\nno\n");
        assert!(text.contains("Could not load data: no data file for New York City"));
    }

    #[test]
    fn closed_input_ends_session() {
        let dir = data_dir();
        let text = run(dir.path(), "");
        assert!(text.starts_with("Hello! Let's explore some US bikeshare data!\n"));
        assert!(!text.contains("Would you like to restart?"));
    }
}
