use std::io::{self, BufRead, Write};

use crate::report::SEPARATOR;

/// Raw, normalised answers to the three filter questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInput {
    pub city: String,
    pub month: String,
    pub day: String,
}

// ---------------------------------------------------------------------------
// Prompter – question/answer over any reader/writer pair
// ---------------------------------------------------------------------------

/// Owns the session's input and output streams.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for everything that is not a question.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `question` and read one answer, trimmed and lowercased.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    /// `true` only for an explicit "yes".
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.ask(question)?.as_deref() == Some("yes"))
    }

    /// Ask for city, month and day. No validation happens here.
    pub fn collect_filters(&mut self) -> io::Result<Option<FilterInput>> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let Some(city) =
            self.ask("Which city would you like to look at? (Chicago, New York City, or Washington): ")?
        else {
            return Ok(None);
        };
        let Some(month) = self.ask(
            "What month do you want to filter by? (January, February, March, etc... or \"all\"): ",
        )?
        else {
            return Ok(None);
        };
        let Some(day) = self.ask(
            "What day of the week would you like to filter by? (Monday, Tuesday, etc... or \"all\"): ",
        )?
        else {
            return Ok(None);
        };

        writeln!(self.output, "{SEPARATOR}")?;
        log::debug!("filters: city={city:?} month={month:?} day={day:?}");
        Ok(Some(FilterInput { city, month, day }))
    }
}
