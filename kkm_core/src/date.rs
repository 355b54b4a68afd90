//! Day-first date normalization.

use chrono::NaiveDate;

use crate::DateError;

/// Wire format used by the upstream form.
const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Day comes first in every user-facing format.
const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a user supplied date.
///
/// Accepts `dd/mm/yyyy`, `dd-mm-yyyy` and `dd.mm.yyyy`, plus the canonical
/// `yyyy-mm-dd` so an already normalized value round-trips.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();

    DAY_FIRST_FORMATS
        .iter()
        .chain(std::iter::once(&CANONICAL_FORMAT))
        .filter(|format| has_four_digit_year(trimmed, format))
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| DateError {
            input: input.to_string(),
        })
}

/// chrono's `%Y` takes 1 to 4 digits; the year must be written in full.
fn has_four_digit_year(input: &str, format: &str) -> bool {
    let mut parts = input.split(['/', '-', '.']);
    let year = if format.starts_with("%Y") {
        parts.next()
    } else {
        parts.last()
    };
    year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Parse and render as `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, DateError> {
    parse_date(input).map(format_date)
}
