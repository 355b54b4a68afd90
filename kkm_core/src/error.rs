//! User-facing failures of a card lookup.
//!
//! Every variant renders (via `Display`) as the exact line sent back to the
//! user, so handlers never build error text themselves.

use thiserror::Error;

/// A date token that matched none of the accepted formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Error! Can't parse date {input}. Accepted formats are dd/mm/yyyy | dd.mm.yyyy | dd-mm-yyyy."
)]
pub struct DateError {
    pub input: String,
}

/// Failure while turning command text into a [`crate::CardQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Error! Usage: /card <clientID> <cardID> [date dd/mm/yyyy]")]
    Usage,

    #[error(transparent)]
    Date(#[from] DateError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Error! Request to mpk.krakow.pl was unsuccessful.")]
    Transport,

    #[error("No valid tickets were found for card {card_id} and date {date}.")]
    NoTickets { card_id: String, date: String },

    #[error("Error! Can't parse results from mpk.krakow.pl.")]
    Malformed,
}

impl From<DateError> for LookupError {
    fn from(err: DateError) -> Self {
        Self::Parse(ParseError::Date(err))
    }
}
