use chrono::{Local, NaiveDate};

use crate::{ParseError, date};

/// Tokens of a `/card` command are separated by single spaces.
pub const COMMAND_SEPARATOR: &str = " ";

/// A single card validity request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardQuery {
    client_id: String,
    card_id: String,
    date: NaiveDate,
}

impl CardQuery {
    #[must_use]
    pub fn new(client_id: impl Into<String>, card_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            client_id: client_id.into(),
            card_id: card_id.into(),
            date,
        }
    }

    /// Parse `<keyword> <clientID> <cardID> [date]`, defaulting the date to
    /// today on the local clock.
    pub fn parse(text: &str, separator: &str) -> Result<Self, ParseError> {
        Self::parse_with_today(text, separator, Local::now().date_naive())
    }

    /// Same as [`CardQuery::parse`] with an explicit "today".
    ///
    /// Tokens after the date are ignored.
    pub fn parse_with_today(
        text: &str,
        separator: &str,
        today: NaiveDate,
    ) -> Result<Self, ParseError> {
        let mut tokens = text.split(separator).skip(1);

        let (Some(client_id), Some(card_id)) = (tokens.next(), tokens.next()) else {
            return Err(ParseError::Usage);
        };

        let date = match tokens.next() {
            Some(raw) => date::parse_date(raw)?,
            None => today,
        };

        Ok(Self::new(client_id, card_id, date))
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date as sent upstream, `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        date::format_date(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap_or_default()
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let query = CardQuery::parse_with_today("/card 12345 67890", COMMAND_SEPARATOR, today());
        assert_eq!(query, Ok(CardQuery::new("12345", "67890", today())));
    }

    #[test]
    fn explicit_date_is_normalized() {
        let Ok(query) =
            CardQuery::parse_with_today("/card 12345 67890 01.02.2023", COMMAND_SEPARATOR, today())
        else {
            panic!("query should parse");
        };
        assert_eq!(query.client_id(), "12345");
        assert_eq!(query.card_id(), "67890");
        assert_eq!(query.date_string(), "2023-02-01");
    }

    #[test]
    fn bad_date_is_reported() {
        let result =
            CardQuery::parse_with_today("/card 1 2 01\\02\\2023", COMMAND_SEPARATOR, today());
        let Err(ParseError::Date(err)) = result else {
            panic!("expected a date error, got {result:?}");
        };
        assert_eq!(err.input, "01\\02\\2023");
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(
            CardQuery::parse_with_today("/card 12345", COMMAND_SEPARATOR, today()),
            Err(ParseError::Usage)
        );
        assert_eq!(
            CardQuery::parse_with_today("/card", COMMAND_SEPARATOR, today()),
            Err(ParseError::Usage)
        );
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let query = CardQuery::parse_with_today(
            "/card 1 2 03-04-2025 trailing",
            COMMAND_SEPARATOR,
            today(),
        );
        assert_eq!(
            query.map(|q| q.date_string()),
            Ok("2025-04-03".to_string())
        );
    }

    #[test]
    fn custom_separator() {
        let query = CardQuery::parse_with_today("card;1;2", ";", today());
        assert_eq!(query, Ok(CardQuery::new("1", "2", today())));
    }

    #[test]
    fn parse_uses_local_clock() {
        let before = Local::now().date_naive();
        let Ok(query) = CardQuery::parse("/card 1 2", COMMAND_SEPARATOR) else {
            panic!("query should parse");
        };
        let after = Local::now().date_naive();
        assert!(query.date() == before || query.date() == after);
    }
}
