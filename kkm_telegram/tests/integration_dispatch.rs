//! Integration tests for message routing.
//!
//! These tests verify that:
//! - `/help` and unknown text never reach the upstream page
//! - `/card` replies carry either the assembled fields or one error line

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use kkm_core::{
    CardLookup, CardQuery, FieldRule, FieldRules, LookupError, PageFetcher, default_rules,
};
use kkm_telegram::{Command, SharedLookup, respond};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingPage {
    body: Result<&'static str, LookupError>,
    calls: AtomicUsize,
}

impl CountingPage {
    fn serving(body: &'static str) -> Self {
        Self {
            body: Ok(body),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            body: Err(LookupError::Transport),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for CountingPage {
    async fn fetch(&self, _query: &CardQuery) -> Result<Vec<u8>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body.clone().map(|b| b.as_bytes().to_vec())
    }
}

fn client_number_rule() -> FieldRules {
    let Ok(rules) = FieldRules::compile(&[FieldRule::new("Numer klienta:.+", "Client number: ")])
    else {
        panic!("rule should compile");
    };
    rules
}

#[tokio::test]
async fn test_help_is_static() {
    let lookup = CardLookup::new(CountingPage::failing(), client_number_rule());

    let reply = respond(&lookup, "/help").await;

    assert_eq!(reply, Command::help_text());
    assert!(reply.starts_with("Available commands:"));
    assert_eq!(lookup.fetcher().calls(), 0);
}

#[tokio::test]
async fn test_unknown_command() {
    let lookup = CardLookup::new(CountingPage::serving(""), client_number_rule());

    for text in ["hello", "", "/card 12345", "/card 1 2 yesterday"] {
        let reply = respond(&lookup, text).await;
        assert_eq!(
            reply,
            "Command not found :(\nTo get a list of available commands enter: '/help'"
        );
    }
    assert_eq!(lookup.fetcher().calls(), 0);
}

#[tokio::test]
async fn test_card_success() {
    let lookup = CardLookup::new(
        CountingPage::serving("<b>Numer klienta:12345</b>"),
        client_number_rule(),
    );

    let reply = respond(&lookup, "/card 12345 67890").await;

    assert_eq!(reply, "Client number: 12345");
    assert_eq!(lookup.fetcher().calls(), 1);
}

#[tokio::test]
async fn test_card_without_tickets() {
    let lookup = CardLookup::new(CountingPage::serving("<p>Brak biletów</p>"), client_number_rule());

    let before = Local::now().date_naive();
    let reply = respond(&lookup, "/card 12345 67890").await;
    let after = Local::now().date_naive();

    let expected = |date: NaiveDate| {
        format!(
            "No valid tickets were found for card 67890 and date {}.",
            date.format("%Y-%m-%d")
        )
    };
    assert!(reply == expected(before) || reply == expected(after), "{reply}");
}

#[tokio::test]
async fn test_card_with_bad_date_passes_grammar_but_fails_parsing() {
    let lookup = CardLookup::new(CountingPage::serving(""), client_number_rule());

    let reply = respond(&lookup, "/card 1 2 01\\02\\2023").await;

    assert_eq!(
        reply,
        "Error! Can't parse date 01\\02\\2023. Accepted formats are dd/mm/yyyy | dd.mm.yyyy | dd-mm-yyyy."
    );
    assert_eq!(lookup.fetcher().calls(), 0);
}

#[tokio::test]
async fn test_card_transport_failure() {
    let lookup = CardLookup::new(CountingPage::failing(), client_number_rule());

    let reply = respond(&lookup, "/card 12345 67890 01.02.2023").await;

    assert_eq!(reply, "Error! Request to mpk.krakow.pl was unsuccessful.");
}

#[tokio::test]
async fn test_shared_lookup_with_trait_object() {
    let Ok(rules) = FieldRules::compile(&default_rules()) else {
        panic!("default rules should compile");
    };
    let fetcher: Arc<dyn PageFetcher> = Arc::new(CountingPage::failing());
    let lookup: SharedLookup = Arc::new(CardLookup::new(fetcher, rules));

    let reply = respond(&*lookup, "/card 1 2").await;

    assert_eq!(reply, "Error! Request to mpk.krakow.pl was unsuccessful.");
}
