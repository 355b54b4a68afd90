#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use std::sync::Arc;

pub mod date;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod query;
pub mod reply;

pub use date::{format_date, normalize_date, parse_date};
pub use error::{DateError, LookupError, ParseError};
pub use extract::{ExtractedField, Extractor, FieldRule, FieldRules, RuleError, default_rules};
pub use lookup::CardLookup;
pub use query::{COMMAND_SEPARATOR, CardQuery};
pub use reply::assemble;

/// Source of the raw card validity page for a query.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the whole page body. Failures are already mapped to the
    /// user-facing [`LookupError::Transport`].
    async fn fetch(&self, query: &CardQuery) -> Result<Vec<u8>, LookupError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, query: &CardQuery) -> Result<Vec<u8>, LookupError> {
        (**self).fetch(query).await
    }
}
