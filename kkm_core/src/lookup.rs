//! The card lookup pipeline: parse, fetch, extract, assemble.

use tracing::{info, warn};

use crate::{
    COMMAND_SEPARATOR, CardQuery, Extractor, FieldRules, LookupError, PageFetcher, assemble,
};

/// Runs a command or query through fetching and extraction.
pub struct CardLookup<F, E = FieldRules> {
    fetcher: F,
    extractor: E,
}

impl<F, E> CardLookup<F, E>
where
    F: PageFetcher,
    E: Extractor,
{
    #[must_use]
    pub const fn new(fetcher: F, extractor: E) -> Self {
        Self { fetcher, extractor }
    }

    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch the page for `query` and assemble the reply text.
    pub async fn lookup(&self, query: &CardQuery) -> Result<String, LookupError> {
        info!(
            "Looking up card {} for client {} on {}",
            query.card_id(),
            query.client_id(),
            query.date_string()
        );

        let page = self.fetcher.fetch(query).await?;
        let fields = self.extractor.extract(&page, query)?;

        Ok(assemble(&fields))
    }

    /// Parse raw `/card ...` text and look it up.
    pub async fn run_command(&self, text: &str) -> Result<String, LookupError> {
        let query = CardQuery::parse(text, COMMAND_SEPARATOR)?;
        self.lookup(&query).await
    }

    /// Like [`CardLookup::run_command`], with failures rendered as the
    /// user-facing line.
    pub async fn reply_for(&self, text: &str) -> String {
        match self.run_command(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Lookup for {text:?} failed: {e}");
                e.to_string()
            }
        }
    }
}
