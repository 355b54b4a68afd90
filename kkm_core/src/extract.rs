//! Labeled field extraction from the raw validity page.
//!
//! The page has no stable structure, so each field is located by a regex over
//! the raw bytes and relabeled. The [`Extractor`] trait keeps the matching
//! strategy replaceable.

use std::fmt;

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CardQuery, LookupError};

/// One scrapeable attribute: where to find it and what to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Regex matched against the raw page.
    pub pattern: String,

    /// Replaces everything up to the first `:` of the match.
    pub label: String,
}

impl FieldRule {
    #[must_use]
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Fields shown for a KKM card, in reply order.
#[must_use]
pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("Numer klienta:.+", "Client number: "),
        FieldRule::new("Numer karty KKM:.+", "KKM card number: "),
        FieldRule::new("Cena:.+", "Price: "),
        FieldRule::new("Data początku ważności:.+", "Valid from: "),
        FieldRule::new("Data końca ważności:.+", "Valid till: "),
        FieldRule::new("Data zwrotu:.+", "Return date: "),
        FieldRule::new("Linie miejskie:.+", "City lines: "),
        FieldRule::new("Linie strefowe:.+", "Zone lines: "),
    ]
}

/// A single relabeled line, e.g. `Client number: 12345`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField(String);

impl ExtractedField {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls the ordered list of fields out of a page.
pub trait Extractor: Send + Sync {
    /// All-or-nothing: either every field is found or an error is returned.
    fn extract(&self, page: &[u8], query: &CardQuery) -> Result<Vec<ExtractedField>, LookupError>;
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid field pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no field rules configured")]
    Empty,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    label: String,
}

/// Field rules compiled once at startup.
#[derive(Debug, Clone)]
pub struct FieldRules {
    rules: Vec<CompiledRule>,
}

impl FieldRules {
    pub fn compile(rules: &[FieldRule]) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::Empty);
        }

        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| CompiledRule {
                        regex,
                        label: rule.label.clone(),
                    })
                    .map_err(|source| RuleError::Pattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Extractor for FieldRules {
    fn extract(&self, page: &[u8], query: &CardQuery) -> Result<Vec<ExtractedField>, LookupError> {
        let mut fields = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let Some(found) = rule.regex.find(page) else {
                tracing::debug!("No match for field {:?}", rule.label);
                return Err(LookupError::NoTickets {
                    card_id: query.card_id().to_string(),
                    date: query.date_string(),
                });
            };

            let text = strip_markup(&String::from_utf8_lossy(found.as_bytes()));
            fields.push(relabel(&text, &rule.label));
        }

        Ok(fields)
    }
}

/// Replace the text before the first `:` with `label`; the rest is kept as is.
///
/// Text without a `:` is replaced by the label entirely.
#[must_use]
pub fn relabel(text: &str, label: &str) -> ExtractedField {
    let value = text.split_once(':').map_or("", |(_, value)| value);
    ExtractedField(format!("{label}{value}"))
}

/// Drop markup tags and decode the common entities, leaving plain text.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    decode_entities(out.trim_end())
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
