//! Query model and provider-specific rewriting
//!
//! The embedding application extracts subject/location/count/timeframe
//! from natural language before calling this crate; here the structured
//! query is turned into one rewritten string per provider. Rewriting is
//! a pure function: same input, same rewritten set, no network access.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Routing intent attached to a query by the caller. It decides the
/// provider tier plan, not the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Rated local listings wanted; directory sources first
    LocalBusiness,
    /// Broad research; places and web results wanted together
    Research,
    /// Plain informational search
    General,
}

/// One logical search request. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    raw: String,
    subject: Option<String>,
    location: Option<String>,
    count: Option<usize>,
    timeframe: Option<String>,
    intent: QueryIntent,
}

impl SearchQuery {
    pub fn builder(raw: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder {
            raw: raw.into(),
            subject: None,
            location: None,
            count: None,
            timeframe: None,
            intent: QueryIntent::General,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn timeframe(&self) -> Option<&str> {
        self.timeframe.as_deref()
    }

    pub fn intent(&self) -> QueryIntent {
        self.intent
    }

    /// Whether this query demands results tied to a place. Such queries
    /// require directory/places results to carry an address or rating.
    pub fn is_location_bound(&self) -> bool {
        self.location.is_some() || self.intent == QueryIntent::LocalBusiness
    }
}

/// Builder for [`SearchQuery`]
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    raw: String,
    subject: Option<String>,
    location: Option<String>,
    count: Option<usize>,
    timeframe: Option<String>,
    intent: QueryIntent,
}

impl SearchQueryBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }

    pub fn intent(mut self, intent: QueryIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn build(self) -> SearchQuery {
        SearchQuery {
            raw: self.raw,
            subject: self.subject,
            location: self.location,
            count: self.count,
            timeframe: self.timeframe,
            intent: self.intent,
        }
    }
}

/// Provider-specific query strings produced by [`rewrite`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewrittenQueries {
    /// For the directory provider: cleaned subject terms; the location
    /// travels in a separate request parameter
    pub directory: String,
    /// For the places provider: location-qualified text query
    pub places: String,
    /// For the web provider: cleaned, synonym-broadened query
    pub web: String,
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "did", "do", "for", "from",
        "had", "has", "have", "he", "her", "him", "his", "if", "in", "into", "is", "it",
        "its", "me", "my", "no", "of", "on", "or", "our", "so", "some", "than", "that",
        "the", "their", "them", "then", "these", "they", "this", "to", "up", "was", "will",
        "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

// Interrogatives stay in the query: they carry intent for web search.
static KEEP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["how", "what", "when", "where", "which", "who", "why"]
        .into_iter()
        .collect()
});

// Synonym families appended to the web variant to broaden recall.
const SYNONYMS: &[(&str, &str)] = &[
    ("tutorial", "guide how-to"),
    ("guide", "tutorial how-to"),
    ("learn", "tutorial guide"),
    ("best", "top"),
    ("top", "best"),
    ("compare", "vs comparison"),
    ("vs", "compare comparison"),
    ("review", "rating feedback"),
    ("rating", "review feedback"),
];

/// Lowercase, collapse whitespace, drop stopwords (keeping
/// interrogatives). Preserves original word order.
fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE.replace_all(lowered.trim(), " ");
    collapsed
        .split(' ')
        .filter(|w| !STOPWORDS.contains(w) || KEEP_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into a stopword-free token set for relevance matching.
/// Tokens are lowercased alphanumeric runs of length > 1.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1 && !STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Produce one rewritten query string per provider. Pure and
/// deterministic.
pub fn rewrite(query: &SearchQuery) -> RewrittenQueries {
    let base = query
        .subject()
        .map(clean)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| clean(query.raw()));

    let places = match query.location() {
        Some(location) => format!("{} in {}", base, location),
        None => base.clone(),
    };

    let mut web = base.clone();
    for (word, expansion) in SYNONYMS {
        if base.split(' ').any(|w| w == *word) {
            web.push(' ');
            web.push_str(expansion);
        }
    }
    if let Some(timeframe) = query.timeframe() {
        web.push(' ');
        web.push_str(&timeframe.to_lowercase());
    }

    RewrittenQueries {
        directory: base,
        places,
        web,
    }
}
