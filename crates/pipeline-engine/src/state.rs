//! Per-invocation ticket state and the typed updates stages produce.
//!
//! One [`TicketState`] exists per pipeline invocation. It is owned by the
//! executor for the lifetime of that invocation and never shared across
//! concurrent invocations. Stages read it and hand back a [`StateUpdate`];
//! the executor merges updates with set-once semantics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query category assigned by the classification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Billing,
    General,
}

impl Category {
    /// All valid categories, in routing priority order.
    pub const ALL: [Category; 3] = [Category::Technical, Category::Billing, Category::General];

    /// Parse a service-produced label. Returns `None` for anything outside
    /// the three valid labels; the classify stage coerces that to General.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("Technical") {
            Some(Category::Technical)
        } else if label.eq_ignore_ascii_case("Billing") {
            Some(Category::Billing)
        } else if label.eq_ignore_ascii_case("General") {
            Some(Category::General)
        } else {
            None
        }
    }

    /// The canonical label for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Billing => "Billing",
            Category::General => "General",
        }
    }

    /// Lowercase label used as the knowledge-base metadata filter.
    pub fn filter_label(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Billing => "billing",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query sentiment assigned by the sentiment stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All valid sentiments.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Parse a service-produced label. Returns `None` for anything outside
    /// the three valid labels; the sentiment stage coerces that to Neutral.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("Positive") {
            Some(Sentiment::Positive)
        } else if label.eq_ignore_ascii_case("Neutral") {
            Some(Sentiment::Neutral)
        } else if label.eq_ignore_ascii_case("Negative") {
            Some(Sentiment::Negative)
        } else {
            None
        }
    }

    /// The canonical label for this sentiment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque per-conversation token.
///
/// Carried alongside an invocation and returned unchanged; routing and
/// state never consult it. Reserved for session-scoped extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing session token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random session id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The mutable record threaded through one pipeline invocation.
///
/// `query` is set at creation and immutable thereafter. The remaining
/// fields start unset and are filled in, exactly once each, as stages run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketState {
    query: String,
    category: Option<Category>,
    sentiment: Option<Sentiment>,
    response: Option<String>,
}

impl TicketState {
    /// Create a fresh state for one invocation.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            sentiment: None,
            response: None,
        }
    }

    /// The raw customer query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The assigned category, if the classify stage has run.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// The assigned sentiment, if the sentiment stage has run.
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    /// The final response, if a terminal stage has run.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Merge a stage's partial update into this state.
    ///
    /// Each field is set-once: an update targeting an already-set field is
    /// ignored and logged, never applied.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(category) = update.category {
            if self.category.is_some() {
                log::warn!("Ignoring attempt to overwrite category (already {:?})", self.category);
            } else {
                self.category = Some(category);
            }
        }
        if let Some(sentiment) = update.sentiment {
            if self.sentiment.is_some() {
                log::warn!("Ignoring attempt to overwrite sentiment (already {:?})", self.sentiment);
            } else {
                self.sentiment = Some(sentiment);
            }
        }
        if let Some(response) = update.response {
            if self.response.is_some() {
                log::warn!("Ignoring attempt to overwrite response");
            } else {
                self.response = Some(response);
            }
        }
    }
}

/// A partial update produced by one stage.
///
/// Fields left as `None` are untouched on merge.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
    pub response: Option<String>,
}

impl StateUpdate {
    /// An update that changes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// An update setting only the category.
    pub fn with_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// An update setting only the sentiment.
    pub fn with_sentiment(sentiment: Sentiment) -> Self {
        Self {
            sentiment: Some(sentiment),
            ..Self::default()
        }
    }

    /// An update setting only the response text.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("Technical"), Some(Category::Technical));
        assert_eq!(Category::from_label(" billing "), Some(Category::Billing));
        assert_eq!(Category::from_label("GENERAL"), Some(Category::General));
        assert_eq!(Category::from_label("Unknown"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn test_sentiment_from_label() {
        assert_eq!(Sentiment::from_label("Negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("neutral\n"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label("angry"), None);
    }

    #[test]
    fn test_state_starts_unset() {
        let state = TicketState::new("What are your office hours?");
        assert_eq!(state.query(), "What are your office hours?");
        assert!(state.category().is_none());
        assert!(state.sentiment().is_none());
        assert!(state.response().is_none());
    }

    #[test]
    fn test_apply_merges_fields() {
        let mut state = TicketState::new("q");
        state.apply(StateUpdate::with_category(Category::Billing));
        state.apply(StateUpdate::with_sentiment(Sentiment::Neutral));
        state.apply(StateUpdate::with_response("answer"));

        assert_eq!(state.category(), Some(Category::Billing));
        assert_eq!(state.sentiment(), Some(Sentiment::Neutral));
        assert_eq!(state.response(), Some("answer"));
    }

    #[test]
    fn test_fields_are_set_once() {
        let mut state = TicketState::new("q");
        state.apply(StateUpdate::with_response("first"));
        state.apply(StateUpdate::with_response("second"));
        assert_eq!(state.response(), Some("first"));

        state.apply(StateUpdate::with_category(Category::Technical));
        state.apply(StateUpdate::with_category(Category::General));
        assert_eq!(state.category(), Some(Category::Technical));
    }

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");

        let generated = SessionId::generate();
        assert_ne!(generated, SessionId::generate());
    }

    #[test]
    fn test_filter_labels_are_lowercase() {
        for category in Category::ALL {
            assert_eq!(category.filter_label(), category.as_str().to_lowercase());
        }
    }
}
