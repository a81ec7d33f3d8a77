//! Routing decision between the four terminal branches.

use crate::state::{Category, Sentiment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four mutually exclusive terminal branches of the support graph.
///
/// A closed enum rather than string-keyed dispatch: every router result is
/// a defined branch by construction, so the "undefined branch" failure
/// class cannot occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// Hand off to a human agent.
    Escalate,
    /// Technical response with knowledge retrieval.
    Technical,
    /// Billing response with knowledge retrieval.
    Billing,
    /// General response with knowledge retrieval.
    General,
}

impl Branch {
    /// Stable identifier for logging and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Escalate => "escalate",
            Branch::Technical => "technical_response",
            Branch::Billing => "billing_response",
            Branch::General => "general_response",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the terminal branch for a classified query.
///
/// Pure function of `(sentiment, category)`, first match wins:
///
/// 1. Negative sentiment escalates, regardless of category.
/// 2. Technical category gets the technical branch.
/// 3. Billing category gets the billing branch.
/// 4. Everything else gets the general branch.
pub fn route(sentiment: Sentiment, category: Category) -> Branch {
    if sentiment == Sentiment::Negative {
        return Branch::Escalate;
    }
    match category {
        Category::Technical => Branch::Technical,
        Category::Billing => Branch::Billing,
        Category::General => Branch::General,
    }
}
