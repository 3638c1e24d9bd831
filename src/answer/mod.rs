//! Generative answer service
//!
//! The browser treats the answer service as opaque I/O: one query in, one
//! structured [`Answer`] (or an error message) out, no retries.

mod gemini;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiAnswerService};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::Result;

/// Heading the service is asked to put its related-search list under
pub const RELATED_SEARCHES_HEADING: &str = "### Related Searches";

/// A cited web source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Structured answer for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Markdown-formatted answer body
    pub text: String,
    /// Cited sources in service order
    pub sources: Vec<Source>,
    /// Follow-up queries offered under the answer
    pub related_searches: Vec<String>,
}

/// Something that turns a free-text query into an [`Answer`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Resolve a query; called at most once per search
    async fn answer(&self, query: &str) -> Result<Answer>;
}

/// Stand-in used when no API key is configured; every query fails with the
/// configured reason
#[derive(Debug, Clone)]
pub struct UnavailableAnswerService {
    reason: String,
}

impl UnavailableAnswerService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AnswerService for UnavailableAnswerService {
    async fn answer(&self, _query: &str) -> Result<Answer> {
        Err(crate::utils::AnswerError::Config(self.reason.clone()))
    }
}

/// Split raw answer text into the answer body and the related-search list.
///
/// Without the heading the raw text is the whole answer. Related entries are
/// the bullet lines (`* ` or `- `) following the heading.
pub fn parse_answer_text(raw: &str) -> (String, Vec<String>) {
    let Some((body, tail)) = raw.split_once(RELATED_SEARCHES_HEADING) else {
        return (raw.to_string(), Vec::new());
    };

    // Only the section up to a repeated heading counts.
    let section = tail.split(RELATED_SEARCHES_HEADING).next().unwrap_or("");
    let related = section
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix("- "))
                .map(str::trim)
        })
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();

    (body.trim().to_string(), related)
}
