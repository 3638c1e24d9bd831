//! Omnibox input interpretation: URL or search, plus autocomplete

use url::Url;

use crate::utils::{AnswerError, Result};

/// Canned autocomplete entries offered while typing
pub const AUTOCOMPLETE_SUGGESTIONS: &[&str] = &[
    "how does the rust borrow checker work",
    "how to make sourdough bread",
    "how far is the moon",
    "what is quantum computing",
    "what is the capital of australia",
    "weather this weekend",
    "best hiking trails near me",
    "latest news in space exploration",
    "learn rust programming",
    "history of the internet",
];

/// What submitting the omnibox should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmniboxAction {
    Navigate(String),
    Search(String),
}

/// Decide what a submitted input means. Blank input does nothing; a single
/// dotted word is a URL; anything else is a search query.
pub fn classify(input: &str) -> Option<OmniboxAction> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }
    if looks_like_url(value) {
        Some(OmniboxAction::Navigate(value.to_string()))
    } else {
        Some(OmniboxAction::Search(value.to_string()))
    }
}

pub fn looks_like_url(value: &str) -> bool {
    value.contains('.') && !value.contains(' ')
}

/// A navigation target after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub url: String,
    pub hostname: String,
}

/// Prefix a scheme when missing and parse the result
pub fn normalize_url(input: &str) -> Result<NavigationTarget> {
    let full = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let parsed = Url::parse(&full).map_err(|e| AnswerError::InvalidUrl(format!("{}: {}", full, e)))?;
    let hostname = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AnswerError::InvalidUrl(full.clone()))?
        .to_string();

    Ok(NavigationTarget { url: full, hostname })
}

/// Autocomplete entries extending `input`, excluding an exact match
pub fn suggestions(input: &str) -> Vec<&'static str> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    AUTOCOMPLETE_SUGGESTIONS
        .iter()
        .copied()
        .filter(|s| {
            let candidate = s.to_lowercase();
            candidate.starts_with(&needle) && candidate != needle
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), None);
        assert_eq!(
            classify(" example.com "),
            Some(OmniboxAction::Navigate("example.com".into()))
        );
        assert_eq!(
            classify("what is rust"),
            Some(OmniboxAction::Search("what is rust".into()))
        );
        assert_eq!(
            classify("rust 1.85 release"),
            Some(OmniboxAction::Search("rust 1.85 release".into()))
        );
        assert_eq!(classify("rust"), Some(OmniboxAction::Search("rust".into())));
    }

    #[test]
    fn test_normalize_adds_scheme() {
        let target = normalize_url("example.com/path").unwrap();
        assert_eq!(target.url, "https://example.com/path");
        assert_eq!(target.hostname, "example.com");

        let target = normalize_url("http://news.ycombinator.com").unwrap();
        assert_eq!(target.url, "http://news.ycombinator.com");
        assert_eq!(target.hostname, "news.ycombinator.com");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_url("exa[mple.com"),
            Err(AnswerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_suggestions_prefix_case_insensitive() {
        let found = suggestions("HOW");
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|s| s.starts_with("how")));

        assert!(suggestions("").is_empty());
        assert!(suggestions("learn rust programming").is_empty());
    }
}
