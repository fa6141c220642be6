//! Grammar stage backed by a rule-based checker.
//!
//! - `languagetool`: HTTP client for a LanguageTool server
//! - `shared`: lazily connected process-wide handle to that client

pub mod languagetool;
pub mod shared;

pub use languagetool::LanguageToolClient;
pub use shared::SharedGrammar;

/// One problem reported by the grammar checker.
///
/// `offset` and `length` count characters (Unicode scalar values) in the
/// text that was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    pub context: String,
    pub replacements: Vec<String>,
    pub offset: usize,
    pub length: usize,
    pub rule_id: Option<String>,
}

impl Issue {
    pub fn new(message: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            message: message.into(),
            context: String::new(),
            replacements: Vec::new(),
            offset,
            length,
            rule_id: None,
        }
    }

    pub fn with_replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// The flagged span of `text`, if it lies inside it.
    /// Character position just past the flagged span, `None` on overflow.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }

    pub fn error_text(&self, text: &str) -> Option<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .get(self.offset..self.end()?)
            .map(|span| span.iter().collect())
    }
}

/// Errors that can occur while talking to the grammar checker
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("Grammar server {url} is unreachable: {details}")]
    Unreachable { url: String, details: String },

    #[error("Grammar server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from grammar server: {details}")]
    InvalidResponse { details: String },

    #[error("Invalid grammar server configuration: {details}")]
    Config { details: String },
}

/// Detects grammar and style issues and applies their suggestions.
#[cfg_attr(test, mockall::automock)]
pub trait GrammarService: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<Issue>, GrammarError>;

    fn apply(&self, text: &str, issues: &[Issue]) -> String {
        apply_issues(text, issues)
    }
}

/// Apply the first replacement of every issue, in order.
///
/// Issues without replacements are ignored. Earlier replacements shift later
/// offsets; an issue whose span no longer holds the text it originally
/// flagged overlaps an earlier one and is skipped.
pub fn apply_issues(text: &str, issues: &[Issue]) -> String {
    let original: Vec<char> = text.chars().collect();
    let mut corrected = original.clone();
    let mut shift: isize = 0;

    for issue in issues {
        let Some(replacement) = issue.replacements.first() else {
            continue;
        };
        let Some(flagged) = issue.end().and_then(|end| original.get(issue.offset..end)) else {
            continue;
        };

        let from = issue.offset as isize + shift;
        if from < 0 {
            continue;
        }
        let from = from as usize;
        let to = from + issue.length;
        if corrected.get(from..to) != Some(flagged) {
            continue;
        }

        let replacement: Vec<char> = replacement.chars().collect();
        shift += replacement.len() as isize - issue.length as isize;
        corrected.splice(from..to, replacement);
    }

    corrected.into_iter().collect()
}
