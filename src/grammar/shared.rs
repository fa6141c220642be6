use once_cell::sync::OnceCell;
use tracing::info;

use super::{GrammarError, GrammarService, Issue, LanguageToolClient};

/// Process-wide handle to the grammar server.
///
/// The connection is made on first use and reused by every later call until
/// the handle is dropped at process exit. A failed connection leaves the cell
/// empty, so the next call tries again instead of caching the error.
/// `OnceCell` serializes initialization; afterwards callers share the
/// `Send + Sync` client without locking.
#[derive(Debug)]
pub struct SharedGrammar {
    server_url: String,
    language: String,
    client: OnceCell<LanguageToolClient>,
}

impl SharedGrammar {
    pub fn new(server_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            language: language.into(),
            client: OnceCell::new(),
        }
    }

    /// Connected client, connecting now if nobody has yet.
    pub fn client(&self) -> Result<&LanguageToolClient, GrammarError> {
        self.client.get_or_try_init(|| {
            info!("🔌 Connecting to LanguageTool at {}", self.server_url);
            LanguageToolClient::connect(&self.server_url, &self.language)
        })
    }

    /// Connect eagerly so a missing server is reported at startup.
    pub fn warm_up(&self) -> Result<(), GrammarError> {
        self.client().map(|_| ())
    }

    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl GrammarService for SharedGrammar {
    fn check(&self, text: &str) -> Result<Vec<Issue>, GrammarError> {
        self.client()?.check(text)
    }
}
