use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use super::{GrammarError, GrammarService, Issue};

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    offset: usize,
    length: usize,
    #[serde(default)]
    context: Option<RawContext>,
    #[serde(default)]
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
}

/// Blocking client for the LanguageTool HTTP API (`/v2/check`).
///
/// `reqwest::blocking::Client` is `Send + Sync` and keeps no per-request
/// state, so one client can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    client: Client,
    base_url: Url,
    language: String,
}

impl LanguageToolClient {
    /// Create a client without contacting the server.
    pub fn new(server_url: &str, language: &str) -> Result<Self, GrammarError> {
        let mut base_url = Url::parse(server_url).map_err(|e| GrammarError::Config {
            details: format!("'{}' is not a valid URL: {}", server_url, e),
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if language.trim().is_empty() {
            return Err(GrammarError::Config {
                details: "language code is empty".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("grammar-fixer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GrammarError::Config {
                details: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            language: language.to_string(),
        })
    }

    /// Create a client and make sure the server answers.
    pub fn connect(server_url: &str, language: &str) -> Result<Self, GrammarError> {
        let client = Self::new(server_url, language)?;
        client.ping()?;
        info!("✅ Connected to LanguageTool at {} ({})", client.base_url, client.language);
        Ok(client)
    }

    /// Probe `/v2/languages`.
    pub fn ping(&self) -> Result<(), GrammarError> {
        let url = self.endpoint("v2/languages")?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GrammarError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn server_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url, GrammarError> {
        self.base_url.join(path).map_err(|e| GrammarError::Config {
            details: format!("cannot build endpoint '{}': {}", path, e),
        })
    }

    fn unreachable(&self, error: reqwest::Error) -> GrammarError {
        GrammarError::Unreachable {
            url: self.base_url.to_string(),
            details: error.to_string(),
        }
    }
}

impl GrammarService for LanguageToolClient {
    fn check(&self, text: &str) -> Result<Vec<Issue>, GrammarError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("v2/check")?;
        let response = self
            .client
            .post(url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.unreachable(e))?;
        if !status.is_success() {
            return Err(GrammarError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let issues = parse_matches(text, &body)?;
        debug!("LanguageTool reported {} issue(s)", issues.len());
        Ok(issues)
    }
}

/// Decode a `/v2/check` body into issues with character offsets.
pub(crate) fn parse_matches(text: &str, body: &str) -> Result<Vec<Issue>, GrammarError> {
    let response: CheckResponse =
        serde_json::from_str(body).map_err(|e| GrammarError::InvalidResponse {
            details: e.to_string(),
        })?;

    let offsets = Utf16Offsets::new(text);
    let issues = response
        .matches
        .into_iter()
        .filter_map(|m| {
            let Some(utf16_end) = m.offset.checked_add(m.length) else {
                debug!("Skipping match with overflowing span at {}", m.offset);
                return None;
            };
            let offset = offsets.to_char(m.offset);
            let end = offsets.to_char(utf16_end);
            Some(Issue {
                message: m.message,
                context: m.context.map(|c| c.text).unwrap_or_default(),
                replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                offset,
                length: end - offset,
                rule_id: m.rule.map(|r| r.id),
            })
        })
        .collect();

    Ok(issues)
}

/// LanguageTool reports positions in UTF-16 code units.
struct Utf16Offsets {
    /// UTF-16 position of every character start, plus the total length.
    starts: Vec<usize>,
}

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() + 1);
        let mut position = 0;
        for c in text.chars() {
            starts.push(position);
            position += c.len_utf16();
        }
        starts.push(position);
        Self { starts }
    }

    fn to_char(&self, utf16: usize) -> usize {
        self.starts
            .partition_point(|&start| start < utf16)
            .min(self.starts.len() - 1)
    }
}
