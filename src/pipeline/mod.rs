//! Spell-then-grammar correction shared by every front end.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::grammar::{GrammarError, GrammarService, Issue, SharedGrammar};
use crate::spell_check::{load_spelling_service, SpellingService};
use crate::text::{count_word_changes, preview};

/// Output of the spelling stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingStage {
    pub text: String,
    pub changed_words: usize,
    pub changed: bool,
}

/// Output of the grammar stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarStage {
    pub text: String,
    pub issues: Vec<Issue>,
}

impl GrammarStage {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub original: String,
    pub corrected: String,
    pub spelling: SpellingStage,
    pub grammar: GrammarStage,
}

/// Runs the optional spelling stage and then the grammar stage.
///
/// Holds only read-only service handles, so one pipeline can be shared
/// across threads behind an `Arc`.
pub struct CorrectionPipeline {
    spelling: Option<Arc<dyn SpellingService>>,
    grammar: Arc<dyn GrammarService>,
}

impl CorrectionPipeline {
    pub fn new(
        grammar: Arc<dyn GrammarService>,
        spelling: Option<Arc<dyn SpellingService>>,
    ) -> Self {
        Self { spelling, grammar }
    }

    /// Wire the LanguageTool handle and the optional dictionary from `config`.
    /// Nothing is contacted until the first call.
    pub fn from_config(config: &Config) -> Self {
        let grammar = Arc::new(SharedGrammar::new(
            config.grammar.server_url.clone(),
            config.language.clone(),
        ));
        let spelling = load_spelling_service(config.spelling.dictionary.as_deref());
        Self::new(grammar, spelling)
    }

    pub fn spelling_enabled(&self) -> bool {
        self.spelling.is_some()
    }

    /// Spelling stage alone. Without a spelling service the text passes
    /// through unchanged.
    pub fn correct_spelling(&self, text: &str) -> SpellingStage {
        let Some(spelling) = &self.spelling else {
            debug!("Spelling service not configured, skipping spelling stage");
            return SpellingStage {
                text: text.to_string(),
                changed_words: 0,
                changed: false,
            };
        };

        let spelled = spelling.correct(text);
        let changed_words = count_word_changes(text, &spelled);
        SpellingStage {
            changed: spelled != text,
            changed_words,
            text: spelled,
        }
    }

    /// Grammar stage alone.
    pub fn check(&self, text: &str) -> Result<GrammarStage, GrammarError> {
        let issues = self.grammar.check(text)?;
        let corrected = self.grammar.apply(text, &issues);
        debug!("Grammar stage found {} issue(s)", issues.len());
        Ok(GrammarStage {
            text: corrected,
            issues,
        })
    }

    /// Spelling, then grammar on the spelling output.
    pub fn run(&self, text: &str) -> Result<PipelineResult, GrammarError> {
        info!("🔧 Correcting text: '{}'", preview(text, 50));

        let spelling = self.correct_spelling(text);
        let grammar = self.check(&spelling.text)?;

        info!(
            "✅ Corrected: '{}' ({} spelling, {} grammar)",
            preview(&grammar.text, 50),
            spelling.changed_words,
            grammar.issue_count()
        );

        Ok(PipelineResult {
            original: text.to_string(),
            corrected: grammar.text.clone(),
            spelling,
            grammar,
        })
    }
}
