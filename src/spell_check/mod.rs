//! Optional spelling stage.
//!
//! - `dictionary`: word frequency table loading
//! - `frequency`: statistical corrector over that table

pub mod dictionary;
pub mod frequency;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

pub use dictionary::FrequencyDictionary;
pub use frequency::FrequencySpeller;

/// Maps text to a spelling-corrected version of itself.
#[cfg_attr(test, mockall::automock)]
pub trait SpellingService: Send + Sync {
    fn correct(&self, text: &str) -> String;
}

/// Errors that can occur while preparing the spelling stage
#[derive(Debug, thiserror::Error)]
pub enum SpellError {
    #[error("Dictionary file not found: {path}")]
    DictionaryNotFound { path: String },

    #[error("Dictionary {path} contains no words")]
    EmptyDictionary { path: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

/// Build the spelling stage from an optional dictionary path.
///
/// Spelling is an enhancement layer: no path, or a dictionary that cannot be
/// loaded, yields `None` and the pipeline passes text through unchanged.
pub fn load_spelling_service(dictionary: Option<&Path>) -> Option<Arc<dyn SpellingService>> {
    let path = dictionary?;

    match FrequencySpeller::from_file(path) {
        Ok(speller) => {
            info!(
                "📚 Spelling dictionary loaded: {} words from {}",
                speller.dictionary().len(),
                path.display()
            );
            Some(Arc::new(speller))
        }
        Err(e) => {
            warn!("⚠️ Spelling correction disabled: {}", e);
            None
        }
    }
}
