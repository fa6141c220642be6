use std::path::PathBuf;

use crate::grammar::GrammarError;
use crate::spell_check::SpellError;

/// Application-level errors surfaced by the CLI, the terminal form and the web API.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("No input provided")]
    EmptyInput,

    #[error("Text too long. Maximum {max} characters.")]
    TextTooLong { len: usize, max: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Spelling(#[from] SpellError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
