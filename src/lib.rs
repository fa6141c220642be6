//! Grammar and spelling correction on top of a LanguageTool server.
//!
//! - `text`: word tokenizer and change counter
//! - `spell_check`: optional frequency-dictionary spelling stage
//! - `grammar`: LanguageTool client and issue application
//! - `pipeline`: spelling then grammar, shared by every front end
//! - `cli`, `gui`, `web`: presentation adapters

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod grammar;
pub mod gui;
pub mod pipeline;
pub mod spell_check;
pub mod text;
pub mod web;

pub use error::{AppError, Result};
pub use pipeline::{CorrectionPipeline, PipelineResult};
