//! Command-line front end.
//!
//! - `input`: file and stdin readers
//! - `display`: report formatting

pub mod display;
pub mod input;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gui;
use crate::pipeline::CorrectionPipeline;

#[derive(Parser, Debug)]
#[command(
    name = "grammar-fixer",
    version,
    about = "Grammar and spelling checker backed by a LanguageTool server"
)]
pub struct Args {
    /// Text to check for grammar issues
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// UTF-8 text file to check for grammar issues
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Run spelling and grammar correction on the given text
    #[arg(long)]
    pub fix: Option<String>,

    /// Open the terminal correction form
    #[arg(long)]
    pub gui: bool,

    /// Read lines until an empty one, then check them
    #[arg(long)]
    pub interactive: bool,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Service options shared by every binary.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Configuration file [default: <config dir>/grammar-fixer/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Language code, e.g. en-US, en-GB, de-DE
    #[arg(long = "lang")]
    pub lang: Option<String>,

    /// LanguageTool server URL
    #[arg(long, env = "LANGUAGETOOL_URL")]
    pub server: Option<String>,

    /// Word frequency file that enables spelling correction
    #[arg(long, env = "GRAMMAR_FIXER_DICTIONARY")]
    pub dictionary: Option<PathBuf>,
}

impl ServiceArgs {
    /// Load the configuration file and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())?;
        self.apply(config)
    }

    /// Overlay flags and environment values on `config`, then validate.
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if let Some(server) = &self.server {
            config.grammar.server_url = server.clone();
        }
        if let Some(dictionary) = &self.dictionary {
            config.spelling.dictionary = Some(dictionary.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Fix(String),
    Text(String),
    File(PathBuf),
    Gui,
    Interactive,
    Prompt,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if let Some(text) = &self.fix {
            Mode::Fix(text.clone())
        } else if let Some(text) = &self.text {
            Mode::Text(text.clone())
        } else if let Some(path) = &self.file {
            Mode::File(path.clone())
        } else if self.gui {
            Mode::Gui
        } else if self.interactive {
            Mode::Interactive
        } else {
            Mode::Prompt
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    let mode = args.mode();
    debug!("Running in {:?} mode", mode);

    // A missing file is reported before the configuration is touched.
    if let Mode::File(path) = &mode {
        if !path.is_file() {
            return Err(AppError::FileNotFound { path: path.clone() });
        }
    }

    let config = args.service.load_config()?;
    let pipeline = CorrectionPipeline::from_config(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_mode(&mode, &pipeline, stdin.lock(), &mut stdout.lock())
}

/// Dispatch one mode over the given input and output streams.
pub fn run_mode<R: BufRead, W: Write>(
    mode: &Mode,
    pipeline: &CorrectionPipeline,
    mut reader: R,
    out: &mut W,
) -> Result<()> {
    match mode {
        Mode::Fix(text) => {
            let result = pipeline.run(text)?;
            display::print_fix(out, &result)?;
        }
        Mode::Text(text) => {
            let stage = pipeline.check(text)?;
            display::print_report(out, &stage)?;
        }
        Mode::File(path) => {
            let text = input::read_text_file(path)?;
            let stage = pipeline.check(&text)?;
            display::print_report(out, &stage)?;
        }
        Mode::Interactive => {
            writeln!(out, "Enter or paste text. Finish with an empty line.\n")?;
            out.flush()?;
            let text = input::read_until_blank(&mut reader)?;
            if text.is_empty() {
                writeln!(out, "No input provided.")?;
                return Ok(());
            }
            let stage = pipeline.check(&text)?;
            display::print_report(out, &stage)?;
        }
        Mode::Prompt => {
            write!(out, "Enter your text: ")?;
            out.flush()?;
            let line = input::read_single_line(&mut reader)?.unwrap_or_default();
            let text = line.trim();
            if text.is_empty() {
                writeln!(out, "No input provided.")?;
                return Ok(());
            }
            let result = pipeline.run(text)?;
            display::print_fix(out, &result)?;
        }
        Mode::Gui => gui::run(pipeline)?,
    }
    Ok(())
}
