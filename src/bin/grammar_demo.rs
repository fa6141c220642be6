use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use grammar_fixer::cli::ServiceArgs;
use grammar_fixer::pipeline::CorrectionPipeline;

/// Sentences LanguageTool is expected to flag, followed by ones it is not.
const SAMPLES: &[&str] = &[
    "I has a pen",
    "She go to school yesterday",
    "This are bad sentence",
    "tommorrow was a holiday",
    "I has three appls",
    "He dont like it",
    "Their going to the store",
    "She is a boy",
    "The cat barked loudly",
    "I ate the building",
    "Tomorrow was a holiday",
];

const SUMMARY: &str = "\
✅ CAN DETECT:
  - Spelling mistakes
  - Subject-verb agreement errors
  - Wrong verb tenses
  - Missing punctuation
  - Wrong word usage (their/they're, etc.)
  - Capitalization issues

❌ CANNOT DETECT:
  - Logical contradictions (she is a boy)
  - Semantic errors (cat barked)
  - Context-dependent errors
  - Factual incorrectness";

#[derive(Parser, Debug)]
#[command(name = "grammar-demo", about = "Show what the checker does with sample sentences")]
struct Args {
    /// Sentences to run instead of the built-in samples
    sentences: Vec<String>,

    #[command(flatten)]
    service: ServiceArgs,
}

fn rule() -> String {
    "=".repeat(60)
}

fn show<W: Write>(out: &mut W, pipeline: &CorrectionPipeline, text: &str) -> grammar_fixer::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "ORIGINAL: {}", text)?;
    writeln!(out, "{}", rule())?;

    let spelling = pipeline.correct_spelling(text);
    if spelling.changed {
        writeln!(out, "✓ SPELLING: {}", spelling.text)?;
    } else {
        writeln!(out, "✓ SPELLING: No changes")?;
    }

    let grammar = pipeline.check(&spelling.text)?;
    if grammar.issues.is_empty() {
        writeln!(out, "\n✅ GRAMMAR: No issues found")?;
        writeln!(out, "✅ FINAL: {}", grammar.text)?;
        return Ok(());
    }

    writeln!(out, "\n📝 GRAMMAR ISSUES FOUND: {}", grammar.issue_count())?;
    for (i, issue) in grammar.issues.iter().enumerate() {
        writeln!(out, "\n  {}. {}", i + 1, issue.message)?;
        if !issue.replacements.is_empty() {
            let top: Vec<&str> = issue.replacements.iter().take(3).map(String::as_str).collect();
            writeln!(out, "     Suggestions: {}", top.join(", "))?;
        }
        if let Some(error_text) = issue.error_text(&spelling.text) {
            writeln!(out, "     Error text: '{}'", error_text)?;
        }
    }
    writeln!(out, "\n✅ FINAL: {}", grammar.text)?;
    Ok(())
}

fn print_summary<W: Write>(out: &mut W, spelling_enabled: bool) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "SUMMARY:")?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "{}", SUMMARY)?;
    if !spelling_enabled {
        writeln!(out, "\n(spelling stage disabled: pass --dictionary to enable it)")?;
    }
    writeln!(out, "{}\n", rule())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.service.load_config()?;
    let pipeline = CorrectionPipeline::from_config(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "GRAMMAR CHECKER DEMO")?;
    writeln!(out, "{}", rule())?;

    if args.sentences.is_empty() {
        for text in SAMPLES {
            show(&mut out, &pipeline, text)?;
        }
    } else {
        for text in &args.sentences {
            show(&mut out, &pipeline, text)?;
        }
    }

    print_summary(&mut out, pipeline.spelling_enabled())?;
    Ok(())
}
