//! Plain-text rendering of correction results.

use std::io::{self, Write};

use console::style;

use crate::grammar::Issue;
use crate::pipeline::{GrammarStage, PipelineResult};

/// Suggestions listed per issue in the report.
pub const REPORT_SUGGESTIONS: usize = 5;

/// Up to `max` replacements joined with commas, `(none)` when empty.
pub fn suggestions(issue: &Issue, max: usize) -> String {
    if issue.replacements.is_empty() {
        return "(none)".to_string();
    }
    issue
        .replacements
        .iter()
        .take(max)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn stats_line(spelling_fixes: usize, grammar_fixes: usize) -> String {
    format!(
        "Spelling fixes: {} | Grammar fixes: {}",
        spelling_fixes, grammar_fixes
    )
}

/// Issue list followed by the corrected text.
pub fn print_report<W: Write>(out: &mut W, stage: &GrammarStage) -> io::Result<()> {
    if stage.issues.is_empty() {
        writeln!(out, "No issues found.")?;
        return Ok(());
    }

    writeln!(out, "{}\n", style(format!("Found {} issue(s):", stage.issue_count())).bold())?;
    for (i, issue) in stage.issues.iter().enumerate() {
        let rule = issue.rule_id.as_deref().unwrap_or("UNKNOWN_RULE");
        writeln!(out, "{}. {}: {}", i + 1, style(rule).cyan(), issue.message)?;
        writeln!(out, "   Offset: {}-{}", issue.offset, issue.offset.saturating_add(issue.length))?;
        writeln!(out, "   Context: {}", issue.context)?;
        writeln!(
            out,
            "   Suggestion(s): {}\n",
            suggestions(issue, REPORT_SUGGESTIONS)
        )?;
    }

    writeln!(out, "{}\n", style("Corrected text:").bold())?;
    writeln!(out, "{}", stage.text)
}

/// Original and corrected text of a full pipeline run.
pub fn print_fix<W: Write>(out: &mut W, result: &PipelineResult) -> io::Result<()> {
    writeln!(out, "{}\n", style("Original:").bold())?;
    writeln!(out, "{}", result.original)?;
    writeln!(out, "\n{}\n", style("Corrected:").bold())?;
    writeln!(out, "{}", result.corrected)?;
    writeln!(
        out,
        "\n{}",
        stats_line(result.spelling.changed_words, result.grammar.issue_count())
    )
}
