use std::io::{self, Write};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{AppError, Result};

/// A clipboard program that reads the text to copy from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[ClipboardCommand] = &[ClipboardCommand {
    program: "pbcopy",
    args: &[],
}];

#[cfg(target_os = "windows")]
const CANDIDATES: &[ClipboardCommand] = &[ClipboardCommand {
    program: "clip",
    args: &[],
}];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[ClipboardCommand] = &[
    ClipboardCommand {
        program: "wl-copy",
        args: &[],
    },
    ClipboardCommand {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    ClipboardCommand {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
];

/// Clipboard programs for this platform, in the order they are tried.
pub fn candidates() -> &'static [ClipboardCommand] {
    CANDIDATES
}

/// Copy `text` with the first clipboard program that succeeds.
pub fn copy_text(text: &str) -> Result<()> {
    copy_with(candidates(), text)
}

pub fn copy_with(commands: &[ClipboardCommand], text: &str) -> Result<()> {
    for command in commands {
        match pipe_to(command, text) {
            Ok(()) => {
                info!("📋 Copied {} characters with {}", text.chars().count(), command.program);
                return Ok(());
            }
            Err(e) => debug!("Clipboard command {} failed: {}", command.program, e),
        }
    }

    let tried: Vec<&str> = commands.iter().map(|c| c.program).collect();
    Err(AppError::Clipboard(format!(
        "no clipboard command succeeded (tried {})",
        tried.join(", ")
    )))
}

fn pipe_to(command: &ClipboardCommand, text: &str) -> io::Result<()> {
    let mut child = Command::new(command.program)
        .args(command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is closed at the end of this block, before the child is reaped.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    let status = child.wait()?;
    written?;
    if !status.success() {
        return Err(io::Error::other(format!("exited with {}", status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_not_empty() {
        assert!(!candidates().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_candidates_order() {
        let programs: Vec<&str> = candidates().iter().map(|c| c.program).collect();
        assert_eq!(programs, vec!["wl-copy", "xclip", "xsel"]);
    }

    #[test]
    fn test_missing_program_is_clipboard_error() {
        let commands = [ClipboardCommand {
            program: "grammar-fixer-no-such-clipboard",
            args: &[],
        }];
        match copy_with(&commands, "text") {
            Err(AppError::Clipboard(message)) => {
                assert!(message.contains("grammar-fixer-no-such-clipboard"))
            }
            other => panic!("expected clipboard error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_pipe_is_reported_after_reaping() {
        // `true` exits without reading, so a payload larger than the pipe buffer breaks it.
        let command = ClipboardCommand {
            program: "true",
            args: &[],
        };
        let text = "x".repeat(1 << 20);

        let error = pipe_to(&command, &text).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }

    #[cfg(unix)]
    #[test]
    fn test_falls_through_to_working_program() {
        let commands = [
            ClipboardCommand {
                program: "false",
                args: &[],
            },
            ClipboardCommand {
                program: "cat",
                args: &[],
            },
        ];
        assert!(copy_with(&commands, "I have a pen").is_ok());
    }
}
