//! Text sources for the command line: files and standard input.

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{AppError, Result};

/// Read a UTF-8 text file; a missing path is reported before anything else runs.
pub fn read_text_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(AppError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Collect lines until the first blank line or end of input.
pub fn read_until_blank<R: BufRead>(reader: R) -> io::Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}

/// One line without its terminator, `None` at end of input.
pub fn read_single_line<R: BufRead>(mut reader: R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.txt");
        fs::write(&path, "This are bad sentence.\n").unwrap();

        assert_eq!(read_text_file(&path).unwrap(), "This are bad sentence.\n");
    }

    #[test]
    fn test_read_text_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_text_file(&temp_dir.path().join("missing.txt"));
        assert!(matches!(result, Err(AppError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_text_file_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_text_file(temp_dir.path());
        assert!(matches!(result, Err(AppError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_until_blank() {
        let input = Cursor::new("first line\n  second line\n\nignored\n");
        assert_eq!(read_until_blank(input).unwrap(), "first line\n  second line");
    }

    #[test]
    fn test_read_until_blank_eof() {
        assert_eq!(read_until_blank(Cursor::new("only line")).unwrap(), "only line");
        assert_eq!(read_until_blank(Cursor::new("")).unwrap(), "");
    }

    #[test]
    fn test_read_single_line() {
        assert_eq!(
            read_single_line(Cursor::new("I has a pen\r\nmore")).unwrap(),
            Some("I has a pen".to_string())
        );
        assert_eq!(read_single_line(Cursor::new("")).unwrap(), None);
    }
}
