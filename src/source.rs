//! Source bookkeeping for syntax errors.
//!
//! Several files are parsed as one newline-joined text so declarations can
//! span files. The map remembers where each file starts, which lets a
//! position in the joined text be reported against the file it came from.

use std::fmt;
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

use crate::lexer::Token;
use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
struct SourceFile {
    path: Option<PathBuf>,
    /// 1-based line of the file's first line in the joined text.
    start_line: usize,
    line_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    text: String,
}

impl SourceMap {
    pub fn from_content(content: &str) -> Self {
        Self {
            files: vec![SourceFile {
                path: None,
                start_line: 1,
                line_count: line_count(content),
            }],
            text: content.to_string(),
        }
    }

    pub fn from_files(files: Vec<(PathBuf, String)>) -> Self {
        let mut map = Self {
            files: Vec::with_capacity(files.len()),
            text: String::new(),
        };
        let mut start_line = 1;
        for (i, (path, content)) in files.into_iter().enumerate() {
            if i > 0 {
                map.text.push('\n');
            }
            let count = line_count(&content);
            map.files.push(SourceFile {
                path: Some(path),
                start_line,
                line_count: count,
            });
            start_line += count;
            map.text.push_str(&content);
        }
        map
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the joined text, e.g. after comments were blanked out.
    /// Line structure must be unchanged.
    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// File and file-local line of a line of the joined text.
    pub fn locate(&self, line: usize) -> (Option<&Path>, usize) {
        let file = self
            .files
            .iter()
            .rev()
            .find(|f| f.start_line <= line)
            .or_else(|| self.files.first());
        match file {
            Some(f) => {
                let local = line.saturating_sub(f.start_line) + 1;
                (f.path.as_deref(), local.min(f.line_count.max(1)))
            }
            None => (None, line),
        }
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.text.lines().nth(line.checked_sub(1)?)
    }

    pub fn syntax_error(&self, error: ParseError) -> SyntaxError {
        let pos = error.pos();
        let (file, line) = self.locate(pos.line);
        let snippet = self
            .line_text(pos.line)
            .map(|text| render_snippet(text, line, pos.column, caret_width(&error)))
            .unwrap_or_default();
        SyntaxError {
            file: file.map(Path::to_path_buf),
            line,
            column: pos.column,
            detail: error.detail(),
            snippet,
        }
    }
}

fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

fn caret_width(error: &ParseError) -> usize {
    match error {
        ParseError::Unexpected {
            found: Token::Ident(s),
            ..
        } => UnicodeWidthStr::width(s.as_str()).max(1),
        _ => 1,
    }
}

/// Two-line excerpt with a caret under the offending token.
fn render_snippet(text: &str, line: usize, column: usize, width: usize) -> String {
    let prefix: String = text.chars().take(column.saturating_sub(1)).collect();
    let offset = UnicodeWidthStr::width(prefix.as_str());
    let gutter = line.to_string().len();
    format!(
        "{:>gutter$} | {}\n{:>gutter$} | {}{}",
        line,
        text,
        "",
        " ".repeat(offset),
        "^".repeat(width),
        gutter = gutter
    )
}

/// Grammar failure attributed to the file it occurred in.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub file: Option<PathBuf>,
    /// 1-based line within `file`.
    pub line: usize,
    pub column: usize,
    pub detail: String,
    pub snippet: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        write!(
            f,
            "Syntax error at line {}, column {}: {}",
            self.line, self.column, self.detail
        )?;
        if !self.snippet.is_empty() {
            write!(f, "\n{}", self.snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_locate_across_files() {
        let map = SourceMap::from_files(vec![
            (PathBuf::from("a.jdl"), "entity A\nentity B".to_string()),
            (PathBuf::from("b.jdl"), "entity C\n\nenity D".to_string()),
        ]);
        assert_eq!(map.text(), "entity A\nentity B\nentity C\n\nenity D");
        assert_eq!(map.locate(2), (Some(Path::new("a.jdl")), 2));
        assert_eq!(map.locate(3), (Some(Path::new("b.jdl")), 1));
        assert_eq!(map.locate(5), (Some(Path::new("b.jdl")), 3));
    }

    #[test]
    fn test_syntax_error_is_attributed_to_its_file() {
        let map = SourceMap::from_files(vec![
            (PathBuf::from("a.jdl"), "entity A".to_string()),
            (PathBuf::from("b.jdl"), "entity C\n  enity D".to_string()),
        ]);
        let err = map.syntax_error(parse(map.text()).unwrap_err());
        assert_eq!(err.file.as_deref(), Some(Path::new("b.jdl")));
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        let text = err.to_string();
        assert!(text.starts_with("b.jdl: Syntax error at line 2, column 3"), "{}", text);
        assert!(text.ends_with("2 |   enity D\n  |   ^^^^^"), "{}", text);
    }

    #[test]
    fn test_snippet_uses_display_width() {
        let snippet = render_snippet("名前 enity", 7, 4, 5);
        assert_eq!(snippet, "7 | 名前 enity\n  |      ^^^^^");
    }
}
