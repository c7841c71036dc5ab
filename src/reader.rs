//! Reads JDL from files or strings and hands it to the parser.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::{Document, EntityList, EntitySelection};
use crate::parser::parse;
use crate::source::{SourceMap, SyntaxError};

pub const JDL_EXTENSIONS: &[&str] = &["jh", "jdl"];

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("No JDL file or content was passed")]
    NoInput,
    #[error("The JDL content to parse is empty")]
    EmptyContent,
    #[error("The file '{}' must end with '.jh' or '.jdl'", .0.display())]
    BadExtension(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Parses JDL held in memory.
pub fn parse_content(content: &str) -> Result<Document, ReadError> {
    if content.trim().is_empty() {
        return Err(ReadError::EmptyContent);
    }
    read(SourceMap::from_content(content))
}

/// Reads and parses one or more `.jh`/`.jdl` files as a single document.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Document, ReadError> {
    if paths.is_empty() {
        return Err(ReadError::NoInput);
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if !has_jdl_extension(path) {
            return Err(ReadError::BadExtension(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        files.push((path.to_path_buf(), content));
    }

    if files.iter().all(|(_, content)| content.trim().is_empty()) {
        return Err(ReadError::EmptyContent);
    }
    debug!(files = files.len(), "reading JDL files");
    read(SourceMap::from_files(files))
}

fn has_jdl_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JDL_EXTENSIONS.contains(&ext))
}

fn read(mut map: SourceMap) -> Result<Document, ReadError> {
    let stripped = strip_comments(map.text());
    map.set_text(stripped);
    let mut document = parse(map.text()).map_err(|e| map.syntax_error(e))?;
    normalize_application_entities(&mut document);
    debug!(
        entities = document.entities.len(),
        relationships = document.relationships.len(),
        applications = document.applications.len(),
        "parsed JDL"
    );
    Ok(document)
}

/// Blanks out `//` comments and `#` directive lines.
///
/// Every removed character becomes a space so that line and column numbers
/// of the remaining tokens are unchanged.
pub fn strip_comments(text: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Str,
        Block,
        Regex,
        Line,
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut line_start = true;
    let mut last_significant = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c == '\n' {
            if state == State::Line {
                state = State::Code;
            }
            out.push('\n');
            line_start = true;
            i += 1;
            continue;
        }

        match state {
            State::Line => out.push(' '),
            State::Str => {
                out.push(c);
                if c == '\\' {
                    if let Some(n) = next.filter(|n| *n != '\n') {
                        out.push(n);
                        i += 1;
                    }
                } else if c == '"' {
                    state = State::Code;
                }
            }
            State::Block => {
                out.push(c);
                if c == '*' && next == Some('/') {
                    out.push('/');
                    i += 1;
                    state = State::Code;
                }
            }
            State::Regex => {
                out.push(c);
                if c == '\\' {
                    if let Some(n) = next.filter(|n| *n != '\n') {
                        out.push(n);
                        i += 1;
                    }
                } else if c == '/' {
                    state = State::Code;
                }
            }
            State::Code => {
                if line_start && c == '#' {
                    state = State::Line;
                    out.push(' ');
                } else if c == '/' && next == Some('/') {
                    state = State::Line;
                    out.push(' ');
                } else if c == '/' && next == Some('*') {
                    state = State::Block;
                    out.push_str("/*");
                    i += 1;
                } else if c == '/' && last_significant == Some('(') {
                    state = State::Regex;
                    out.push(c);
                } else {
                    if c == '"' {
                        state = State::Str;
                    }
                    out.push(c);
                }
            }
        }

        if !c.is_whitespace() {
            line_start = false;
            if state == State::Code || state == State::Regex || state == State::Str {
                last_significant = Some(c);
            }
        }
        i += 1;
    }

    out
}

/// Rewrites `entities * except X` selections in applications into the
/// explicit list of declared entities.
fn normalize_application_entities(document: &mut Document) {
    let declared: Vec<String> = document.entities.iter().map(|e| e.name.clone()).collect();

    for app in &mut document.applications {
        let Some(selection) = app.entities.as_mut() else {
            continue;
        };
        let names: Vec<String> = match &selection.targets {
            EntityList::All => declared.clone(),
            EntityList::Names(names) => names.clone(),
        };
        let names = names
            .into_iter()
            .filter(|name| !selection.excluded.contains(name))
            .fold(Vec::new(), |mut acc, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });
        *selection = EntitySelection {
            targets: EntityList::Names(names),
            excluded: Vec::new(),
        };
    }
}
