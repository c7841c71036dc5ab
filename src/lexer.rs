use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// 1-based line and column of a token in the (concatenated) source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    /// Raw numeric text, kept verbatim (`42`, `0.5`, `6.0.0`).
    Num(String),
    /// Body of a `/.../` literal, without the slashes.
    Regex(String),
    /// Body of a `/** ... */` comment, trimmed and with leading stars removed.
    Doc(String),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Eq,       // =
    Star,     // *
    Dot,      // .
    At,       // @

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "'{}'", s),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Num(s) => write!(f, "{}", s),
            Token::Regex(s) => write!(f, "/{}/", s),
            Token::Doc(_) => write!(f, "comment"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Eq => write!(f, "'='"),
            Token::Star => write!(f, "'*'"),
            Token::Dot => write!(f, "'.'"),
            Token::At => write!(f, "'@'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Pos),
    #[error("Unterminated string starting at {0}")]
    UnterminatedString(Pos),
    #[error("Unterminated comment starting at {0}")]
    UnterminatedComment(Pos),
    #[error("Unterminated pattern starting at {0}")]
    UnterminatedRegex(Pos),
}

impl LexError {
    pub fn pos(&self) -> Pos {
        match self {
            LexError::UnexpectedChar(_, pos)
            | LexError::UnterminatedString(pos)
            | LexError::UnterminatedComment(pos)
            | LexError::UnterminatedRegex(pos) => *pos,
        }
    }

    /// Message without the position.
    pub fn detail(&self) -> String {
        match self {
            LexError::UnexpectedChar(c, _) => format!("unexpected character '{}'", c),
            LexError::UnterminatedString(_) => "unterminated string".to_string(),
            LexError::UnterminatedComment(_) => "unterminated comment".to_string(),
            LexError::UnterminatedRegex(_) => "unterminated pattern".to_string(),
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    /// Last significant token, used to tell a regex literal from a stray slash.
    last: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            last: None,
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() != Some(&'/') {
                        break;
                    }
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self, start: Pos) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.bump() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString(start)),
            }
        }
    }

    fn read_number(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    /// Reads a `/* ... */` block. Returns `Some(doc)` for `/** ... */`.
    fn read_block_comment(&mut self, start: Pos) -> Result<Option<String>, LexError> {
        // the leading '/' is consumed, '*' is next
        self.bump();
        let is_doc = self.chars.peek() == Some(&'*');
        let mut body = String::new();
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    break;
                }
                Some(c) => body.push(c),
                None => return Err(LexError::UnterminatedComment(start)),
            }
        }
        if !is_doc {
            return Ok(None);
        }
        Ok(Some(clean_doc(&body)))
    }

    fn read_regex(&mut self, start: Pos) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    s.push('\\');
                    match self.bump() {
                        Some(c) => s.push(c),
                        None => return Err(LexError::UnterminatedRegex(start)),
                    }
                }
                Some('/') => return Ok(s),
                Some('\n') | None => return Err(LexError::UnterminatedRegex(start)),
                Some(c) => s.push(c),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        loop {
            self.skip_whitespace_and_comments();
            let pos = self.pos();

            let c = match self.bump() {
                Some(c) => c,
                None => {
                    return Ok(Spanned {
                        token: Token::Eof,
                        pos,
                    });
                }
            };

            let tok = match c {
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ',' => Token::Comma,
                '=' => Token::Eq,
                '*' => Token::Star,
                '.' => Token::Dot,
                '@' => Token::At,
                '/' => {
                    if self.chars.peek() == Some(&'*') {
                        match self.read_block_comment(pos)? {
                            Some(doc) => Token::Doc(doc),
                            None => continue,
                        }
                    } else if self.last == Some(Token::LParen) {
                        Token::Regex(self.read_regex(pos)?)
                    } else {
                        return Err(LexError::UnexpectedChar(c, pos));
                    }
                }
                '"' => Token::Str(self.read_string(pos)?),
                c if c.is_ascii_digit() => Token::Num(self.read_number(c)),
                c if c.is_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
                _ => return Err(LexError::UnexpectedChar(c, pos)),
            };

            if !matches!(tok, Token::Doc(_)) {
                self.last = Some(tok.clone());
            }
            return Ok(Spanned { token: tok, pos });
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.token == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

fn clean_doc(body: &str) -> String {
    body.trim_start_matches('*')
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
