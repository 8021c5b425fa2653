use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Bare word or number (`createNode`, `transform`, `-1.5`, `yes`).
    Word(String),
    /// `-name`, `-p`; stored without the dash.
    Flag(String),
    /// Double-quoted string, unescaped.
    Str(String),
}

impl TokenKind {
    /// Text of a word or string token.
    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            TokenKind::Word(s) | TokenKind::Str(s) => Some(s),
            TokenKind::Flag(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl LexError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.offset, self.message)
    }
}

/// One `;`-terminated statement with the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawStatement {
    pub(crate) line: usize,
    pub(crate) text: String,
}

/// Split scene text into statements.
///
/// Statements end at a `;` outside double quotes and may span lines. `//` outside a string
/// comments out the rest of its line; blank lines are skipped. Trailing text without a
/// terminator becomes a final statement.
pub(crate) fn split_statements(input: &str) -> Vec<RawStatement> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut start_line = 0usize;
    let mut in_str = false;
    let mut escaped = false;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if !in_str && (trimmed.is_empty() || trimmed.starts_with("//")) {
            continue;
        }

        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if !in_str && c == '/' && chars.peek() == Some(&'/') {
                break;
            }
            if buf.trim().is_empty() && !c.is_whitespace() {
                start_line = line_no;
            }
            if in_str {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_str = false;
                }
                buf.push(c);
                continue;
            }
            match c {
                '"' => {
                    in_str = true;
                    buf.push(c);
                }
                ';' => {
                    let text = buf.trim();
                    if !text.is_empty() {
                        out.push(RawStatement {
                            line: start_line,
                            text: text.to_owned(),
                        });
                    }
                    buf.clear();
                }
                _ => buf.push(c),
            }
        }
        buf.push('\n');
    }

    let text = buf.trim();
    if !text.is_empty() {
        out.push(RawStatement {
            line: start_line,
            text: text.to_owned(),
        });
    }
    out
}

/// Tokenize a single statement.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while let Some(c) = input[i..].chars().next() {
        if c.is_whitespace() {
            i += c.len_utf8();
            continue;
        }

        let start = i;

        if c == '"' {
            i += 1;
            let mut s = String::new();
            let mut closed = false;
            while i < bytes.len() {
                let ch = input[i..].chars().next().unwrap_or('\0');
                match ch {
                    '\\' if i + 1 < bytes.len() => {
                        let next = input[i + 1..].chars().next().unwrap_or('\0');
                        match next {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            other => s.push(other),
                        }
                        i += 1 + next.len_utf8();
                    }
                    '"' => {
                        i += 1;
                        closed = true;
                        break;
                    }
                    other => {
                        s.push(other);
                        i += other.len_utf8();
                    }
                }
            }
            if !closed {
                return Err(LexError::new(start, "unterminated string"));
            }
            out.push(Token {
                kind: TokenKind::Str(s),
                span: Span { start, end: i },
            });
            continue;
        }

        i += input[i..]
            .find(|ch: char| ch.is_whitespace() || ch == '"')
            .unwrap_or(input.len() - i);
        let word = &input[start..i];
        let kind = match word.strip_prefix('-') {
            Some(flag) if flag.starts_with(|ch: char| ch.is_ascii_alphabetic()) => {
                TokenKind::Flag(flag.to_owned())
            }
            _ => TokenKind::Word(word.to_owned()),
        };
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/lexer.rs"]
mod tests;
