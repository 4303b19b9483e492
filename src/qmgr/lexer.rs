// src/qmgr/lexer.rs

//! The quote/whitespace-sensitive value lexer and the line reader that
//! turns raw input into one directive at a time.

use std::collections::VecDeque;

/// Whether unquoted whitespace is admitted inside a value. Entity-limit
/// values are the only callers of [`AllowWhite::Yes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowWhite {
    No,
    Yes,
}

/// Lexer failure classes, with the user-visible wording the caret printer
/// attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrKind {
    IllegalChar,
    ImproperQuoting,
    NoClosingQuote,
}

impl LexErrKind {
    pub fn message(self) -> &'static str {
        match self {
            LexErrKind::IllegalChar => "illegal character",
            LexErrKind::ImproperQuoting => "improper quoting syntax",
            LexErrKind::NoClosingQuote => "no closing quote",
        }
    }
}

/// A lexer error carrying the byte offset of the offending character in the
/// original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrKind,
}

/// Parses one value token.
///
/// Rules: either `"` or `'` quotes; characters must be printable; `&` is
/// reserved and always illegal; `,` terminates unless quoted; whitespace
/// terminates unless quoted or `allow_white` is on; switching quote styles
/// mid-value treats the other quote character as literal. Returns the
/// parsed value and the byte offset where scanning stopped (the terminator
/// itself is not consumed).
pub fn quote_parse(input: &str, allow_white: AllowWhite) -> Result<(String, usize), LexError> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() && (bytes[pos] as char).is_ascii_whitespace() {
        pos += 1;
    }

    let mut quoting = false;
    let mut quotechar = 0u8;
    let mut nth = 0usize;
    // Entity-limit values carry commas inside their brackets; in
    // allow-white mode a comma only terminates at bracket depth zero.
    let mut depth = 0usize;

    while pos < bytes.len() {
        let b = bytes[pos];
        let c = b as char;
        nth += 1;

        if !is_printable(b) && !c.is_ascii_whitespace() {
            return Err(LexError {
                offset: pos,
                kind: LexErrKind::IllegalChar,
            });
        }

        if quoting {
            if b == quotechar {
                quoting = false;
            } else if b == b'&' {
                return Err(LexError {
                    offset: pos,
                    kind: LexErrKind::IllegalChar,
                });
            } else {
                out.push(c);
            }
        } else if (b == b'"' || b == b'\'') && (allow_white == AllowWhite::No || nth == 1) {
            if quotechar != 0 && quotechar != b {
                // Cannot switch quoting styles mid-value; the other quote
                // is a plain character.
                out.push(c);
            } else {
                quotechar = b;
                quoting = true;
            }
        } else if (b == b',' && depth == 0)
            || (c.is_ascii_whitespace() && allow_white == AllowWhite::No)
        {
            return Ok((out, pos));
        } else {
            if b == b'&' {
                return Err(LexError {
                    offset: pos,
                    kind: LexErrKind::IllegalChar,
                });
            }
            if allow_white == AllowWhite::Yes {
                if b == b'[' {
                    depth += 1;
                } else if b == b']' {
                    depth = depth.saturating_sub(1);
                }
            }
            out.push(c);
        }

        pos += 1;
    }

    if quoting {
        return Err(LexError {
            offset: pos,
            kind: LexErrKind::NoClosingQuote,
        });
    }
    Ok((out, pos))
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_graphic() || b == b' '
}

/// Lexical position of the directive scanner inside a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Fresh,
    InQuote(u8),
}

/// Splits a logical line at the first top-level `;`. Returns the directive
/// text and the unconsumed remainder, if any. A `#` at the start of the
/// line or after whitespace ends the directive and discards the rest.
fn split_directive(line: &str) -> (String, Option<String>) {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut state = ScanState::Fresh;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            ScanState::InQuote(q) => {
                out.push(b as char);
                if b == q {
                    state = ScanState::Fresh;
                }
            }
            ScanState::Fresh => match b {
                b';' => {
                    let rest = line[i + 1..].trim_start();
                    return (
                        out,
                        (!rest.is_empty()).then(|| rest.to_string()),
                    );
                }
                b'"' | b'\'' => {
                    out.push(b as char);
                    state = ScanState::InQuote(b);
                }
                b'#' => {
                    let at_start = i == 0;
                    let after_space =
                        i > 0 && (bytes[i - 1] as char).is_ascii_whitespace();
                    if at_start || after_space {
                        return (out, None);
                    }
                    out.push('#');
                }
                _ => out.push(b as char),
            },
        }
        i += 1;
    }
    (out, None)
}

/// Source of physical lines. Implemented by the interactive editor and by
/// plain buffered readers; the request reader is agnostic.
pub trait LineSource {
    /// Reads one physical line without its newline. `Ok(None)` is
    /// end-of-input. `prompt` distinguishes the fresh prompt from the
    /// continuation prompt; non-terminal sources ignore it.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

/// A [`LineSource`] over any buffered reader (redirected files, heredocs,
/// pipes).
pub struct BufLineSource<R: std::io::BufRead> {
    inner: R,
}

impl<R: std::io::BufRead> BufLineSource<R> {
    pub fn new(inner: R) -> Self {
        BufLineSource { inner }
    }
}

impl<R: std::io::BufRead> LineSource for BufLineSource<R> {
    fn read_line(&mut self, _prompt: &str) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.inner.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// The directive reader: collects physical lines (handling continuation,
/// comments, and `;` separators) and yields one directive at a time.
pub struct RequestReader<S: LineSource> {
    source: S,
    pending: VecDeque<String>,
    prompt: &'static str,
    contin: &'static str,
}

impl<S: LineSource> RequestReader<S> {
    pub fn new(source: S) -> Self {
        RequestReader {
            source,
            pending: VecDeque::new(),
            prompt: "Qmgr: ",
            contin: "Qmgr< ",
        }
    }

    /// Returns the next directive, or `None` at end of input. Blank lines
    /// and comment-only lines never surface.
    pub fn get_request(&mut self) -> std::io::Result<Option<String>> {
        loop {
            if let Some(buffered) = self.pending.pop_front() {
                let (directive, rest) = split_directive(&buffered);
                if let Some(rest) = rest {
                    self.pending.push_front(rest);
                }
                if !directive.trim().is_empty() {
                    return Ok(Some(directive));
                }
                continue;
            }

            // Assemble one logical line, joining continuations.
            let mut logical = String::new();
            loop {
                let prompt = if logical.is_empty() {
                    self.prompt
                } else {
                    self.contin
                };
                let Some(line) = self.source.read_line(prompt)? else {
                    if logical.is_empty() {
                        return Ok(None);
                    }
                    break;
                };
                if logical.is_empty() && line.trim().is_empty() {
                    continue;
                }
                if let Some(stripped) = line.strip_suffix('\\') {
                    logical.push_str(stripped);
                    logical.push(' ');
                    continue;
                }
                logical.push_str(&line);
                break;
            }
            if logical.trim().is_empty() {
                continue;
            }
            self.pending.push_back(logical);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> RequestReader<BufLineSource<Cursor<Vec<u8>>>> {
        RequestReader::new(BufLineSource::new(Cursor::new(input.as_bytes().to_vec())))
    }

    #[test]
    fn quote_parse_basics() {
        assert_eq!(
            quote_parse("hello world", AllowWhite::No).unwrap(),
            ("hello".to_string(), 5)
        );
        assert_eq!(
            quote_parse("\"hello world\"", AllowWhite::No).unwrap(),
            ("hello world".to_string(), 13)
        );
        assert_eq!(
            quote_parse("a,b", AllowWhite::No).unwrap(),
            ("a".to_string(), 1)
        );
    }

    #[test]
    fn quote_parse_no_style_switch() {
        // The other quote character is literal inside a quoted region.
        assert_eq!(
            quote_parse("\"a'b\"", AllowWhite::No).unwrap().0,
            "a'b".to_string()
        );
        // Once a style is chosen, re-quoting with the other style outside a
        // quoted region keeps the character literal.
        assert_eq!(
            quote_parse("\"a\"'b'", AllowWhite::No).unwrap().0,
            "a'b'".to_string()
        );
    }

    #[test]
    fn quote_parse_errors() {
        let err = quote_parse("\"abc", AllowWhite::No).unwrap_err();
        assert_eq!(err.kind, LexErrKind::NoClosingQuote);
        let err = quote_parse("a&b", AllowWhite::No).unwrap_err();
        assert_eq!(err.kind, LexErrKind::IllegalChar);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn quote_parse_allow_white() {
        assert_eq!(
            quote_parse("[u:alice = 3] ,x", AllowWhite::Yes).unwrap(),
            ("[u:alice = 3] ".to_string(), 14)
        );
        // Commas inside the brackets belong to the value.
        assert_eq!(
            quote_parse("[u:alice = 3, g:staff = 5],next", AllowWhite::Yes)
                .unwrap(),
            ("[u:alice = 3, g:staff = 5]".to_string(), 26)
        );
    }

    #[test]
    fn reader_splits_semicolons_and_comments() {
        let mut r = reader("set server scheduling=true; list server\n# full comment\nprint server # trailing\n");
        assert_eq!(r.get_request().unwrap().unwrap(), "set server scheduling=true");
        assert_eq!(r.get_request().unwrap().unwrap(), "list server");
        assert_eq!(r.get_request().unwrap().unwrap(), "print server ");
        assert!(r.get_request().unwrap().is_none());
    }

    #[test]
    fn reader_joins_continuations() {
        let mut r = reader("set server \\\ncomment=hi\n");
        assert_eq!(r.get_request().unwrap().unwrap(), "set server  comment=hi");
    }

    #[test]
    fn reader_keeps_semicolon_in_quotes() {
        let mut r = reader("set server comment=\"a;b\"\n");
        assert_eq!(
            r.get_request().unwrap().unwrap(),
            "set server comment=\"a;b\""
        );
    }
}
