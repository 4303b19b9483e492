use openbatch::qmgr::lexer::{AllowWhite, BufLineSource, LexErrKind, RequestReader, quote_parse};
use std::io::Cursor;

#[test]
fn test_plain_token_stops_at_whitespace() {
    let (value, used) = quote_parse("abc def", AllowWhite::No).unwrap();
    assert_eq!(value, "abc");
    assert_eq!(used, 3);
}

#[test]
fn test_comma_terminates_unquoted() {
    let (value, used) = quote_parse("one,two", AllowWhite::No).unwrap();
    assert_eq!(value, "one");
    assert_eq!(used, 3);
}

#[test]
fn test_quoted_value_keeps_separators() {
    let (value, _) = quote_parse("\"a b,c\"", AllowWhite::No).unwrap();
    assert_eq!(value, "a b,c");
}

#[test]
fn test_other_quote_is_literal_inside() {
    let (value, _) = quote_parse("\"a'b\"", AllowWhite::No).unwrap();
    assert_eq!(value, "a'b");
}

#[test]
fn test_reopened_quote_without_close_is_rejected() {
    // "a"b" - the second double quote reopens quoting and never closes.
    let err = quote_parse("\"a\"b\"", AllowWhite::No).unwrap_err();
    assert_eq!(err.kind, LexErrKind::NoClosingQuote);
}

#[test]
fn test_unterminated_quote_is_rejected() {
    let err = quote_parse("'never closed", AllowWhite::No).unwrap_err();
    assert_eq!(err.kind, LexErrKind::NoClosingQuote);
}

#[test]
fn test_ampersand_is_reserved() {
    let err = quote_parse("ab&cd", AllowWhite::No).unwrap_err();
    assert_eq!(err.kind, LexErrKind::IllegalChar);
    assert_eq!(err.offset, 2);
    // Also illegal inside quotes.
    let err = quote_parse("\"ab&cd\"", AllowWhite::No).unwrap_err();
    assert_eq!(err.kind, LexErrKind::IllegalChar);
}

#[test]
fn test_nonprintable_rejected() {
    let err = quote_parse("ab\u{7f}cd", AllowWhite::No).unwrap_err();
    assert_eq!(err.kind, LexErrKind::IllegalChar);
}

#[test]
fn test_allow_white_admits_spaces_and_bracketed_commas() {
    let (value, _) = quote_parse("[u:alice = 3, g:staff = 5]", AllowWhite::Yes).unwrap();
    assert_eq!(value, "[u:alice = 3, g:staff = 5]");

    // Outside brackets the comma still separates.
    let (value, used) = quote_parse("[u:a=1],trailer", AllowWhite::Yes).unwrap();
    assert_eq!(value, "[u:a=1]");
    assert_eq!(used, 7);
}

#[test]
fn test_leading_whitespace_skipped() {
    let (value, used) = quote_parse("   abc", AllowWhite::No).unwrap();
    assert_eq!(value, "abc");
    assert_eq!(used, 6);
}

fn reader(input: &str) -> RequestReader<BufLineSource<Cursor<Vec<u8>>>> {
    RequestReader::new(BufLineSource::new(Cursor::new(input.as_bytes().to_vec())))
}

#[test]
fn test_reader_multiple_directives_per_line() {
    let mut r = reader("create queue a; create queue b;; list queue a\n");
    assert_eq!(r.get_request().unwrap().unwrap(), "create queue a");
    assert_eq!(r.get_request().unwrap().unwrap(), "create queue b");
    assert_eq!(r.get_request().unwrap().unwrap(), "list queue a");
    assert!(r.get_request().unwrap().is_none());
}

#[test]
fn test_reader_comment_rules() {
    // Column-one comment and whitespace-preceded comment are stripped; an
    // embedded # is not a comment.
    let mut r = reader("# leading\nset server comment=a#b\nlist server # tail\n");
    assert_eq!(r.get_request().unwrap().unwrap(), "set server comment=a#b");
    assert_eq!(r.get_request().unwrap().unwrap(), "list server ");
    assert!(r.get_request().unwrap().is_none());
}

#[test]
fn test_reader_backslash_continuation() {
    let mut r = reader("set server \\\nscheduling=true\nlist server\n");
    assert_eq!(r.get_request().unwrap().unwrap(), "set server  scheduling=true");
    assert_eq!(r.get_request().unwrap().unwrap(), "list server");
}

#[test]
fn test_reader_quoted_semicolon_not_a_separator() {
    let mut r = reader("set server comment='a;b;c'\n");
    assert_eq!(r.get_request().unwrap().unwrap(), "set server comment='a;b;c'");
}
