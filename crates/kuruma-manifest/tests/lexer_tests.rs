//! Integration tests for the manifest lexer

use kuruma_manifest::{LexError, Lexer, Token};

fn tokens(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

fn first_error(source: &str) -> LexError {
    Lexer::new(source).tokenize().unwrap_err().remove(0)
}

#[test]
fn test_call_statement_tokens() {
    assert_eq!(
        tokens("dependency 'base'"),
        vec![
            Token::Identifier("dependency".to_string()),
            Token::StringLiteral("base".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_table_tokens() {
    assert_eq!(
        tokens("files { \"a.lua\", 'b.lua'; }"),
        vec![
            Token::Identifier("files".to_string()),
            Token::LeftBrace,
            Token::StringLiteral("a.lua".to_string()),
            Token::Comma,
            Token::StringLiteral("b.lua".to_string()),
            Token::Semicolon,
            Token::RightBrace,
            Token::Eof,
        ]
    );
}

#[test]
fn test_keywords_and_reserved_words() {
    assert_eq!(
        tokens("local nil true false and or not function"),
        vec![
            Token::Local,
            Token::Nil,
            Token::True,
            Token::False,
            Token::And,
            Token::Or,
            Token::Not,
            Token::Reserved("function".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        tokens("locals ending"),
        vec![
            Token::Identifier("locals".to_string()),
            Token::Identifier("ending".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_operators() {
    assert_eq!(
        tokens(".. ... == ~= <= >= // # ^"),
        vec![
            Token::DotDot,
            Token::Ellipsis,
            Token::EqualEqual,
            Token::TildeEqual,
            Token::LessEqual,
            Token::GreaterEqual,
            Token::SlashSlash,
            Token::Hash,
            Token::Caret,
            Token::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("1 2.5 0x1F 1e10 .5"),
        vec![
            Token::Number("1".to_string()),
            Token::Number("2.5".to_string()),
            Token::Number("0x1F".to_string()),
            Token::Number("1e10".to_string()),
            Token::Number(".5".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let source = "-- line comment\nfx_version 'x' --[[ block\ncomment ]] game 'gta5' --[==[ ]] ]==]";
    assert_eq!(
        tokens(source),
        vec![
            Token::Identifier("fx_version".to_string()),
            Token::StringLiteral("x".to_string()),
            Token::Identifier("game".to_string()),
            Token::StringLiteral("gta5".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_long_strings() {
    assert_eq!(
        tokens("description [[\nmulti\nline]] [=[a]]b]=]"),
        vec![
            Token::Identifier("description".to_string()),
            Token::StringLiteral("multi\nline".to_string()),
            Token::StringLiteral("a]]b".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""tab\there" 'quote\'s' "\x41\66\u{43}" "a\z   b""#),
        vec![
            Token::StringLiteral("tab\there".to_string()),
            Token::StringLiteral("quote's".to_string()),
            Token::StringLiteral("ABC".to_string()),
            Token::StringLiteral("ab".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_spans_track_lines_and_columns() {
    let result = Lexer::new("author 'me'\n  version '1.0'").tokenize().unwrap();

    let (token, span) = &result[2];
    assert_eq!(token, &Token::Identifier("version".to_string()));
    assert_eq!(span.line, 2);
    assert_eq!(span.column, 3);

    let (token, span) = &result[1];
    assert_eq!(token, &Token::StringLiteral("me".to_string()));
    assert_eq!((span.start, span.end), (7, 11));
}

#[test]
fn test_byte_order_mark_is_whitespace() {
    assert_eq!(
        tokens("\u{FEFF}game 'gta5'"),
        vec![
            Token::Identifier("game".to_string()),
            Token::StringLiteral("gta5".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    match first_error("author 'me'\nversion $") {
        LexError::UnexpectedCharacter { char, span } => {
            assert_eq!(char, '$');
            assert_eq!(span.line, 2);
            assert_eq!(span.column, 9);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        first_error("author 'me"),
        LexError::UnterminatedString { .. }
    ));
    assert!(matches!(
        first_error("description [[ never closed"),
        LexError::UnterminatedString { .. }
    ));
}

#[test]
fn test_unterminated_block_comment() {
    assert!(matches!(
        first_error("--[[ never closed\nauthor 'me'"),
        LexError::UnterminatedComment { .. }
    ));
}

#[test]
fn test_invalid_escape() {
    assert!(matches!(
        first_error(r#"author "bad \q escape""#),
        LexError::InvalidEscape { .. }
    ));
}
