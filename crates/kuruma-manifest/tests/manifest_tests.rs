//! Integration tests for manifest interpretation

use kuruma_manifest::{
    interpret, CallStatementInterpreter, DiagnosticKind, ManifestError, ManifestInterpreter,
    PropertyValue,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const FXMANIFEST: &str = r#"
-- Resource manifest
fx_version 'cerulean'
games { 'gta5', 'rdr3' }

author 'Jim'
description [[A small
example resource]]
version '1.0.0'

dependencies {
    'base',
    'es_extended',
}

client_scripts {
    '@base/locale.lua',
    'client/*.lua',
}
server_script 'server/main.lua'
"#;

#[test]
fn test_interpret_realistic_manifest() {
    let result = interpret(FXMANIFEST).unwrap();
    let properties = &result.properties;

    assert_eq!(properties.scalar("fx_version"), Some("cerulean"));
    assert_eq!(properties.list("games"), Some(&strings(&["gta5", "rdr3"])[..]));
    assert_eq!(properties.scalar("author"), Some("Jim"));
    assert_eq!(
        properties.scalar("description"),
        Some("A small\nexample resource")
    );
    assert_eq!(
        properties.list("dependencies"),
        Some(&strings(&["base", "es_extended"])[..])
    );
    assert_eq!(
        properties.list("client_scripts"),
        Some(&strings(&["@base/locale.lua", "client/*.lua"])[..])
    );
    assert_eq!(properties.scalar("server_script"), Some("server/main.lua"));
    assert_eq!(properties.len(), 8);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_last_write_wins_across_shapes() {
    let result = interpret("files 'a.lua'\nfiles { 'b.lua', 'c.lua' }\nauthor { 'x' }\nauthor 'y'")
        .unwrap();

    assert_eq!(
        result.properties.get("files"),
        Some(&PropertyValue::List(strings(&["b.lua", "c.lua"])))
    );
    assert_eq!(
        result.properties.get("author"),
        Some(&PropertyValue::Scalar("y".to_string()))
    );
}

#[test]
fn test_empty_manifest() {
    let result = interpret("").unwrap();
    assert!(result.properties.is_empty());
    assert!(result.diagnostics.is_empty());

    let result = interpret("-- only a comment\n").unwrap();
    assert!(result.properties.is_empty());
}

#[test]
fn test_empty_table_is_empty_list() {
    let result = interpret("dependencies {}").unwrap();
    assert_eq!(result.properties.list("dependencies"), Some(&[][..]));
}

#[test]
fn test_non_literal_arguments_are_diagnostics() {
    let source = "ui_page('html/index.html')\nexports.base:call 'x'\nauthor 'me'\nversion (1)";
    let result = interpret(source).unwrap();

    assert_eq!(result.properties.len(), 1);
    assert_eq!(result.properties.scalar("author"), Some("me"));
    assert_eq!(result.diagnostics.len(), 3);
    assert!(result
        .diagnostics
        .iter()
        .all(|d| matches!(d.kind, DiagnosticKind::UnrecognizedStatement { .. })));
}

#[test]
fn test_diagnostic_reports_statement_text() {
    let result = interpret("author 'me'\n  ui_page('index.html')").unwrap();

    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::UnrecognizedStatement {
            line: 2,
            column: 3,
            statement: "ui_page('index.html')".to_string(),
        }
    );
}

#[test]
fn test_assignments_and_locals_are_dropped() {
    let result = interpret("local x = 'a'\nConfig = { debug = true }\nauthor 'me'").unwrap();
    assert_eq!(result.properties.len(), 1);
    assert_eq!(result.diagnostics.len(), 2);
}

#[test]
fn test_chained_string_calls_are_dropped() {
    let result = interpret("data_file 'A' 'B'").unwrap();
    assert!(result.properties.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_syntax_error_carries_source() {
    let source = "author 'me'\nfiles { 'a.lua'";
    let err = interpret(source).unwrap_err();

    assert_eq!(err.source_text(), source);
    let ManifestError::Syntax { line, .. } = &err;
    assert_eq!(*line, 2);
}

#[test]
fn test_block_constructs_are_syntax_errors() {
    for source in [
        "function f() end",
        "if true then author 'x' end",
        "for i = 1, 2 do end",
        "while true do end",
        "return 1",
        "local function f() end",
    ] {
        let err = interpret(source).unwrap_err();
        assert!(
            err.to_string().contains("not supported"),
            "{}: {}",
            source,
            err
        );
    }
}

#[test]
fn test_lex_error_is_syntax_error() {
    let err = interpret("author 'me'\nversion @").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Manifest syntax error at 2:9: unexpected character `@`"
    );
}

#[test]
fn test_trait_object_interpretation() {
    let interpreter: Box<dyn ManifestInterpreter> = Box::new(CallStatementInterpreter::new());
    let result = interpreter.interpret("provide 'alias'").unwrap();
    assert_eq!(result.properties.scalar("provide"), Some("alias"));
}

#[test]
fn test_property_map_serializes_in_key_order() {
    let result = interpret("zeta 'z'\nalpha { 'a', 'b' }").unwrap();
    let json = serde_json::to_string(&result.properties).unwrap();
    assert_eq!(json, r#"{"alpha":["a","b"],"zeta":"z"}"#);
}

#[test]
fn test_interpretation_is_idempotent() {
    assert_eq!(interpret(FXMANIFEST).unwrap(), interpret(FXMANIFEST).unwrap());
}
