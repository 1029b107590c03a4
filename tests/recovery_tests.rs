// Integration tests for error recovery and fatal errors

use subcc::errors::{ErrorKind, SourceError};
use subcc::icode::NodeKind;
use subcc::parser::lexer::TokenSource;
use subcc::parser::parse_source;
use subcc::parser::token::{SourceLocation, Token, TokenKind};
use subcc::parser::Parser;
use subcc::symtab::DefinitionKind;
use std::io;

#[test]
fn test_missing_right_brace_flagged_once() {
    let source = r#"
        void p() {
            int x;
            x = 1;
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::MissingRightBrace), 1);
    assert_eq!(unit.error_count(), 1, "{:?}", unit.errors);

    let p = unit.routine("p").expect("p not declared");
    let root = unit
        .symtab
        .entry(p)
        .routine()
        .and_then(|info| info.icode.root())
        .expect("p has no body");
    assert_eq!(root.kind, NodeKind::Compound);
    assert_eq!(root.count_kind(NodeKind::Assign), 1);
}

#[test]
fn test_redefinition_adds_one_error() {
    let clean = parse_source("void p() { int a; int b; }").expect("Parsing failed");
    let dup = parse_source("void p() { int a; int a; }").expect("Parsing failed");

    assert_eq!(dup.error_count(), clean.error_count() + 1);
    assert_eq!(dup.count_of(ErrorKind::IdentifierRedefined), 1);
    assert_eq!(dup.entries_named("a").len(), 1);
}

#[test]
fn test_undefined_identifier_flagged_per_use() {
    let source = r#"
        void p() {
            int x;
            x = y + 1;
            x = y * 2;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::IdentifierUndefined), 2);
    assert_eq!(unit.count_of(ErrorKind::IncompatibleTypes), 0);

    let y = unit.entries_named("y");
    assert_eq!(y.len(), 1);
    assert_eq!(unit.symtab.entry(y[0]).kind(), DefinitionKind::Undefined);
    assert_eq!(unit.symtab.entry(y[0]).line_numbers(), &[4, 5]);
}

#[test]
fn test_parsing_continues_after_errors() {
    let source = r#"
        void p() {
            int x;
            x = ;
            if x > 1) x = 2;
        }
        void q() {
            int ok;
            ok = 1;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::MissingExpression), 1);
    assert_eq!(unit.count_of(ErrorKind::MissingLeftParen), 1);
    assert_eq!(unit.error_count(), 2, "{:?}", unit.errors);

    // q is unaffected by errors in p
    let q = unit.routine("q").expect("q not declared");
    let root = unit
        .symtab
        .entry(q)
        .routine()
        .and_then(|info| info.icode.root())
        .expect("q has no body");
    assert_eq!(root.count_kind(NodeKind::Assign), 1);
    assert!(unit.errors.iter().all(|e| e.location.line < 7));
}

#[test]
fn test_unsupported_statements_do_not_hang() {
    let source = r#"
        void p() {
            int i;
            for (i = 0; i < 10; i = i + 1) i = i;
            switch (i) { }
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert!(unit.error_count() > 0);
    assert!(unit.routine("p").is_some());
}

#[test]
fn test_garbage_input_terminates() {
    let unit = parse_source(") ] } = = , ; ; ( [ {").expect("Parsing failed");
    assert!(unit.error_count() > 0);
    assert_eq!(unit.count_of(ErrorKind::MissingRightBrace), 1);
}

#[test]
fn test_bad_character_is_not_reported_twice() {
    let source = r#"
        void p() {
            int x;
            x = @;
            x = 2;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::InvalidCharacter), 1);
    assert_eq!(unit.count_of(ErrorKind::UnexpectedToken), 0);
    assert!(unit.errors.iter().all(|e| e.location.line == 4));
    assert_eq!(body_assigns(&unit, "p"), 2);
}

fn body_assigns(unit: &subcc::CompilationUnit, routine: &str) -> usize {
    let id = unit.routine(routine).expect("Routine not found");
    unit.symtab
        .entry(id)
        .routine()
        .and_then(|info| info.icode.root())
        .map_or(0, |root| root.count_kind(NodeKind::Assign))
}

#[test]
fn test_misspelled_type_is_reported() {
    let source = r#"
        integer y;
        void p() {
            int z;
            z = 1;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert!(unit.error_count() > 0);
    assert_eq!(unit.count_of(ErrorKind::MissingLeftParen), 1);
    assert!(unit.errors.iter().all(|e| e.location.line == 2));
    assert!(unit.routine("y").is_none());
    assert_eq!(body_assigns(&unit, "p"), 1);
}

#[test]
fn test_errors_are_in_source_order() {
    let source = r#"
        void p() {
            int x;
            x = 1.5;
            x = 'c';
            x = "s";
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    let lines: Vec<_> = unit.errors.iter().map(|e| e.location.line).collect();
    assert_eq!(lines, vec![4, 5, 6]);
    assert_eq!(unit.summary.error_count, 3);
}

struct FailingSource {
    remaining: usize,
}

impl TokenSource for FailingSource {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "device lost").into());
        }
        self.remaining -= 1;
        Ok(Token::new(
            TokenKind::Identifier,
            "x",
            SourceLocation::new(1, 1),
        ))
    }
}

#[test]
fn test_read_failure_is_fatal() {
    let parser = Parser::new(Box::new(FailingSource { remaining: 4 })).expect("First token read");
    let err = parser.parse_program().expect_err("Read failure must abort");
    assert_eq!(err.kind(), ErrorKind::IoError);
    assert!(err.kind().is_fatal());
}

#[test]
fn test_read_failure_on_first_token() {
    let result = Parser::new(Box::new(FailingSource { remaining: 0 }));
    assert!(result.is_err());
}
