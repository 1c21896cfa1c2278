use super::*;
use crate::jack::ast::{BinOp, Statement, Term};

#[test]
fn empty_class_parses() {
    let mut p = Parser::new("class Abc {}").unwrap();
    let class = p.parse_class().unwrap();
    assert_eq!(class.name, "Abc");
    assert!(class.class_vars.is_empty());
    assert!(class.subroutines.is_empty());
}

#[test]
fn class_missing_braces_is_a_structure_error() {
    let mut p = Parser::new("class Abc").unwrap();
    let err = p.parse_class().unwrap_err();
    assert!(err.is_structure_error());
}

#[test]
fn let_with_non_identifier_target_is_a_structure_error() {
    let mut p = Parser::new("let 1abc = 5;").unwrap();
    let err = p.compile_let().unwrap_err();
    assert_eq!(err.kind, ErrorKind::StructureError);
}

#[test]
fn compile_let_in_isolation() {
    let mut p = Parser::new("let x = 5;").unwrap();
    let stmt = p.compile_let().unwrap();
    match stmt {
        Statement::Let { name, index, expr } => {
            assert_eq!(name, "x");
            assert!(index.is_none());
            assert!(matches!(*expr.first, Term::IntConst(5)));
        }
        _ => panic!("expected Let"),
    }
}

#[test]
fn compile_let_array_target() {
    let mut p = Parser::new("let x[2] = 5;").unwrap();
    let stmt = p.compile_let().unwrap();
    match stmt {
        Statement::Let { name, index, .. } => {
            assert_eq!(name, "x");
            assert!(index.is_some());
        }
        _ => panic!("expected Let"),
    }
}

#[test]
fn compile_let_incomplete_is_incomplete_command_error() {
    let mut p = Parser::new("let x =").unwrap();
    let err = p.compile_let().unwrap_err();
    assert_eq!(err.kind, ErrorKind::IncompleteCommandError);
    assert!(err.is_structure_error());
}

#[test]
fn compile_statements_stops_before_closing_brace() {
    let mut p = Parser::new("let x = 1; let y = 2; }").unwrap();
    let stmts = p.compile_statements().unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn compile_var_dec_list_multiple_names() {
    let mut p = Parser::new("var int a, b, c;").unwrap();
    let locals = p.compile_var_dec_list().unwrap();
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].names, vec!["a", "b", "c"]);
}

#[test]
fn compile_subroutine_dec_method_with_params() {
    let mut p = Parser::new("method void foo(int a, boolean b) { return; }").unwrap();
    let sub = p.compile_subroutine_dec().unwrap();
    assert_eq!(sub.name, "foo");
    assert_eq!(sub.params.len(), 2);
}

#[test]
fn expression_is_left_to_right_flat_no_precedence() {
    let mut p = Parser::new("a + b * c").unwrap();
    let expr = p.compile_expression().unwrap();
    assert_eq!(expr.rest.len(), 2);
    assert_eq!(expr.rest[0].0, BinOp::Add);
    assert_eq!(expr.rest[1].0, BinOp::Mul);
}

#[test]
fn term_disambiguation_array_call_and_var() {
    let mut p = Parser::new("a[1]").unwrap();
    assert!(matches!(p.compile_expression().unwrap().first.as_ref(), Term::ArrayAt { .. }));

    let mut p = Parser::new("a(1)").unwrap();
    assert!(matches!(p.compile_expression().unwrap().first.as_ref(), Term::Call(_)));

    let mut p = Parser::new("a.b(1)").unwrap();
    let expr = p.compile_expression().unwrap();
    match expr.first.as_ref() {
        Term::Call(call) => assert_eq!(call.parent.as_deref(), Some("a")),
        _ => panic!("expected Call"),
    }

    let mut p = Parser::new("a").unwrap();
    assert!(matches!(p.compile_expression().unwrap().first.as_ref(), Term::VarRef(_)));
}
