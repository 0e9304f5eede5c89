//! End-to-end scenarios (spec §8).

use snc::arena::Arena;
use snc::ast::{ExprKind, StmtKind};
use snc::rt::hash::hash;
use snc::rt::uuid::{namespace_dns, RtUuid};
use snc::rt::RtArena;
use snc::symbol::SymbolTable;
use snc::types::Type;
use snc::{Parser, TypeChecker};

fn parse<'a>(arena: &'a Arena, symbols: &mut SymbolTable, src: &str) -> Option<snc::ast::Module<'a>> {
    let mut parser = Parser::new(arena, src, "<test>", symbols);
    parser.execute()
}

#[test]
fn scenario_1_parses_namespace_import() {
    let arena = Arena::new();
    let mut symbols = SymbolTable::new();
    let module = parse(&arena, &mut symbols, "import \"utils/string_helpers\" as strings\n").unwrap();
    assert_eq!(module.statements.len(), 1);
    match &module.statements[0].kind {
        StmtKind::Import { module_name, namespace } => {
            assert_eq!(module_name.lexeme, "utils/string_helpers");
            assert_eq!(namespace.unwrap().lexeme, "strings");
        }
        other => panic!("expected an import statement, got {other:?}"),
    }
}

#[test]
fn scenario_1_rejects_reserved_keyword_as_alias() {
    let arena = Arena::new();
    let mut symbols = SymbolTable::new();
    let module = parse(&arena, &mut symbols, "import \"utils/string_helpers\" as var\n");
    assert!(module.is_none());
}

#[test]
fn scenario_2_type_checks_hello_world() {
    let arena = Arena::new();
    let mut symbols = SymbolTable::new();
    let module = parse(&arena, &mut symbols, "fn main(): void => print(\"hello\\n\")").unwrap();

    let mut checker = TypeChecker::new();
    let diagnostics = checker.check(&module);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    match &module.statements[0].kind {
        StmtKind::Function { return_type, params, body, .. } => {
            assert_eq!(*return_type, Type::void());
            assert!(params.is_empty());
            assert_eq!(body.len(), 1);
            match &body[0].kind {
                StmtKind::Expr(call_expr) => {
                    assert_eq!(call_expr.expr_type(), Some(Type::void()));
                    assert!(matches!(call_expr.kind, ExprKind::Call { .. }));
                }
                other => panic!("expected an expression statement, got {other:?}"),
            }
        }
        other => panic!("expected a function statement, got {other:?}"),
    }
}

#[test]
fn scenario_3_arena_promote_is_a_deep_copy() {
    let b = RtArena::create();
    let mut values: [i64; 5] = [0, 10, 20, 30, 40];
    let source = as_bytes(&values);
    let dest = b.promote(Some(&source), source.len()).unwrap();

    values[0] = 999;

    let first_i64 = i64::from_le_bytes(dest[0..8].try_into().unwrap());
    assert_eq!(first_i64, 0, "promoted copy must not see the later mutation of the source array");
}

fn as_bytes(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn scenario_4_sha1_rfc_vectors() {
    assert_eq!(hex::encode(hash(b"abc")), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(hex::encode(hash(b"")), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}

#[test]
fn scenario_5_uuid_v5_is_deterministic() {
    let ns = namespace_dns();
    let a = RtUuid::new_v5(&ns, b"python.org");
    let b = RtUuid::new_v5(&ns, b"python.org");
    assert_eq!(a, b);
    let s = a.to_string();
    assert_eq!(s.chars().nth(14), Some('5'));
    assert!("89ab".contains(s.chars().nth(19).unwrap()));
}

#[test]
fn scenario_6_date_arithmetic_clamps_at_month_end() {
    use snc::rt::RtDate;
    assert_eq!(RtDate::from_ymd(2024, 1, 31).add_months(1).to_iso(), "2024-02-29");
    assert_eq!(RtDate::from_ymd(2025, 1, 31).add_months(1).to_iso(), "2025-02-28");
    assert_eq!(RtDate::from_ymd(2024, 2, 29).add_years(1).to_iso(), "2025-02-28");
}

#[test]
fn symbol_table_concurrent_mode_serializes_declare_and_lookup() {
    use snc::symbol::{ConcurrentSymbolTable, Symbol, SymbolKind};
    use snc::token::{Token, TokenKind};
    use std::sync::Arc;
    use std::thread;

    let table = Arc::new(ConcurrentSymbolTable::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let table = Arc::clone(&table);
        handles.push(thread::spawn(move || {
            let name = format!("x{i}");
            let tok = Token::new(TokenKind::Identifier, "x", 1, "<test>");
            let _ = table.declare(&name, Symbol::new(name.clone(), Type::int(), SymbolKind::Var, tok));
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    for i in 0..8 {
        assert!(table.lookup(&format!("x{i}")).is_some());
    }
}
