//! Annotates every expression with its resolved type and enforces the
//! type rules (spec §4.4). Diagnostics are collected, not early-exited
//! on: the module is rejected overall only if at least one was recorded.

use crate::ast::{Expr, ExprKind, Module, Stmt, StmtKind};
use crate::error::{Diagnostic, Location};
use crate::symbol::{Symbol, SymbolKind, SymbolTable};
use crate::token::{Token, TokenKind};
use crate::types::Type;

pub struct TypeChecker {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

fn loc(tok: Option<Token<'_>>) -> Location {
    match tok {
        Some(t) => Location { line: t.line, filename: t.filename.to_string() },
        None => Location { line: 0, filename: "<unknown>".to_string() },
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker { symbols: SymbolTable::new(), diagnostics: Vec::new() }
    }

    fn error(&mut self, tok: Option<Token<'_>>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(loc(tok), message));
    }

    /// `print` is the only global the core language exposes directly;
    /// everything else a program needs goes through the runtime
    /// symbols a `Call` lowers to during code generation.
    fn declare_builtins(&mut self) {
        let synthetic = Token::new(TokenKind::Identifier, "print", 0, "<builtin>");
        let print_ty = Type::function(Type::void(), vec![Type::any()]);
        let _ = self.symbols.declare("print", Symbol::new("print", print_ty, SymbolKind::Fn, synthetic));
    }

    /// Walks the module, filling every expression's `expr_type`. Returns
    /// the collected diagnostics; empty means the module type-checks.
    pub fn check<'a>(&mut self, module: &Module<'a>) -> Vec<Diagnostic> {
        self.declare_builtins();
        // Pre-declare top-level function signatures so forward calls resolve.
        for stmt in &module.statements {
            if let StmtKind::Function { name, params, return_type, .. } = &stmt.kind {
                let param_types: Vec<Type> = params.iter().map(|p| p.ty.clone()).collect();
                let ty = Type::function(return_type.clone(), param_types);
                let _ = self.symbols.declare(name.lexeme, Symbol::new(name.lexeme, ty, SymbolKind::Fn, *name));
            }
        }
        for stmt in &module.statements {
            self.check_stmt(stmt, None);
        }
        std::mem::take(&mut self.diagnostics)
    }

    fn check_stmt<'a>(&mut self, stmt: &Stmt<'a>, enclosing_return: Option<&Type>) {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                self.check_expr(e);
            }
            StmtKind::VarDecl { name, ty, init } => {
                if let Some(init) = init {
                    let actual = self.check_expr(init);
                    if actual != *ty && !matches!(actual, Type::Primitive(crate::types::Primitive::Any)) {
                        let msg = format!("cannot assign a value of type {actual} to '{}' of type {ty}", name.lexeme);
                        self.error(Some(*name), msg);
                    }
                }
                let _ = self.symbols.declare(name.lexeme, Symbol::new(name.lexeme, ty.clone(), SymbolKind::Var, *name));
            }
            StmtKind::Function { params, return_type, body, .. } => {
                self.symbols.open_scope();
                for p in params.iter() {
                    let _ = self.symbols.declare(p.name.lexeme, Symbol::new(p.name.lexeme, p.ty.clone(), SymbolKind::Param, p.name));
                }
                for s in body.iter() {
                    self.check_stmt(s, Some(return_type));
                }
                self.symbols.close_scope();
            }
            StmtKind::Return { keyword, value } => {
                let actual = value.map(|v| self.check_expr(v)).unwrap_or_else(Type::void);
                if let Some(expected) = enclosing_return {
                    if actual != *expected && !expected.as_primitive().is_some_and(|p| p == crate::types::Primitive::Any) {
                        let msg = format!("return type mismatch: expected {expected}, found {actual}");
                        self.error(Some(*keyword), msg);
                    }
                }
            }
            StmtKind::Block { stmts } => {
                self.symbols.open_scope();
                for s in stmts.iter() {
                    self.check_stmt(s, enclosing_return);
                }
                self.symbols.close_scope();
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                let cond_ty = self.check_expr(cond);
                if cond_ty != Type::bool() {
                    self.error(cond.token, format!("if condition must be bool, found {cond_ty}"));
                }
                self.check_stmt(then_branch, enclosing_return);
                if let Some(e) = else_branch {
                    self.check_stmt(e, enclosing_return);
                }
            }
            StmtKind::While { cond, body } => {
                let cond_ty = self.check_expr(cond);
                if cond_ty != Type::bool() {
                    self.error(cond.token, format!("while condition must be bool, found {cond_ty}"));
                }
                self.check_stmt(body, enclosing_return);
            }
            StmtKind::For { init, cond, step, body } => {
                self.symbols.open_scope();
                if let Some(init) = init {
                    self.check_stmt(init, enclosing_return);
                }
                if let Some(cond) = cond {
                    let cond_ty = self.check_expr(cond);
                    if cond_ty != Type::bool() {
                        self.error(cond.token, format!("for condition must be bool, found {cond_ty}"));
                    }
                }
                if let Some(step) = step {
                    self.check_expr(step);
                }
                self.check_stmt(body, enclosing_return);
                self.symbols.close_scope();
            }
            StmtKind::Import { .. } => {}
        }
    }

    fn numeric_kind_match(a: &Type, b: &Type) -> bool {
        a.is_numeric() && a == b
    }

    fn check_expr<'a>(&mut self, expr: &Expr<'a>) -> Type {
        let ty = self.infer(expr);
        expr.set_expr_type(ty.clone());
        ty
    }

    fn infer<'a>(&mut self, expr: &Expr<'a>) -> Type {
        match &expr.kind {
            ExprKind::Literal { literal_type, .. } => literal_type.clone(),
            ExprKind::Variable { name } => match self.symbols.lookup(name.lexeme) {
                Some(sym) => sym.declared_type.clone(),
                None => {
                    self.error(Some(*name), format!("undeclared identifier '{}'", name.lexeme));
                    Type::any()
                }
            },
            ExprKind::Assign { name, value } => {
                let value_ty = self.check_expr(value);
                match self.symbols.lookup(name.lexeme) {
                    Some(sym) => {
                        let declared = sym.declared_type.clone();
                        if value_ty != declared && !declared.as_primitive().is_some_and(|p| p == crate::types::Primitive::Any) {
                            let msg = format!("cannot assign {value_ty} to '{}' of type {declared}", name.lexeme);
                            self.error(Some(*name), msg);
                        }
                        declared
                    }
                    None => {
                        self.error(Some(*name), format!("undeclared identifier '{}'", name.lexeme));
                        Type::any()
                    }
                }
            }
            ExprKind::Binary { left, op, right } => self.check_binary(expr.token, left, *op, right),
            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand);
                match op {
                    TokenKind::Bang => {
                        if ty != Type::bool() {
                            self.error(expr.token, format!("'!' requires bool, found {ty}"));
                        }
                        Type::bool()
                    }
                    TokenKind::Minus => {
                        if !ty.is_numeric() {
                            self.error(expr.token, format!("unary '-' requires a numeric type, found {ty}"));
                        }
                        ty
                    }
                    _ => ty,
                }
            }
            ExprKind::Call { callee, arguments } => self.check_call(expr.token, callee, arguments),
            ExprKind::Array { elements } => {
                let mut elem_ty = Type::any();
                for (i, e) in elements.iter().enumerate() {
                    let t = self.check_expr(e);
                    if i == 0 {
                        elem_ty = t;
                    }
                }
                Type::array(elem_ty)
            }
            ExprKind::ArrayAccess { array, index } => {
                let array_ty = self.check_expr(array);
                let index_ty = self.check_expr(index);
                if !index_ty.is_integer() {
                    self.error(expr.token, format!("array index must be an integer, found {index_ty}"));
                }
                match array_ty.element_type() {
                    Some(elem) => elem.clone(),
                    None => {
                        self.error(expr.token, format!("cannot index non-array type {array_ty}"));
                        Type::any()
                    }
                }
            }
            ExprKind::Member { object, member } => self.check_member(object, *member),
            ExprKind::Increment { operand } | ExprKind::Decrement { operand } => {
                let ty = self.check_expr(operand);
                if !ty.is_integer() {
                    self.error(expr.token, format!("increment/decrement requires int or long, found {ty}"));
                }
                ty
            }
            ExprKind::Interpolated { parts } => {
                for p in parts.iter() {
                    self.check_expr(p);
                }
                Type::string()
            }
        }
    }

    fn check_binary<'a>(
        &mut self,
        token: Option<Token<'a>>,
        left: &Expr<'a>,
        op: TokenKind,
        right: &Expr<'a>,
    ) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        match op {
            TokenKind::Plus if lt == Type::string() && rt == Type::string() => Type::string(),
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                if Self::numeric_kind_match(&lt, &rt) {
                    lt
                } else {
                    self.error(
                        token,
                        format!("arithmetic operator requires matching numeric operands, found {lt} and {rt}"),
                    );
                    Type::any()
                }
            }
            _ if op.is_comparison() => {
                let ok = (lt.is_numeric() && lt == rt) || (lt == Type::string() && rt == Type::string());
                if !ok {
                    self.error(token, format!("comparison requires matching operand types, found {lt} and {rt}"));
                }
                Type::bool()
            }
            TokenKind::AmpAmp | TokenKind::PipePipe => {
                if lt != Type::bool() || rt != Type::bool() {
                    self.error(token, format!("logical operator requires bool operands, found {lt} and {rt}"));
                }
                Type::bool()
            }
            _ => {
                self.error(token, format!("unsupported binary operator {op:?}"));
                Type::any()
            }
        }
    }

    fn check_call<'a>(
        &mut self,
        token: Option<Token<'a>>,
        callee: &Expr<'a>,
        arguments: &[&Expr<'a>],
    ) -> Type {
        let callee_ty = self.check_expr(callee);
        let arg_types: Vec<Type> = arguments.iter().map(|a| self.check_expr(a)).collect();
        match callee_ty {
            Type::Function { ret, params } => {
                if params.len() != arg_types.len() {
                    let msg = format!("expected {} argument(s), found {}", params.len(), arg_types.len());
                    self.error(token, msg);
                } else {
                    for (expected, actual) in params.iter().zip(arg_types.iter()) {
                        if expected != actual && !expected.as_primitive().is_some_and(|p| p == crate::types::Primitive::Any) {
                            self.error(token, format!("expected argument of type {expected}, found {actual}"));
                        }
                    }
                }
                *ret
            }
            Type::Primitive(crate::types::Primitive::Any) => Type::any(),
            other => {
                self.error(token, format!("cannot call a value of type {other}"));
                Type::any()
            }
        }
    }

    /// Member access resolves against a fixed set of built-in
    /// capabilities per type (spec §4.4): `length` on arrays/strings,
    /// `push` on arrays.
    fn check_member<'a>(&mut self, object: &Expr<'a>, member: Token<'a>) -> Type {
        let obj_ty = self.check_expr(object);
        match (&obj_ty, member.lexeme) {
            (Type::Array(_), "length") => Type::long(),
            (Type::Primitive(crate::types::Primitive::String), "length") => Type::long(),
            (Type::Array(elem), "push") => {
                Type::function(Type::void(), vec![(**elem).clone()])
            }
            (Type::Primitive(crate::types::Primitive::Any), _) => Type::any(),
            _ => {
                self.error(
                    Some(member),
                    format!("type {obj_ty} has no member '{}'", member.lexeme),
                );
                Type::any()
            }
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::parser::Parser;
    use crate::symbol::SymbolTable as ParseSymbolTable;

    fn check_source<'a>(arena: &'a Arena, src: &str) -> (Module<'a>, Vec<Diagnostic>) {
        let mut symbols = ParseSymbolTable::new();
        let mut parser = Parser::new(arena, src, "<test>", &mut symbols);
        let module = parser.execute().expect("parse should succeed");
        let mut checker = TypeChecker::new();
        let diags = checker.check(&module);
        (module, diags)
    }

    #[test]
    fn simple_function_type_checks_and_annotates_call() {
        let arena = Arena::new();
        let (module, diags) = check_source(&arena, "fn main(): void => print(\"hello\\n\")");
        assert!(diags.is_empty(), "{diags:?}");
        match &module.statements[0].kind {
            StmtKind::Function { return_type, body, .. } => {
                assert_eq!(*return_type, Type::void());
                match body[0].kind {
                    StmtKind::Expr(e) => assert_eq!(e.expr_type(), Some(Type::void())),
                    _ => panic!(),
                }
            }
            _ => panic!(),
        }
    }

    #[test]
    fn mixed_numeric_binary_is_a_type_error() {
        let arena = Arena::new();
        let (_, diags) = check_source(&arena, "fn f(): void { var x: int = 1; var y: double = 2.0; var z: int = x + y; }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn string_concat_with_plus_yields_string() {
        let arena = Arena::new();
        let (module, diags) = check_source(&arena, "fn f(): string => \"a\" + \"b\"");
        assert!(diags.is_empty(), "{diags:?}");
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => match body[0].kind {
                StmtKind::Expr(e) => assert_eq!(e.expr_type(), Some(Type::string())),
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn undeclared_variable_is_a_type_error() {
        let arena = Arena::new();
        let (_, diags) = check_source(&arena, "fn f(): void { return nope; }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn argument_count_mismatch_is_a_type_error() {
        let arena = Arena::new();
        let (_, diags) = check_source(
            &arena,
            "fn add(a: int, b: int): int => a + b\nfn f(): void { var r: int = add(1); }",
        );
        assert!(!diags.is_empty());
    }

    #[test]
    fn every_expression_has_a_type_after_checking() {
        let arena = Arena::new();
        let (module, diags) = check_source(&arena, "fn f(): int => 1 + 2 * 3");
        assert!(diags.is_empty());
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => match body[0].kind {
                StmtKind::Expr(e) => assert!(e.expr_type().is_some()),
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn array_length_member_resolves_to_long() {
        let arena = Arena::new();
        let (module, diags) =
            check_source(&arena, "fn f(): long { var xs: int[] = [1, 2, 3]; return xs.length; }");
        assert!(diags.is_empty(), "{diags:?}");
        let _ = module;
    }
}
