//! Typed AST -> typed AST, semantics-preserving (spec §4.5). Runs the
//! rewrite set to fixed point: constant folding, dead-branch elimination,
//! removal of no-effect expression statements, and hoisting of provably
//! loop-invariant declarations. None of these change the set of
//! observable effects (prints, assignments, calls).

use hashbrown::HashSet;

use crate::arena::Arena;
use crate::ast::{Expr, ExprKind, LiteralValue, Module, Stmt, StmtKind};
use crate::token::{Token, TokenKind};
use crate::types::Type;

const MAX_PASSES: usize = 32;

pub struct Optimizer<'a> {
    arena: &'a Arena,
}

impl<'a> Optimizer<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Optimizer { arena }
    }

    /// Rewrites `module` in place, iterating until a pass makes no
    /// further change or [`MAX_PASSES`] is reached (a well-behaved
    /// rewrite set converges in a handful of passes; the cap is a
    /// backstop against a rewrite that oscillates).
    pub fn run(&self, module: &mut Module<'a>) {
        for _ in 0..MAX_PASSES {
            let mut changed = false;
            let mut rewritten = Vec::with_capacity(module.statements.len());
            for stmt in module.statements.iter() {
                rewritten.extend(self.rewrite_stmt(*stmt, &mut changed));
            }
            module.statements = rewritten;
            if !changed {
                break;
            }
        }
    }

    // ---- expressions ----

    /// `None` means unchanged; the caller reuses the original node.
    fn fold_expr(&self, e: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        match &e.kind {
            ExprKind::Literal { .. } | ExprKind::Variable { .. } => None,
            ExprKind::Assign { name, value } => {
                let new_value = self.fold_expr(*value)?;
                Some(Expr::assign(self.arena, *name, Some(new_value)).expect("assign with a value always succeeds"))
            }
            ExprKind::Binary { left, op, right } => {
                let new_left = self.fold_expr(*left);
                let new_right = self.fold_expr(*right);
                let l = new_left.unwrap_or(*left);
                let r = new_right.unwrap_or(*right);
                if let (ExprKind::Literal { value: lv, .. }, ExprKind::Literal { value: rv, .. }) = (&l.kind, &r.kind) {
                    if let Some(folded) = fold_binary_literals(self.arena, e.token, *op, lv, rv) {
                        return Some(folded);
                    }
                }
                if new_left.is_some() || new_right.is_some() {
                    Some(Expr::binary(self.arena, e.token, Some(l), *op, Some(r)).expect("binary with both operands always succeeds"))
                } else {
                    None
                }
            }
            ExprKind::Unary { op, operand } => {
                let new_operand = self.fold_expr(*operand);
                let o = new_operand.unwrap_or(*operand);
                if let ExprKind::Literal { value, .. } = &o.kind {
                    if let Some(folded) = fold_unary_literal(self.arena, e.token, *op, value) {
                        return Some(folded);
                    }
                }
                new_operand.map(|_| Expr::unary(self.arena, e.token, *op, Some(o)).expect("unary with an operand always succeeds"))
            }
            ExprKind::Call { callee, arguments } => {
                let new_callee = self.fold_expr(*callee);
                let mut any = false;
                let new_args: Vec<&'a Expr<'a>> = arguments
                    .iter()
                    .map(|a| match self.fold_expr(*a) {
                        Some(n) => {
                            any = true;
                            n
                        }
                        None => *a,
                    })
                    .collect();
                if new_callee.is_none() && !any {
                    return None;
                }
                let c = new_callee.unwrap_or(*callee);
                Some(Expr::call(self.arena, e.token, Some(c), &new_args).expect("call with a callee always succeeds"))
            }
            ExprKind::Array { elements } => {
                let mut any = false;
                let new_elems: Vec<&'a Expr<'a>> = elements
                    .iter()
                    .map(|el| match self.fold_expr(*el) {
                        Some(n) => {
                            any = true;
                            n
                        }
                        None => *el,
                    })
                    .collect();
                if any {
                    Some(Expr::array(self.arena, e.token, &new_elems))
                } else {
                    None
                }
            }
            ExprKind::ArrayAccess { array, index } => {
                let new_array = self.fold_expr(*array);
                let new_index = self.fold_expr(*index);
                if new_array.is_none() && new_index.is_none() {
                    return None;
                }
                let a = new_array.unwrap_or(*array);
                let i = new_index.unwrap_or(*index);
                Some(Expr::array_access(self.arena, e.token, Some(a), Some(i)).expect("array access with both children always succeeds"))
            }
            ExprKind::Member { object, member } => {
                let new_object = self.fold_expr(*object)?;
                Some(Expr::member(self.arena, Some(new_object), *member).expect("member with an object always succeeds"))
            }
            ExprKind::Increment { operand } => {
                let new_operand = self.fold_expr(*operand)?;
                Some(Expr::increment(self.arena, e.token, Some(new_operand)).expect("increment with an operand always succeeds"))
            }
            ExprKind::Decrement { operand } => {
                let new_operand = self.fold_expr(*operand)?;
                Some(Expr::decrement(self.arena, e.token, Some(new_operand)).expect("decrement with an operand always succeeds"))
            }
            ExprKind::Interpolated { parts } => {
                let mut any = false;
                let new_parts: Vec<&'a Expr<'a>> = parts
                    .iter()
                    .map(|p| match self.fold_expr(*p) {
                        Some(n) => {
                            any = true;
                            n
                        }
                        None => *p,
                    })
                    .collect();
                if any {
                    Some(Expr::interpolated(self.arena, e.token, &new_parts))
                } else {
                    None
                }
            }
        }
    }

    // ---- statements ----

    fn rewrite_block(&self, stmts: &'a [Stmt<'a>], changed: &mut bool) -> Vec<&'a Stmt<'a>> {
        let mut out = Vec::new();
        for s in stmts.iter() {
            out.extend(self.rewrite_stmt(s, changed));
        }
        out
    }

    /// A branch target (`if`'s then/else, `while`'s body) is a single
    /// `&Stmt`; fold its block to a list, then re-wrap into one node.
    fn rewrite_branch(&self, s: &'a Stmt<'a>, changed: &mut bool) -> &'a Stmt<'a> {
        let rewritten = self.rewrite_stmt(s, changed);
        match rewritten.len() {
            0 => Stmt::block(self.arena, None, &[]),
            1 if std::ptr::eq(rewritten[0], s) => s,
            1 => rewritten[0],
            _ => Stmt::block(self.arena, s.token, &to_owned_stmts(&rewritten)),
        }
    }

    /// Returns the replacement statements: empty for an eliminated
    /// statement, one for the common case, two when a loop-invariant
    /// declaration was hoisted ahead of its loop.
    fn rewrite_stmt(&self, s: &'a Stmt<'a>, changed: &mut bool) -> Vec<&'a Stmt<'a>> {
        match &s.kind {
            StmtKind::Expr(e) => {
                let folded = self.fold_expr(*e);
                let e2 = folded.unwrap_or(*e);
                if matches!(e2.kind, ExprKind::Variable { .. }) {
                    *changed = true;
                    return Vec::new();
                }
                if folded.is_none() {
                    vec![s]
                } else {
                    *changed = true;
                    vec![Stmt::expr_stmt(self.arena, e2)]
                }
            }
            StmtKind::VarDecl { name, ty, init } => {
                let new_init = init.and_then(|e| self.fold_expr(e));
                if new_init.is_none() {
                    vec![s]
                } else {
                    *changed = true;
                    vec![Stmt::var_decl(self.arena, *name, Some(ty.clone()), new_init).expect("var_decl with a resolved type always succeeds")]
                }
            }
            StmtKind::Function { name, params, return_type, body } => {
                let new_body = self.rewrite_block(*body, changed);
                vec![Stmt::function(self.arena, *name, params, return_type.clone(), &to_owned_stmts(&new_body))]
            }
            StmtKind::Return { keyword, value } => {
                let new_value = value.and_then(|e| self.fold_expr(e));
                match new_value {
                    Some(v) => {
                        *changed = true;
                        vec![Stmt::return_stmt(self.arena, *keyword, Some(v))]
                    }
                    None => vec![s],
                }
            }
            StmtKind::Block { stmts } => {
                let new_stmts = self.rewrite_block(*stmts, changed);
                vec![Stmt::block(self.arena, s.token, &to_owned_stmts(&new_stmts))]
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                let folded_cond = self.fold_expr(*cond);
                let cond2 = folded_cond.unwrap_or(*cond);
                if let Some(b) = literal_bool(cond2) {
                    *changed = true;
                    return if b {
                        self.rewrite_stmt(*then_branch, changed)
                    } else {
                        match else_branch {
                            Some(e) => self.rewrite_stmt(*e, changed),
                            None => Vec::new(),
                        }
                    };
                }
                let then2 = self.rewrite_branch(*then_branch, changed);
                let else2 = else_branch.map(|e| self.rewrite_branch(e, changed));
                vec![Stmt::if_stmt(self.arena, s.token, Some(cond2), Some(then2), else2).expect("if with cond and then always succeeds")]
            }
            StmtKind::While { cond, body } => {
                let folded_cond = self.fold_expr(*cond);
                let cond2 = folded_cond.unwrap_or(*cond);
                let body_stmts = self.rewrite_block(block_stmts(*body), changed);

                let mut assigned = HashSet::new();
                assigned_vars_expr(cond2, &mut assigned);
                for st in &body_stmts {
                    assigned_vars(*st, &mut assigned);
                }
                let (hoisted, retained) = hoist_invariants(&body_stmts, &assigned, changed);

                let new_body = Stmt::block(self.arena, (*body).token, &retained);
                let mut out = hoisted;
                out.push(Stmt::while_stmt(self.arena, s.token, Some(cond2), Some(new_body)).expect("while with cond and body always succeeds"));
                out
            }
            StmtKind::For { init, cond, step, body } => {
                let new_init = init.map(|i| self.rewrite_stmt(i, changed)).map(|v| v.into_iter().next()).unwrap_or(None);
                let new_cond = cond.and_then(|c| self.fold_expr(c)).or(*cond);
                let new_step = step.and_then(|st| self.fold_expr(st)).or(*step);
                let new_body = self.rewrite_branch(*body, changed);
                vec![Stmt::for_stmt(self.arena, s.token, new_init, new_cond, new_step, Some(new_body)).expect("for with a body always succeeds")]
            }
            StmtKind::Import { .. } => vec![s],
        }
    }
}

/// `while`'s body is always a single `Stmt`, usually a `Block`; treat a
/// bare non-block body as a one-statement block for hoisting purposes.
fn block_stmts<'a>(body: &'a Stmt<'a>) -> &'a [Stmt<'a>] {
    match &body.kind {
        StmtKind::Block { stmts } => stmts,
        _ => std::slice::from_ref(body),
    }
}

fn literal_bool<'a>(e: &'a Expr<'a>) -> Option<bool> {
    match &e.kind {
        ExprKind::Literal { value: LiteralValue::Bool(b), .. } => Some(*b),
        _ => None,
    }
}

/// `Stmt::block`/`Stmt::function` clone their body into the arena
/// themselves; the rewrite passes work with references into the
/// existing arena, so bridge the two by cloning each referenced
/// statement once before handing the slice over.
fn to_owned_stmts<'a>(stmts: &[&'a Stmt<'a>]) -> Vec<Stmt<'a>> {
    stmts.iter().map(|s| (**s).clone()).collect()
}

fn fold_binary_literals<'a>(
    arena: &'a Arena,
    token: Option<Token<'a>>,
    op: TokenKind,
    lv: &LiteralValue<'a>,
    rv: &LiteralValue<'a>,
) -> Option<&'a Expr<'a>> {
    let (lit, ty): (LiteralValue<'a>, Type) = match (lv, rv) {
        (LiteralValue::Int(a), LiteralValue::Int(b)) => match op {
            TokenKind::Plus => (LiteralValue::Int(a.checked_add(*b)?), Type::int()),
            TokenKind::Minus => (LiteralValue::Int(a.checked_sub(*b)?), Type::int()),
            TokenKind::Star => (LiteralValue::Int(a.checked_mul(*b)?), Type::int()),
            TokenKind::Slash if *b != 0 => (LiteralValue::Int(a.checked_div(*b)?), Type::int()),
            TokenKind::Percent if *b != 0 => (LiteralValue::Int(a.checked_rem(*b)?), Type::int()),
            TokenKind::EqualEqual => (LiteralValue::Bool(a == b), Type::bool()),
            TokenKind::BangEqual => (LiteralValue::Bool(a != b), Type::bool()),
            TokenKind::Less => (LiteralValue::Bool(a < b), Type::bool()),
            TokenKind::LessEqual => (LiteralValue::Bool(a <= b), Type::bool()),
            TokenKind::Greater => (LiteralValue::Bool(a > b), Type::bool()),
            TokenKind::GreaterEqual => (LiteralValue::Bool(a >= b), Type::bool()),
            _ => return None,
        },
        (LiteralValue::Double(a), LiteralValue::Double(b)) => match op {
            TokenKind::Plus => (LiteralValue::Double(a + b), Type::double()),
            TokenKind::Minus => (LiteralValue::Double(a - b), Type::double()),
            TokenKind::Star => (LiteralValue::Double(a * b), Type::double()),
            TokenKind::Slash if *b != 0.0 => (LiteralValue::Double(a / b), Type::double()),
            TokenKind::EqualEqual => (LiteralValue::Bool(a == b), Type::bool()),
            TokenKind::BangEqual => (LiteralValue::Bool(a != b), Type::bool()),
            TokenKind::Less => (LiteralValue::Bool(a < b), Type::bool()),
            TokenKind::LessEqual => (LiteralValue::Bool(a <= b), Type::bool()),
            TokenKind::Greater => (LiteralValue::Bool(a > b), Type::bool()),
            TokenKind::GreaterEqual => (LiteralValue::Bool(a >= b), Type::bool()),
            _ => return None,
        },
        (LiteralValue::Bool(a), LiteralValue::Bool(b)) => match op {
            TokenKind::EqualEqual => (LiteralValue::Bool(a == b), Type::bool()),
            TokenKind::BangEqual => (LiteralValue::Bool(a != b), Type::bool()),
            TokenKind::AmpAmp => (LiteralValue::Bool(*a && *b), Type::bool()),
            TokenKind::PipePipe => (LiteralValue::Bool(*a || *b), Type::bool()),
            _ => return None,
        },
        (LiteralValue::String(a), LiteralValue::String(b)) => match op {
            TokenKind::Plus => {
                let mut joined = std::string::String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                (LiteralValue::String(arena.alloc_str(&joined)), Type::string())
            }
            TokenKind::EqualEqual => (LiteralValue::Bool(a == b), Type::bool()),
            TokenKind::BangEqual => (LiteralValue::Bool(a != b), Type::bool()),
            _ => return None,
        },
        _ => return None,
    };
    let tok = token.unwrap_or_else(|| Token::new(TokenKind::NumberLiteral, "", 0, "<const-fold>"));
    Some(Expr::literal(arena, tok, lit, ty, false))
}

fn fold_unary_literal<'a>(
    arena: &'a Arena,
    token: Option<Token<'a>>,
    op: TokenKind,
    v: &LiteralValue<'a>,
) -> Option<&'a Expr<'a>> {
    let (lit, ty) = match (op, v) {
        (TokenKind::Minus, LiteralValue::Int(a)) => (LiteralValue::Int(a.checked_neg()?), Type::int()),
        (TokenKind::Minus, LiteralValue::Double(a)) => (LiteralValue::Double(-a), Type::double()),
        (TokenKind::Bang, LiteralValue::Bool(a)) => (LiteralValue::Bool(!a), Type::bool()),
        _ => return None,
    };
    let tok = token.unwrap_or_else(|| Token::new(TokenKind::NumberLiteral, "", 0, "<const-fold>"));
    Some(Expr::literal(arena, tok, lit, ty, false))
}

// ---- loop-invariant hoisting ----

fn assigned_vars<'a>(s: &'a Stmt<'a>, out: &mut HashSet<&'a str>) {
    match &s.kind {
        StmtKind::Expr(e) => assigned_vars_expr(*e, out),
        StmtKind::VarDecl { init: Some(e), .. } => assigned_vars_expr(*e, out),
        StmtKind::VarDecl { init: None, .. } => {}
        StmtKind::Return { value: Some(e), .. } => assigned_vars_expr(*e, out),
        StmtKind::Return { value: None, .. } => {}
        StmtKind::Block { stmts } => {
            for st in stmts.iter() {
                assigned_vars(st, out);
            }
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            assigned_vars_expr(*cond, out);
            assigned_vars(*then_branch, out);
            if let Some(e) = else_branch {
                assigned_vars(*e, out);
            }
        }
        StmtKind::While { cond, body } => {
            assigned_vars_expr(*cond, out);
            assigned_vars(*body, out);
        }
        StmtKind::For { init, cond, step, body } => {
            if let Some(i) = init {
                assigned_vars(*i, out);
            }
            if let Some(c) = cond {
                assigned_vars_expr(*c, out);
            }
            if let Some(st) = step {
                assigned_vars_expr(*st, out);
            }
            assigned_vars(*body, out);
        }
        StmtKind::Function { .. } | StmtKind::Import { .. } => {}
    }
}

fn assigned_vars_expr<'a>(e: &'a Expr<'a>, out: &mut HashSet<&'a str>) {
    match &e.kind {
        ExprKind::Assign { name, value } => {
            out.insert(name.lexeme);
            assigned_vars_expr(*value, out);
        }
        ExprKind::Increment { operand } | ExprKind::Decrement { operand } => {
            if let ExprKind::Variable { name } = &operand.kind {
                out.insert(name.lexeme);
            }
        }
        ExprKind::Binary { left, right, .. } => {
            assigned_vars_expr(*left, out);
            assigned_vars_expr(*right, out);
        }
        ExprKind::Unary { operand, .. } => assigned_vars_expr(*operand, out),
        ExprKind::Call { callee, arguments } => {
            assigned_vars_expr(*callee, out);
            for a in arguments.iter() {
                assigned_vars_expr(*a, out);
            }
        }
        ExprKind::Array { elements } => {
            for el in elements.iter() {
                assigned_vars_expr(*el, out);
            }
        }
        ExprKind::ArrayAccess { array, index } => {
            assigned_vars_expr(*array, out);
            assigned_vars_expr(*index, out);
        }
        ExprKind::Member { object, .. } => assigned_vars_expr(*object, out),
        ExprKind::Interpolated { parts } => {
            for p in parts.iter() {
                assigned_vars_expr(*p, out);
            }
        }
        ExprKind::Literal { .. } | ExprKind::Variable { .. } => {}
    }
}

fn collect_vars<'a>(e: &'a Expr<'a>, out: &mut HashSet<&'a str>) {
    match &e.kind {
        ExprKind::Variable { name } => {
            out.insert(name.lexeme);
        }
        ExprKind::Assign { name, value } => {
            out.insert(name.lexeme);
            collect_vars(*value, out);
        }
        ExprKind::Binary { left, right, .. } => {
            collect_vars(*left, out);
            collect_vars(*right, out);
        }
        ExprKind::Unary { operand, .. } => collect_vars(*operand, out),
        ExprKind::Call { callee, arguments } => {
            collect_vars(*callee, out);
            for a in arguments.iter() {
                collect_vars(*a, out);
            }
        }
        ExprKind::Array { elements } => {
            for el in elements.iter() {
                collect_vars(*el, out);
            }
        }
        ExprKind::ArrayAccess { array, index } => {
            collect_vars(*array, out);
            collect_vars(*index, out);
        }
        ExprKind::Member { object, .. } => collect_vars(*object, out),
        ExprKind::Increment { operand } | ExprKind::Decrement { operand } => collect_vars(*operand, out),
        ExprKind::Interpolated { parts } => {
            for p in parts.iter() {
                collect_vars(*p, out);
            }
        }
        ExprKind::Literal { .. } => {}
    }
}

fn is_pure<'a>(e: &'a Expr<'a>) -> bool {
    match &e.kind {
        ExprKind::Call { .. } | ExprKind::Assign { .. } | ExprKind::Increment { .. } | ExprKind::Decrement { .. } => false,
        ExprKind::Literal { .. } | ExprKind::Variable { .. } => true,
        ExprKind::Binary { left, right, .. } => is_pure(*left) && is_pure(*right),
        ExprKind::Unary { operand, .. } => is_pure(*operand),
        ExprKind::Array { elements } => elements.iter().all(|el| is_pure(*el)),
        ExprKind::ArrayAccess { array, index } => is_pure(*array) && is_pure(*index),
        ExprKind::Member { object, .. } => is_pure(*object),
        ExprKind::Interpolated { parts } => parts.iter().all(|p| is_pure(*p)),
    }
}

/// Splits a loop body's top-level statements into ones safe to hoist
/// ahead of the loop (pure initializers referencing no variable the
/// loop assigns or redeclares earlier in the body) and the rest.
fn hoist_invariants<'a>(
    stmts: &[&'a Stmt<'a>],
    assigned: &HashSet<&'a str>,
    changed: &mut bool,
) -> (Vec<&'a Stmt<'a>>, Vec<Stmt<'a>>) {
    let mut hoisted = Vec::new();
    let mut retained = Vec::new();
    let mut locally_declared: HashSet<&'a str> = HashSet::new();
    for s in stmts {
        if let StmtKind::VarDecl { name, init: Some(init), .. } = &s.kind {
            let mut vars = HashSet::new();
            collect_vars(*init, &mut vars);
            let invariant = is_pure(*init) && vars.iter().all(|v| !assigned.contains(v) && !locally_declared.contains(v));
            if invariant {
                *changed = true;
                hoisted.push(*s);
                locally_declared.insert(name.lexeme);
                continue;
            }
        }
        if let StmtKind::VarDecl { name, .. } = &s.kind {
            locally_declared.insert(name.lexeme);
        }
        retained.push((**s).clone());
    }
    (hoisted, retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::symbol::SymbolTable;

    fn optimized<'a>(arena: &'a Arena, src: &str) -> Module<'a> {
        let mut symbols = SymbolTable::new();
        let mut parser = Parser::new(arena, src, "<test>", &mut symbols);
        let mut module = parser.execute().expect("parse should succeed");
        Optimizer::new(arena).run(&mut module);
        module
    }

    fn first_expr<'a>(module: &Module<'a>) -> &'a Expr<'a> {
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => match body[0].kind {
                StmtKind::Expr(e) => e,
                _ => panic!("expected an expression statement"),
            },
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn folds_arithmetic_over_literals() {
        let arena = Arena::new();
        let module = optimized(&arena, "fn f(): int => 1 + 2 * 3");
        let e = first_expr(&module);
        assert!(matches!(e.kind, ExprKind::Literal { value: LiteralValue::Int(7), .. }));
    }

    #[test]
    fn folds_string_concatenation() {
        let arena = Arena::new();
        let module = optimized(&arena, "fn f(): string => \"ab\" + \"cd\"");
        let e = first_expr(&module);
        match e.kind {
            ExprKind::Literal { value: LiteralValue::String(s), .. } => assert_eq!(s, "abcd"),
            _ => panic!("expected a folded string literal"),
        }
    }

    #[test]
    fn does_not_fold_division_by_zero() {
        let arena = Arena::new();
        let module = optimized(&arena, "fn f(): int => 1 / 0");
        let e = first_expr(&module);
        assert!(matches!(e.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn eliminates_dead_if_branch_on_literal_true() {
        let arena = Arena::new();
        let module = optimized(&arena, "fn f(): void { if (true) { var x: int = 1; } else { var x: int = 2; } }");
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => match &body[0].kind {
                StmtKind::VarDecl { init: Some(e), .. } => {
                    assert!(matches!(e.kind, ExprKind::Literal { value: LiteralValue::Int(1), .. }));
                }
                other => panic!("expected the then-branch to survive alone, got {other:?}"),
            },
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn removes_bare_variable_reference_statement() {
        let arena = Arena::new();
        let module = optimized(&arena, "fn f(): void { var x: int = 1; x; }");
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => assert_eq!(body.len(), 1),
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn hoists_loop_invariant_declaration_out_of_while() {
        let arena = Arena::new();
        let module = optimized(
            &arena,
            "fn f(): void { var i: int = 0; while (i < 10) { var k: int = 2 * 3; i = i + 1; } }",
        );
        match &module.statements[0].kind {
            StmtKind::Function { body, .. } => {
                // the hoisted `k` decl lands right before the (rewritten) while loop
                assert!(body.len() >= 3);
                let hoisted_index = body.len() - 2;
                match &body[hoisted_index].kind {
                    StmtKind::VarDecl { name, .. } => assert_eq!(name.lexeme, "k"),
                    other => panic!("expected the hoisted decl, got {other:?}"),
                }
                match &body[body.len() - 1].kind {
                    StmtKind::While { .. } => {}
                    other => panic!("expected the while loop last, got {other:?}"),
                }
            }
            _ => panic!("expected a function"),
        }
    }
}
