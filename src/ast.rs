//! The typed expression/statement tree (spec §3.1).
//!
//! All nodes are allocated from an [`Arena`] and borrow from it, so the
//! tree's lifetime is literally the arena's lifetime — nothing is freed
//! node-by-node. Constructors that have a *required* child accept that
//! child as `Option<&Expr>`/`Option<&Stmt>` (since a sub-parse may have
//! failed) and return `None` themselves when a required child is
//! missing, the Rust rendition of "constructor precondition violated ->
//! no node produced" (spec §3.1). Genuinely optional children (an
//! `if`'s `else`, a `for`'s initializer, a `return`'s value, an
//! `import`'s namespace alias) are plain `Option` fields on the node.

use std::cell::RefCell;

use crate::arena::Arena;
use crate::token::{Token, TokenKind};
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Int(i64),
    Double(f64),
    Char(char),
    String(&'a str),
    Bool(bool),
}

#[derive(Debug)]
pub enum ExprKind<'a> {
    Literal { value: LiteralValue<'a>, literal_type: Type, interpolated: bool },
    Variable { name: Token<'a> },
    Assign { name: Token<'a>, value: &'a Expr<'a> },
    /// Also used for comparisons (`== != < <= > >=`): the spec leaves it
    /// an open question whether these should diverge into a separate
    /// kind and explicitly says not to guess, so `op` simply ranges over
    /// both the arithmetic and comparison operator tokens.
    Binary { left: &'a Expr<'a>, op: TokenKind, right: &'a Expr<'a> },
    Unary { op: TokenKind, operand: &'a Expr<'a> },
    Call { callee: &'a Expr<'a>, arguments: &'a [&'a Expr<'a>] },
    Array { elements: &'a [&'a Expr<'a>] },
    ArrayAccess { array: &'a Expr<'a>, index: &'a Expr<'a> },
    Member { object: &'a Expr<'a>, member: Token<'a> },
    Increment { operand: &'a Expr<'a> },
    Decrement { operand: &'a Expr<'a> },
    Interpolated { parts: &'a [&'a Expr<'a>] },
}

/// Every expression carries its source token (absent for some
/// synthesized nodes) and a resolved type, filled in by the type
/// checker and `None` until then (spec §8: "no expression has
/// `expr_type != null` before type checking").
#[derive(Debug)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub token: Option<Token<'a>>,
    expr_type: RefCell<Option<Type>>,
}

impl<'a> Expr<'a> {
    fn alloc(arena: &'a Arena, token: Option<Token<'a>>, kind: ExprKind<'a>) -> &'a Expr<'a> {
        arena.alloc(Expr { kind, token, expr_type: RefCell::new(None) })
    }

    pub fn expr_type(&self) -> Option<Type> {
        self.expr_type.borrow().clone()
    }

    pub fn set_expr_type(&self, ty: Type) {
        *self.expr_type.borrow_mut() = Some(ty);
    }

    pub fn literal(
        arena: &'a Arena,
        token: Token<'a>,
        value: LiteralValue<'a>,
        literal_type: Type,
        interpolated: bool,
    ) -> &'a Expr<'a> {
        Self::alloc(
            arena,
            Some(token),
            ExprKind::Literal { value, literal_type, interpolated },
        )
    }

    pub fn variable(arena: &'a Arena, name: Token<'a>) -> &'a Expr<'a> {
        Self::alloc(arena, Some(name), ExprKind::Variable { name })
    }

    pub fn assign(
        arena: &'a Arena,
        name: Token<'a>,
        value: Option<&'a Expr<'a>>,
    ) -> Option<&'a Expr<'a>> {
        let value = value?;
        Some(Self::alloc(arena, Some(name), ExprKind::Assign { name, value }))
    }

    pub fn binary(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        left: Option<&'a Expr<'a>>,
        op: TokenKind,
        right: Option<&'a Expr<'a>>,
    ) -> Option<&'a Expr<'a>> {
        let (left, right) = (left?, right?);
        Some(Self::alloc(arena, token, ExprKind::Binary { left, op, right }))
    }

    /// Alias kept for readability at call sites that build comparisons;
    /// identical to [`Expr::binary`] (see module doc and DESIGN.md).
    pub fn comparison(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        left: Option<&'a Expr<'a>>,
        op: TokenKind,
        right: Option<&'a Expr<'a>>,
    ) -> Option<&'a Expr<'a>> {
        Self::binary(arena, token, left, op, right)
    }

    pub fn unary(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        op: TokenKind,
        operand: Option<&'a Expr<'a>>,
    ) -> Option<&'a Expr<'a>> {
        let operand = operand?;
        Some(Self::alloc(arena, token, ExprKind::Unary { op, operand }))
    }

    pub fn call(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        callee: Option<&'a Expr<'a>>,
        arguments: &[&'a Expr<'a>],
    ) -> Option<&'a Expr<'a>> {
        let callee = callee?;
        let arguments = arena.alloc_slice(arguments);
        Some(Self::alloc(arena, token, ExprKind::Call { callee, arguments }))
    }

    pub fn array(arena: &'a Arena, token: Option<Token<'a>>, elements: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        let elements = arena.alloc_slice(elements);
        Self::alloc(arena, token, ExprKind::Array { elements })
    }

    pub fn array_access(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        array: Option<&'a Expr<'a>>,
        index: Option<&'a Expr<'a>>,
    ) -> Option<&'a Expr<'a>> {
        let (array, index) = (array?, index?);
        Some(Self::alloc(arena, token, ExprKind::ArrayAccess { array, index }))
    }

    pub fn member(
        arena: &'a Arena,
        object: Option<&'a Expr<'a>>,
        member: Token<'a>,
    ) -> Option<&'a Expr<'a>> {
        let object = object?;
        Some(Self::alloc(arena, Some(member), ExprKind::Member { object, member }))
    }

    pub fn increment(arena: &'a Arena, token: Option<Token<'a>>, operand: Option<&'a Expr<'a>>) -> Option<&'a Expr<'a>> {
        let operand = operand?;
        Some(Self::alloc(arena, token, ExprKind::Increment { operand }))
    }

    pub fn decrement(arena: &'a Arena, token: Option<Token<'a>>, operand: Option<&'a Expr<'a>>) -> Option<&'a Expr<'a>> {
        let operand = operand?;
        Some(Self::alloc(arena, token, ExprKind::Decrement { operand }))
    }

    pub fn interpolated(arena: &'a Arena, token: Option<Token<'a>>, parts: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        let parts = arena.alloc_slice(parts);
        Self::alloc(arena, token, ExprKind::Interpolated { parts })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    pub name: Token<'a>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub enum StmtKind<'a> {
    Expr(&'a Expr<'a>),
    VarDecl { name: Token<'a>, ty: Type, init: Option<&'a Expr<'a>> },
    Function {
        name: Token<'a>,
        params: &'a [Parameter<'a>],
        return_type: Type,
        body: &'a [Stmt<'a>],
    },
    Return { keyword: Token<'a>, value: Option<&'a Expr<'a>> },
    Block { stmts: &'a [Stmt<'a>] },
    If {
        cond: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
    },
    While { cond: &'a Expr<'a>, body: &'a Stmt<'a> },
    For {
        init: Option<&'a Stmt<'a>>,
        cond: Option<&'a Expr<'a>>,
        step: Option<&'a Expr<'a>>,
        body: &'a Stmt<'a>,
    },
    Import { module_name: Token<'a>, namespace: Option<Token<'a>> },
}

#[derive(Debug, Clone)]
pub struct Stmt<'a> {
    pub kind: StmtKind<'a>,
    pub token: Option<Token<'a>>,
}

impl<'a> Stmt<'a> {
    fn alloc(arena: &'a Arena, token: Option<Token<'a>>, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        arena.alloc(Stmt { kind, token })
    }

    pub fn expr_stmt(arena: &'a Arena, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        Self::alloc(arena, expr.token, StmtKind::Expr(expr))
    }

    /// `VarDecl` without a resolved type is a contract violation: no node.
    pub fn var_decl(
        arena: &'a Arena,
        name: Token<'a>,
        ty: Option<Type>,
        init: Option<&'a Expr<'a>>,
    ) -> Option<&'a Stmt<'a>> {
        let ty = ty?;
        Some(Self::alloc(arena, Some(name), StmtKind::VarDecl { name, ty, init }))
    }

    pub fn function(
        arena: &'a Arena,
        name: Token<'a>,
        params: &[Parameter<'a>],
        return_type: Type,
        body: &[Stmt<'a>],
    ) -> &'a Stmt<'a> {
        let params = arena.alloc_slice(params);
        let body = arena.alloc_slice(body);
        Self::alloc(
            arena,
            Some(name),
            StmtKind::Function { name, params, return_type, body },
        )
    }

    pub fn return_stmt(arena: &'a Arena, keyword: Token<'a>, value: Option<&'a Expr<'a>>) -> &'a Stmt<'a> {
        Self::alloc(arena, Some(keyword), StmtKind::Return { keyword, value })
    }

    pub fn block(arena: &'a Arena, token: Option<Token<'a>>, stmts: &[Stmt<'a>]) -> &'a Stmt<'a> {
        let stmts = arena.alloc_slice(stmts);
        Self::alloc(arena, token, StmtKind::Block { stmts })
    }

    /// `if` without a condition or a then-branch is a contract violation.
    pub fn if_stmt(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        cond: Option<&'a Expr<'a>>,
        then_branch: Option<&'a Stmt<'a>>,
        else_branch: Option<&'a Stmt<'a>>,
    ) -> Option<&'a Stmt<'a>> {
        let (cond, then_branch) = (cond?, then_branch?);
        Some(Self::alloc(arena, token, StmtKind::If { cond, then_branch, else_branch }))
    }

    pub fn while_stmt(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        cond: Option<&'a Expr<'a>>,
        body: Option<&'a Stmt<'a>>,
    ) -> Option<&'a Stmt<'a>> {
        let (cond, body) = (cond?, body?);
        Some(Self::alloc(arena, token, StmtKind::While { cond, body }))
    }

    /// `for` permits init/cond/step to be omitted; only the body is required.
    pub fn for_stmt(
        arena: &'a Arena,
        token: Option<Token<'a>>,
        init: Option<&'a Stmt<'a>>,
        cond: Option<&'a Expr<'a>>,
        step: Option<&'a Expr<'a>>,
        body: Option<&'a Stmt<'a>>,
    ) -> Option<&'a Stmt<'a>> {
        let body = body?;
        Some(Self::alloc(arena, token, StmtKind::For { init, cond, step, body }))
    }

    pub fn import(
        arena: &'a Arena,
        module_name: Token<'a>,
        namespace: Option<Token<'a>>,
    ) -> &'a Stmt<'a> {
        Self::alloc(arena, Some(module_name), StmtKind::Import { module_name, namespace })
    }
}

/// The in-memory result of parsing one source file: its filename and an
/// ordered list of top-level statements, growing by doubling from an
/// initial capacity of 8 (spec §3.1).
#[derive(Debug)]
pub struct Module<'a> {
    pub filename: String,
    pub statements: Vec<&'a Stmt<'a>>,
}

impl<'a> Module<'a> {
    pub fn new(filename: impl Into<String>) -> Self {
        Module { filename: filename.into(), statements: Vec::with_capacity(8) }
    }

    pub fn push(&mut self, stmt: &'a Stmt<'a>) {
        self.statements.push(stmt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, lexeme: &str) -> Token<'_> {
        Token::new(kind, lexeme, 1, "<test>")
    }

    #[test]
    fn binary_requires_both_children() {
        let arena = Arena::new();
        let lit = Expr::literal(&arena, tok(TokenKind::NumberLiteral, "1"), LiteralValue::Int(1), Type::int(), false);
        assert!(Expr::binary(&arena, None, Some(lit), TokenKind::Plus, None).is_none());
        assert!(Expr::binary(&arena, None, None, TokenKind::Plus, Some(lit)).is_none());
        assert!(Expr::binary(&arena, None, Some(lit), TokenKind::Plus, Some(lit)).is_some());
    }

    #[test]
    fn array_access_requires_array_and_index() {
        let arena = Arena::new();
        let lit = Expr::literal(&arena, tok(TokenKind::NumberLiteral, "1"), LiteralValue::Int(1), Type::int(), false);
        assert!(Expr::array_access(&arena, None, None, Some(lit)).is_none());
        assert!(Expr::array_access(&arena, None, Some(lit), None).is_none());
        assert!(Expr::array_access(&arena, None, Some(lit), Some(lit)).is_some());
    }

    #[test]
    fn var_decl_requires_type() {
        let arena = Arena::new();
        assert!(Stmt::var_decl(&arena, tok(TokenKind::Identifier, "x"), None, None).is_none());
        assert!(Stmt::var_decl(&arena, tok(TokenKind::Identifier, "x"), Some(Type::int()), None).is_some());
    }

    #[test]
    fn if_requires_cond_and_then_branch() {
        let arena = Arena::new();
        let lit = Expr::literal(&arena, tok(TokenKind::True, "true"), LiteralValue::Bool(true), Type::bool(), false);
        let then = Stmt::block(&arena, None, &[]);
        assert!(Stmt::if_stmt(&arena, None, None, Some(then), None).is_none());
        assert!(Stmt::if_stmt(&arena, None, Some(lit), None, None).is_none());
        assert!(Stmt::if_stmt(&arena, None, Some(lit), Some(then), None).is_some());
    }

    #[test]
    fn for_allows_omitted_init_cond_step() {
        let arena = Arena::new();
        let body = Stmt::block(&arena, None, &[]);
        let stmt = Stmt::for_stmt(&arena, None, None, None, None, Some(body)).unwrap();
        match stmt.kind {
            StmtKind::For { init, cond, step, .. } => {
                assert!(init.is_none());
                assert!(cond.is_none());
                assert!(step.is_none());
            }
            _ => panic!("expected For"),
        }
    }

    #[test]
    fn expr_type_starts_absent_and_is_settable() {
        let arena = Arena::new();
        let lit = Expr::literal(&arena, tok(TokenKind::NumberLiteral, "1"), LiteralValue::Int(1), Type::int(), false);
        assert_eq!(lit.expr_type(), None);
        lit.set_expr_type(Type::int());
        assert_eq!(lit.expr_type(), Some(Type::int()));
    }

    #[test]
    fn module_starts_with_capacity_eight_and_grows() {
        let arena = Arena::new();
        let mut module = Module::new("<test>");
        assert_eq!(module.statements.capacity(), 8);
        for _ in 0..20 {
            module.push(Stmt::block(&arena, None, &[]));
        }
        assert_eq!(module.statements.len(), 20);
    }
}
