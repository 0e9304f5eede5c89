//! Tokens -> Module (spec §4.2): predictive recursive descent with
//! panic-mode recovery at statement boundaries.

use crate::arena::Arena;
use crate::ast::{Expr, LiteralValue, Module, Parameter, Stmt};
use crate::error::{Diagnostic, Location};
use crate::lexer::Lexer;
use crate::symbol::{Symbol, SymbolKind, SymbolTable};
use crate::token::{Token, TokenKind};
use crate::types::Type;

pub struct Parser<'a, 'b> {
    arena: &'a Arena,
    lexer: Lexer<'a>,
    symbols: &'b mut SymbolTable,
    filename: &'a str,
    previous: Token<'a>,
    current: Token<'a>,
    pub diagnostics: Vec<Diagnostic>,
    had_error: bool,
}

type ExprResult<'a> = Option<&'a Expr<'a>>;
type StmtResult<'a> = Option<&'a Stmt<'a>>;

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(arena: &'a Arena, source: &str, filename: &'a str, symbols: &'b mut SymbolTable) -> Self {
        let mut lexer = Lexer::new(arena, source, filename);
        let first = lexer.next_token();
        Parser {
            arena,
            lexer,
            symbols,
            filename,
            previous: first,
            current: first,
            diagnostics: Vec::new(),
            had_error: false,
        }
    }

    fn location(&self, tok: Token<'a>) -> Location {
        Location { line: tok.line, filename: tok.filename.to_string() }
    }

    fn error_at(&mut self, tok: Token<'a>, message: impl Into<String>) {
        self.had_error = true;
        self.diagnostics.push(Diagnostic::new(self.location(tok), message));
    }

    fn advance(&mut self) -> Token<'a> {
        self.previous = self.current;
        loop {
            self.current = self.lexer.next_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let msg = format!("unexpected input: {}", self.current.lexeme);
            self.error_at(self.current, msg);
        }
        self.previous
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `current` if it has the expected kind; otherwise records
    /// "expected <kind>" at the current token's location and returns
    /// `None` without consuming, so the caller can decide how to recover.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token<'a>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let message = format!("expected {what}, found {:?}", self.current.kind);
            self.error_at(self.current, message);
            None
        }
    }

    fn synchronize(&mut self) {
        loop {
            if self.previous.kind == TokenKind::Semicolon || self.previous.kind == TokenKind::RightBrace {
                return;
            }
            match self.current.kind {
                TokenKind::Fn
                | TokenKind::Var
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Parses top-level statements until EOF (spec §4.2).
    pub fn execute(&mut self) -> Option<Module<'a>> {
        let mut module = Module::new(self.filename.to_string());
        while !self.check(TokenKind::Eof) {
            match self.declaration() {
                Some(stmt) => module.push(stmt),
                None => self.synchronize(),
            }
        }
        if self.had_error {
            None
        } else {
            Some(module)
        }
    }

    fn declaration(&mut self) -> StmtResult<'a> {
        if self.matches(TokenKind::Import) {
            return self.import_statement();
        }
        if self.matches(TokenKind::Var) {
            return self.var_decl_statement();
        }
        if self.matches(TokenKind::Fn) {
            return self.function_statement();
        }
        self.statement()
    }

    fn import_statement(&mut self) -> StmtResult<'a> {
        let path_tok = self.expect(TokenKind::StringLiteral, "a module path string")?;
        let namespace = if self.matches(TokenKind::As) {
            let alias = self.current;
            if alias.kind.is_reserved() || alias.kind != TokenKind::Identifier {
                let msg = format!("'{}' is not a valid namespace alias", alias.lexeme);
                self.error_at(alias, msg);
                return None;
            }
            self.advance();
            self.symbols
                .declare_namespace(alias.lexeme, crate::symbol::Namespace::new())
                .ok();
            Some(alias)
        } else {
            None
        };
        self.matches(TokenKind::Semicolon);
        Some(Stmt::import(self.arena, path_tok, namespace))
    }

    fn parse_type(&mut self) -> Option<Type> {
        let ty = match self.current.kind {
            TokenKind::IntType => Type::int(),
            TokenKind::LongType => Type::long(),
            TokenKind::DoubleType => Type::double(),
            TokenKind::CharType => Type::char_(),
            TokenKind::StringType => Type::string(),
            TokenKind::BoolType => Type::bool(),
            TokenKind::VoidType => Type::void(),
            TokenKind::AnyType => Type::any(),
            _ => {
                let message = format!("expected a type, found {:?}", self.current.kind);
                self.error_at(self.current, message);
                return None;
            }
        };
        self.advance();
        let mut ty = ty;
        while self.matches(TokenKind::LeftBracket) {
            self.expect(TokenKind::RightBracket, "']'")?;
            ty = Type::array(ty);
        }
        Some(ty)
    }

    fn var_decl_statement(&mut self) -> StmtResult<'a> {
        let name = self.expect(TokenKind::Identifier, "a variable name")?;
        let ty = if self.matches(TokenKind::Colon) { self.parse_type() } else { None };
        let init = if self.matches(TokenKind::Equal) { self.expression() } else { None };
        self.matches(TokenKind::Semicolon);
        let resolved_ty = ty.or_else(|| init.and_then(|e| e.expr_type()));
        if let Some(t) = &resolved_ty {
            let _ = self.symbols.declare(name.lexeme, Symbol::new(name.lexeme, t.clone(), SymbolKind::Var, name));
        }
        Stmt::var_decl(self.arena, name, resolved_ty, init)
    }

    fn function_statement(&mut self) -> StmtResult<'a> {
        let name = self.expect(TokenKind::Identifier, "a function name")?;
        self.expect(TokenKind::LeftParen, "'('")?;
        let mut params: Vec<Parameter<'a>> = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let pname = self.expect(TokenKind::Identifier, "a parameter name")?;
                self.expect(TokenKind::Colon, "':'")?;
                let pty = self.parse_type()?;
                params.push(Parameter { name: pname, ty: pty });
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')'")?;
        self.expect(TokenKind::Colon, "':'")?;
        let return_type = self.parse_type()?;

        self.symbols.open_scope();
        for p in &params {
            let _ = self.symbols.declare(p.name.lexeme, Symbol::new(p.name.lexeme, p.ty.clone(), SymbolKind::Param, p.name));
        }
        let param_types: Vec<Type> = params.iter().map(|p| p.ty.clone()).collect();
        let _ = self.symbols.declare(
            name.lexeme,
            Symbol::new(name.lexeme, Type::function(return_type.clone(), param_types), SymbolKind::Fn, name),
        );

        let body: Vec<Stmt<'a>> = if self.matches(TokenKind::Arrow) {
            let expr = self.expression();
            match expr {
                Some(e) => vec![Stmt::expr_stmt(self.arena, e).clone()],
                None => Vec::new(),
            }
        } else {
            self.expect(TokenKind::LeftBrace, "'{' or '=>'")?;
            self.block_statements()
        };
        self.symbols.close_scope();

        Some(Stmt::function(self.arena, name, &params, return_type, &body))
    }

    fn block_statements(&mut self) -> Vec<Stmt<'a>> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            match self.declaration() {
                Some(s) => stmts.push(s.clone()),
                None => self.synchronize(),
            }
        }
        self.expect(TokenKind::RightBrace, "'}'");
        stmts
    }

    fn statement(&mut self) -> StmtResult<'a> {
        if self.matches(TokenKind::Return) {
            return self.return_statement();
        }
        if self.matches(TokenKind::LeftBrace) {
            self.symbols.open_scope();
            let stmts = self.block_statements();
            self.symbols.close_scope();
            return Some(Stmt::block(self.arena, Some(self.previous), &stmts));
        }
        if self.matches(TokenKind::If) {
            return self.if_statement();
        }
        if self.matches(TokenKind::While) {
            return self.while_statement();
        }
        if self.matches(TokenKind::For) {
            return self.for_statement();
        }
        self.expression_statement()
    }

    fn return_statement(&mut self) -> StmtResult<'a> {
        let keyword = self.previous;
        let value = if self.check(TokenKind::Semicolon) || self.check(TokenKind::RightBrace) {
            None
        } else {
            self.expression()
        };
        self.matches(TokenKind::Semicolon);
        Some(Stmt::return_stmt(self.arena, keyword, value))
    }

    fn if_statement(&mut self) -> StmtResult<'a> {
        let token = Some(self.previous);
        self.expect(TokenKind::LeftParen, "'('")?;
        let cond = self.expression();
        self.expect(TokenKind::RightParen, "')'")?;
        let then_branch = self.statement();
        let else_branch = if self.matches(TokenKind::Else) { self.statement() } else { None };
        Stmt::if_stmt(self.arena, token, cond, then_branch, else_branch)
    }

    fn while_statement(&mut self) -> StmtResult<'a> {
        let token = Some(self.previous);
        self.expect(TokenKind::LeftParen, "'('")?;
        let cond = self.expression();
        self.expect(TokenKind::RightParen, "')'")?;
        let body = self.statement();
        Stmt::while_stmt(self.arena, token, cond, body)
    }

    fn for_statement(&mut self) -> StmtResult<'a> {
        let token = Some(self.previous);
        self.expect(TokenKind::LeftParen, "'('")?;
        let init: Option<&'a Stmt<'a>> = if self.matches(TokenKind::Semicolon) {
            None
        } else if self.matches(TokenKind::Var) {
            self.var_decl_statement()
        } else {
            self.expression_statement()
        };
        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            self.expression()
        };
        self.matches(TokenKind::Semicolon);
        let step = if self.check(TokenKind::RightParen) { None } else { self.expression() };
        self.expect(TokenKind::RightParen, "')'")?;
        let body = self.statement();
        Stmt::for_stmt(self.arena, token, init, cond, step, body)
    }

    fn expression_statement(&mut self) -> StmtResult<'a> {
        let expr = self.expression()?;
        self.matches(TokenKind::Semicolon);
        Some(Stmt::expr_stmt(self.arena, expr))
    }

    // ---- expressions, lowest to highest precedence ----

    fn expression(&mut self) -> ExprResult<'a> {
        self.assignment()
    }

    fn assignment(&mut self) -> ExprResult<'a> {
        let expr = self.logical_or()?;
        if self.matches(TokenKind::Equal) {
            let equals = self.previous;
            let value = self.assignment();
            return match expr.kind {
                crate::ast::ExprKind::Variable { name } => Expr::assign(self.arena, name, value),
                _ => {
                    self.error_at(equals, "invalid assignment target");
                    None
                }
            };
        }
        Some(expr)
    }

    fn binary_level(
        &mut self,
        kinds: &[TokenKind],
        next: fn(&mut Self) -> ExprResult<'a>,
    ) -> ExprResult<'a> {
        let mut expr = next(self)?;
        while kinds.contains(&self.current.kind) {
            let op_tok = self.advance();
            let right = next(self);
            expr = Expr::binary(self.arena, Some(op_tok), Some(expr), op_tok.kind, right)?;
        }
        Some(expr)
    }

    fn logical_or(&mut self) -> ExprResult<'a> {
        self.binary_level(&[TokenKind::PipePipe], Self::logical_and)
    }

    fn logical_and(&mut self) -> ExprResult<'a> {
        self.binary_level(&[TokenKind::AmpAmp], Self::equality)
    }

    fn equality(&mut self) -> ExprResult<'a> {
        self.binary_level(&[TokenKind::EqualEqual, TokenKind::BangEqual], Self::comparison)
    }

    fn comparison(&mut self) -> ExprResult<'a> {
        self.binary_level(
            &[TokenKind::Less, TokenKind::LessEqual, TokenKind::Greater, TokenKind::GreaterEqual],
            Self::additive,
        )
    }

    fn additive(&mut self) -> ExprResult<'a> {
        self.binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> ExprResult<'a> {
        self.binary_level(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent], Self::unary)
    }

    fn unary(&mut self) -> ExprResult<'a> {
        if matches!(self.current.kind, TokenKind::Bang | TokenKind::Minus) {
            let op_tok = self.advance();
            let operand = self.unary();
            return Expr::unary(self.arena, Some(op_tok), op_tok.kind, operand);
        }
        self.call_chain()
    }

    fn call_chain(&mut self) -> ExprResult<'a> {
        let mut expr = self.primary()?;
        loop {
            if self.matches(TokenKind::LeftParen) {
                let mut args: Vec<&'a Expr<'a>> = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    loop {
                        if let Some(a) = self.expression() {
                            args.push(a);
                        }
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let tok = self.current;
                self.expect(TokenKind::RightParen, "')'");
                expr = Expr::call(self.arena, Some(tok), Some(expr), &args)?;
            } else if self.matches(TokenKind::Dot) {
                let member = self.expect(TokenKind::Identifier, "a member name")?;
                expr = Expr::member(self.arena, Some(expr), member)?;
            } else if self.matches(TokenKind::LeftBracket) {
                let index = self.expression();
                self.expect(TokenKind::RightBracket, "']'");
                expr = Expr::array_access(self.arena, Some(expr.token.unwrap_or(self.previous)), Some(expr), index)?;
            } else if self.matches(TokenKind::PlusPlus) {
                expr = Expr::increment(self.arena, Some(self.previous), Some(expr))?;
            } else if self.matches(TokenKind::MinusMinus) {
                expr = Expr::decrement(self.arena, Some(self.previous), Some(expr))?;
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn primary(&mut self) -> ExprResult<'a> {
        let tok = self.current;
        match tok.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                if tok.lexeme.contains('.') || tok.lexeme.contains(['e', 'E']) {
                    let value: f64 = tok.lexeme.parse().unwrap_or(0.0);
                    Some(Expr::literal(self.arena, tok, LiteralValue::Double(value), Type::double(), false))
                } else {
                    let value: i64 = tok.lexeme.parse().unwrap_or(0);
                    Some(Expr::literal(self.arena, tok, LiteralValue::Int(value), Type::int(), false))
                }
            }
            TokenKind::CharLiteral => {
                self.advance();
                let c = tok.lexeme.chars().next().unwrap_or('\0');
                Some(Expr::literal(self.arena, tok, LiteralValue::Char(c), Type::char_(), false))
            }
            TokenKind::StringLiteral => {
                self.advance();
                let s = self.arena.alloc_str(tok.lexeme);
                Some(Expr::literal(self.arena, tok, LiteralValue::String(s), Type::string(), false))
            }
            TokenKind::InterpolationFragment => self.interpolated_string(),
            TokenKind::True => {
                self.advance();
                Some(Expr::literal(self.arena, tok, LiteralValue::Bool(true), Type::bool(), false))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::literal(self.arena, tok, LiteralValue::Bool(false), Type::bool(), false))
            }
            TokenKind::Nil => {
                self.advance();
                Some(Expr::literal(self.arena, tok, LiteralValue::Int(0), Type::nil(), false))
            }
            TokenKind::Identifier => {
                self.advance();
                Some(Expr::variable(self.arena, tok))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression();
                self.expect(TokenKind::RightParen, "')'");
                inner
            }
            TokenKind::LeftBracket => {
                self.advance();
                let mut elements: Vec<&'a Expr<'a>> = Vec::new();
                if !self.check(TokenKind::RightBracket) {
                    loop {
                        if let Some(e) = self.expression() {
                            elements.push(e);
                        }
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RightBracket, "']'");
                Some(Expr::array(self.arena, Some(tok), &elements))
            }
            _ => {
                let message = format!("expected an expression, found {:?}", tok.kind);
                self.error_at(tok, message);
                None
            }
        }
    }

    /// Composes the begin/segment/end token sequence the lexer produced
    /// for an interpolated string into a single `Interpolated` expr.
    fn interpolated_string(&mut self) -> ExprResult<'a> {
        let begin = self.advance(); // consumes the begin InterpolationFragment
        let mut parts: Vec<&'a Expr<'a>> = Vec::new();
        loop {
            if self.check(TokenKind::InterpolationFragment) {
                self.advance();
                break;
            }
            if self.check(TokenKind::StringLiteral) {
                let tok = self.advance();
                let s = self.arena.alloc_str(tok.lexeme);
                parts.push(Expr::literal(self.arena, tok, LiteralValue::String(s), Type::string(), true));
                continue;
            }
            if self.check(TokenKind::Eof) {
                self.error_at(self.current, "unterminated interpolated string");
                return None;
            }
            if let Some(e) = self.expression() {
                parts.push(e);
            } else {
                self.advance();
            }
        }
        Some(Expr::interpolated(self.arena, Some(begin), &parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtKind;

    fn parse<'a>(arena: &'a Arena, src: &str, symbols: &mut SymbolTable) -> Option<Module<'a>> {
        let mut parser = Parser::new(arena, src, "<test>", symbols);
        parser.execute()
    }

    #[test]
    fn parses_namespace_import() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let module = parse(&arena, "import \"utils/string_helpers\" as strings\n", &mut symbols).unwrap();
        assert_eq!(module.statements.len(), 1);
        match module.statements[0].kind {
            StmtKind::Import { module_name, namespace } => {
                assert_eq!(module_name.lexeme, "utils/string_helpers");
                assert_eq!(namespace.unwrap().lexeme, "strings");
            }
            _ => panic!("expected Import"),
        }
    }

    #[test]
    fn reserved_word_as_namespace_alias_is_a_parse_error() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        assert!(parse(&arena, "import \"x\" as var\n", &mut symbols).is_none());
        let mut symbols = SymbolTable::new();
        assert!(parse(&arena, "import \"x\" as int\n", &mut symbols).is_none());
    }

    #[test]
    fn non_identifier_after_as_is_a_parse_error() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        assert!(parse(&arena, "import \"x\" as 5\n", &mut symbols).is_none());
    }

    #[test]
    fn parses_function_with_block_body() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let module = parse(&arena, "fn main(): void { return; }", &mut symbols).unwrap();
        match &module.statements[0].kind {
            StmtKind::Function { return_type, params, .. } => {
                assert_eq!(*return_type, Type::void());
                assert!(params.is_empty());
            }
            _ => panic!("expected Function"),
        }
    }

    #[test]
    fn parses_arrow_function_body() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let module = parse(&arena, "fn main(): void => print(\"hello\\n\")", &mut symbols).unwrap();
        match module.statements[0].kind {
            StmtKind::Function { body, .. } => assert_eq!(body.len(), 1),
            _ => panic!("expected Function"),
        }
    }

    #[test]
    fn for_loop_permits_omitted_clauses() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let module = parse(&arena, "fn f(): void { for (;;) { return; } }", &mut symbols).unwrap();
        match module.statements[0].kind {
            StmtKind::Function { body, .. } => match body[0].kind {
                StmtKind::For { init, cond, step, .. } => {
                    assert!(init.is_none() && cond.is_none() && step.is_none());
                }
                _ => panic!("expected For"),
            },
            _ => panic!("expected Function"),
        }
    }

    #[test]
    fn multiple_errors_surface_in_one_pass() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let mut parser = Parser::new(&arena, "var ; var ;", "<test>", &mut symbols);
        assert!(parser.execute().is_none());
        assert!(parser.diagnostics.len() >= 2);
    }

    #[test]
    fn precedence_binds_multiplicative_tighter_than_additive() {
        let arena = Arena::new();
        let mut symbols = SymbolTable::new();
        let module = parse(&arena, "fn f(): int => 1 + 2 * 3", &mut symbols).unwrap();
        let body = match module.statements[0].kind {
            StmtKind::Function { body, .. } => body,
            _ => panic!(),
        };
        let expr = match body[0].kind {
            StmtKind::Expr(e) => e,
            _ => panic!(),
        };
        match expr.kind {
            crate::ast::ExprKind::Binary { op: TokenKind::Plus, right, .. } => {
                assert!(matches!(right.kind, crate::ast::ExprKind::Binary { op: TokenKind::Star, .. }));
            }
            _ => panic!("expected top-level +"),
        }
    }
}
