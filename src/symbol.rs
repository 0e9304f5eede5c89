//! Scoped, namespace-aware name resolution (spec §3.2, §4.3).

use std::sync::Mutex;

use hashbrown::HashMap;

use crate::token::Token;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Fn,
    Param,
    Import,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub declared_type: Type,
    pub kind: SymbolKind,
    pub source_line: u32,
}

impl Symbol {
    pub fn new(name: impl Into<String>, declared_type: Type, kind: SymbolKind, source: Token<'_>) -> Self {
        Symbol { name: name.into(), declared_type, kind, source_line: source.line }
    }
}

/// A namespace introduced by `import "path" as ident`: a flat name->symbol
/// map, not a nested scope stack (SPEC_FULL.md §3).
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    symbols: im::HashMap<String, Symbol>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}

#[derive(Debug, Clone)]
enum Binding {
    Symbol(Symbol),
    Namespace(Namespace),
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("'{0}' is already declared in this scope")]
    AlreadyDeclared(String),
    #[error("'{0}' is a reserved keyword and cannot be used as an identifier")]
    ReservedIdentifier(String),
    #[error("namespace '{0}' is not declared")]
    UnknownNamespace(String),
    #[error("'{1}' is not declared in namespace '{0}'")]
    UnknownQualifiedName(String, String),
}

/// A stack of scopes mapping unqualified names to symbols (spec §3.2).
/// Single-threaded; see [`ConcurrentSymbolTable`] for the mutex-guarded
/// mode used by concurrent callers (SPEC_FULL.md §5).
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        // The outermost (global) scope is always present.
        SymbolTable { scopes: vec![Scope::default()] }
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn close_scope(&mut self) {
        // The global scope is never discarded; closing it would be a
        // caller bug, so we simply refuse past the last scope.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("symbol table always has a scope")
    }

    pub fn declare(&mut self, name: &str, symbol: Symbol) -> Result<(), SymbolError> {
        let scope = self.innermost_mut();
        if scope.bindings.contains_key(name) {
            return Err(SymbolError::AlreadyDeclared(name.to_string()));
        }
        scope.bindings.insert(name.to_string(), Binding::Symbol(symbol));
        Ok(())
    }

    /// Scans inner to outer for an unqualified name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(Binding::Symbol(sym)) = scope.bindings.get(name) {
                return Some(sym);
            }
        }
        None
    }

    /// A namespace alias is scoped like any other symbol: declaring one
    /// in an inner scope shadows an outer alias of the same name for
    /// that scope's lifetime (spec §4.3).
    pub fn declare_namespace(&mut self, alias: &str, namespace: Namespace) -> Result<(), SymbolError> {
        let scope = self.innermost_mut();
        if scope.bindings.contains_key(alias) {
            return Err(SymbolError::AlreadyDeclared(alias.to_string()));
        }
        scope.bindings.insert(alias.to_string(), Binding::Namespace(namespace));
        Ok(())
    }

    fn lookup_namespace(&self, alias: &str) -> Option<&Namespace> {
        for scope in self.scopes.iter().rev() {
            if let Some(Binding::Namespace(ns)) = scope.bindings.get(alias) {
                return Some(ns);
            }
        }
        None
    }

    /// Resolves `namespace.name`.
    pub fn resolve(&self, namespace: &str, name: &str) -> Result<&Symbol, SymbolError> {
        let ns = self
            .lookup_namespace(namespace)
            .ok_or_else(|| SymbolError::UnknownNamespace(namespace.to_string()))?;
        ns.get(name)
            .ok_or_else(|| SymbolError::UnknownQualifiedName(namespace.to_string(), name.to_string()))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Concurrent mode: the same scope-stack logic, mutex-serialized
/// (spec §4.3, §5). A distinct type rather than a runtime flag so the
/// single-threaded `SymbolTable` fast path pays no synchronization cost.
#[derive(Debug)]
pub struct ConcurrentSymbolTable {
    inner: Mutex<SymbolTable>,
}

impl ConcurrentSymbolTable {
    pub fn new() -> Self {
        ConcurrentSymbolTable { inner: Mutex::new(SymbolTable::new()) }
    }

    pub fn declare(&self, name: &str, symbol: Symbol) -> Result<(), SymbolError> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).declare(name, symbol)
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).lookup(name).cloned()
    }

    pub fn open_scope(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).open_scope();
    }

    pub fn close_scope(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).close_scope();
    }
}

impl Default for ConcurrentSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
