//! Symbol table and scope management

use crate::common::Span;
use super::types::Type;
use crate::frontend::decaf::ast::ScalarType;
use std::collections::HashMap;
use string_interner::{DefaultStringInterner, DefaultSymbol};
use thiserror::Error;

/// A symbol in the symbol table
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared type; the return type for methods
    pub ty: Type,
    pub span: Span,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Type, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            span,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method { .. })
    }
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Field,
    Local,
    Parameter,
    Method { params: Vec<ScalarType> },
}

/// Returned by [`ScopeTable::declare`] when the name is taken in the current scope
#[derive(Error, Debug, Clone, PartialEq)]
#[error("symbol '{}' already defined in this scope", .rejected.name)]
pub struct DuplicateError {
    pub rejected: Symbol,
}

/// A scope containing symbols
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<DefaultSymbol, Symbol>,
    parent: Option<Box<Scope>>,
}

/// Nested lexical scopes over one interned identifier pool
///
/// Only the active chain from the root to the innermost scope exists; a
/// scope is dropped wholesale by [`exit_scope`](Self::exit_scope).
#[derive(Debug)]
pub struct ScopeTable {
    interner: DefaultStringInterner,
    current: Scope,
    depth: usize,
}

impl ScopeTable {
    /// Table holding just the root scope
    pub fn new() -> Self {
        Self {
            interner: DefaultStringInterner::default(),
            current: Scope::default(),
            depth: 1,
        }
    }

    /// Push a new child scope
    pub fn enter_scope(&mut self) {
        let old_scope = std::mem::take(&mut self.current);
        self.current.parent = Some(Box::new(old_scope));
        self.depth += 1;
        log::trace!("enter scope (depth {})", self.depth);
    }

    /// Pop to the parent scope; the root scope is never popped
    pub fn exit_scope(&mut self) -> bool {
        if let Some(parent) = self.current.parent.take() {
            self.current = *parent;
            self.depth -= 1;
            log::trace!("exit scope (depth {})", self.depth);
            true
        } else {
            false
        }
    }

    /// Number of live scopes, root included
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Define a symbol in the innermost scope
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), DuplicateError> {
        let key = self.interner.get_or_intern(&symbol.name);
        if self.current.symbols.contains_key(&key) {
            return Err(DuplicateError { rejected: symbol });
        }
        self.current.symbols.insert(key, symbol);
        Ok(())
    }

    /// Look up a name in the innermost scope, then its ancestors
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        let key = self.interner.get(name)?;
        let mut scope = Some(&self.current);
        while let Some(s) = scope {
            if let Some(sym) = s.symbols.get(&key) {
                return Some(sym);
            }
            scope = s.parent.as_deref();
        }
        None
    }

    /// Look up a name in the innermost scope only
    pub fn resolve_local(&self, name: &str) -> Option<&Symbol> {
        let key = self.interner.get(name)?;
        self.current.symbols.get(&key)
    }
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}
