//! # Symbol Table (C3)
//!
//! Two scopes: `class_scope` persists for the lifetime of a class;
//! `subroutine_scope` is cleared at the start of each subroutine. Passed
//! through the code generator as an owned value, never shared — there is
//! no implicit global symbol state.

use std::collections::HashMap;

use crate::jack::ast::Type;
use crate::jack::error::{ErrorKind, JackError, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

impl SymbolKind {
    /// The VM segment a symbol of this kind lives in (§4.3).
    pub fn segment(self) -> &'static str {
        match self {
            SymbolKind::Static => "static",
            SymbolKind::Field => "this",
            SymbolKind::Argument => "argument",
            SymbolKind::Local => "local",
        }
    }

    fn is_class_scoped(self) -> bool {
        matches!(self, SymbolKind::Static | SymbolKind::Field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name: String,
    pub var_type: Type,
    pub kind: SymbolKind,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, SymbolEntry>,
    subroutine_scope: HashMap<String, SymbolEntry>,
    static_count: u16,
    field_count: u16,
    argument_count: u16,
    local_count: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the subroutine scope and reset its counters. Class scope and
    /// `field_count`/`static_count` are untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.argument_count = 0;
        self.local_count = 0;
    }

    pub fn field_count(&self) -> u16 {
        self.field_count
    }

    pub fn define(
        &mut self,
        name: &str,
        var_type: Type,
        kind: SymbolKind,
    ) -> Result<(), JackError> {
        let scope = if kind.is_class_scoped() {
            &self.class_scope
        } else {
            &self.subroutine_scope
        };
        if scope.contains_key(name) {
            return Err(JackError::new(
                ErrorKind::StructureError,
                format!("'{name}' is already defined in this scope"),
                Span::new(1, 1),
            ));
        }

        let counter = match kind {
            SymbolKind::Static => &mut self.static_count,
            SymbolKind::Field => &mut self.field_count,
            SymbolKind::Argument => &mut self.argument_count,
            SymbolKind::Local => &mut self.local_count,
        };
        let index = *counter;
        *counter += 1;

        let entry = SymbolEntry {
            name: name.to_string(),
            var_type,
            kind,
            index,
        };
        if kind.is_class_scoped() {
            self.class_scope.insert(name.to_string(), entry);
        } else {
            self.subroutine_scope.insert(name.to_string(), entry);
        }
        Ok(())
    }

    /// Subroutine scope shadows class scope.
    pub fn lookup(&self, name: &str) -> Result<&SymbolEntry, JackError> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
            .ok_or_else(|| {
                JackError::new(
                    ErrorKind::SymbolNotFoundError,
                    format!("undefined symbol '{name}'"),
                    Span::new(1, 1),
                )
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.subroutine_scope.contains_key(name) || self.class_scope.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_indices_per_kind() {
        let mut t = SymbolTable::new();
        t.define("a", Type::Int, SymbolKind::Field).unwrap();
        t.define("b", Type::Int, SymbolKind::Field).unwrap();
        t.define("c", Type::Boolean, SymbolKind::Static).unwrap();
        assert_eq!(t.lookup("a").unwrap().index, 0);
        assert_eq!(t.lookup("b").unwrap().index, 1);
        assert_eq!(t.lookup("c").unwrap().index, 0);
        assert_eq!(t.field_count(), 2);
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut t = SymbolTable::new();
        t.define("x", Type::Int, SymbolKind::Field).unwrap();
        t.define("x", Type::Int, SymbolKind::Local).unwrap();
        assert_eq!(t.lookup("x").unwrap().kind, SymbolKind::Local);
    }

    #[test]
    fn start_subroutine_clears_subroutine_scope_only() {
        let mut t = SymbolTable::new();
        t.define("f", Type::Int, SymbolKind::Field).unwrap();
        t.define("a", Type::Int, SymbolKind::Argument).unwrap();
        t.start_subroutine();
        assert!(t.contains("f"));
        assert!(!t.contains("a"));
        t.define("b", Type::Int, SymbolKind::Argument).unwrap();
        assert_eq!(t.lookup("b").unwrap().index, 0);
    }

    #[test]
    fn redefinition_in_same_scope_is_an_error() {
        let mut t = SymbolTable::new();
        t.define("a", Type::Int, SymbolKind::Local).unwrap();
        assert!(t.define("a", Type::Int, SymbolKind::Local).is_err());
    }

    #[test]
    fn undefined_symbol_lookup_fails() {
        let t = SymbolTable::new();
        let err = t.lookup("nope").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SymbolNotFoundError);
    }
}
