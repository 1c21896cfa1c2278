//! # Assembler Symbol Manager (C9)
//!
//! Holds the predefined symbol table and an ordered list of deferred
//! variable fixups. Rather than mutating an already-built output vector
//! as references are discovered (as the reference implementation does),
//! this keeps the resolved-instructions vector and the fixup list
//! separate and performs resolution once, in [`SymbolManager::resolve_all`]
//! (§9 Design Notes).

use std::collections::HashMap;

use crate::asm::error::{AsmError, ErrorKind, Span};

const FIRST_VARIABLE_ADDRESS: u16 = 16;

pub struct SymbolManager {
    table: HashMap<String, u16>,
    pending: Vec<(String, usize)>,
    variable_cursor: u16,
}

impl Default for SymbolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolManager {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        table.insert("SP".to_string(), 0);
        table.insert("LCL".to_string(), 1);
        table.insert("ARG".to_string(), 2);
        table.insert("THIS".to_string(), 3);
        table.insert("THAT".to_string(), 4);
        table.insert("SCREEN".to_string(), 0x4000);
        table.insert("KBD".to_string(), 0x6000);
        for r in 0..=15u16 {
            table.insert(format!("R{r}"), r);
        }
        Self {
            table,
            pending: Vec::new(),
            variable_cursor: FIRST_VARIABLE_ADDRESS,
        }
    }

    fn validate_name(name: &str, span: Span) -> Result<(), AsmError> {
        let mut chars = name.chars();
        let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.');
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$');
        if starts_ok && rest_ok {
            Ok(())
        } else {
            Err(AsmError::new(
                ErrorKind::BadSymbolNameError,
                format!("'{name}' is not a valid symbol name"),
                span,
                name,
            ))
        }
    }

    /// Define a label at a ROM address. Fails if the name — predefined,
    /// an earlier label, or an earlier variable — is already bound.
    pub fn define_label(&mut self, name: &str, rom_address: u16, span: Span) -> Result<(), AsmError> {
        Self::validate_name(name, span)?;
        if self.table.contains_key(name) {
            return Err(AsmError::new(
                ErrorKind::MultipleSymbolDefinitionError,
                format!("'{name}' is already defined"),
                span,
                name,
            ));
        }
        self.table.insert(name.to_string(), rom_address);
        Ok(())
    }

    /// Resolve a reference to `name`, or queue it as a deferred fixup at
    /// `command_index` and return the placeholder `0`.
    pub fn reference(&mut self, name: &str, command_index: usize, span: Span) -> Result<u16, AsmError> {
        Self::validate_name(name, span)?;
        if let Some(&address) = self.table.get(name) {
            return Ok(address);
        }
        self.pending.push((name.to_string(), command_index));
        Ok(0)
    }

    /// Patch every deferred reference into `commands`, allocating a dense
    /// variable address (starting at 16) for each name not otherwise
    /// defined by the time scanning finished.
    pub fn resolve_all(&mut self, commands: &mut [u16]) {
        for (name, command_index) in std::mem::take(&mut self.pending) {
            let address = if let Some(&address) = self.table.get(&name) {
                address
            } else {
                let address = self.variable_cursor;
                self.variable_cursor += 1;
                self.table.insert(name, address);
                address
            };
            commands[command_index] = address;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s() -> Span {
        Span::new(1)
    }

    #[test]
    fn predefined_symbols_resolve_to_their_addresses() {
        let mut mgr = SymbolManager::new();
        assert_eq!(mgr.reference("SP", 0, s()).unwrap(), 0);
        assert_eq!(mgr.reference("KBD", 0, s()).unwrap(), 0x6000);
        assert_eq!(mgr.reference("R5", 0, s()).unwrap(), 5);
    }

    #[test]
    fn redefining_a_predefined_symbol_as_a_label_is_an_error() {
        let mut mgr = SymbolManager::new();
        let err = mgr.define_label("SP", 10, s()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleSymbolDefinitionError);
    }

    #[test]
    fn redefining_a_label_is_an_error() {
        let mut mgr = SymbolManager::new();
        mgr.define_label("LOOP", 3, s()).unwrap();
        let err = mgr.define_label("LOOP", 7, s()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleSymbolDefinitionError);
    }

    #[test]
    fn variable_addresses_are_dense_starting_at_16() {
        let mut mgr = SymbolManager::new();
        let mut commands = vec![0u16; 3];
        mgr.reference("i", 0, s()).unwrap();
        mgr.reference("j", 1, s()).unwrap();
        mgr.reference("i", 2, s()).unwrap(); // same variable again
        mgr.resolve_all(&mut commands);
        assert_eq!(commands[0], 16);
        assert_eq!(commands[1], 17);
        assert_eq!(commands[2], 16);
    }

    #[test]
    fn forward_referenced_label_resolves_once_defined() {
        let mut mgr = SymbolManager::new();
        let mut commands = vec![0u16; 1];
        mgr.reference("END", 0, s()).unwrap();
        mgr.define_label("END", 42, s()).unwrap();
        mgr.resolve_all(&mut commands);
        assert_eq!(commands[0], 42);
    }

    #[test]
    fn invalid_symbol_name_is_rejected() {
        let mut mgr = SymbolManager::new();
        let err = mgr.reference("1bad", 0, s()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadSymbolNameError);
    }
}
