//! Symbol table stack
//!
//! Scopes and entries live in two arenas owned by [`SymbolTable`] and are
//! addressed by [`ScopeId`]/[`EntryId`] handles. The active scope stack is a
//! list of scope handles: popping a scope only removes it from the stack,
//! so entries and node references created while it was active stay valid.
//!
//! The global scope (level 0) is always present and is never popped.

use super::entry::{Definition, SymbolEntry};
use super::{EntryId, ScopeId};
use crate::icode::ICode;
use crate::types::TypeSpec;
use rustc_hash::FxHashMap;

/// One level of the nested symbol table
#[derive(Debug, Clone)]
pub struct Scope {
    level: usize,
    names: FxHashMap<String, EntryId>,
    order: Vec<EntryId>,
    slot_number: usize,
    max_slot_number: usize,
}

impl Scope {
    fn new(level: usize) -> Self {
        Self {
            level,
            names: FxHashMap::default(),
            order: Vec::new(),
            slot_number: 0,
            max_slot_number: 0,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn get(&self, name: &str) -> Option<EntryId> {
        self.names.get(name).copied()
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[EntryId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Assign the next storage slot.
    pub fn next_slot_number(&mut self) -> usize {
        self.max_slot_number = self.slot_number;
        self.slot_number += 1;
        self.max_slot_number
    }

    /// Slot the next declaration will get
    pub fn slot_number(&self) -> usize {
        self.slot_number
    }

    /// Highest slot handed out so far
    pub fn max_slot_number(&self) -> usize {
        self.max_slot_number
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    program_id: Option<EntryId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the empty global scope.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scopes: vec![Scope::new(0)],
            stack: vec![ScopeId(0)],
            program_id: None,
        }
    }

    /// Push a new empty scope and return it.
    pub fn push(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(self.stack.len()));
        self.stack.push(id);
        id
    }

    /// Pop the innermost scope. The global scope stays.
    pub fn pop(&mut self) -> Option<ScopeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Nesting level of the innermost scope (0 = global)
    pub fn current_level(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn local_scope_id(&self) -> ScopeId {
        self.stack[self.stack.len() - 1]
    }

    pub fn local_scope(&self) -> &Scope {
        &self.scopes[self.local_scope_id().0]
    }

    pub fn local_scope_mut(&mut self) -> &mut Scope {
        let id = self.local_scope_id();
        &mut self.scopes[id.0]
    }

    /// Create an entry for `name` in the innermost scope.
    ///
    /// Returns `None` when the name is already defined there; the caller
    /// decides how to report it.
    pub fn enter_local(&mut self, name: &str) -> Option<EntryId> {
        let key = name.to_lowercase();
        let scope_id = self.local_scope_id();
        if self.scopes[scope_id.0].names.contains_key(&key) {
            return None;
        }

        let id = EntryId(self.entries.len());
        self.entries.push(SymbolEntry::new(key.clone(), scope_id));
        let scope = &mut self.scopes[scope_id.0];
        scope.names.insert(key, id);
        scope.order.push(id);
        Some(id)
    }

    /// Create an entry attached to the innermost scope without binding its
    /// name there (compiler-generated targets such as return values).
    pub fn create_detached(&mut self, name: &str, definition: Definition, ty: TypeSpec) -> EntryId {
        let id = EntryId(self.entries.len());
        let mut entry = SymbolEntry::new(name.to_lowercase(), self.local_scope_id());
        entry.definition = definition;
        entry.ty = Some(ty);
        self.entries.push(entry);
        id
    }

    /// Look `name` up in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<EntryId> {
        self.local_scope().get(&name.to_lowercase())
    }

    /// Look `name` up from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<EntryId> {
        let key = name.to_lowercase();
        self.stack
            .iter()
            .rev()
            .find_map(|scope| self.scopes[scope.0].get(&key))
    }

    pub fn entry(&self, id: EntryId) -> &SymbolEntry {
        &self.entries[id.0]
    }

    pub fn entry_mut(&mut self, id: EntryId) -> &mut SymbolEntry {
        &mut self.entries[id.0]
    }

    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &SymbolEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Every scope ever pushed, global first
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    /// The global scope
    pub fn global_scope(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn set_program_id(&mut self, id: EntryId) {
        self.program_id = Some(id);
    }

    pub fn program_id(&self) -> Option<EntryId> {
        self.program_id
    }

    /// The routine whose scope is `scope`, if any
    pub fn scope_owner(&self, scope: ScopeId) -> Option<EntryId> {
        self.entries()
            .find(|(_, e)| e.routine().is_some_and(|r| r.scope == Some(scope)))
            .map(|(id, _)| id)
    }

    /// Intermediate code of a routine. The program answers with its `main`
    /// function's code once one has been declared.
    pub fn routine_icode(&self, id: EntryId) -> Option<&ICode> {
        let info = self.entry(id).routine()?;
        match info.main_routine {
            Some(main) => self.entry(main).routine().map(|r| &r.icode),
            None => Some(&info.icode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::DefinitionKind;

    #[test]
    fn test_enter_and_lookup_local() {
        let mut table = SymbolTable::new();
        table.push();
        let id = table.enter_local("Count").unwrap();
        table.entry_mut(id).definition = Definition::Variable { slot: 0 };

        let found = table.lookup_local("count").unwrap();
        assert_eq!(found, id);
        assert_eq!(table.entry(found).name(), "count");
        assert_eq!(table.entry(found).kind(), DefinitionKind::Variable);
    }

    #[test]
    fn test_enter_local_rejects_duplicates() {
        let mut table = SymbolTable::new();
        assert!(table.enter_local("x").is_some());
        assert!(table.enter_local("X").is_none());
        assert_eq!(table.local_scope().len(), 1);
    }

    #[test]
    fn test_lookup_searches_outwards() {
        let mut table = SymbolTable::new();
        let outer = table.enter_local("a").unwrap();
        table.push();
        let inner = table.enter_local("a").unwrap();

        assert_eq!(table.lookup("a"), Some(inner));
        assert_eq!(table.lookup_local("a"), Some(inner));

        table.pop();
        assert_eq!(table.lookup("a"), Some(outer));
        // The inner entry outlives its scope
        assert_eq!(table.entry(inner).name(), "a");
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.push();
        assert_eq!(table.current_level(), 1);
        assert!(table.pop().is_some());
        assert!(table.pop().is_none());
        assert_eq!(table.current_level(), 0);
    }

    #[test]
    fn test_slot_numbers_follow_declaration_order() {
        let mut table = SymbolTable::new();
        table.push();
        let scope = table.local_scope_mut();
        assert_eq!(scope.next_slot_number(), 0);
        assert_eq!(scope.next_slot_number(), 1);
        assert_eq!(scope.max_slot_number(), 1);
        assert_eq!(scope.slot_number(), 2);
    }

    #[test]
    fn test_detached_entries_are_not_bound() {
        let mut table = SymbolTable::new();
        table.push();
        let id = table.create_detached("f", Definition::Variable { slot: 1 }, TypeSpec::INT);
        assert!(table.lookup("f").is_none());
        assert_eq!(table.entry(id).scope(), table.local_scope_id());
    }
}
