//! Symbol tables
//!
//! - [`entry`]: [`SymbolEntry`] and its per-kind [`Definition`]
//! - [`stack`]: the [`SymbolTable`] scope stack with its entry/scope arenas
//! - [`xref`]: cross-reference listing of every scope
//!
//! Entries and scopes refer to each other through [`EntryId`]/[`ScopeId`]
//! handles, never through owning links.

pub mod entry;
pub mod stack;
pub mod xref;

pub use entry::{
    ConstValue, Definition, DefinitionKind, RoutineCode, RoutineInfo, SymbolEntry,
};
pub use stack::{Scope, SymbolTable};

use crate::types::{Primitive, TypeSpec};

/// Handle of a symbol entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

/// Handle of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Enter the predefined types into the global scope.
pub fn initialize_predefined(table: &mut SymbolTable) {
    for primitive in Primitive::ALL {
        if primitive == Primitive::Undefined {
            continue;
        }
        if let Some(id) = table.enter_local(primitive.name()) {
            let entry = table.entry_mut(id);
            entry.definition = Definition::Type;
            entry.ty = Some(TypeSpec::Primitive(primitive));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_types_live_in_global_scope() {
        let mut table = SymbolTable::new();
        initialize_predefined(&mut table);
        table.push();

        let int = table.lookup("int").unwrap();
        assert_eq!(table.entry(int).kind(), DefinitionKind::Type);
        assert_eq!(table.entry(int).type_spec(), TypeSpec::INT);
        assert!(table.lookup_local("int").is_none());
        assert!(table.lookup("undefined").is_none());
        assert_eq!(table.global_scope().len(), 5);
    }
}
