//! Cross-reference listing
//!
//! Prints every scope of a compiled unit with its names in sorted order,
//! the lines each name appears on, and what the name was declared as.

use super::{EntryId, SymbolTable};
use std::fmt::Write;

const NAME_WIDTH: usize = 16;

/// Listing of all scopes except the predefined global one.
pub fn listing(table: &SymbolTable) -> Vec<String> {
    let mut lines = Vec::new();

    for (scope_id, scope) in table.scopes().skip(1) {
        let owner = table
            .scope_owner(scope_id)
            .map(|id| table.entry(id).name().to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());
        lines.push(format!(
            "===== SCOPE level {} ({}) =====",
            scope.level(),
            owner
        ));

        if scope.is_empty() {
            lines.push("  (empty)".to_string());
            continue;
        }

        let mut ids: Vec<EntryId> = scope.entries().to_vec();
        ids.sort_by(|a, b| table.entry(*a).name().cmp(table.entry(*b).name()));

        for id in ids {
            lines.push(entry_line(table, id));
        }
    }

    lines
}

fn entry_line(table: &SymbolTable, id: EntryId) -> String {
    let entry = table.entry(id);
    let mut line = format!("  {:<width$}", entry.name(), width = NAME_WIDTH);

    let refs: Vec<String> = entry
        .line_numbers()
        .iter()
        .map(|n| format!("{:03}", n))
        .collect();
    let _ = write!(line, " {:<24}", refs.join(" "));
    let _ = write!(line, " {}", entry.kind());
    if let Some(ty) = &entry.ty {
        let _ = write!(line, " : {}", ty);
    }
    if let Some(slot) = entry.definition.slot() {
        let _ = write!(line, " [slot {}]", slot);
    }
    if let super::Definition::Constant(value) = &entry.definition {
        let _ = write!(line, " = {}", value);
    }
    if let Some(code) = entry.routine().and_then(|r| r.code) {
        let _ = write!(line, " ({:?})", code);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::{initialize_predefined, Definition};
    use crate::types::TypeSpec;

    #[test]
    fn test_listing_sorts_names() {
        let mut table = SymbolTable::new();
        initialize_predefined(&mut table);
        table.push();
        for (i, name) in ["zeta", "alpha"].iter().enumerate() {
            let id = table.enter_local(name).unwrap();
            let entry = table.entry_mut(id);
            entry.definition = Definition::Variable { slot: i };
            entry.ty = Some(TypeSpec::INT);
            entry.append_line_number(i + 1);
        }

        let lines = listing(&table);
        assert!(lines[0].starts_with("===== SCOPE level 1"));
        assert!(lines[1].contains("alpha"));
        assert!(lines[1].contains("002"));
        assert!(lines[1].contains("variable : int [slot 1]"));
        assert!(lines[2].contains("zeta"));
    }
}
