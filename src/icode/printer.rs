//! Intermediate-code tree printer
//!
//! Renders each routine's tree as indented XML-like text:
//!
//! ```text
//! <ASSIGN line="3" type="int">
//!     <VARIABLE id="x" type="int" />
//!     <INTEGER_CONSTANT value="3" type="int" />
//! </ASSIGN>
//! ```

use super::{ICodeNode, NodeValue};
use crate::symtab::{EntryId, SymbolTable};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Print one node and its subtree.
pub fn print_node(node: &ICodeNode, table: &SymbolTable) -> Vec<String> {
    let mut lines = Vec::new();
    print_into(node, table, 0, &mut lines);
    lines
}

fn print_into(node: &ICodeNode, table: &SymbolTable, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let mut open = format!("{}<{}", indent, node.kind.name());

    if let Some(line) = node.line() {
        let _ = write!(open, " line=\"{}\"", line);
    }
    if let Some(id) = node.id() {
        let _ = write!(open, " id=\"{}\"", table.entry(id).name());
    }
    if let Some(value) = &node.attrs.value {
        let text = match value {
            NodeValue::Integer(v) => v.to_string(),
            NodeValue::Real(v) => v.to_string(),
            NodeValue::Character(c) => c.escape_default().to_string(),
            NodeValue::String(s) => s.escape_default().to_string(),
        };
        let _ = write!(open, " value=\"{}\"", text);
    }
    let _ = write!(open, " type=\"{}\"", node.ty);

    if node.children.is_empty() {
        open.push_str(" />");
        lines.push(open);
        return;
    }

    open.push('>');
    lines.push(open);
    for child in &node.children {
        print_into(child, table, depth + 1, lines);
    }
    lines.push(format!("{}</{}>", indent, node.kind.name()));
}

/// Print every routine reachable from the program entry, depth first.
pub fn print_routines(table: &SymbolTable) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(program) = table.program_id() {
        print_routine(program, table, &mut lines);
    }
    lines
}

fn print_routine(id: EntryId, table: &SymbolTable, lines: &mut Vec<String>) {
    let entry = table.entry(id);
    let Some(info) = entry.routine() else {
        return;
    };

    lines.push(format!("===== {} {} =====", entry.kind(), entry.name()));
    match info.icode.root() {
        Some(root) => lines.extend(print_node(root, table)),
        None => lines.push("(no intermediate code)".to_string()),
    }

    let mut nested = info.routines.clone();
    if let Some(main) = info.main_routine {
        nested.push(main);
    }
    for routine in nested {
        print_routine(routine, table, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icode::NodeKind;
    use crate::types::TypeSpec;

    #[test]
    fn test_print_nested_nodes() {
        let table = SymbolTable::new();
        let mut assign = ICodeNode::new(NodeKind::Assign)
            .with_type(TypeSpec::DOUBLE)
            .with_line(4);
        assign.add_child(
            ICodeNode::new(NodeKind::RealConstant)
                .with_type(TypeSpec::DOUBLE)
                .with_value(NodeValue::Real(2.5)),
        );

        let lines = print_node(&assign, &table);
        assert_eq!(
            lines,
            vec![
                "<ASSIGN line=\"4\" type=\"double\">".to_string(),
                "    <REAL_CONSTANT value=\"2.5\" type=\"double\" />".to_string(),
                "</ASSIGN>".to_string(),
            ]
        );
    }
}
