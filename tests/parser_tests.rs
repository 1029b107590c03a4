// Integration tests for declarations, routines and intermediate code

use subcc::errors::ErrorKind;
use subcc::icode::{ICodeNode, NodeKind};
use subcc::parser::parse_source;
use subcc::symtab::{DefinitionKind, RoutineCode};
use subcc::types::TypeSpec;
use subcc::CompilationUnit;

fn body<'a>(unit: &'a CompilationUnit, routine: &str) -> &'a ICodeNode {
    let id = unit.routine(routine).expect("Routine not found");
    unit.symtab
        .entry(id)
        .routine()
        .and_then(|info| info.icode.root())
        .expect("Routine has no intermediate code")
}

#[test]
fn test_program_level_assignment() {
    let source = r#"
        int x;
        x = 3;
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let root = unit
        .symtab
        .entry(unit.program)
        .routine()
        .and_then(|info| info.icode.root())
        .expect("Program has no body");
    assert_eq!(root.kind, NodeKind::Compound);

    let assign = root.child(0).expect("Missing assignment");
    assert_eq!(assign.kind, NodeKind::Assign);
    assert_eq!(assign.ty, TypeSpec::INT);
    assert_eq!(assign.line(), Some(3));

    let target = assign.child(0).expect("Missing target");
    assert_eq!(target.kind, NodeKind::Variable);
    let x = target.id().expect("Target has no symbol");
    assert_eq!(unit.symtab.entry(x).name(), "x");
    assert_eq!(unit.symtab.entry(x).line_numbers(), &[2, 3]);

    let value = assign.child(1).expect("Missing value");
    assert_eq!(value.kind, NodeKind::IntegerConstant);
    assert_eq!(value.ty, TypeSpec::INT);
}

#[test]
fn test_incompatible_assignment_still_builds_node() {
    let source = r#"
        void p() {
            int x;
            x = 3.5;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 1);
    assert_eq!(unit.count_of(ErrorKind::IncompatibleTypes), 1);
    assert_eq!(unit.errors[0].location.line, 4);

    let assign = body(&unit, "p").child(1).expect("Missing assignment");
    assert_eq!(assign.kind, NodeKind::Assign);
    assert_eq!(assign.children.len(), 2);
}

#[test]
fn test_integer_widens_to_double() {
    let source = r#"
        void p() {
            double d;
            int i;
            d = i * 2 + 1.5;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let assign = body(&unit, "p").child(2).expect("Missing assignment");
    let add = assign.child(1).expect("Missing value");
    assert_eq!(add.kind, NodeKind::Add);
    assert_eq!(add.ty, TypeSpec::DOUBLE);
    assert_eq!(add.child(0).map(|n| n.kind), Some(NodeKind::Multiply));
}

#[test]
fn test_forward_then_definition() {
    let source = r#"
        int square(int n);
        void p() {
            int y;
            y = square(4);
        }
        int square(int n) {
            return n * n;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::IdentifierRedefined), 0);
    assert_eq!(unit.count_of(ErrorKind::AlreadyForwarded), 1);
    assert_eq!(unit.error_count(), 1, "{:?}", unit.errors);
    assert_eq!(unit.errors[0].location.line, 7);

    let square = unit.routine("square").expect("square not declared");
    let routines = unit
        .entries_named("square")
        .into_iter()
        .filter(|id| unit.symtab.entry(*id).kind().is_routine())
        .count();
    assert_eq!(routines, 1);

    let entry = unit.symtab.entry(square);
    assert_eq!(entry.kind(), DefinitionKind::Function);
    assert_eq!(entry.type_spec(), TypeSpec::INT);
    assert_eq!(
        entry.routine().and_then(|info| info.code),
        Some(RoutineCode::Declared)
    );

    let children = &unit
        .symtab
        .entry(unit.program)
        .routine()
        .expect("Program has no routine info")
        .routines;
    assert_eq!(children.iter().filter(|id| **id == square).count(), 1);
}

#[test]
fn test_unfinished_forward_stays_forward() {
    let unit = parse_source("void later(int a);").expect("Parsing failed");
    assert_eq!(unit.error_count(), 0);

    let later = unit.routine("later").expect("later not declared");
    let info = unit.symtab.entry(later).routine().expect("No routine info");
    assert!(info.is_forward());
    assert_eq!(info.params.len(), 1);
}

#[test]
fn test_return_statements() {
    let source = r#"
        int f() {
            return;
        }
        void p() {
            return;
        }
        void q() {
            return 1;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 2, "{:?}", unit.errors);
    assert_eq!(unit.count_of(ErrorKind::MissingExpression), 1);
    assert_eq!(unit.count_of(ErrorKind::InvalidAssignToVoid), 1);

    let lines: Vec<_> = unit.errors.iter().map(|e| e.location.line).collect();
    assert_eq!(lines, vec![3, 9]);
}

#[test]
fn test_return_assigns_to_slot_past_locals() {
    let source = r#"
        int f(int a) {
            int b;
            return a + b;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let ret = body(&unit, "f").child(1).expect("Missing return");
    assert_eq!(ret.kind, NodeKind::Assign);
    assert_eq!(ret.ty, TypeSpec::INT);

    let target = ret.child(0).and_then(|n| n.id()).expect("No return target");
    let entry = unit.symtab.entry(target);
    assert_eq!(entry.name(), "f");
    assert_eq!(entry.definition.slot(), Some(2));
}

#[test]
fn test_return_uses_next_free_slot() {
    let unit = parse_source("int f() {\n    return 1;\n}").expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let ret = body(&unit, "f").child(0).expect("Missing return");
    let target = ret.child(0).and_then(|n| n.id()).expect("No return target");
    assert_eq!(unit.symtab.entry(target).definition.slot(), Some(0));
}

#[test]
fn test_declared_names_resolve_locally() {
    let source = r#"
        const int limit = 10;
        typedef double real;
        real r;
        void p(int n) {
            char c;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let kind_of = |name: &str| {
        let ids = unit.entries_named(name);
        assert_eq!(ids.len(), 1, "{} declared {} times", name, ids.len());
        unit.symtab.entry(ids[0]).kind()
    };
    assert_eq!(kind_of("limit"), DefinitionKind::Constant);
    assert_eq!(kind_of("real"), DefinitionKind::Type);
    assert_eq!(kind_of("r"), DefinitionKind::Variable);
    assert_eq!(kind_of("p"), DefinitionKind::Procedure);
    assert_eq!(kind_of("n"), DefinitionKind::ValueParam);
    assert_eq!(kind_of("c"), DefinitionKind::Variable);

    let r = unit.entries_named("r")[0];
    assert_eq!(unit.symtab.entry(r).type_spec(), TypeSpec::DOUBLE);
}

#[test]
fn test_main_is_program_entry_point() {
    let source = r#"
        int counter;
        int main() {
            counter = 0;
            while (counter < 10) {
                counter = counter + 1;
            }
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let main = unit.routine("main").expect("main not declared");
    let program = unit
        .symtab
        .entry(unit.program)
        .routine()
        .expect("Program has no routine info");
    assert_eq!(program.main_routine, Some(main));

    let root = body(&unit, "main");
    assert_eq!(root.count_kind(NodeKind::While), 1);
    assert_eq!(root.count_kind(NodeKind::Assign), 2);
}

#[test]
fn test_call_arguments_are_checked() {
    let source = r#"
        void show(int a, double b) {
        }
        void p() {
            show(1, 2);
            show(1);
            show(1.5, 2);
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.count_of(ErrorKind::WrongNumberOfParms), 1);
    assert_eq!(unit.count_of(ErrorKind::IncompatibleTypes), 1);
    assert_eq!(unit.error_count(), 2);

    let root = body(&unit, "p");
    assert_eq!(root.count_kind(NodeKind::Call), 3);
    let first = root.child(0).expect("Missing call");
    assert_eq!(first.child(0).map(|n| n.children.len()), Some(2));
}

#[test]
fn test_printers_on_parsed_program() {
    let source = r#"
        int total;
        void add(int n) {
            total = total + n;
        }
    "#;

    let unit = parse_source(source).expect("Parsing failed");
    assert_eq!(unit.error_count(), 0, "{:?}", unit.errors);

    let xref = subcc::symtab::xref::listing(&unit.symtab);
    assert!(xref.iter().any(|l| l.contains("total")));
    assert!(xref.iter().any(|l| l.contains("add")));

    let icode = subcc::icode::printer::print_routines(&unit.symtab);
    assert!(icode.iter().any(|l| l.contains("<ASSIGN line=\"4\" type=\"int\">")));
    assert!(icode.iter().any(|l| l.contains("<ADD")));
    assert!(icode.iter().any(|l| l.contains("id=\"n\"")));
}
