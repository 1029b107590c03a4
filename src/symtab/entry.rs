//! Symbol entries
//!
//! A [`SymbolEntry`] describes one declared name. What the entry carries
//! depends on how the name was defined, so [`Definition`] is a closed variant
//! type: routines carry a [`RoutineInfo`], storage carries its slot, and
//! constants carry their value.

use super::{EntryId, ScopeId};
use crate::icode::ICode;
use crate::types::TypeSpec;
use std::fmt;

/// Fieldless view of a [`Definition`], convenient for matching and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Program,
    Procedure,
    Function,
    Variable,
    ValueParam,
    VarParam,
    Constant,
    Type,
    Undefined,
}

impl DefinitionKind {
    pub fn name(self) -> &'static str {
        match self {
            DefinitionKind::Program => "program",
            DefinitionKind::Procedure => "procedure",
            DefinitionKind::Function => "function",
            DefinitionKind::Variable => "variable",
            DefinitionKind::ValueParam => "value parameter",
            DefinitionKind::VarParam => "var parameter",
            DefinitionKind::Constant => "constant",
            DefinitionKind::Type => "type",
            DefinitionKind::Undefined => "undefined",
        }
    }

    pub fn is_routine(self) -> bool {
        matches!(
            self,
            DefinitionKind::Program | DefinitionKind::Procedure | DefinitionKind::Function
        )
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declaration status of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineCode {
    Forward,
    Declared,
}

/// Bookkeeping for programs, procedures and functions.
#[derive(Debug, Clone, Default)]
pub struct RoutineInfo {
    pub code: Option<RoutineCode>,
    pub scope: Option<ScopeId>,
    pub icode: ICode,
    pub params: Vec<EntryId>,
    pub routines: Vec<EntryId>,
    /// Program only: the `main` function acting as entry point
    pub main_routine: Option<EntryId>,
}

impl RoutineInfo {
    pub fn is_forward(&self) -> bool {
        self.code == Some(RoutineCode::Forward)
    }
}

/// Value bound to a constant
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Integer(i64),
    Real(f64),
    Character(char),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Integer(v) => write!(f, "{}", v),
            ConstValue::Real(v) => write!(f, "{}", v),
            ConstValue::Character(c) => write!(f, "{:?}", c),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Definition {
    Program(RoutineInfo),
    Procedure(RoutineInfo),
    Function(RoutineInfo),
    Variable { slot: usize },
    ValueParam { slot: usize },
    VarParam { slot: usize },
    Constant(ConstValue),
    Type,
    Undefined,
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Program(_) => DefinitionKind::Program,
            Definition::Procedure(_) => DefinitionKind::Procedure,
            Definition::Function(_) => DefinitionKind::Function,
            Definition::Variable { .. } => DefinitionKind::Variable,
            Definition::ValueParam { .. } => DefinitionKind::ValueParam,
            Definition::VarParam { .. } => DefinitionKind::VarParam,
            Definition::Constant(_) => DefinitionKind::Constant,
            Definition::Type => DefinitionKind::Type,
            Definition::Undefined => DefinitionKind::Undefined,
        }
    }

    /// Storage of `kind` (variable or parameter) at `slot`.
    ///
    /// Falls back to a plain variable for non-storage kinds.
    pub fn storage(kind: DefinitionKind, slot: usize) -> Self {
        match kind {
            DefinitionKind::ValueParam => Definition::ValueParam { slot },
            DefinitionKind::VarParam => Definition::VarParam { slot },
            _ => Definition::Variable { slot },
        }
    }

    /// Routine of `kind` carrying `info`.
    pub fn routine(kind: DefinitionKind, info: RoutineInfo) -> Self {
        match kind {
            DefinitionKind::Program => Definition::Program(info),
            DefinitionKind::Procedure => Definition::Procedure(info),
            _ => Definition::Function(info),
        }
    }

    pub fn routine_info(&self) -> Option<&RoutineInfo> {
        match self {
            Definition::Program(info) | Definition::Procedure(info) | Definition::Function(info) => {
                Some(info)
            }
            _ => None,
        }
    }

    pub fn routine_info_mut(&mut self) -> Option<&mut RoutineInfo> {
        match self {
            Definition::Program(info) | Definition::Procedure(info) | Definition::Function(info) => {
                Some(info)
            }
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<usize> {
        match self {
            Definition::Variable { slot }
            | Definition::ValueParam { slot }
            | Definition::VarParam { slot } => Some(*slot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolEntry {
    name: String,
    pub definition: Definition,
    pub ty: Option<TypeSpec>,
    scope: ScopeId,
    line_numbers: Vec<usize>,
}

impl SymbolEntry {
    pub(crate) fn new(name: String, scope: ScopeId) -> Self {
        Self {
            name,
            definition: Definition::Undefined,
            ty: None,
            scope,
            line_numbers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DefinitionKind {
        self.definition.kind()
    }

    /// Owning scope (non-owning back-reference)
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Resolved type, or the undefined sentinel
    pub fn type_spec(&self) -> TypeSpec {
        self.ty.clone().unwrap_or_default()
    }

    pub fn line_numbers(&self) -> &[usize] {
        &self.line_numbers
    }

    /// Record a line where the name appears; each line is kept once.
    pub fn append_line_number(&mut self, line: usize) {
        if !self.line_numbers.contains(&line) {
            self.line_numbers.push(line);
        }
    }

    pub fn routine(&self) -> Option<&RoutineInfo> {
        self.definition.routine_info()
    }

    pub fn routine_mut(&mut self) -> Option<&mut RoutineInfo> {
        self.definition.routine_info_mut()
    }

    /// Re-tag a routine entry (e.g. a forwarded function completed as a
    /// procedure), keeping its bookkeeping.
    pub fn set_routine_kind(&mut self, kind: DefinitionKind) {
        let info = self.definition.routine_info().cloned().unwrap_or_default();
        self.definition = Definition::routine(kind, info);
    }
}
