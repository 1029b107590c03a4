//! Intermediate code
//!
//! Each routine owns one [`ICode`] whose root is an [`ICodeNode`] tree. A
//! node has a [`NodeKind`] tag, an ordered list of owned children, a resolved
//! [`TypeSpec`], and a few attributes: the source line, a handle to the
//! symbol entry it refers to, and a literal value for constants.
//!
//! Nodes are built bottom-up by the parser and attached to their parent
//! immediately; once attached they are not re-parented.

pub mod printer;

use crate::symtab::EntryId;
use crate::types::TypeSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Statements
    Compound,
    Assign,
    If,
    While,
    DoWhile,
    Call,
    Parameters,
    NoOp,

    // Operands
    Variable,
    IntegerConstant,
    RealConstant,
    CharConstant,
    StringConstant,

    // Operators
    Negate,
    Not,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Compound => "COMPOUND",
            NodeKind::Assign => "ASSIGN",
            NodeKind::If => "IF",
            NodeKind::While => "WHILE",
            NodeKind::DoWhile => "DO_WHILE",
            NodeKind::Call => "CALL",
            NodeKind::Parameters => "PARAMETERS",
            NodeKind::NoOp => "NO_OP",
            NodeKind::Variable => "VARIABLE",
            NodeKind::IntegerConstant => "INTEGER_CONSTANT",
            NodeKind::RealConstant => "REAL_CONSTANT",
            NodeKind::CharConstant => "CHAR_CONSTANT",
            NodeKind::StringConstant => "STRING_CONSTANT",
            NodeKind::Negate => "NEGATE",
            NodeKind::Not => "NOT",
            NodeKind::Add => "ADD",
            NodeKind::Subtract => "SUBTRACT",
            NodeKind::Multiply => "MULTIPLY",
            NodeKind::Divide => "DIVIDE",
            NodeKind::Modulo => "MODULO",
            NodeKind::And => "AND",
            NodeKind::Or => "OR",
            NodeKind::Eq => "EQ",
            NodeKind::Ne => "NE",
            NodeKind::Lt => "LT",
            NodeKind::Le => "LE",
            NodeKind::Gt => "GT",
            NodeKind::Ge => "GE",
        }
    }
}

/// Literal carried by constant nodes
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Integer(i64),
    Real(f64),
    Character(char),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeAttrs {
    pub line: Option<usize>,
    pub id: Option<EntryId>,
    pub value: Option<NodeValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ICodeNode {
    pub kind: NodeKind,
    pub children: Vec<ICodeNode>,
    pub ty: TypeSpec,
    pub attrs: NodeAttrs,
}

impl ICodeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            ty: TypeSpec::UNDEFINED,
            attrs: NodeAttrs::default(),
        }
    }

    pub fn with_type(mut self, ty: TypeSpec) -> Self {
        self.ty = ty;
        self
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.attrs.id = Some(id);
        self
    }

    pub fn with_value(mut self, value: NodeValue) -> Self {
        self.attrs.value = Some(value);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.attrs.line = Some(line);
        self
    }

    pub fn add_child(&mut self, child: ICodeNode) {
        self.children.push(child);
    }

    pub fn line(&self) -> Option<usize> {
        self.attrs.line
    }

    pub fn id(&self) -> Option<EntryId> {
        self.attrs.id
    }

    pub fn child(&self, index: usize) -> Option<&ICodeNode> {
        self.children.get(index)
    }

    /// Depth-first count of nodes of `kind` in this subtree
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        let own = usize::from(self.kind == kind);
        own + self
            .children
            .iter()
            .map(|c| c.count_kind(kind))
            .sum::<usize>()
    }
}

/// Intermediate code of one routine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ICode {
    root: Option<ICodeNode>,
}

impl ICode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, root: ICodeNode) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<&ICodeNode> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut ICodeNode> {
        self.root.as_mut()
    }
}
