//! Statement parsing implementation
//!
//! Every statement becomes one intermediate-code node stamped with the line
//! the statement starts on:
//!
//! - Compound statements: `{ ... }` → `COMPOUND`
//! - Assignments: `x = expr;` → `ASSIGN`
//! - Procedure/function calls: `f(a, b);` → `CALL`
//! - Control flow: `if`/`else`, `while`, `do`-`while`
//! - `return [expr];` → `ASSIGN` to the routine's return-value slot
//! - Declarations inside a body: parsed into the routine scope → `NO_OP`
//!
//! # Grammar
//!
//! ```text
//! statement ::= compound | assignment | call | if_stmt | while_stmt
//!             | do_while | return_stmt | var_decls | const_defs | ";"
//! compound  ::= "{" { statement } "}"
//! if_stmt   ::= "if" "(" expression ")" statement [ "else" statement ]
//! while_stmt ::= "while" "(" expression ")" statement
//! do_while  ::= "do" statement "while" "(" expression ")"
//! return_stmt ::= "return" [ expression ] ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{ErrorKind, ParseError};
use crate::icode::{ICodeNode, NodeKind};
use crate::parser::expressions::EXPRESSION_START_SET;
use crate::parser::parse::Parser;
use crate::parser::token::{TokenKind, TokenSet};
use crate::symtab::{Definition, DefinitionKind, EntryId};
use crate::types::{checker, TypeSpec};

/// Tokens that can start a statement. `for` and `switch` are not part of
/// the language and must not stop recovery.
pub(crate) const STATEMENT_START_SET: TokenSet = TokenSet::of(&[
    TokenKind::LeftBrace,
    TokenKind::If,
    TokenKind::Do,
    TokenKind::While,
    TokenKind::Identifier,
    TokenKind::Semicolon,
    TokenKind::Int,
    TokenKind::Char,
    TokenKind::Double,
    TokenKind::Float,
    TokenKind::Const,
    TokenKind::Return,
]);

impl Parser {
    /// Parse one statement inside `routine`.
    pub(crate) fn parse_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        let token = self.current().clone();

        let node = match token.kind {
            TokenKind::LeftBrace => self.parse_compound_statement(routine)?,
            TokenKind::Identifier => self.parse_identifier_statement()?,
            TokenKind::Int | TokenKind::Char | TokenKind::Float | TokenKind::Double => {
                self.parse_variable_declarations(None)?;
                ICodeNode::new(NodeKind::NoOp)
            }
            TokenKind::Const => {
                self.next_token()?;
                self.parse_constant_definitions()?;
                ICodeNode::new(NodeKind::NoOp)
            }
            TokenKind::Do => self.parse_do_while_statement(routine)?,
            TokenKind::While => self.parse_while_statement(routine)?,
            TokenKind::If => self.parse_if_statement(routine)?,
            TokenKind::Return => self.parse_return_statement(routine)?,
            _ => ICodeNode::new(NodeKind::NoOp),
        };

        Ok(node.with_line(token.line()))
    }

    /// Parse statements into `parent` until `terminator`, which is consumed.
    /// A missing terminator is flagged once as `error`.
    pub(crate) fn parse_list(
        &mut self,
        parent: &mut ICodeNode,
        routine: EntryId,
        terminator: TokenKind,
        error: ErrorKind,
    ) -> Result<(), ParseError> {
        let terminator_set = STATEMENT_START_SET
            .with(terminator)
            .with(TokenKind::EndOfFile);

        let mut token = self.current().clone();
        while !token.is_eof() && token.kind != terminator {
            let start = self.position();

            let statement = self.parse_statement(routine)?;
            parent.add_child(statement);
            self.match_token(TokenKind::Semicolon)?;

            if self.position() == start {
                self.flag(ErrorKind::UnexpectedToken);
                self.next_token()?;
            }

            token = self.synchronize(terminator_set)?;
        }

        if token.kind == terminator {
            self.next_token()?;
        } else {
            self.flag(error);
        }
        Ok(())
    }

    /// Parse `{ statements }`.
    pub(crate) fn parse_compound_statement(
        &mut self,
        routine: EntryId,
    ) -> Result<ICodeNode, ParseError> {
        let line = self.current().line();
        self.next_token()?; // consume '{'

        let mut compound = ICodeNode::new(NodeKind::Compound).with_line(line);
        self.parse_list(
            &mut compound,
            routine,
            TokenKind::RightBrace,
            ErrorKind::MissingRightBrace,
        )?;
        Ok(compound)
    }

    /// A statement that starts with an identifier: assignment or call,
    /// decided by what the identifier names.
    fn parse_identifier_statement(&mut self) -> Result<ICodeNode, ParseError> {
        let token = self.current().clone();
        let kind = self
            .symtab
            .lookup(&token.text)
            .map(|id| self.entry_kind(id))
            .unwrap_or(DefinitionKind::Undefined);

        match kind {
            DefinitionKind::Variable
            | DefinitionKind::ValueParam
            | DefinitionKind::VarParam
            | DefinitionKind::Undefined => self.parse_assignment_statement(),
            DefinitionKind::Function | DefinitionKind::Procedure => {
                let call = self.parse_call()?;
                if !self.check(TokenKind::Semicolon) {
                    self.flag(ErrorKind::MissingSemicolon);
                }
                Ok(call)
            }
            _ => {
                self.flag(ErrorKind::UnexpectedToken);
                self.next_token()?;
                Ok(ICodeNode::new(NodeKind::NoOp))
            }
        }
    }

    /// Parse `variable = expression`. The `;` is left for the statement list.
    fn parse_assignment_statement(&mut self) -> Result<ICodeNode, ParseError> {
        let target = self.parse_variable()?;
        let target_type = target.ty.clone();

        if !self.match_token(TokenKind::Equals)? {
            self.flag(ErrorKind::MissingEquals);
        }

        let value_token = self.current().clone();
        let value = self.parse_expression()?;
        if !checker::are_assignment_compatible(&target_type, &value.ty) {
            self.flag_at(&value_token, ErrorKind::IncompatibleTypes);
        }

        let mut assign = ICodeNode::new(NodeKind::Assign).with_type(target_type);
        assign.add_child(target);
        assign.add_child(value);

        if !self.check(TokenKind::Semicolon) {
            self.flag(ErrorKind::MissingSemicolon);
        }
        Ok(assign)
    }

    /// Parse a statement nested in a control construct, including its `;`.
    fn parse_nested_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        let statement = self.parse_statement(routine)?;
        self.match_token(TokenKind::Semicolon)?;
        Ok(statement)
    }

    /// Parse `( expression )` and check that it can serve as a condition.
    fn parse_condition(&mut self) -> Result<ICodeNode, ParseError> {
        if !self.match_token(TokenKind::LeftParen)? {
            self.flag(ErrorKind::MissingLeftParen);
        }

        let token = self.current().clone();
        let condition = self.parse_expression()?;
        if !checker::is_condition(&condition.ty) {
            self.flag_at(&token, ErrorKind::IncompatibleTypes);
        }

        if !self.match_token(TokenKind::RightParen)? {
            self.flag(ErrorKind::MissingRightParen);
        }
        Ok(condition)
    }

    fn parse_if_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        self.next_token()?; // consume 'if'

        let mut node = ICodeNode::new(NodeKind::If);
        node.add_child(self.parse_condition()?);
        node.add_child(self.parse_nested_statement(routine)?);

        if self.match_token(TokenKind::Else)? {
            node.add_child(self.parse_nested_statement(routine)?);
        }
        Ok(node)
    }

    fn parse_while_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        self.next_token()?; // consume 'while'

        let mut node = ICodeNode::new(NodeKind::While);
        node.add_child(self.parse_condition()?);
        node.add_child(self.parse_nested_statement(routine)?);
        Ok(node)
    }

    fn parse_do_while_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        self.next_token()?; // consume 'do'

        let mut node = ICodeNode::new(NodeKind::DoWhile);
        node.add_child(self.parse_nested_statement(routine)?);

        if self.match_token(TokenKind::While)? {
            node.add_child(self.parse_condition()?);
        } else {
            self.flag(ErrorKind::MissingWhile);
        }
        Ok(node)
    }

    /// Parse `return [expression]` as an assignment to a compiler-made
    /// variable in the routine's next free slot.
    fn parse_return_statement(&mut self, routine: EntryId) -> Result<ICodeNode, ParseError> {
        self.next_token()?; // consume 'return'

        let entry = self.symtab.entry(routine);
        let kind = entry.kind();
        let name = entry.name().to_string();
        let ty = match kind {
            DefinitionKind::Procedure => TypeSpec::VOID,
            _ => entry.type_spec(),
        };

        let slot = self.symtab.local_scope().slot_number();
        let target = self
            .symtab
            .create_detached(&name, Definition::Variable { slot }, ty.clone());

        let mut assign = ICodeNode::new(NodeKind::Assign).with_type(ty.clone());
        assign.add_child(
            ICodeNode::new(NodeKind::Variable)
                .with_type(ty.clone())
                .with_id(target),
        );

        if EXPRESSION_START_SET.contains(self.current_kind()) {
            let value_token = self.current().clone();
            let value = self.parse_expression()?;
            if kind == DefinitionKind::Procedure {
                self.flag_at(&value_token, ErrorKind::InvalidAssignToVoid);
            } else if !checker::are_assignment_compatible(&ty, &value.ty) {
                self.flag_at(&value_token, ErrorKind::IncompatibleTypes);
            }
            assign.add_child(value);
        } else if kind == DefinitionKind::Function {
            self.flag(ErrorKind::MissingExpression);
        }

        if !self.check(TokenKind::Semicolon) {
            self.flag(ErrorKind::MissingSemicolon);
        }
        Ok(assign)
    }
}
