//! Declaration parsing implementation
//!
//! This module handles the declarations that may appear at top level and
//! at the head of statement lists:
//!
//! - Constant definitions: `const double pi = 3.14159, e = 2.71828;`
//! - Type definitions: `typedef int count;`, `typedef char line[80];`
//! - Variable declarations: `int i, j;`
//! - Type specifications, including `struct`/`union` record names
//!
//! # Grammar
//!
//! ```text
//! declarations ::= { const_defs | type_defs | var_decls | routine }
//! const_defs   ::= "const" [type] identifier "=" constant { "," identifier "=" constant } ";"
//! type_defs    ::= "typedef" type identifier [ "[" integer "]" ] ";"
//! var_decls    ::= type identifier { "," identifier } ";"
//! constant     ::= [ "+" | "-" ] ( integer | real ) | character
//! type         ::= "int" | "float" | "double" | "char" | "void"
//!                | ( "struct" | "union" ) identifier | type_identifier
//! ```
//!
//! At top level, `identifier =` and `{` start statements of the program's
//! own body. A top-level `type identifier (` hands off to the routine parser with the
//! already parsed type as the function's return type.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{ErrorKind, ParseError};
use crate::icode::{ICodeNode, NodeKind};
use crate::parser::parse::Parser;
use crate::parser::token::{Token, TokenKind, TokenSet, TokenValue};
use crate::symtab::{ConstValue, Definition, DefinitionKind, EntryId};
use crate::types::{checker, TypeSpec};

/// Tokens that can start a declaration
pub(crate) const DECLARATION_START_SET: TokenSet = TokenSet::of(&[
    TokenKind::Const,
    TokenKind::Typedef,
    TokenKind::Int,
    TokenKind::Double,
    TokenKind::Float,
    TokenKind::Char,
    TokenKind::Void,
    TokenKind::Identifier,
]);

/// Top-level recovery set: declarations plus program-body statements
const TOP_LEVEL_SET: TokenSet = DECLARATION_START_SET.with(TokenKind::LeftBrace);

const SCALAR_TYPE_SET: TokenSet = TokenSet::of(&[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Char,
]);

/// Type of a constant's value
fn constant_type(value: &ConstValue) -> TypeSpec {
    match value {
        ConstValue::Integer(_) => TypeSpec::INT,
        ConstValue::Real(_) => TypeSpec::DOUBLE,
        ConstValue::Character(_) => TypeSpec::CHAR,
    }
}

impl Parser {
    /// Parse declarations and routines up to end of file. Routines found
    /// here become children of `parent`.
    pub(crate) fn parse_declarations(&mut self, parent: EntryId) -> Result<(), ParseError> {
        while !self.current().is_eof() {
            let start = self.position();
            let token = self.synchronize(TOP_LEVEL_SET)?;
            let assignment =
                token.kind == TokenKind::Identifier && self.peek_kind()? == TokenKind::Equals;

            match token.kind {
                TokenKind::EndOfFile => break,
                TokenKind::LeftBrace => self.parse_program_statement(parent)?,
                _ if assignment => self.parse_program_statement(parent)?,
                TokenKind::Const => {
                    self.next_token()?;
                    self.parse_constant_definitions()?;
                }
                TokenKind::Typedef => {
                    self.next_token()?;
                    self.parse_type_definitions()?;
                }
                _ if self.starts_variable_declaration() => {
                    self.parse_variable_declarations(Some(parent))?;
                }
                _ => {
                    self.parse_routine(parent, None)?;
                }
            }

            // Nothing consumed: drop the token so the loop always advances
            if self.position() == start && !self.current().is_eof() {
                self.flag(ErrorKind::UnexpectedToken);
                self.next_token()?;
            }
        }
        Ok(())
    }

    /// Parse a statement at top level and append it to `program`'s body.
    fn parse_program_statement(&mut self, program: EntryId) -> Result<(), ParseError> {
        let statement = self.parse_statement(program)?;
        self.match_token(TokenKind::Semicolon)?;

        let Some(info) = self.symtab.entry_mut(program).routine_mut() else {
            return Ok(());
        };
        match info.icode.root_mut() {
            Some(root) => root.add_child(statement),
            None => {
                let mut root = ICodeNode::new(NodeKind::Compound);
                root.attrs.line = statement.line();
                root.add_child(statement);
                info.icode.set_root(root);
            }
        }
        Ok(())
    }

    /// Does the current token start `type identifier ...`?
    pub(crate) fn starts_variable_declaration(&self) -> bool {
        let token = self.current();
        match token.kind {
            kind if SCALAR_TYPE_SET.contains(kind) => true,
            TokenKind::Identifier => self.type_named(&token.text).is_some(),
            _ => false,
        }
    }

    /// The type entry visible as `name`, if any
    fn type_named(&self, name: &str) -> Option<EntryId> {
        self.symtab
            .lookup(name)
            .filter(|id| self.entry_kind(*id) == DefinitionKind::Type)
    }

    /// Parse a type specification. Returns `None` without consuming anything
    /// when the current token does not start one.
    pub(crate) fn parse_type_spec(&mut self) -> Result<Option<TypeSpec>, ParseError> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Char
            | TokenKind::Void
            | TokenKind::Identifier => {
                let Some(id) = self.type_named(&token.text) else {
                    return Ok(None);
                };
                let entry = self.symtab.entry_mut(id);
                entry.append_line_number(token.line());
                let ty = entry.type_spec();
                self.next_token()?;
                Ok(Some(ty))
            }
            TokenKind::Struct | TokenKind::Union => {
                let name = self.next_token()?;
                if name.kind == TokenKind::Identifier {
                    self.next_token()?;
                    Ok(Some(TypeSpec::Record {
                        name: name.text.to_lowercase(),
                    }))
                } else {
                    self.flag(ErrorKind::MissingIdentifier);
                    Ok(Some(TypeSpec::UNDEFINED))
                }
            }
            _ => Ok(None),
        }
    }

    /// Enter a variable or parameter in the local scope with the next slot.
    pub(crate) fn declare_storage(
        &mut self,
        token: &Token,
        kind: DefinitionKind,
        ty: &TypeSpec,
    ) -> Option<EntryId> {
        let Some(id) = self.symtab.enter_local(&token.text) else {
            self.flag_at(token, ErrorKind::IdentifierRedefined);
            return None;
        };

        let slot = self.symtab.local_scope_mut().next_slot_number();
        let entry = self.symtab.entry_mut(id);
        entry.definition = Definition::storage(kind, slot);
        entry.ty = Some(ty.clone());
        entry.append_line_number(token.line());
        Some(id)
    }

    /// Parse `type identifier { , identifier } ;`.
    ///
    /// With a `routine_parent`, a first identifier followed by `(` starts a
    /// function instead, declared under that parent.
    pub(crate) fn parse_variable_declarations(
        &mut self,
        routine_parent: Option<EntryId>,
    ) -> Result<(), ParseError> {
        let type_token = self.current().clone();
        let ty = match self.parse_type_spec()? {
            Some(ty) => ty,
            None => {
                self.flag(ErrorKind::InvalidType);
                TypeSpec::UNDEFINED
            }
        };

        let mut first = true;
        loop {
            let token = self.current().clone();
            if token.kind != TokenKind::Identifier {
                self.flag(ErrorKind::MissingIdentifier);
                break;
            }

            if first {
                if let Some(parent) = routine_parent {
                    if self.peek_kind()? == TokenKind::LeftParen {
                        self.parse_routine(parent, Some(ty))?;
                        return Ok(());
                    }
                }
                if ty == TypeSpec::VOID {
                    self.flag_at(&type_token, ErrorKind::InvalidType);
                }
                first = false;
            }

            self.declare_storage(&token, DefinitionKind::Variable, &ty);
            self.next_token()?;

            if self.match_token(TokenKind::Comma)? {
                continue;
            }
            if self.check(TokenKind::Identifier) {
                self.flag(ErrorKind::MissingComma);
                continue;
            }
            break;
        }

        if !self.match_token(TokenKind::Semicolon)? {
            self.flag(ErrorKind::MissingSemicolon);
        }
        Ok(())
    }

    /// Parse the definitions after `const`.
    pub(crate) fn parse_constant_definitions(&mut self) -> Result<(), ParseError> {
        let declared = if self.starts_variable_declaration() {
            self.parse_type_spec()?
        } else {
            None
        };

        loop {
            let name = self.current().clone();
            if name.kind != TokenKind::Identifier {
                self.flag(ErrorKind::MissingIdentifier);
                break;
            }
            self.next_token()?;

            if !self.match_token(TokenKind::Equals)? {
                self.flag(ErrorKind::MissingEquals);
            }

            let value_token = self.current().clone();
            if let Some(value) = self.parse_constant_value()? {
                let value_type = constant_type(&value);
                let ty = match &declared {
                    Some(declared) => {
                        if !checker::are_assignment_compatible(declared, &value_type) {
                            self.flag_at(&value_token, ErrorKind::IncompatibleTypes);
                        }
                        declared.clone()
                    }
                    None => value_type,
                };

                match self.symtab.enter_local(&name.text) {
                    Some(id) => {
                        let entry = self.symtab.entry_mut(id);
                        entry.definition = Definition::Constant(value);
                        entry.ty = Some(ty);
                        entry.append_line_number(name.line());
                    }
                    None => self.flag_at(&name, ErrorKind::IdentifierRedefined),
                }
            }

            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        if !self.match_token(TokenKind::Semicolon)? {
            self.flag(ErrorKind::MissingSemicolon);
        }
        Ok(())
    }

    /// Parse an optionally signed literal.
    fn parse_constant_value(&mut self) -> Result<Option<ConstValue>, ParseError> {
        let sign = match self.current_kind() {
            TokenKind::Plus => Some(1),
            TokenKind::Minus => Some(-1),
            _ => None,
        };
        if sign.is_some() {
            self.next_token()?;
        }

        let token = self.current().clone();
        let factor = sign.unwrap_or(1);
        let value = match &token.value {
            Some(TokenValue::Integer(v)) => Some(ConstValue::Integer(factor * v)),
            Some(TokenValue::Real(v)) => Some(ConstValue::Real(factor as f64 * v)),
            Some(TokenValue::Character(c)) if sign.is_none() => Some(ConstValue::Character(*c)),
            _ => None,
        };

        if value.is_none() {
            self.flag(ErrorKind::InvalidConstant);
        }
        if matches!(
            token.kind,
            TokenKind::Integer | TokenKind::Real | TokenKind::Character | TokenKind::String
        ) {
            self.next_token()?;
        }
        Ok(value)
    }

    /// Parse the definition after `typedef`.
    pub(crate) fn parse_type_definitions(&mut self) -> Result<(), ParseError> {
        let ty = match self.parse_type_spec()? {
            Some(ty) => ty,
            None => {
                self.flag(ErrorKind::InvalidType);
                TypeSpec::UNDEFINED
            }
        };

        let name = self.current().clone();
        if name.kind == TokenKind::Identifier {
            self.next_token()?;
            let ty = if self.match_token(TokenKind::LeftBracket)? {
                self.parse_array_bound(ty)?
            } else {
                ty
            };

            match self.symtab.enter_local(&name.text) {
                Some(id) => {
                    let entry = self.symtab.entry_mut(id);
                    entry.definition = Definition::Type;
                    entry.ty = Some(ty);
                    entry.append_line_number(name.line());
                }
                None => self.flag_at(&name, ErrorKind::IdentifierRedefined),
            }
        } else {
            self.flag(ErrorKind::MissingIdentifier);
        }

        if !self.match_token(TokenKind::Semicolon)? {
            self.flag(ErrorKind::MissingSemicolon);
        }
        Ok(())
    }

    /// Parse `integer ]` after `[`, making an array of `element`.
    fn parse_array_bound(&mut self, element: TypeSpec) -> Result<TypeSpec, ParseError> {
        let Some(primitive) = element.primitive() else {
            self.flag(ErrorKind::InvalidType);
            return Ok(TypeSpec::UNDEFINED);
        };

        let bound = match self.current().value {
            Some(TokenValue::Integer(n)) if n >= 0 => Some(n as usize),
            _ => None,
        };
        let count = match bound {
            Some(n) => {
                self.next_token()?;
                n
            }
            None => {
                self.flag(ErrorKind::InvalidConstant);
                0
            }
        };

        if !self.match_token(TokenKind::RightBracket)? {
            self.flag(ErrorKind::UnexpectedToken);
        }
        Ok(TypeSpec::Array {
            element: primitive,
            count,
        })
    }
}
