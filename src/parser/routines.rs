//! Routine declarations
//!
//! Procedures, functions and their formal parameters. A routine owns a new
//! scope for its parameters and body; the scope is popped when the routine
//! ends however its parse went.
//!
//! # Grammar
//!
//! ```text
//! routine    ::= [ "void" | type ] identifier "(" [ parameters ] ")" ( block | ";" )
//! parameters ::= "void" | parameter { "," parameter }
//! parameter  ::= ( "int" | "float" | "double" ) identifier
//! ```
//!
//! A header followed by `;` (or by nothing that starts a body) declares the
//! routine forward. A later declaration with the same name completes it. The
//! completion should not repeat the header; one that does is flagged
//! `AlreadyForwarded` and its header is parsed anyway.

use crate::constants::{
    DUMMY_FUNCTION_PREFIX, DUMMY_PROCEDURE_PREFIX, DUMMY_PROGRAM_NAME, MAIN_ROUTINE_NAME,
};
use crate::errors::{ErrorKind, ParseError};
use crate::icode::ICode;
use crate::parser::declarations::DECLARATION_START_SET;
use crate::parser::parse::Parser;
use crate::parser::token::{TokenKind, TokenSet};
use crate::symtab::{Definition, DefinitionKind, EntryId, RoutineCode, RoutineInfo};
use crate::types::{TypeForm, TypeSpec};

/// Where a formal parameter list may begin
const LEFT_PAREN_SET: TokenSet = DECLARATION_START_SET
    .with(TokenKind::LeftParen)
    .with(TokenKind::Semicolon)
    .with(TokenKind::Colon)
    .with(TokenKind::LeftBrace);

/// Tokens that can start a parameter
const PARAMETER_TYPE_SET: TokenSet = TokenSet::of(&[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Char,
    TokenKind::Void,
    TokenKind::Identifier,
]);

/// What may follow a routine name
const ROUTINE_NAME_FOLLOW_SET: TokenSet = TokenSet::of(&[
    TokenKind::LeftParen,
    TokenKind::LeftBrace,
    TokenKind::Semicolon,
]);

const PARAMETER_SET: TokenSet = DECLARATION_START_SET.with(TokenKind::RightParen);

/// What may follow one parameter
const COMMA_SET: TokenSet = PARAMETER_TYPE_SET
    .with(TokenKind::Comma)
    .with(TokenKind::RightParen)
    .with(TokenKind::Semicolon)
    .with(TokenKind::LeftBrace);

impl Parser {
    /// Parse one routine declared under `parent`.
    ///
    /// `return_type` is set when a variable declaration handed off after
    /// reading `type identifier (`.
    pub(crate) fn parse_routine(
        &mut self,
        parent: EntryId,
        return_type: Option<TypeSpec>,
    ) -> Result<EntryId, ParseError> {
        let (kind, dummy) = match self.current_kind() {
            TokenKind::Void => {
                self.next_token()?;
                let dummy = self.next_dummy_name(DUMMY_PROCEDURE_PREFIX);
                (DefinitionKind::Procedure, dummy)
            }
            TokenKind::Identifier => {
                let dummy = self.next_dummy_name(DUMMY_FUNCTION_PREFIX);
                (DefinitionKind::Function, dummy)
            }
            _ => (DefinitionKind::Program, DUMMY_PROGRAM_NAME.to_string()),
        };

        let (routine, forwarded) = self.parse_routine_name(&dummy)?;

        let entry = self.symtab.entry_mut(routine);
        if forwarded {
            entry.set_routine_kind(kind);
        } else {
            entry.definition = Definition::routine(kind, RoutineInfo::default());
        }
        if kind == DefinitionKind::Procedure {
            entry.ty = Some(TypeSpec::VOID);
        }
        let is_main = kind == DefinitionKind::Function && entry.name() == MAIN_ROUTINE_NAME;

        let scope = self.symtab.push();
        if let Some(info) = self.symtab.entry_mut(routine).routine_mut() {
            info.scope = Some(scope);
            info.icode = ICode::new();
            info.params.clear();
        }

        if is_main {
            if let Some(program) = self.symtab.program_id() {
                if let Some(info) = self.symtab.entry_mut(program).routine_mut() {
                    info.main_routine = Some(routine);
                }
            }
            // Slot 0 of main's frame is reserved
            self.symtab.local_scope_mut().next_slot_number();
        } else if !forwarded {
            if let Some(info) = self.symtab.entry_mut(parent).routine_mut() {
                info.routines.push(routine);
            }
        }

        if forwarded && !self.check(TokenKind::Semicolon) {
            self.flag(ErrorKind::AlreadyForwarded);
        }
        self.parse_header(routine, kind, return_type)?;

        match self.current_kind() {
            TokenKind::LeftBrace => {
                self.set_routine_code(routine, RoutineCode::Declared);
                let body = self.parse_compound_statement(routine)?;
                if let Some(info) = self.symtab.entry_mut(routine).routine_mut() {
                    info.icode.set_root(body);
                }
            }
            TokenKind::Semicolon => {
                self.set_routine_code(routine, RoutineCode::Forward);
                self.next_token()?;
            }
            _ => self.set_routine_code(routine, RoutineCode::Forward),
        }

        self.symtab.pop();
        Ok(routine)
    }

    /// Resolve the routine's name to an entry: a new one, a forwarded one
    /// being completed, or a dummy when the name is missing or taken.
    fn parse_routine_name(&mut self, dummy: &str) -> Result<(EntryId, bool), ParseError> {
        let token = self.current().clone();
        let mut routine = None;
        let mut forwarded = false;

        if token.kind == TokenKind::Identifier {
            match self.symtab.lookup_local(&token.text) {
                None => routine = self.symtab.enter_local(&token.text),
                Some(id) if self.symtab.entry(id).routine().is_some_and(|r| r.is_forward()) => {
                    routine = Some(id);
                    forwarded = true;
                }
                Some(_) => self.flag(ErrorKind::IdentifierRedefined),
            }

            if let Some(id) = routine {
                self.symtab.entry_mut(id).append_line_number(token.line());
            }
            self.next_token()?;
            self.synchronize(ROUTINE_NAME_FOLLOW_SET)?;
        } else {
            self.flag(ErrorKind::MissingIdentifier);
        }

        let id = match routine {
            Some(id) => id,
            None => self.enter_or_detach(dummy),
        };
        Ok((id, forwarded))
    }

    fn set_routine_code(&mut self, routine: EntryId, code: RoutineCode) {
        if let Some(info) = self.symtab.entry_mut(routine).routine_mut() {
            info.code = Some(code);
        }
    }

    /// Parse the formal parameters and settle the return type.
    fn parse_header(
        &mut self,
        routine: EntryId,
        kind: DefinitionKind,
        return_type: Option<TypeSpec>,
    ) -> Result<(), ParseError> {
        self.parse_formal_parameters(routine)?;

        if kind == DefinitionKind::Function {
            let ty = match return_type {
                Some(ty) => {
                    if ty.form() != TypeForm::Scalar {
                        self.flag(ErrorKind::InvalidType);
                    }
                    ty
                }
                None => TypeSpec::UNDEFINED,
            };
            self.symtab.entry_mut(routine).ty = Some(ty);
        }
        Ok(())
    }

    /// Parse `( parameters )` if present and record the parameters in order.
    fn parse_formal_parameters(&mut self, routine: EntryId) -> Result<(), ParseError> {
        let token = self.synchronize(LEFT_PAREN_SET)?;
        let mut params = Vec::new();

        if token.kind == TokenKind::LeftParen {
            self.next_token()?;

            if self.check(TokenKind::Void) && self.peek_kind()? == TokenKind::RightParen {
                self.next_token()?;
            }
            self.synchronize(PARAMETER_SET)?;

            while PARAMETER_TYPE_SET.contains(self.current_kind()) {
                if let Some(param) = self.parse_parameter()? {
                    params.push(param);
                }
            }

            if !self.match_token(TokenKind::RightParen)? {
                self.flag(ErrorKind::MissingRightParen);
            }
        } else {
            self.flag(ErrorKind::MissingLeftParen);
        }

        if let Some(info) = self.symtab.entry_mut(routine).routine_mut() {
            info.params = params;
        }
        Ok(())
    }

    /// Parse one parameter and the comma after it. Always consumes at least
    /// one token.
    fn parse_parameter(&mut self) -> Result<Option<EntryId>, ParseError> {
        let mut param = None;

        match self.current_kind() {
            TokenKind::Int | TokenKind::Float | TokenKind::Double => {
                let ty = self.parse_type_spec()?.unwrap_or_default();
                let name = self.current().clone();
                if name.kind == TokenKind::Identifier {
                    param = self.declare_storage(&name, DefinitionKind::ValueParam, &ty);
                    self.next_token()?;
                } else {
                    self.flag(ErrorKind::MissingIdentifier);
                }
            }
            _ => {
                self.flag(ErrorKind::InvalidType);
                self.next_token()?;
                if self.check(TokenKind::Identifier) {
                    self.next_token()?;
                }
            }
        }

        let token = self.synchronize(COMMA_SET)?;
        if token.kind == TokenKind::Comma {
            self.next_token()?;
        } else if PARAMETER_TYPE_SET.contains(token.kind) {
            self.flag(ErrorKind::MissingComma);
        }
        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::parser::parse::{CompilationUnit, Parser};
    use crate::symtab::{DefinitionKind, RoutineCode};
    use crate::types::TypeSpec;

    fn parse(source: &str) -> CompilationUnit {
        Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap()
    }

    #[test]
    fn test_procedure_and_function_kinds() {
        let unit = parse("void p() { }\nint f(int a, double b) { }");
        assert_eq!(unit.error_count(), 0);

        let p = unit.symtab.entry(unit.routine("p").unwrap());
        assert_eq!(p.kind(), DefinitionKind::Procedure);
        assert_eq!(p.type_spec(), TypeSpec::VOID);

        let f = unit.symtab.entry(unit.routine("f").unwrap());
        assert_eq!(f.kind(), DefinitionKind::Function);
        assert_eq!(f.type_spec(), TypeSpec::INT);

        let params = &f.routine().unwrap().params;
        assert_eq!(params.len(), 2);
        let b = unit.symtab.entry(params[1]);
        assert_eq!(b.name(), "b");
        assert_eq!(b.kind(), DefinitionKind::ValueParam);
        assert_eq!(b.definition.slot(), Some(1));
    }

    #[test]
    fn test_routines_are_children_of_program() {
        let unit = parse("void a() { }\nvoid b() { }");
        let program = unit.symtab.entry(unit.program).routine().unwrap();
        let names: Vec<_> = program
            .routines
            .iter()
            .map(|id| unit.symtab.entry(*id).name())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_main_becomes_entry_point() {
        let unit = parse("int main() { int x; }");
        let main = unit.routine("main").unwrap();
        let program = unit.symtab.entry(unit.program).routine().unwrap();

        assert_eq!(program.main_routine, Some(main));
        assert!(program.routines.is_empty());

        // Slot 0 is taken by the return value
        let x = unit.symtab.entry(unit.entries_named("x")[0]);
        assert_eq!(x.definition.slot(), Some(1));
    }

    #[test]
    fn test_void_parameter_list_is_empty() {
        let unit = parse("int f(void) { }");
        assert_eq!(unit.error_count(), 0);
        let f = unit.symtab.entry(unit.routine("f").unwrap());
        assert!(f.routine().unwrap().params.is_empty());
    }

    #[test]
    fn test_char_parameter_is_invalid() {
        let unit = parse("int f(char c, int n) { }");
        assert_eq!(unit.count_of(ErrorKind::InvalidType), 1);
        let f = unit.symtab.entry(unit.routine("f").unwrap());
        assert_eq!(f.routine().unwrap().params.len(), 1);
    }

    #[test]
    fn test_forward_then_completion() {
        let unit = parse("void f();\nvoid f() { }");
        assert_eq!(unit.count_of(ErrorKind::IdentifierRedefined), 0);
        assert_eq!(unit.count_of(ErrorKind::AlreadyForwarded), 1);
        assert_eq!(unit.errors[0].location.line, 2);
        assert_eq!(unit.entries_named("f").len(), 1);

        let f_id = unit.routine("f").unwrap();
        let f = unit.symtab.entry(f_id);
        assert_eq!(f.routine().unwrap().code, Some(RoutineCode::Declared));
        assert_eq!(f.line_numbers(), &[1, 2]);

        let program = unit.symtab.entry(unit.program).routine().unwrap();
        assert_eq!(program.routines, vec![f_id]);
    }

    #[test]
    fn test_completion_header_is_still_parsed() {
        let unit = parse("int f(int a);\nint f(double a) { }");
        assert_eq!(unit.count_of(ErrorKind::AlreadyForwarded), 1);

        let f = unit.symtab.entry(unit.routine("f").unwrap());
        let params = &f.routine().unwrap().params;
        assert_eq!(params.len(), 1);
        assert_eq!(unit.symtab.entry(params[0]).type_spec(), TypeSpec::DOUBLE);
    }

    #[test]
    fn test_name_without_parameter_list_is_flagged() {
        let unit = parse("integer y;\nvoid p() { int z; z = 1; }");
        assert_eq!(unit.count_of(ErrorKind::MissingLeftParen), 1);
        assert_eq!(unit.count_of(ErrorKind::UnexpectedToken), 1);
        assert_eq!(unit.error_count(), 2);
        assert!(unit.routine("y").is_none());
        assert!(unit.routine("p").is_some());
    }

    #[test]
    fn test_duplicate_routine_gets_dummy_name() {
        let unit = parse("void p() { }\nvoid p() { }");
        assert_eq!(unit.count_of(ErrorKind::IdentifierRedefined), 1);
        assert!(unit.routine("dummyprocedurename_002").is_some());
    }

    #[test]
    fn test_record_return_type_is_invalid() {
        let unit = parse("typedef struct point pt;\npt f() { }");
        assert_eq!(unit.count_of(ErrorKind::InvalidType), 1);
    }

    #[test]
    fn test_array_return_type_is_invalid() {
        let unit = parse("typedef int arr[3];\narr f() { }");
        assert_eq!(unit.count_of(ErrorKind::InvalidType), 1);
        assert_eq!(unit.error_count(), 1);
    }

    #[test]
    fn test_missing_return_type_is_undefined() {
        let unit = parse("f() { }");
        assert_eq!(unit.error_count(), 0);

        let f = unit.symtab.entry(unit.routine("f").unwrap());
        assert_eq!(f.kind(), DefinitionKind::Function);
        assert_eq!(f.type_spec(), TypeSpec::UNDEFINED);
    }
}
