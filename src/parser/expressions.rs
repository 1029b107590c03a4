//! Expression parsing implementation
//!
//! Expressions are parsed by recursive descent, one method per precedence
//! level, and every node is typed as it is built. An operand pair the
//! checker rejects is flagged `IncompatibleTypes` and the node gets the
//! undefined type so the error does not cascade.
//!
//! # Precedence (lowest first)
//!
//! ```text
//! expression     ::= logical_and { "||" logical_and }
//! logical_and    ::= equality { "&&" equality }
//! equality       ::= relational { ( "==" | "!=" ) relational }
//! relational     ::= additive { ( "<" | "<=" | ">" | ">=" ) additive }
//! additive       ::= multiplicative { ( "+" | "-" ) multiplicative }
//! multiplicative ::= unary { ( "*" | "/" | "%" ) unary }
//! unary          ::= ( "-" | "+" | "!" ) unary | factor
//! factor         ::= literal | variable | constant | call | "(" expression ")"
//! call           ::= identifier "(" [ expression { "," expression } ] ")"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{ErrorKind, ParseError};
use crate::icode::{ICodeNode, NodeKind, NodeValue};
use crate::parser::parse::Parser;
use crate::parser::token::{TokenKind, TokenSet, TokenValue};
use crate::symtab::{ConstValue, Definition, DefinitionKind, EntryId};
use crate::types::{checker, Primitive, TypeSpec};

/// Tokens that can start an expression
pub(crate) const EXPRESSION_START_SET: TokenSet = TokenSet::of(&[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Not,
    TokenKind::Identifier,
    TokenKind::Integer,
    TokenKind::Real,
    TokenKind::Character,
    TokenKind::String,
    TokenKind::LeftParen,
]);

/// Result type of a binary operator node
fn binary_result(op: NodeKind, left: &TypeSpec, right: &TypeSpec) -> Option<TypeSpec> {
    match op {
        NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply | NodeKind::Divide => {
            checker::arithmetic_result(left, right)
        }
        NodeKind::Modulo => checker::modulo_result(left, right),
        NodeKind::And | NodeKind::Or => checker::logical_result(left, right),
        _ => checker::comparison_result(left, right),
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<ICodeNode, ParseError> {
        self.parse_logical_or()
    }

    /// Build `op(left, right)` with its checked type.
    fn binary_node(
        &mut self,
        op: NodeKind,
        line: usize,
        left: ICodeNode,
        right: ICodeNode,
    ) -> ICodeNode {
        let ty = match binary_result(op, &left.ty, &right.ty) {
            Some(ty) => ty,
            None => {
                self.flag(ErrorKind::IncompatibleTypes);
                TypeSpec::UNDEFINED
            }
        };

        let mut node = ICodeNode::new(op).with_type(ty).with_line(line);
        node.add_child(left);
        node.add_child(right);
        node
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.check(TokenKind::Or) {
            let line = self.current().line();
            self.next_token()?;
            let right = self.parse_logical_and()?;
            left = self.binary_node(NodeKind::Or, line, left, right);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_equality()?;

        while self.check(TokenKind::And) {
            let line = self.current().line();
            self.next_token()?;
            let right = self.parse_equality()?;
            left = self.binary_node(NodeKind::And, line, left, right);
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.current_kind() {
                TokenKind::EqualEquals => NodeKind::Eq,
                TokenKind::NotEquals => NodeKind::Ne,
                _ => break,
            };
            let line = self.current().line();
            self.next_token()?;

            let right = self.parse_relational()?;
            left = self.binary_node(op, line, left, right);
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current_kind() {
                TokenKind::LessThan => NodeKind::Lt,
                TokenKind::LessEquals => NodeKind::Le,
                TokenKind::GreaterThan => NodeKind::Gt,
                TokenKind::GreaterEquals => NodeKind::Ge,
                _ => break,
            };
            let line = self.current().line();
            self.next_token()?;

            let right = self.parse_additive()?;
            left = self.binary_node(op, line, left, right);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => NodeKind::Add,
                TokenKind::Minus => NodeKind::Subtract,
                _ => break,
            };
            let line = self.current().line();
            self.next_token()?;

            let right = self.parse_multiplicative()?;
            left = self.binary_node(op, line, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<ICodeNode, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_kind() {
                TokenKind::Star => NodeKind::Multiply,
                TokenKind::Slash => NodeKind::Divide,
                TokenKind::Mod => NodeKind::Modulo,
                _ => break,
            };
            let line = self.current().line();
            self.next_token()?;

            let right = self.parse_unary()?;
            left = self.binary_node(op, line, left, right);
        }

        Ok(left)
    }

    /// Parse unary (- + !)
    fn parse_unary(&mut self) -> Result<ICodeNode, ParseError> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Minus | TokenKind::Plus => {
                self.next_token()?;
                let operand = self.parse_unary()?;
                let ty = checker::negation_result(&operand.ty).unwrap_or_else(|| {
                    self.flag_at(&token, ErrorKind::IncompatibleTypes);
                    TypeSpec::UNDEFINED
                });

                if token.kind == TokenKind::Plus {
                    return Ok(operand);
                }
                let mut node = ICodeNode::new(NodeKind::Negate)
                    .with_type(ty)
                    .with_line(token.line());
                node.add_child(operand);
                Ok(node)
            }
            TokenKind::Not => {
                self.next_token()?;
                let operand = self.parse_unary()?;
                if !checker::is_condition(&operand.ty) {
                    self.flag_at(&token, ErrorKind::IncompatibleTypes);
                }

                let mut node = ICodeNode::new(NodeKind::Not)
                    .with_type(TypeSpec::INT)
                    .with_line(token.line());
                node.add_child(operand);
                Ok(node)
            }
            _ => self.parse_factor(),
        }
    }

    /// Parse a literal, name, call or parenthesized expression
    fn parse_factor(&mut self) -> Result<ICodeNode, ParseError> {
        let token = self.current().clone();

        let node = match (&token.kind, &token.value) {
            (TokenKind::Integer, Some(TokenValue::Integer(v))) => {
                ICodeNode::new(NodeKind::IntegerConstant)
                    .with_type(TypeSpec::INT)
                    .with_value(NodeValue::Integer(*v))
            }
            (TokenKind::Real, Some(TokenValue::Real(v))) => ICodeNode::new(NodeKind::RealConstant)
                .with_type(TypeSpec::DOUBLE)
                .with_value(NodeValue::Real(*v)),
            (TokenKind::Character, Some(TokenValue::Character(c))) => {
                ICodeNode::new(NodeKind::CharConstant)
                    .with_type(TypeSpec::CHAR)
                    .with_value(NodeValue::Character(*c))
            }
            (TokenKind::String, Some(TokenValue::String(s))) => {
                ICodeNode::new(NodeKind::StringConstant)
                    .with_type(TypeSpec::Array {
                        element: Primitive::Char,
                        count: s.chars().count() + 1,
                    })
                    .with_value(NodeValue::String(s.clone()))
            }
            (TokenKind::Identifier, _) => return self.parse_identifier_factor(),
            (TokenKind::LeftParen, _) => {
                self.next_token()?;
                let expr = self.parse_expression()?;
                if !self.match_token(TokenKind::RightParen)? {
                    self.flag(ErrorKind::MissingRightParen);
                }
                return Ok(expr);
            }
            _ => {
                self.flag(ErrorKind::MissingExpression);
                return Ok(ICodeNode::new(NodeKind::NoOp));
            }
        };

        self.next_token()?;
        Ok(node)
    }

    /// An identifier inside an expression
    fn parse_identifier_factor(&mut self) -> Result<ICodeNode, ParseError> {
        let token = self.current().clone();
        let found = self.symtab.lookup(&token.text);

        match found.map(|id| (id, self.entry_kind(id))) {
            Some((id, DefinitionKind::Constant)) => {
                let entry = self.symtab.entry_mut(id);
                entry.append_line_number(token.line());
                let ty = entry.type_spec();
                let node = match &entry.definition {
                    Definition::Constant(ConstValue::Integer(v)) => {
                        ICodeNode::new(NodeKind::IntegerConstant).with_value(NodeValue::Integer(*v))
                    }
                    Definition::Constant(ConstValue::Real(v)) => {
                        ICodeNode::new(NodeKind::RealConstant).with_value(NodeValue::Real(*v))
                    }
                    Definition::Constant(ConstValue::Character(c)) => {
                        ICodeNode::new(NodeKind::CharConstant)
                            .with_value(NodeValue::Character(*c))
                    }
                    _ => ICodeNode::new(NodeKind::NoOp),
                };
                self.next_token()?;
                Ok(node.with_type(ty).with_id(id))
            }
            Some((_, DefinitionKind::Function | DefinitionKind::Procedure)) => self.parse_call(),
            Some((_, DefinitionKind::Type | DefinitionKind::Program)) => {
                self.flag(ErrorKind::UnexpectedToken);
                self.next_token()?;
                Ok(ICodeNode::new(NodeKind::NoOp))
            }
            _ => self.parse_variable(),
        }
    }

    /// Resolve the current identifier, flagging it when it has no usable
    /// definition. An unknown name is entered locally as undefined.
    fn resolve_identifier(&mut self) -> EntryId {
        let token = self.current().clone();

        let id = match self.symtab.lookup(&token.text) {
            Some(id) => {
                if self.entry_kind(id) == DefinitionKind::Undefined {
                    self.flag(ErrorKind::IdentifierUndefined);
                }
                id
            }
            None => {
                self.flag(ErrorKind::IdentifierUndefined);
                let id = self.enter_or_detach(&token.text);
                let entry = self.symtab.entry_mut(id);
                entry.definition = Definition::Undefined;
                entry.ty = Some(TypeSpec::UNDEFINED);
                id
            }
        };

        self.symtab.entry_mut(id).append_line_number(token.line());
        id
    }

    /// Parse a variable reference.
    pub(crate) fn parse_variable(&mut self) -> Result<ICodeNode, ParseError> {
        let id = self.resolve_identifier();
        let ty = self.symtab.entry(id).type_spec();
        self.next_token()?;

        Ok(ICodeNode::new(NodeKind::Variable).with_type(ty).with_id(id))
    }

    /// Parse `name ( arguments )` for a declared procedure or function.
    pub(crate) fn parse_call(&mut self) -> Result<ICodeNode, ParseError> {
        let name = self.current().clone();
        let id = self.resolve_identifier();
        self.next_token()?;

        let entry = self.symtab.entry(id);
        let ty = match entry.kind() {
            DefinitionKind::Procedure => TypeSpec::VOID,
            _ => entry.type_spec(),
        };
        let formals: Vec<TypeSpec> = entry
            .routine()
            .map(|info| {
                info.params
                    .iter()
                    .map(|p| self.symtab.entry(*p).type_spec())
                    .collect()
            })
            .unwrap_or_default();

        let mut call = ICodeNode::new(NodeKind::Call)
            .with_type(ty)
            .with_id(id)
            .with_line(name.line());

        if !self.match_token(TokenKind::LeftParen)? {
            self.flag(ErrorKind::MissingLeftParen);
            return Ok(call);
        }

        let mut params = ICodeNode::new(NodeKind::Parameters);
        if !self.check(TokenKind::RightParen) {
            loop {
                let arg_token = self.current().clone();
                let arg = self.parse_expression()?;

                if let Some(formal) = formals.get(params.children.len()) {
                    if !checker::are_assignment_compatible(formal, &arg.ty) {
                        self.flag_at(&arg_token, ErrorKind::IncompatibleTypes);
                    }
                }
                params.add_child(arg);

                if !self.match_token(TokenKind::Comma)? {
                    break;
                }
            }
        }

        if !self.match_token(TokenKind::RightParen)? {
            self.flag(ErrorKind::MissingRightParen);
        }
        if params.children.len() != formals.len() {
            self.flag_at(&name, ErrorKind::WrongNumberOfParms);
        }

        if !params.children.is_empty() {
            call.add_child(params);
        }
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::icode::{ICodeNode, NodeKind, NodeValue};
    use crate::parser::parse::{CompilationUnit, Parser};
    use crate::types::TypeSpec;

    fn parse(source: &str) -> CompilationUnit {
        Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap()
    }

    /// The value side of the last statement in `p`'s body
    fn last_value(unit: &CompilationUnit) -> &ICodeNode {
        let id = unit.routine("p").unwrap();
        let root = unit.symtab.entry(id).routine().unwrap().icode.root().unwrap();
        let last = root.children.last().unwrap();
        last.child(1).unwrap()
    }

    #[test]
    fn test_precedence_builds_nested_nodes() {
        let unit = parse("void p() { int x; x = 1 + 2 * 3; }");
        assert_eq!(unit.error_count(), 0);

        let add = last_value(&unit);
        assert_eq!(add.kind, NodeKind::Add);
        assert_eq!(add.children[0].attrs.value, Some(NodeValue::Integer(1)));
        assert_eq!(add.children[1].kind, NodeKind::Multiply);
        assert_eq!(add.ty, TypeSpec::INT);
    }

    #[test]
    fn test_mixed_arithmetic_widens() {
        let unit = parse("void p() { double d; d = 2 * 1.5; }");
        assert_eq!(unit.error_count(), 0);
        assert_eq!(last_value(&unit).ty, TypeSpec::DOUBLE);
    }

    #[test]
    fn test_modulo_needs_integers() {
        let unit = parse("void p() { int x; x = 2.5 % 2; }");
        assert_eq!(unit.count_of(ErrorKind::IncompatibleTypes), 1);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let unit = parse("void p() { int x; x = (1 + 2) * 3; }");
        let mul = last_value(&unit);
        assert_eq!(mul.kind, NodeKind::Multiply);
        assert_eq!(mul.children[0].kind, NodeKind::Add);
    }

    #[test]
    fn test_constants_fold_into_nodes() {
        let unit = parse("const n = 7;\nvoid p() { int x; x = -n; }");
        assert_eq!(unit.error_count(), 0);

        let negate = last_value(&unit);
        assert_eq!(negate.kind, NodeKind::Negate);
        assert_eq!(negate.children[0].attrs.value, Some(NodeValue::Integer(7)));
    }

    #[test]
    fn test_call_checks_arguments() {
        let unit = parse(
            "int sq(int n) { return n * n; }\n\
             void p() { int x; x = sq(2); x = sq(); x = sq('c'); }",
        );
        assert_eq!(unit.count_of(ErrorKind::WrongNumberOfParms), 1);
        assert_eq!(unit.count_of(ErrorKind::IncompatibleTypes), 1);

        let call = last_value(&unit);
        assert_eq!(call.kind, NodeKind::Call);
        assert_eq!(call.ty, TypeSpec::INT);
        assert_eq!(call.children[0].kind, NodeKind::Parameters);
    }

    #[test]
    fn test_undefined_identifier_flagged_per_use() {
        let unit = parse("void p() { int x; x = y + y; }");
        assert_eq!(unit.count_of(ErrorKind::IdentifierUndefined), 2);
        assert_eq!(unit.error_count(), 2);
    }
}
