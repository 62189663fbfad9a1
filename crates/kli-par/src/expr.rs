//! Operation parsing: atom scan, then precedence climbing.
//!
//! An operation is scanned left to right into a flat list of atoms
//! (names, constants, operators, parentheses) until its terminator shows
//! up at parenthesis depth zero. The list is then folded: `build_operand`
//! produces a primary (constant, name, prefix chain or parenthesized
//! group) and `build_operator` binds infix operators while their
//! precedence stays at or above the requested minimum. Left-associative
//! levels recurse with `precedence + 1`, right-associative levels with
//! `precedence`, which is the whole associativity story.

use kli_util::Lexeme;

use crate::ast::{
    precedence, Associativity, ConstantKind, Node, NodeData, NodeKind, OperatorKind,
};
use crate::error::ParseError;
use crate::{is_name, is_string_literal, Parser};

/// One scanned atom of an operation.
#[derive(Clone, Copy)]
struct Atom<'a> {
    lexeme: Lexeme<'a>,
    kind: AtomKind,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AtomKind {
    Name,
    Constant(ConstantKind),
    Operator(OperatorKind),
    LeftParenthesis,
    RightParenthesis,
}

impl<'a> Parser<'a> {
    /// Scans and folds one operation.
    ///
    /// Stops at the first of `terminators` seen at parenthesis depth
    /// zero and consumes it; the matched terminator is returned next to
    /// the folded tree. An empty operation folds to `None`.
    pub(crate) fn parse_operation(
        &mut self,
        terminators: &[&[u8]],
        production: &'static str,
        anchor: Lexeme<'_>,
    ) -> Result<(Option<Node>, Lexeme<'a>), ParseError> {
        let mut atoms: Vec<Atom<'a>> = Vec::new();
        let mut depth: u32 = 0;
        let terminator = loop {
            let Some(lexeme) = self.it.peek() else {
                return Err(ParseError::unexpected_eof(production, self.context, anchor));
            };
            if depth == 0 && terminators.contains(&lexeme.literal) {
                self.it.bump();
                break lexeme;
            }
            let kind = self.classify_atom(lexeme)?;
            match kind {
                AtomKind::LeftParenthesis => depth += 1,
                AtomKind::RightParenthesis => {
                    if depth == 0 {
                        return Err(ParseError::unbalanced(self.context, lexeme));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            atoms.push(Atom { lexeme, kind });
            self.it.bump();
        };
        let node = self.fold_operation(&atoms)?;
        Ok((node, terminator))
    }

    fn classify_atom(&self, lexeme: Lexeme<'a>) -> Result<AtomKind, ParseError> {
        let literal = lexeme.literal;
        if literal == b"(" {
            return Ok(AtomKind::LeftParenthesis);
        }
        if literal == b")" {
            return Ok(AtomKind::RightParenthesis);
        }
        if let Some(operator) = OperatorKind::from_literal(literal) {
            return Ok(AtomKind::Operator(operator));
        }
        if matches!(literal.first(), Some(b) if b.is_ascii_digit()) {
            return Ok(AtomKind::Constant(ConstantKind::Numeric));
        }
        if is_string_literal(literal) {
            return Ok(AtomKind::Constant(ConstantKind::Literal));
        }
        if is_name(literal) {
            return Ok(AtomKind::Name);
        }
        // A cooked character literal is a single byte that matches no
        // other class.
        if literal.len() == 1 {
            return Ok(AtomKind::Constant(ConstantKind::Char));
        }
        Err(ParseError::unexpected_token(
            "operation",
            self.context,
            lexeme,
        ))
    }

    /// Folds a scanned atom list into its operation tree.
    fn fold_operation(&self, atoms: &[Atom<'a>]) -> Result<Option<Node>, ParseError> {
        if atoms.is_empty() {
            return Ok(None);
        }
        let mut fold = Fold {
            atoms,
            position: 0,
            opened: 0,
            closed: false,
            context: self.context,
        };
        let operand = fold.build_operand()?;
        let node = fold.build_operator(operand, 0)?;
        if fold.position < atoms.len() {
            return Err(ParseError::unexpected_token(
                "operation",
                self.context,
                atoms[fold.position].lexeme,
            ));
        }
        if fold.opened != 0 {
            return Err(ParseError::unbalanced(
                self.context,
                atoms[atoms.len() - 1].lexeme,
            ));
        }
        Ok(Some(node))
    }
}

/// Precedence-climbing state over one atom list.
struct Fold<'s, 'a> {
    atoms: &'s [Atom<'a>],
    position: usize,
    /// Parentheses opened and not yet closed during folding.
    opened: u32,
    /// Latch set when a group's `)` was just consumed; unwinds the
    /// operator recursion back to the frame that opened the group.
    closed: bool,
    context: &'s str,
}

impl<'s, 'a> Fold<'s, 'a> {
    fn peek(&self) -> Option<Atom<'a>> {
        self.atoms.get(self.position).copied()
    }

    /// The atom most recently consumed; anchors missing-operand errors.
    fn last_lexeme(&self) -> Lexeme<'a> {
        self.atoms[self.position.saturating_sub(1).min(self.atoms.len() - 1)].lexeme
    }

    /// Parses one operand: a constant, a name, a unary prefix chain, or
    /// a parenthesized sub-operation.
    fn build_operand(&mut self) -> Result<Node, ParseError> {
        let Some(atom) = self.peek() else {
            return Err(ParseError::missing_operand(self.context, self.last_lexeme()));
        };
        match atom.kind {
            AtomKind::Name => {
                self.position += 1;
                Ok(Node::new(NodeKind::Name, NodeData::None, atom.lexeme))
            }
            AtomKind::Constant(kind) => {
                self.position += 1;
                Ok(Node::new(
                    NodeKind::Constant,
                    NodeData::Constant(kind),
                    atom.lexeme,
                ))
            }
            AtomKind::Operator(operator) if prefix_kind(operator).is_some() => {
                self.position += 1;
                let kind = prefix_kind(operator).expect("guarded by the match arm");
                let child = self.build_operand()?;
                Ok(Node::operator(kind, atom.lexeme, vec![child]))
            }
            AtomKind::LeftParenthesis => {
                self.position += 1;
                self.opened += 1;
                let operand = self.build_operand()?;
                let group = self.build_operator(operand, 0)?;
                // The group's `)` ended the unwind here.
                self.closed = false;
                Ok(group)
            }
            _ => Err(ParseError::unexpected_token(
                "operation",
                self.context,
                atom.lexeme,
            )),
        }
    }

    /// Binds infix and postfix operators onto `lhs` while their
    /// precedence is at least `min_precedence`.
    fn build_operator(&mut self, mut lhs: Node, min_precedence: u8) -> Result<Node, ParseError> {
        loop {
            let Some(atom) = self.peek() else {
                return Ok(lhs);
            };
            match atom.kind {
                AtomKind::RightParenthesis => {
                    if self.opened == 0 {
                        return Err(ParseError::unbalanced(self.context, atom.lexeme));
                    }
                    self.opened -= 1;
                    self.position += 1;
                    self.closed = true;
                    return Ok(lhs);
                }
                // A `(` after a completed operand is a call.
                AtomKind::LeftParenthesis => {
                    if precedence::POSTFIX < min_precedence {
                        return Ok(lhs);
                    }
                    self.position += 1;
                    if matches!(self.peek(), Some(a) if a.kind == AtomKind::RightParenthesis) {
                        self.position += 1;
                        lhs = Node::operator(OperatorKind::Call, atom.lexeme, vec![lhs]);
                    } else {
                        self.opened += 1;
                        let operand = self.build_operand()?;
                        let argument = self.build_operator(operand, 0)?;
                        self.closed = false;
                        lhs = Node::operator(OperatorKind::Call, atom.lexeme, vec![lhs, argument]);
                    }
                }
                AtomKind::Operator(operator)
                    if matches!(operator, OperatorKind::Increment | OperatorKind::Decrement) =>
                {
                    // Operator position: the atom folds as a suffix.
                    if precedence::POSTFIX < min_precedence {
                        return Ok(lhs);
                    }
                    self.position += 1;
                    let kind = if operator == OperatorKind::Increment {
                        OperatorKind::IncrementSuffix
                    } else {
                        OperatorKind::DecrementSuffix
                    };
                    lhs = Node::operator(kind, atom.lexeme, vec![lhs]);
                }
                AtomKind::Operator(operator) => {
                    let Some(level) = operator.infix_precedence() else {
                        return Err(ParseError::unexpected_token(
                            "operation",
                            self.context,
                            atom.lexeme,
                        ));
                    };
                    if level < min_precedence {
                        return Ok(lhs);
                    }
                    self.position += 1;
                    let next_min = match operator.associativity() {
                        Associativity::LeftToRight => level + 1,
                        Associativity::RightToLeft => level,
                    };
                    let operand = self.build_operand()?;
                    let rhs = self.build_operator(operand, next_min)?;
                    lhs = combine(operator, atom.lexeme, lhs, rhs, self.context)?;
                    if self.closed {
                        return Ok(lhs);
                    }
                }
                // An operand where an operator belongs: stop folding and
                // let the caller report the leftover atom.
                _ => return Ok(lhs),
            }
        }
    }
}

/// Unary-prefix reading of an operator atom in operand position, if any.
/// `-` converts from its binary reading to `Minus` here.
fn prefix_kind(operator: OperatorKind) -> Option<OperatorKind> {
    use OperatorKind::*;
    match operator {
        Not => Some(Not),
        BitReverse => Some(BitReverse),
        Increment => Some(Increment),
        Decrement => Some(Decrement),
        Substraction => Some(Minus),
        _ => None,
    }
}

/// Builds the node for a bound infix operator. `?` splices its folded
/// `:` right-hand side into a single three-child ternary.
fn combine(
    operator: OperatorKind,
    lexeme: Lexeme<'_>,
    lhs: Node,
    rhs: Node,
    context: &str,
) -> Result<Node, ParseError> {
    if operator != OperatorKind::TernaryIf {
        return Ok(Node::operator(operator, lexeme, vec![lhs, rhs]));
    }
    if rhs.operator_kind() == Some(OperatorKind::TernaryElse) && rhs.children.len() == 2 {
        let mut branches = rhs.children.into_iter();
        let then_branch = branches.next().expect("two children checked");
        let else_branch = branches.next().expect("two children checked");
        Ok(Node::operator(
            OperatorKind::TernaryIf,
            lexeme,
            vec![lhs, then_branch, else_branch],
        ))
    } else {
        Err(ParseError::missing_operand(context, lexeme))
    }
}
