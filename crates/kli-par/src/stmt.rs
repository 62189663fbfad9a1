//! Expression bodies and statement parsing.
//!
//! A value body is either a `{ ... }` block or a single-line expression
//! that ends when the next token leaves the opening line (or at the
//! enclosing `}`). Both forms are `Expression` nodes whose children are
//! statements.

use kli_util::Lexeme;

use crate::ast::{Node, NodeData, NodeKind, StatementKind};
use crate::error::ParseError;
use crate::{is_name, Parser};

impl<'a> Parser<'a> {
    /// Block or single-line expression, per the next token.
    pub(crate) fn parse_value_expression(
        &mut self,
        production: &'static str,
        anchor: Lexeme<'_>,
    ) -> Result<Node, ParseError> {
        let lexeme = self.peek_or_eof(production, anchor)?;
        if lexeme.literal == b"{" {
            self.parse_block_expression()
        } else {
            self.parse_single_line_expression()
        }
    }

    /// `Block := "{" Statement* "}"`
    pub(crate) fn parse_block_expression(&mut self) -> Result<Node, ParseError> {
        let open = self.it.bump().expect("caller peeked the opener");
        let mut node = Node::new(NodeKind::Expression, NodeData::None, open);
        loop {
            let lexeme = self.peek_or_eof("expression", open)?;
            if lexeme.literal == b"}" {
                self.it.bump();
                return Ok(node);
            }
            self.parse_statement(&mut node)?;
        }
    }

    /// Statements while the line does not change; stops (without
    /// consuming) at a `}` closing the enclosing scope or at an `else`
    /// belonging to the enclosing `if`.
    fn parse_single_line_expression(&mut self) -> Result<Node, ParseError> {
        let first = self.it.peek().expect("caller peeked the first token");
        let line = first.token.line;
        let mut node = Node::new(NodeKind::Expression, NodeData::None, first);
        while let Some(lexeme) = self.it.peek() {
            if lexeme.token.line != line || lexeme.literal == b"}" || lexeme.literal == b"else" {
                break;
            }
            self.parse_statement(&mut node)?;
        }
        Ok(node)
    }

    /// One statement, appended to `parent`.
    fn parse_statement(&mut self, parent: &mut Node) -> Result<(), ParseError> {
        let lexeme = self.it.peek().expect("caller peeked the first token");
        match lexeme.literal {
            b"if" => parent.children.push(self.parse_if()?),
            b"while" => parent.children.push(self.parse_while()?),
            b"for" => parent.children.push(self.parse_for()?),
            b"switch" => parent.children.push(self.parse_switch()?),
            b"break" => parent.children.push(self.parse_terminal(StatementKind::Break)?),
            b"continue" => parent
                .children
                .push(self.parse_terminal(StatementKind::Continue)?),
            b"return" => parent.children.push(self.parse_return()?),
            b"emit" => parent.children.push(self.parse_emit()?),
            b"{" => parent.children.push(self.parse_block_expression()?),
            b"[" => parent.children.push(self.parse_list()?),
            literal if is_name(literal) => match self.it.peek_second() {
                None => {
                    return Err(ParseError::unexpected_eof(
                        "statement",
                        self.context,
                        lexeme,
                    ))
                }
                Some(next) if next.literal == b"{" => {
                    // Value-position instantiation: `b: B {}`.
                    parent.children.push(self.parse_class()?)
                }
                Some(next) if is_name(next.literal) || next.literal == b"<" => {
                    parent.children.push(self.parse_local()?)
                }
                _ => self.parse_operation_statement(parent, lexeme)?,
            },
            _ => self.parse_operation_statement(parent, lexeme)?,
        }
        Ok(())
    }

    /// `Operation ";"`. An empty operation (a bare `;`) adds nothing.
    fn parse_operation_statement(
        &mut self,
        parent: &mut Node,
        anchor: Lexeme<'_>,
    ) -> Result<(), ParseError> {
        let (operation, _) = self.parse_operation(&[b";"], "operation", anchor)?;
        if let Some(operation) = operation {
            parent.children.push(operation);
        }
        Ok(())
    }

    /// `if (cond) body (else if (cond) body)* (else body)?`
    ///
    /// Children: condition/body pairs in order, plus a trailing `else`
    /// body when present.
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::If),
            keyword,
        );
        self.parse_condition_and_body(&mut node, "if statement", keyword)?;
        while let Some(lexeme) = self.it.peek() {
            if lexeme.literal != b"else" {
                break;
            }
            self.it.bump();
            let next = self.peek_or_eof("if statement", keyword)?;
            if next.literal == b"if" {
                self.it.bump();
                self.parse_condition_and_body(&mut node, "if statement", keyword)?;
            } else {
                node.children
                    .push(self.parse_value_expression("if statement", keyword)?);
                break;
            }
        }
        Ok(node)
    }

    /// `while (cond) body`
    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::While),
            keyword,
        );
        self.parse_condition_and_body(&mut node, "while statement", keyword)?;
        Ok(node)
    }

    /// `for (init; cond; step) body` — three operations, any of which
    /// may be empty.
    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::For),
            keyword,
        );
        self.expect("for statement", keyword, b"(")?;
        let clause_terminators: [&[u8]; 3] = [b";", b";", b")"];
        for terminator in clause_terminators {
            let (operation, end) =
                self.parse_operation(&[terminator], "for statement", keyword)?;
            node.children
                .push(operation.unwrap_or_else(|| empty_operation(end)));
        }
        node.children
            .push(self.parse_value_expression("for statement", keyword)?);
        Ok(node)
    }

    /// `switch (subject) { (case Expr : body)* (default : body)? }`
    fn parse_switch(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::Switch),
            keyword,
        );
        self.expect("switch statement", keyword, b"(")?;
        let (subject, end) = self.parse_operation(&[b")"], "switch statement", keyword)?;
        node.children
            .push(subject.unwrap_or_else(|| empty_operation(end)));
        self.expect("switch statement", keyword, b"{")?;
        loop {
            let lexeme = self.peek_or_eof("switch statement", keyword)?;
            match lexeme.literal {
                b"}" => {
                    self.it.bump();
                    return Ok(node);
                }
                b"case" => {
                    self.it.bump();
                    let (value, end) =
                        self.parse_operation(&[b":"], "switch statement", keyword)?;
                    node.children
                        .push(value.unwrap_or_else(|| empty_operation(end)));
                    node.children
                        .push(self.parse_value_expression("switch statement", keyword)?);
                }
                b"default" => {
                    self.it.bump();
                    self.expect("switch statement", keyword, b":")?;
                    node.children
                        .push(self.parse_value_expression("switch statement", keyword)?);
                }
                _ => {
                    return Err(ParseError::unexpected_token(
                        "switch statement",
                        self.context,
                        lexeme,
                    ))
                }
            }
        }
    }

    /// `break ";"` / `continue ";"`
    fn parse_terminal(&mut self, kind: StatementKind) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let node = Node::new(NodeKind::Statement, NodeData::Statement(kind), keyword);
        self.expect("statement", keyword, b";")?;
        Ok(node)
    }

    /// `return Operation? ";"`
    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::Return),
            keyword,
        );
        let (operation, _) = self.parse_operation(&[b";"], "return statement", keyword)?;
        if let Some(operation) = operation {
            node.children.push(operation);
        }
        Ok(node)
    }

    /// `emit Operation ";"`
    fn parse_emit(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(
            NodeKind::Statement,
            NodeData::Statement(StatementKind::Emit),
            keyword,
        );
        let (operation, _) = self.parse_operation(&[b";"], "emit statement", keyword)?;
        match operation {
            Some(operation) => node.children.push(operation),
            None => {
                return Err(ParseError::missing_operand(self.context, keyword));
            }
        }
        Ok(node)
    }

    /// `List := "[" (Operation ("," Operation)*)? "]"`
    fn parse_list(&mut self) -> Result<Node, ParseError> {
        let open = self.it.bump().expect("caller peeked the opener");
        let mut node = Node::new(NodeKind::List, NodeData::None, open);
        if self.peek_or_eof("list statement", open)?.literal == b"]" {
            self.it.bump();
            return Ok(node);
        }
        loop {
            let (element, terminator) =
                self.parse_operation(&[b",", b"]"], "list statement", open)?;
            if let Some(element) = element {
                node.children.push(element);
            }
            if terminator.literal == b"]" {
                return Ok(node);
            }
        }
    }

    /// `Local := Type Name "=" Operation ";"`
    ///
    /// Children: `[type, name, value]`. Entered when a statement leads
    /// with a name followed by another name or `<`.
    fn parse_local(&mut self) -> Result<Node, ParseError> {
        let type_node = self.parse_type("local declaration")?;

        let name = self.peek_or_eof("local declaration", self.last_anchor(&type_node))?;
        if !is_name(name.literal) {
            return Err(ParseError::unexpected_token(
                "local declaration",
                self.context,
                name,
            ));
        }
        self.it.bump();

        let mut node = Node::new(NodeKind::Local, NodeData::None, name);
        self.expect("local declaration", name, b"=")?;
        let (value, end) = self.parse_operation(&[b";"], "local declaration", name)?;
        let value = match value {
            Some(value) => value,
            None => return Err(ParseError::missing_operand(self.context, end)),
        };
        node.children = vec![
            type_node,
            Node::new(NodeKind::Name, NodeData::None, name),
            value,
        ];
        Ok(node)
    }

    /// `Type := Name | Name "<" Type ("," Type)* ">"`
    fn parse_type(&mut self, production: &'static str) -> Result<Node, ParseError> {
        let name = self.it.peek().expect("caller peeked the type name");
        if !is_name(name.literal) {
            return Err(ParseError::unexpected_token(production, self.context, name));
        }
        self.it.bump();

        if !matches!(self.it.peek(), Some(l) if l.literal == b"<") {
            return Ok(Node::new(NodeKind::Type, NodeData::None, name));
        }
        self.it.bump();
        let mut node = Node::new(NodeKind::TemplateType, NodeData::None, name);
        loop {
            let argument = self.peek_or_eof(production, name)?;
            if !is_name(argument.literal) {
                return Err(ParseError::unexpected_token(production, self.context, argument));
            }
            node.children.push(self.parse_type(production)?);

            let separator = self.peek_or_eof(production, name)?;
            match separator.literal {
                b"," => {
                    self.it.bump();
                }
                b">" => {
                    self.it.bump();
                    return Ok(node);
                }
                _ => {
                    return Err(ParseError::unexpected_token(
                        production,
                        self.context,
                        separator,
                    ))
                }
            }
        }
    }

    /// `"(" Operation ")" (Block | SingleLineExpr)` for if/while.
    fn parse_condition_and_body(
        &mut self,
        node: &mut Node,
        production: &'static str,
        anchor: Lexeme<'_>,
    ) -> Result<(), ParseError> {
        self.expect(production, anchor, b"(")?;
        let (condition, end) = self.parse_operation(&[b")"], production, anchor)?;
        node.children
            .push(condition.unwrap_or_else(|| empty_operation(end)));
        node.children.push(self.parse_value_expression(production, anchor)?);
        Ok(())
    }

    fn last_anchor<'n>(&self, node: &'n Node) -> Lexeme<'n> {
        Lexeme {
            token: node.token,
            literal: &node.literal,
        }
    }
}

/// Placeholder for an omitted operation, e.g. the clauses of `for(;;)`.
fn empty_operation(at: Lexeme<'_>) -> Node {
    Node::new(NodeKind::Expression, NodeData::None, at)
}

#[cfg(test)]
mod tests {
    use crate::ast::{NodeData, NodeKind, OperatorKind, StatementKind};
    use crate::tests::{parse, parse_err};
    use crate::{Node, ParseError};

    fn body_of(source: &str) -> Node {
        let outcome = parse(source);
        let function = outcome.root.children.into_iter().next().unwrap();
        function.children.into_iter().nth(1).unwrap()
    }

    #[test]
    fn test_if_else_if_else_chain() {
        let body = body_of(
            "Item { function f() { if (a) { x = 1; } else if (b) { x = 2; } else { x = 3; } } }",
        );
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::If));
        // cond, body, cond, body, else-body
        assert_eq!(statement.children.len(), 5);
        assert_eq!(statement.children[0].literal_lossy(), "a");
        assert_eq!(statement.children[2].literal_lossy(), "b");
    }

    #[test]
    fn test_single_line_if_else_on_one_line() {
        let body = body_of("Item { function f() { if (a) x = 1; else x = 2; } }");
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::If));
        // cond, then-body, else-body
        assert_eq!(statement.children.len(), 3);
    }

    #[test]
    fn test_long_else_if_chain() {
        let source = "Item { function f() { if (a) { } else if (b) { } else if (c) { } else if (d) { } } }";
        let body = body_of(source);
        let statement = &body.children[0];
        assert_eq!(statement.children.len(), 8);
    }

    #[test]
    fn test_while_statement() {
        let body = body_of("Item { function f() { while (i < 10) { i = i + 1; } } }");
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::While));
        assert_eq!(statement.children.len(), 2);
        assert_eq!(
            statement.children[0].data,
            NodeData::Operator(OperatorKind::Lighter)
        );
    }

    #[test]
    fn test_for_statement() {
        let body = body_of("Item { function f() { for (i = 0; i < 10; i++) { total += i; } } }");
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::For));
        assert_eq!(statement.children.len(), 4);
        assert_eq!(
            statement.children[2].data,
            NodeData::Operator(OperatorKind::IncrementSuffix)
        );
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let body = body_of("Item { function f() { for (;;) { break; } } }");
        let statement = &body.children[0];
        assert_eq!(statement.children.len(), 4);
        for clause in &statement.children[0..3] {
            assert_eq!(clause.kind, NodeKind::Expression);
            assert!(clause.children.is_empty());
        }
    }

    #[test]
    fn test_switch_with_cases_and_default() {
        let body = body_of(
            "Item { function f() { switch (x) { case 1: { a = 1; } case 2: { a = 2; } default: { a = 3; } } } }",
        );
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::Switch));
        // subject + 2 * (value, body) + default body
        assert_eq!(statement.children.len(), 6);
        assert_eq!(statement.children[0].literal_lossy(), "x");
    }

    #[test]
    fn test_break_continue_return_emit() {
        let body = body_of(
            "Item { function f() { while (1) { if (a) { continue; } break; } emit done; return 0; } }",
        );
        let kinds: Vec<StatementKind> = body
            .children
            .iter()
            .map(|c| c.statement_kind().unwrap())
            .collect();
        assert_eq!(
            kinds,
            [StatementKind::While, StatementKind::Emit, StatementKind::Return]
        );
    }

    #[test]
    fn test_return_without_value() {
        let body = body_of("Item { function f() { return; } }");
        let statement = &body.children[0];
        assert_eq!(statement.data, NodeData::Statement(StatementKind::Return));
        assert!(statement.children.is_empty());
    }

    #[test]
    fn test_emit_requires_an_operand() {
        assert!(matches!(
            parse_err("Item { function f() { emit; } }"),
            ParseError::MissingOperand { .. }
        ));
    }

    #[test]
    fn test_list_statement() {
        let outcome = parse("Item { values: [ 1, 2, 3 ]; }");
        let assignment = &outcome.root.children[0];
        let list = &assignment.children[0].children[0];
        assert_eq!(list.kind, NodeKind::List);
        assert_eq!(list.children.len(), 3);
    }

    #[test]
    fn test_empty_list() {
        let outcome = parse("Item { values: []; }");
        let list = &outcome.root.children[0].children[0].children[0];
        assert_eq!(list.kind, NodeKind::List);
        assert!(list.children.is_empty());
    }

    #[test]
    fn test_local_declaration() {
        let body = body_of("Item { function f() { Int total = 0; } }");
        let local = &body.children[0];
        assert_eq!(local.kind, NodeKind::Local);
        assert_eq!(local.children[0].kind, NodeKind::Type);
        assert_eq!(local.children[0].literal_lossy(), "Int");
        assert_eq!(local.children[1].literal_lossy(), "total");
        assert_eq!(local.children[2].literal_lossy(), "0");
    }

    #[test]
    fn test_template_local_declaration() {
        let body = body_of("Item { function f() { Map<String, List<Int>> cache = empty(); } }");
        let local = &body.children[0];
        let template = &local.children[0];
        assert_eq!(template.kind, NodeKind::TemplateType);
        assert_eq!(template.literal_lossy(), "Map");
        assert_eq!(template.children[0].kind, NodeKind::Type);
        let nested = &template.children[1];
        assert_eq!(nested.kind, NodeKind::TemplateType);
        assert_eq!(nested.literal_lossy(), "List");
    }

    #[test]
    fn test_single_line_body_stops_at_line_end() {
        let outcome = parse("Item {\n  x: 1;\n  y: 2;\n}");
        assert_eq!(outcome.root.children.len(), 2);
    }

    #[test]
    fn test_single_line_body_stops_at_closing_brace() {
        // Everything on one line: the `}` must close the class.
        let outcome = parse("Item { property x: 42; }");
        assert_eq!(outcome.root.children.len(), 1);
    }

    #[test]
    fn test_value_position_instantiation() {
        let outcome = parse("A { b: B {} }");
        let assignment = &outcome.root.children[0];
        assert_eq!(assignment.kind, NodeKind::Assignment);
        let value = &assignment.children[0];
        assert_eq!(value.kind, NodeKind::Expression);
        let instance = &value.children[0];
        assert_eq!(instance.kind, NodeKind::Class);
        assert_eq!(instance.literal_lossy(), "B");
    }
}
