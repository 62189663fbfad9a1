//! Declaration parsing: imports, classes and class members.

use crate::ast::{Node, NodeData, NodeKind};
use crate::error::ParseError;
use crate::{is_name, is_string_literal, Parser};

impl<'a> Parser<'a> {
    /// `Import := "import" StringLiteral`
    pub(crate) fn parse_import(&mut self) -> Result<(), ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let literal = self.peek_or_eof("import declaration", keyword)?;
        if !is_string_literal(literal.literal) {
            return Err(ParseError::unexpected_token(
                "import declaration",
                self.context,
                literal,
            ));
        }
        self.it.bump();
        let inner = &literal.literal[1..literal.literal.len() - 1];
        self.imports.push(String::from_utf8_lossy(inner).into_owned());
        Ok(())
    }

    /// `Class := Name "{" ClassMember* "}"`
    ///
    /// Also entered from statement position for value-position
    /// instantiations such as `b: B {}`.
    pub(crate) fn parse_class(&mut self) -> Result<Node, ParseError> {
        let name = self.it.bump().expect("caller peeked the class name");
        let mut node = Node::new(NodeKind::Class, NodeData::None, name);
        self.expect("class declaration", name, b"{")?;
        loop {
            let lexeme = self.peek_or_eof("class declaration", name)?;
            match lexeme.literal {
                b"}" => {
                    self.it.bump();
                    return Ok(node);
                }
                b"function" => node.children.push(self.parse_function()?),
                b"signal" => node.children.push(self.parse_signal()?),
                b"property" => node.children.push(self.parse_property()?),
                b"on" => node.children.push(self.parse_event()?),
                literal if is_name(literal) => {
                    let next = self
                        .it
                        .peek_second()
                        .ok_or_else(|| ParseError::unexpected_eof("class declaration", self.context, lexeme))?;
                    match next.literal {
                        b":" => node.children.push(self.parse_assignment()?),
                        b"{" => node.children.push(self.parse_class()?),
                        _ => {
                            return Err(ParseError::unexpected_token(
                                "class declaration",
                                self.context,
                                next,
                            ))
                        }
                    }
                }
                _ => {
                    return Err(ParseError::unexpected_token(
                        "class declaration",
                        self.context,
                        lexeme,
                    ))
                }
            }
        }
    }

    /// `Function := "function" Name ParameterList "{" Expression "}"`
    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let name = self.peek_or_eof("function declaration", keyword)?;
        if !is_name(name.literal) {
            return Err(ParseError::unexpected_token(
                "function declaration",
                self.context,
                name,
            ));
        }
        self.it.bump();
        let mut node = Node::new(NodeKind::Function, NodeData::None, name);

        let open = self.peek_or_eof("function declaration", name)?;
        if open.literal != b"(" {
            return Err(ParseError::unexpected_token(
                "function parameters",
                self.context,
                open,
            ));
        }
        node.children.push(self.parse_parameter_list()?);

        let body = self.peek_or_eof("function declaration", name)?;
        if body.literal != b"{" {
            return Err(ParseError::unexpected_token(
                "function declaration",
                self.context,
                body,
            ));
        }
        node.children.push(self.parse_block_expression()?);
        Ok(node)
    }

    /// `Signal := "signal" Name ParameterList ";"`
    fn parse_signal(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let name = self.peek_or_eof("signal declaration", keyword)?;
        if !is_name(name.literal) {
            return Err(ParseError::unexpected_token(
                "signal declaration",
                self.context,
                name,
            ));
        }
        self.it.bump();
        let mut node = Node::new(NodeKind::Signal, NodeData::None, name);

        let open = self.peek_or_eof("signal declaration", name)?;
        if open.literal != b"(" {
            return Err(ParseError::unexpected_token(
                "signal declaration",
                self.context,
                open,
            ));
        }
        node.children.push(self.parse_parameter_list()?);
        self.expect("signal declaration", name, b";")?;
        Ok(node)
    }

    /// `Property := "property" Name ":" (Block | SingleLineExpr)`
    fn parse_property(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let name = self.peek_or_eof("property declaration", keyword)?;
        if !is_name(name.literal) {
            return Err(ParseError::unexpected_token(
                "property declaration",
                self.context,
                name,
            ));
        }
        self.it.bump();
        let mut node = Node::new(NodeKind::Property, NodeData::None, name);
        self.expect("property declaration", name, b":")?;
        node.children
            .push(self.parse_value_expression("property declaration", name)?);
        Ok(node)
    }

    /// `Event := "on" Expression ":" (Block | SingleLineExpr)`
    ///
    /// The subject is one operation terminated by `:`, wrapped in an
    /// `Expression` node.
    fn parse_event(&mut self) -> Result<Node, ParseError> {
        let keyword = self.it.bump().expect("caller peeked the keyword");
        let mut node = Node::new(NodeKind::Event, NodeData::None, keyword);

        let first = self.peek_or_eof("event declaration", keyword)?;
        let mut subject = Node::new(NodeKind::Expression, NodeData::None, first);
        let (operation, _) = self.parse_operation(&[b":"], "event declaration", keyword)?;
        if let Some(operation) = operation {
            subject.children.push(operation);
        }
        node.children.push(subject);

        node.children
            .push(self.parse_value_expression("event declaration", keyword)?);
        Ok(node)
    }

    /// `Assignment := Name ":" (Block | SingleLineExpr)`
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let name = self.it.bump().expect("caller peeked the name");
        let mut node = Node::new(NodeKind::Assignment, NodeData::None, name);
        self.expect("assignment declaration", name, b":")?;
        node.children
            .push(self.parse_value_expression("assignment declaration", name)?);
        Ok(node)
    }

    /// `ParameterList := "(" (Name ("," Name)*)? ")"`
    fn parse_parameter_list(&mut self) -> Result<Node, ParseError> {
        let open = self.it.bump().expect("caller peeked the opener");
        let mut node = Node::new(NodeKind::ParameterList, NodeData::None, open);
        loop {
            let lexeme = self.peek_or_eof("parameter list", open)?;
            if lexeme.literal == b")" {
                self.it.bump();
                return Ok(node);
            }
            if !is_name(lexeme.literal) {
                return Err(ParseError::unexpected_token(
                    "parameter list",
                    self.context,
                    lexeme,
                ));
            }
            node.children
                .push(Node::new(NodeKind::Name, NodeData::None, lexeme));
            self.it.bump();

            let separator = self.peek_or_eof("parameter list", open)?;
            if separator.literal == b"," {
                self.it.bump();
            } else if separator.literal != b")" {
                return Err(ParseError::unexpected_token(
                    "parameter list",
                    self.context,
                    separator,
                ));
            }
        }
    }
}
