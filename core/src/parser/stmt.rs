use crate::ast::*;
use crate::parser::{ParseResult, Parser};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// 语句分流。只有 CALL 和裸表达式语句会返回 Err，其余结构一旦认出关键字就尽力完成。
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let statement = match self.peek().kind {
            TokenKind::Define => self.parse_define(),
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Call => self.parse_call()?,
            TokenKind::Return => self.parse_return(),
            kind if kind.is_sql_start() => self.parse_sql(),
            _ => {
                let expr = self.parse_expression()?;
                Node::new(expr.range, StatementData::Expression(expr))
            }
        };
        Ok(statement)
    }

    /// DEFINE a INTEGER, b CHAR(20)
    fn parse_define(&mut self) -> Statement {
        let start = self.advance(); // DEFINE
        let mut variables = Vec::new();

        loop {
            let name = self.consume(TokenKind::Identifier, "Expected variable name");
            if let Some(name_token) = name {
                let data_type = self.parse_data_type();
                variables.push(self.make_node_from(
                    name_token.range(),
                    VariableDeclarationData {
                        name: name_token.text.to_string(),
                        data_type,
                    },
                ));
            }

            if !self.match_token(&[TokenKind::Comma]) {
                break;
            }
        }

        self.make_node_from(start.range(), StatementData::Define(variables))
    }

    /// LET name = expr
    fn parse_let(&mut self) -> Statement {
        let start = self.advance(); // LET
        let variable = self
            .consume(TokenKind::Identifier, "Expected variable name")
            .map(|t| t.text.to_string())
            .unwrap_or_default();
        self.consume(TokenKind::Assign, "Expected '=' after variable");
        let value = self.parse_expression_or_error();

        self.make_node_from(start.range(), StatementData::Let { variable, value })
    }

    /// IF cond THEN ... [ELSE ...] ENDIF
    fn parse_if(&mut self) -> Statement {
        let start = self.advance(); // IF
        let condition = self.parse_expression_or_error();
        self.consume(TokenKind::Then, "Expected 'THEN' after condition");

        let then_block = self.parse_block();
        let else_block = if self.match_token(&[TokenKind::Else]) {
            self.parse_block()
        } else {
            Vec::new()
        };

        self.consume_block_end(TokenKind::EndIf, TokenKind::If, "Expected 'ENDIF'");

        self.make_node_from(
            start.range(),
            StatementData::If {
                condition,
                then_block,
                else_block,
            },
        )
    }

    /// WHILE cond ... ENDWHILE
    fn parse_while(&mut self) -> Statement {
        let start = self.advance(); // WHILE
        let condition = self.parse_expression_or_error();
        let body = self.parse_block();
        self.consume_block_end(TokenKind::EndWhile, TokenKind::While, "Expected 'ENDWHILE'");

        self.make_node_from(start.range(), StatementData::While { condition, body })
    }

    /// FOR <header> ... ENDFOR
    /// 循环头原样跳过到行尾，只解析循环体
    fn parse_for(&mut self) -> Statement {
        let start = self.advance(); // FOR
        self.skip_to_line_end();
        let body = self.parse_block();
        self.consume_block_end(TokenKind::EndFor, TokenKind::For, "Expected 'ENDFOR'");

        self.make_node_from(start.range(), StatementData::For { body })
    }

    /// CALL name[(args)]
    fn parse_call(&mut self) -> ParseResult<Statement> {
        let start = self.advance(); // CALL
        let name = self
            .consume(TokenKind::Identifier, "Expected function name")
            .map(|t| t.text.to_string())
            .unwrap_or_default();

        let args = if self.match_token(&[TokenKind::LeftParen]) {
            let args = self.parse_argument_list()?;
            self.consume(TokenKind::RightParen, "Expected ')' after arguments");
            args
        } else {
            Vec::new()
        };

        Ok(self.make_node_from(start.range(), StatementData::Call { name, args }))
    }

    /// RETURN [expr]
    fn parse_return(&mut self) -> Statement {
        let start = self.advance(); // RETURN

        let value = if self.check(TokenKind::Newline)
            || self.check(TokenKind::Semicolon)
            || self.is_at_end()
            || self.is_block_end()
        {
            None
        } else {
            Some(self.parse_expression_or_error())
        };

        self.make_node_from(start.range(), StatementData::Return(value))
    }

    /// SQL 语句不做结构解析：记下种类，原样吃到行尾或分号
    fn parse_sql(&mut self) -> Statement {
        let start = self.advance();
        let kind = match start.kind {
            TokenKind::Select => SqlKind::Select,
            TokenKind::Insert => SqlKind::Insert,
            TokenKind::Update => SqlKind::Update,
            _ => SqlKind::Delete,
        };
        self.skip_to_line_end();

        self.make_node_from(start.range(), StatementData::Sql(kind))
    }

    pub(crate) fn skip_to_line_end(&mut self) {
        while !self.is_at_end()
            && !self.check(TokenKind::Newline)
            && !self.check(TokenKind::Semicolon)
        {
            self.advance();
        }
    }

    /// 块结束关键字 (ENDIF)，或两词形式 END IF
    fn consume_block_end(&mut self, closing: TokenKind, opener: TokenKind, message: &str) {
        if self.match_token(&[closing]) {
            return;
        }
        if self.check_word("END") && self.peek_nth(1).kind == opener {
            self.advance();
            self.advance();
            return;
        }
        let token = self.peek();
        self.error_at(token, message);
    }
}
