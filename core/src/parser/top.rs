use crate::ast::*;
use crate::parser::{ParseResult, Parser};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// 顶层条目：函数、过程，其余一律按语句处理 (全局 DEFINE 就走这里)
    pub(crate) fn parse_item(&mut self) -> ParseResult<Item> {
        match self.peek().kind {
            TokenKind::Function => Ok(Item::Function(self.parse_function())),
            TokenKind::Procedure => Ok(Item::Procedure(self.parse_procedure())),
            _ if self.is_block_end() => {
                let token = self.peek();
                Err(self.error_here(&format!("Unexpected '{}' outside of a block", token.text)))
            }
            _ => Ok(Item::Statement(self.parse_statement()?)),
        }
    }

    /// FUNCTION name(params) [RETURNING type]
    ///     ...
    /// END | ENDFUNCTION | END FUNCTION
    fn parse_function(&mut self) -> FunctionDefinition {
        let start = self.advance(); // FUNCTION
        let name = self.parse_declaration_name("Expected function name");

        let params = self.parse_param_list("function");

        // RETURNING 不是关键字，按标识符文本识别
        let return_type = if self.check_word("RETURNING") {
            self.advance();
            Some(self.parse_data_type())
        } else {
            None
        };

        let body = self.parse_block();
        self.consume_declaration_end(
            "ENDFUNCTION",
            TokenKind::Function,
            "Expected 'END' or 'ENDFUNCTION'",
        );

        self.make_node_from(
            start.range(),
            FunctionDefinitionData {
                name,
                params,
                return_type,
                body,
            },
        )
    }

    /// PROCEDURE name(params)
    ///     ...
    /// END | ENDPROCEDURE | END PROCEDURE
    fn parse_procedure(&mut self) -> ProcedureDefinition {
        let start = self.advance(); // PROCEDURE
        let name = self.parse_declaration_name("Expected procedure name");

        let params = self.parse_param_list("procedure");
        let body = self.parse_block();
        self.consume_declaration_end(
            "ENDPROCEDURE",
            TokenKind::Procedure,
            "Expected 'END' or 'ENDPROCEDURE'",
        );

        self.make_node_from(start.range(), ProcedureDefinitionData { name, params, body })
    }

    fn parse_declaration_name(&mut self, message: &str) -> String {
        self.consume(TokenKind::Identifier, message)
            .map(|t| t.text.to_string())
            .unwrap_or_default()
    }

    /// (a INTEGER, b CHAR(10))
    fn parse_param_list(&mut self, owner: &str) -> Vec<Param> {
        let mut params = Vec::new();

        let open = self.consume(
            TokenKind::LeftParen,
            &format!("Expected '(' after {} name", owner),
        );
        if open.is_none() {
            return params;
        }

        if !self.check(TokenKind::RightParen) {
            loop {
                if let Some(name_token) =
                    self.consume(TokenKind::Identifier, "Expected parameter name")
                {
                    let data_type = self.parse_data_type();
                    params.push(self.make_node_from(
                        name_token.range(),
                        ParamData {
                            name: name_token.text.to_string(),
                            data_type,
                        },
                    ));
                }

                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters");
        params
    }

    /// 数据类型：类型关键字或任意标识符，可带尺寸 CHAR(20) / DECIMAL(10,2)。
    /// 失败时记错并返回 "UNKNOWN"，不移动游标。
    pub(crate) fn parse_data_type(&mut self) -> String {
        let token = self.peek();
        if !(token.kind.is_data_type() || token.kind == TokenKind::Identifier) {
            self.error_at(token, "Expected data type");
            return "UNKNOWN".to_string();
        }
        self.advance();

        let mut text = token.text.to_string();
        if self.check(TokenKind::LeftParen) && self.peek_nth(1).kind == TokenKind::NumberLiteral {
            self.advance(); // (
            let mut sizes = Vec::new();
            loop {
                match self.consume(TokenKind::NumberLiteral, "Expected type size") {
                    Some(size) => sizes.push(size.text),
                    None => break,
                }
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
            self.consume(TokenKind::RightParen, "Expected ')' after type size");
            text = format!("{}({})", text, sizes.join(","));
        }
        text
    }

    /// 声明结束符：长形式 (ENDFUNCTION)、END，或两词形式 END FUNCTION
    fn consume_declaration_end(&mut self, long_form: &str, opener: TokenKind, message: &str) {
        if self.check_word(long_form) {
            self.advance();
            return;
        }
        if self.check_word("END") {
            self.advance();
            if self.check(opener) {
                self.advance();
            }
            return;
        }
        let token = self.peek();
        self.error_at(token, message);
    }

    /// 节点区间从起始 Token 一直覆盖到最后一个被消费的有效 Token
    pub(crate) fn make_node_from<T>(&self, start: crate::utils::Range, data: T) -> Node<T> {
        Node::new(start.to(self.previous_range()), data)
    }
}
