use crate::ast::*;
use crate::parser::{MAX_NESTING, ParseError, ParseResult, Parser};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// 核心入口：解析表达式
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_expression_bp(0)
    }

    /// 语句内部用：失败时记错，返回占位节点，外层结构继续
    pub(crate) fn parse_expression_or_error(&mut self) -> Expression {
        match self.parse_expression() {
            Ok(expr) => expr,
            Err(err) => {
                let range = err.range;
                self.errors.push(err);
                Node::new(range, ExpressionData::Error)
            }
        }
    }

    /// 左结合力，数值越大绑定越紧
    fn get_binding_power(&self, kind: TokenKind) -> Option<(u8, BinaryOp)> {
        match kind {
            // --- 逻辑 ---
            TokenKind::Or => Some((20, BinaryOp::Or)),
            TokenKind::And => Some((30, BinaryOp::And)),

            // --- 相等 ---
            // 表达式里单个 = 也当作比较
            TokenKind::Equal | TokenKind::Assign => Some((40, BinaryOp::Eq)),
            TokenKind::NotEqual => Some((40, BinaryOp::Neq)),

            // --- 大小比较 ---
            TokenKind::LessThan => Some((50, BinaryOp::Lt)),
            TokenKind::GreaterThan => Some((50, BinaryOp::Gt)),
            TokenKind::LessEqual => Some((50, BinaryOp::Lte)),
            TokenKind::GreaterEqual => Some((50, BinaryOp::Gte)),

            _ => None,
        }
    }

    /// 每层括号、每个右操作数都占一层嵌套
    fn parse_expression_bp(&mut self, min_bp: u8) -> ParseResult<Expression> {
        if self.depth >= MAX_NESTING {
            return Err(self.nesting_too_deep());
        }
        self.depth += 1;
        let result = self.parse_binary_chain(min_bp);
        self.depth -= 1;
        result
    }

    /// Pratt 循环，全部是左结合二元运算。
    /// 左结合链每接一个运算符，树就深一层，所以链长也计入嵌套深度。
    fn parse_binary_chain(&mut self, min_bp: u8) -> ParseResult<Expression> {
        let mut lhs = self.parse_primary()?;
        let mut links = 0;

        loop {
            let (op_bp, op) = match self.get_binding_power(self.peek().kind) {
                Some((bp, op)) if bp >= min_bp => (bp, op),
                _ => break,
            };
            if self.depth + links >= MAX_NESTING {
                return Err(self.nesting_too_deep());
            }
            self.advance(); // 吃掉运算符

            self.depth += links;
            let rhs = self.parse_expression_bp(op_bp + 1);
            self.depth -= links;
            let rhs = rhs?;
            links += 1;

            let range = lhs.range.to(rhs.range);
            lhs = Node::new(
                range,
                ExpressionData::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
            );
        }

        Ok(lhs)
    }

    /// 记错后跳到行尾，外层各帧直接把错误传上去
    fn nesting_too_deep(&mut self) -> ParseError {
        let err = self.error_here("Nesting too deep");
        self.skip_to_line_end();
        err
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek();
        match token.kind {
            TokenKind::StringLiteral => {
                self.advance();
                Ok(Node::new(
                    token.range(),
                    ExpressionData::Literal(Literal::String(token.text.to_string())),
                ))
            }
            TokenKind::NumberLiteral => {
                self.advance();
                Ok(Node::new(
                    token.range(),
                    ExpressionData::Literal(Literal::Number(token.text.to_string())),
                ))
            }
            TokenKind::Identifier => {
                self.advance();
                if self.match_token(&[TokenKind::LeftParen]) {
                    let args = self.parse_argument_list()?;
                    self.consume(TokenKind::RightParen, "Expected ')' after arguments");
                    return Ok(self.make_node_from(
                        token.range(),
                        ExpressionData::Call {
                            name: token.text.to_string(),
                            args,
                        },
                    ));
                }
                Ok(Node::new(
                    token.range(),
                    ExpressionData::Identifier(token.text.to_string()),
                ))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression");
                // 括号不单独建节点，区间扩到括号
                Ok(Node::new(
                    token.range().to(self.previous_range()),
                    inner.data,
                ))
            }
            _ => Err(self.error_here("Expected expression")),
        }
    }

    /// 已经吃掉 '('，解析到 ')' 之前
    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut args = Vec::new();
        if self.check(TokenKind::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&[TokenKind::Comma]) {
                break;
            }
        }
        Ok(args)
    }
}
