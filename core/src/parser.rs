mod expr;
mod stmt;
mod top;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::utils::Range;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub found: TokenKind,
    pub range: Range,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message,
            self.range.start.line + 1,
            self.range.start.character + 1
        )
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// 一次解析的全部产出：尽力构建的 AST 加上语法错误，两者总是同时返回
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub items: Vec<Item>,
    pub errors: Vec<ParseError>,
}

/// 解析入口。永远不会失败，坏输入只会让 AST 变得不完整。
pub fn parse(source: &str) -> ParseOutput {
    let mut parser = Parser::new(source);
    let items = parser.parse_program();
    log::debug!(
        "parsed {} top-level items with {} syntax errors",
        items.len(),
        parser.errors.len()
    );
    ParseOutput {
        items,
        errors: parser.errors,
    }
}

/// 块嵌套、括号嵌套与运算符链加在一起的上限，超出后不再递归
pub const MAX_NESTING: usize = 256;

/// 递归下降解析器。游标状态都在实例里，每次解析一个实例。
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    /// 当前嵌套深度，见 MAX_NESTING
    depth: usize,
    pub errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize())
    }

    pub fn from_tokens(mut tokens: Vec<Token<'a>>) -> Self {
        // 末尾必须有 EOF，peek 依赖它
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let eof = match tokens.last() {
                Some(last) => Token::new(TokenKind::Eof, "", last.span, last.end, last.end),
                None => Token::new(
                    TokenKind::Eof,
                    "",
                    Default::default(),
                    Default::default(),
                    Default::default(),
                ),
            };
            tokens.push(eof);
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    // --- Token 检查与消费 ---

    pub fn peek(&self) -> Token<'a> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Token<'a> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.current + n).min(last)]
    }

    pub fn previous(&self) -> Token<'a> {
        self.tokens[self.current.saturating_sub(1)]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// 标识符且文本 (忽略大小写) 等于 word
    pub fn check_word(&self, word: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier && token.text.eq_ignore_ascii_case(word)
    }

    pub fn advance(&mut self) -> Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// 匹配则前进并返回 Token；否则记一条错误，不移动游标，返回 None。
    /// 调用方自己保证外层循环有进展。
    pub fn consume(&mut self, kind: TokenKind, message: &str) -> Option<Token<'a>> {
        if self.check(kind) {
            return Some(self.advance());
        }
        let token = self.peek();
        self.error_at(token, message);
        None
    }

    pub fn error_at(&mut self, token: Token<'a>, message: &str) {
        self.errors.push(Self::make_error(token, message));
    }

    pub fn error_here(&self, message: &str) -> ParseError {
        Self::make_error(self.peek(), message)
    }

    fn make_error(token: Token<'a>, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            found: token.kind,
            range: token.error_range(),
        }
    }

    /// 最近一个被消费的有效 Token 的区间 (跳过换行和分号)，用于节点结尾
    pub fn previous_range(&self) -> Range {
        self.tokens[..self.current]
            .iter()
            .rev()
            .find(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Semicolon))
            .or_else(|| self.tokens.first())
            .map(|t| t.range())
            .unwrap_or_default()
    }

    /// 块结束判断：END/ENDFUNCTION/ENDPROCEDURE 是普通标识符，
    /// ENDIF/ENDWHILE/ENDFOR 是关键字；ELSE 结束 THEN 分支。
    /// 只决定何时停止收集语句，具体吃哪个结束符由外层结构决定。
    pub fn is_block_end(&self) -> bool {
        match self.peek().kind {
            TokenKind::EndIf | TokenKind::EndWhile | TokenKind::EndFor | TokenKind::Else => true,
            TokenKind::Identifier => ["END", "ENDFUNCTION", "ENDPROCEDURE"]
                .iter()
                .any(|word| self.check_word(word)),
            _ => false,
        }
    }

    fn at_declaration_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Function | TokenKind::Procedure)
    }

    /// 跳过语句之间的换行和分号
    fn skip_separators(&mut self) {
        while self.match_token(&[TokenKind::Newline, TokenKind::Semicolon]) {}
    }

    /// 循环体一轮下来游标必须前进，否则强制吃掉一个 Token
    fn ensure_progress(&mut self, before: usize) {
        if self.current == before && !self.is_at_end() {
            log::trace!("parser made no progress at {:?}, skipping", self.peek().kind);
            self.advance();
        }
    }

    /// Panic-mode 恢复：至少丢弃一个 Token，然后停在
    /// 语句分隔符之后，或者新的语句/声明/块结束符之前
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if matches!(
                self.previous().kind,
                TokenKind::Semicolon | TokenKind::Newline
            ) {
                return;
            }

            match self.peek().kind {
                TokenKind::Function
                | TokenKind::Procedure
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return => return,
                _ => {}
            }

            if self.is_block_end() {
                return;
            }

            self.advance();
        }
    }

    /// 解析入口：顶层声明序列
    pub fn parse_program(&mut self) -> Vec<Item> {
        let mut items = Vec::new();

        loop {
            self.skip_separators();
            if self.is_at_end() {
                break;
            }

            let before = self.current;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
            self.ensure_progress(before);
        }

        items
    }

    /// 语句块：一直收集到块结束符、新的声明或 EOF
    pub(crate) fn parse_block(&mut self) -> Vec<Statement> {
        if self.depth >= MAX_NESTING {
            let token = self.peek();
            self.error_at(token, "Nesting too deep");
            self.skip_nested_block();
            return Vec::new();
        }
        self.depth += 1;

        let mut statements = Vec::new();

        loop {
            self.skip_separators();
            if self.is_at_end() || self.is_block_end() || self.at_declaration_start() {
                break;
            }

            let before = self.current;
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
            self.ensure_progress(before);
        }

        self.depth -= 1;
        statements
    }

    /// 嵌套过深时整段跳过，停在与本块平级的结束符、新的声明或 EOF 前。
    /// 内层的 IF/WHILE/FOR 与各自的结束符配对抵消；END/ENDFUNCTION/ENDPROCEDURE
    /// 在任何层级都停下，不越过外层声明的结尾。
    fn skip_nested_block(&mut self) {
        let mut open = 0usize;
        while !self.is_at_end() && !self.at_declaration_start() {
            if self.at_nested_close() {
                if open == 0 {
                    return;
                }
                open -= 1;
                if self.check_word("END") {
                    self.advance();
                }
                self.advance();
                continue;
            }
            if self.is_block_end() && (open == 0 || !self.check(TokenKind::Else)) {
                return;
            }
            if matches!(
                self.peek().kind,
                TokenKind::If | TokenKind::While | TokenKind::For
            ) {
                open += 1;
            }
            self.advance();
        }
    }

    /// ENDIF/ENDWHILE/ENDFOR，或两词形式 END IF/END WHILE/END FOR
    fn at_nested_close(&self) -> bool {
        match self.peek().kind {
            TokenKind::EndIf | TokenKind::EndWhile | TokenKind::EndFor => true,
            _ => {
                self.check_word("END")
                    && matches!(
                        self.peek_nth(1).kind,
                        TokenKind::If | TokenKind::While | TokenKind::For
                    )
            }
        }
    }
}
