use crate::token::{Token, TokenKind};
use crate::utils::{Position, Span};
use core::iter::Peekable;
use core::str::CharIndices;

/// 单遍扫描的词法分析器。空白与注释不产出 Token，但照常推进行列号。
/// 任何输入都不会报错：无法识别的字符会变成一个 `Unknown` Token。
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    current_position: usize,
    start_position: usize,

    // 当前与 Token 起点的行列 (0-based，列按 UTF-16 计)
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            current_position: 0,
            start_position: 0,
            line: 0,
            column: 0,
            start_line: 0,
            start_column: 0,
        }
    }

    /// 扫描全部输入，末尾追加一个 EOF Token
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        log::trace!("lexed {} tokens", tokens.len());
        tokens
    }

    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(
            kind,
            &self.src[self.start_position..self.current_position],
            Span::new(self.start_position, self.current_position),
            Position::new(self.start_line, self.start_column),
            Position::new(self.line, self.column),
        )
    }

    fn mark_start(&mut self) {
        self.start_position = self.current_position;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        self.current_position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16() as u32;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next().map(|(_, c)| c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }
}

impl<'a> Lexer<'a> {
    pub fn next_token(&mut self) -> Token<'a> {
        loop {
            self.mark_start();

            let c = match self.peek() {
                Some(c) => c,
                None => return self.make_token(TokenKind::Eof),
            };

            // 1. 水平空白：吞掉，不产出
            if is_horizontal_whitespace(c) {
                self.skip_horizontal_whitespace();
                continue;
            }

            // 2. 行注释：# 或 --
            if c == '#' || (c == '-' && self.peek_next() == Some('-')) {
                self.skip_comment_line();
                continue;
            }

            return self.scan_token(c);
        }
    }

    fn scan_token(&mut self, c: char) -> Token<'a> {
        match c {
            '"' | '\'' => self.scan_string(c),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => self.scan_identifier(),
            '\n' => {
                self.advance();
                self.make_token(TokenKind::Newline)
            }
            _ => {
                self.advance();
                match c {
                    '=' => self.either('=', TokenKind::Equal, TokenKind::Assign),
                    // 单独的 ! 不是合法运算符
                    '!' => self.either('=', TokenKind::NotEqual, TokenKind::Unknown),
                    '<' => self.either('=', TokenKind::LessEqual, TokenKind::LessThan),
                    '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::GreaterThan),
                    ';' => self.make_token(TokenKind::Semicolon),
                    ',' => self.make_token(TokenKind::Comma),
                    '.' => self.make_token(TokenKind::Dot),
                    '(' => self.make_token(TokenKind::LeftParen),
                    ')' => self.make_token(TokenKind::RightParen),
                    '{' => self.make_token(TokenKind::LeftBrace),
                    '}' => self.make_token(TokenKind::RightBrace),
                    _ => self.make_token(TokenKind::Unknown),
                }
            }
        }
    }

    /// 双字符运算符：下一个字符是 `second` 时取 `long`，否则取 `short`
    fn either(&mut self, second: char, long: TokenKind, short: TokenKind) -> Token<'a> {
        let kind = if self.match_char(second) { long } else { short };
        self.make_token(kind)
    }

    // --- 辅助函数 ---

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut pred) {
            self.advance();
        }
    }

    fn skip_horizontal_whitespace(&mut self) {
        self.eat_while(is_horizontal_whitespace);
    }

    /// 吃到行尾，换行符本身留给下一次扫描
    fn skip_comment_line(&mut self) {
        self.eat_while(|c| c != '\n');
    }

    /// 首尾引号相同；反斜杠跳过下一个字符。未闭合的字符串一直吃到输入结束。
    fn scan_string(&mut self, quote: char) -> Token<'a> {
        self.advance(); // 开引号
        while let Some(c) = self.advance() {
            if c == quote {
                break;
            }
            if c == '\\' {
                self.advance();
            }
        }
        self.make_token(TokenKind::StringLiteral)
    }

    /// 数字与点的任意组合 (1.2.3 也是一个 Token)，不处理指数和符号
    fn scan_number(&mut self) -> Token<'a> {
        self.eat_while(|c| c.is_ascii_digit() || c == '.');
        self.make_token(TokenKind::NumberLiteral)
    }

    fn scan_identifier(&mut self) -> Token<'a> {
        self.eat_while(is_ident_continue);

        let text = &self.src[self.start_position..self.current_position];

        // 关键字优先，大小写不敏感
        let kind = TokenKind::lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }
}

/// 便捷入口
pub fn tokenize(src: &str) -> Vec<Token<'_>> {
    Lexer::new(src).tokenize()
}

fn is_horizontal_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
