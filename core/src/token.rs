use crate::utils::{Position, Range, Span};

/// 词法单元。`text` 直接借用源码切片，产出后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 字节偏移 [start, end)
    pub span: Span,
    /// 0-based 起止坐标
    pub start: Position,
    pub end: Position,
}

impl<'a> Token<'a> {
    #[inline(always)]
    pub fn new(kind: TokenKind, text: &'a str, span: Span, start: Position, end: Position) -> Self {
        Self {
            kind,
            text,
            span,
            start,
            end,
        }
    }

    /// 1-based 行号
    pub fn line(&self) -> u32 {
        self.start.line + 1
    }

    /// 1-based 列号
    pub fn column(&self) -> u32 {
        self.start.character + 1
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    /// 报错用的区间：空 Token (EOF) 也至少占一个字符宽
    pub fn error_range(&self) -> Range {
        if self.start == self.end {
            Range::new(
                self.start,
                Position::new(self.start.line, self.start.character + 1),
            )
        } else {
            self.range()
        }
    }
}

macro_rules! define_tokens {
    (
        dynamic { $($dynamic_variant:ident),* $(,)? }
        keywords { $($keyword_text:literal => $keyword_variant:ident),* $(,)? }
        symbols { $($symbol_text:literal => $symbol_variant:ident),* $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenKind {
            Eof,
            Unknown,
            // 动态 Token (由扫描逻辑生成，而非直接匹配字符串)
            $($dynamic_variant),*,
            // 关键字
            $($keyword_variant),*,
            // 符号
            $($symbol_variant),*,
        }

        impl TokenKind {
            /// 全部关键字的规范文本 (大写)
            pub const KEYWORDS: &'static [&'static str] = &[$($keyword_text),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    TokenKind::Eof => "end of file",
                    TokenKind::Unknown => "unknown",
                    $(TokenKind::$dynamic_variant => stringify!($dynamic_variant)),*,
                    $(TokenKind::$keyword_variant => $keyword_text),*,
                    $(TokenKind::$symbol_variant => $symbol_text),*,
                }
            }

            /// 关键字大小写不敏感：调用方传入的文本会先转成大写再匹配
            pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
                match text.to_ascii_uppercase().as_str() {
                    $($keyword_text => Some(TokenKind::$keyword_variant),)*
                    _ => None,
                }
            }

            pub fn is_keyword(&self) -> bool {
                matches!(self, $(TokenKind::$keyword_variant)|*)
            }
        }
    };
}

define_tokens! {
    dynamic {
        Identifier,
        StringLiteral, // "hello" 或 'hello'
        NumberLiteral, // 123 / 12.34
        Newline,       // 换行是语句分隔符，保留在 Token 流里
    }

    keywords {
        // --- 声明 ---
        "FUNCTION"  => Function,
        "PROCEDURE" => Procedure,
        "FORM"      => Form,
        "REPORT"    => Report,
        "DATABASE"  => Database,
        "TABLE"     => Table,
        "DEFINE"    => Define,
        "LET"       => Let,

        // --- SQL ---
        "SELECT"    => Select,
        "INSERT"    => Insert,
        "UPDATE"    => Update,
        "DELETE"    => Delete,
        "WHERE"     => Where,
        "FROM"      => From,
        "INTO"      => Into,
        "VALUES"    => Values,

        // --- 控制流 ---
        "IF"        => If,
        "THEN"      => Then,
        "ELSE"      => Else,
        "ENDIF"     => EndIf,
        "WHILE"     => While,
        "ENDWHILE"  => EndWhile,
        "FOR"       => For,
        "ENDFOR"    => EndFor,
        "RETURN"    => Return,
        "CALL"      => Call,

        // --- 数据类型 ---
        "INTEGER"   => Integer,
        "DECIMAL"   => Decimal,
        "CHAR"      => Char,
        "VARCHAR"   => Varchar,
        "DATE"      => Date,
        "DATETIME"  => Datetime,

        // --- 逻辑 ---
        "AND"       => And,
        "OR"        => Or,
        "NOT"       => Not,
    }

    symbols {
        "=="  => Equal,
        "!="  => NotEqual,
        "<="  => LessEqual,
        ">="  => GreaterEqual,
        "="   => Assign,
        "<"   => LessThan,
        ">"   => GreaterThan,
        ";"   => Semicolon,
        ","   => Comma,
        "."   => Dot,
        "("   => LeftParen,
        ")"   => RightParen,
        "{"   => LeftBrace,
        "}"   => RightBrace,
    }
}

impl TokenKind {
    /// 可以直接作为数据类型出现的关键字
    pub fn is_data_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Decimal
                | TokenKind::Char
                | TokenKind::Varchar
                | TokenKind::Date
                | TokenKind::Datetime
        )
    }

    pub fn is_sql_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Select | TokenKind::Insert | TokenKind::Update | TokenKind::Delete
        )
    }
}
