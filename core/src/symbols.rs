mod extract;
mod index;

pub use extract::extract;
pub use index::SymbolIndex;

use crate::source::DocumentId;
use crate::utils::Range;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Procedure,
    Variable,
    Parameter,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Procedure => "procedure",
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
        }
    }

    /// 函数和过程会开启作用域
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Procedure)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, SymbolKind::Variable | SymbolKind::Parameter)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 从 AST 拍平出来的一个声明点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 变量/参数的类型，函数的返回类型；过程没有
    pub data_type: Option<String>,
    pub range: Range,
    #[serde(skip)]
    pub document: DocumentId,
    /// 一行摘要，例如 `function f(a: INTEGER): INTEGER`
    pub detail: String,
}
