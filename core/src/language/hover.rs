use serde::Serialize;

use crate::language::builtins::{builtin_function, keyword_doc};
use crate::source::{Document, DocumentId};
use crate::symbols::{Symbol, SymbolIndex, SymbolKind};
use crate::utils::Position;

/// 悬停内容，Markdown 文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub contents: String,
}

/// 查找顺序：内置函数、关键字、光标处的符号、任意文档里的同名符号，
/// 最后对普通标识符给出一段 "未找到" 的提示。
pub fn hover(
    index: &SymbolIndex,
    document: &Document,
    id: DocumentId,
    pos: Position,
) -> Option<Hover> {
    let word = document.word_at(pos)?;
    let upper = word.to_ascii_uppercase();

    if let Some(builtin) = builtin_function(word) {
        return Some(markdown([
            format!("**{}** (Built-in Function)", upper),
            String::new(),
            format!("**Returns:** {}", builtin.return_type),
            String::new(),
            format!("**Syntax:** `{}`", builtin.syntax),
            String::new(),
            builtin.description.to_string(),
        ]));
    }

    if let Some(doc) = keyword_doc(word) {
        return Some(markdown([
            format!("**{}** (Keyword)", upper),
            String::new(),
            doc.to_string(),
        ]));
    }

    if let Some(symbol) = index.find_at(id, pos) {
        return Some(Hover {
            contents: describe_symbol(symbol),
        });
    }

    let same_name = index.find_by_name(word, None);
    if let Some(first) = same_name.first() {
        let mut contents = format!("**{}** ({})", first.name, first.kind);
        if let Some(data_type) = &first.data_type {
            contents.push_str(&format!("\n\n**Type:** {}", data_type));
        }
        if same_name.len() > 1 {
            contents.push_str(&format!("\n\n*Found {} definitions*", same_name.len()));
        }
        return Some(Hover { contents });
    }

    if is_identifier(word) {
        return Some(markdown([
            format!("**{}**", word),
            String::new(),
            "*Identifier not found in current scope*".to_string(),
            String::new(),
            "This might be:".to_string(),
            "- An undeclared variable".to_string(),
            "- A function or procedure defined elsewhere".to_string(),
            "- A table or column name".to_string(),
            "- A typo in the identifier name".to_string(),
        ]));
    }

    None
}

fn describe_symbol(symbol: &Symbol) -> String {
    let mut contents = format!("**{}** ({})", symbol.name, symbol.kind);
    if let Some(data_type) = &symbol.data_type {
        contents.push_str(&format!("\n\n**Type:** {}", data_type));
    }
    if !symbol.detail.is_empty() {
        contents.push_str(&format!("\n\n{}", symbol.detail));
    }
    let note = match symbol.kind {
        SymbolKind::Function => "*User-defined function*",
        SymbolKind::Procedure => "*User-defined procedure*",
        SymbolKind::Variable => "*Local variable*",
        SymbolKind::Parameter => "*Function/procedure parameter*",
    };
    contents.push_str("\n\n");
    contents.push_str(note);
    contents
}

fn markdown<const N: usize>(lines: [String; N]) -> Hover {
    Hover {
        contents: lines.join("\n"),
    }
}

/// 数字开头的单词 (例如 123) 不是标识符
fn is_identifier(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
