use std::collections::HashSet;

use serde::Serialize;

use crate::language::builtins::{BUILTIN_FUNCTIONS, FORM_CONTEXT_KEYWORDS, SQL_CONTEXT_KEYWORDS};
use crate::source::{Document, DocumentId};
use crate::symbols::{Symbol, SymbolIndex};
use crate::token::TokenKind;
use crate::utils::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Function,
    Procedure,
    Variable,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: String,
    /// insert_text 里带 `$1` 这样的占位符
    pub is_snippet: bool,
    pub sort_key: Option<String>,
}

impl CompletionItem {
    fn plain(label: &str, kind: CompletionKind, detail: Option<String>) -> Self {
        Self {
            label: label.to_string(),
            kind,
            detail,
            documentation: None,
            insert_text: label.to_string(),
            is_snippet: false,
            sort_key: None,
        }
    }

    fn call(label: &str, kind: CompletionKind, detail: Option<String>) -> Self {
        Self {
            insert_text: format!("{}($1)", label),
            is_snippet: true,
            ..Self::plain(label, kind, detail)
        }
    }

    fn sorted(mut self, group: u8) -> Self {
        self.sort_key = Some(format!("{}_{}", group, self.label.to_ascii_lowercase()));
        self
    }
}

// 排序分组：用户符号在前，关键字和内置函数在后
const GROUP_FUNCTION: u8 = 0;
const GROUP_PROCEDURE: u8 = 1;
const GROUP_VARIABLE: u8 = 2;
const GROUP_KEYWORD: u8 = 3;
const GROUP_BUILTIN: u8 = 4;

/// 光标处的补全候选。按光标左边的半个单词做大小写不敏感的前缀过滤，为空时不过滤。
pub fn completions(
    index: &SymbolIndex,
    document: &Document,
    id: DocumentId,
    pos: Position,
) -> Vec<CompletionItem> {
    let prefix = document.prefix_at(pos).unwrap_or("").to_ascii_lowercase();
    let line = document.line_text(pos.line).unwrap_or("");

    let mut builder = Builder {
        prefix,
        seen: HashSet::new(),
        items: Vec::new(),
    };

    // ==========================================
    // 用户符号：函数、过程、作用域内的变量
    // ==========================================
    for func in index.functions() {
        let detail = symbol_detail(func).unwrap_or_else(|| {
            format!("Function: {}", func.data_type.as_deref().unwrap_or("void"))
        });
        builder.push(
            CompletionItem::call(&func.name, CompletionKind::Function, Some(detail))
                .sorted(GROUP_FUNCTION),
        );
    }

    for procedure in index.procedures() {
        let detail = symbol_detail(procedure).unwrap_or_else(|| "Procedure".to_string());
        builder.push(
            CompletionItem::call(&procedure.name, CompletionKind::Procedure, Some(detail))
                .sorted(GROUP_PROCEDURE),
        );
    }

    for var in index.variables_in_scope(id, pos) {
        let detail = symbol_detail(var).unwrap_or_else(|| {
            format!("{}: {}", var.kind, var.data_type.as_deref().unwrap_or("unknown"))
        });
        builder.push(
            CompletionItem::plain(&var.name, CompletionKind::Variable, Some(detail))
                .sorted(GROUP_VARIABLE),
        );
    }

    // ==========================================
    // 关键字 (按当前行的上下文追加 SQL / FORM 关键字)
    // ==========================================
    for keyword in TokenKind::KEYWORDS {
        builder.push(
            CompletionItem::plain(keyword, CompletionKind::Keyword, Some("Keyword".to_string()))
                .sorted(GROUP_KEYWORD),
        );
    }
    if line_has_any_word(line, &["SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE"]) {
        for keyword in SQL_CONTEXT_KEYWORDS {
            let detail = Some("SQL Keyword".to_string());
            builder.push(
                CompletionItem::plain(keyword, CompletionKind::Keyword, detail)
                    .sorted(GROUP_KEYWORD),
            );
        }
    }
    if line_has_any_word(line, &["FORM", "INPUT", "DISPLAY", "CONSTRUCT"]) {
        for keyword in FORM_CONTEXT_KEYWORDS {
            let detail = Some("Form Keyword".to_string());
            builder.push(
                CompletionItem::plain(keyword, CompletionKind::Keyword, detail)
                    .sorted(GROUP_KEYWORD),
            );
        }
    }

    // ==========================================
    // 内置函数
    // ==========================================
    for builtin in BUILTIN_FUNCTIONS {
        let mut item = CompletionItem::call(
            builtin.name,
            CompletionKind::Function,
            Some(format!("Built-in function: {}", builtin.return_type)),
        )
        .sorted(GROUP_BUILTIN);
        item.documentation = Some(builtin.description.to_string());
        builder.push(item);
    }

    log::trace!(
        "{} completion candidates at {}:{}",
        builder.items.len(),
        pos.line,
        pos.character
    );
    builder.items
}

struct Builder {
    prefix: String,
    seen: HashSet<(String, CompletionKind)>,
    items: Vec<CompletionItem>,
}

impl Builder {
    /// 前缀不匹配或已有同名同类候选时丢弃
    fn push(&mut self, item: CompletionItem) {
        if !item.label.to_ascii_lowercase().starts_with(&self.prefix) {
            return;
        }
        if self.seen.insert((item.label.clone(), item.kind)) {
            self.items.push(item);
        }
    }
}

fn symbol_detail(symbol: &Symbol) -> Option<String> {
    if symbol.detail.is_empty() {
        None
    } else {
        Some(symbol.detail.clone())
    }
}

fn line_has_any_word(line: &str, words: &[&str]) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|w| words.iter().any(|k| k.eq_ignore_ascii_case(w)))
}
