use std::collections::BTreeMap;

use crate::source::DocumentId;
use crate::symbols::{Symbol, SymbolKind};
use crate::utils::Position;

/// 每个文档一张符号表。更新时整表替换，不做增量合并。
/// BTreeMap 让跨文档查询按文档编号 (打开顺序) 稳定输出。
#[derive(Debug, Default)]
pub struct SymbolIndex {
    tables: BTreeMap<DocumentId, Vec<Symbol>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, document: DocumentId, symbols: Vec<Symbol>) {
        log::debug!(
            "symbol table for document {} replaced ({} symbols)",
            document,
            symbols.len()
        );
        self.tables.insert(document, symbols);
    }

    pub fn remove(&mut self, document: DocumentId) -> Option<Vec<Symbol>> {
        self.tables.remove(&document)
    }

    pub fn symbols_in_document(&self, document: DocumentId) -> &[Symbol] {
        self.tables
            .get(&document)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.tables.values().flatten()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.of_kind(SymbolKind::Function)
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Symbol> {
        self.of_kind(SymbolKind::Procedure)
    }

    fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.all_symbols().filter(move |s| s.kind == kind)
    }

    /// 按存储顺序第一个包含 pos 的符号 (首尾闭区间)。
    /// 函数的区间覆盖整个函数体，所以函数体里的位置会先命中函数本身。
    pub fn find_at(&self, document: DocumentId, pos: Position) -> Option<&Symbol> {
        self.symbols_in_document(document)
            .iter()
            .find(|s| s.range.contains_inclusive(pos))
    }

    /// 名字区分大小写，跨所有文档
    pub fn find_by_name(&self, name: &str, kind: Option<SymbolKind>) -> Vec<&Symbol> {
        self.all_symbols()
            .filter(|s| s.name == name && kind.is_none_or(|k| s.kind == k))
            .collect()
    }

    /// 找到包含 pos 的最内层函数/过程，返回声明在它区间内的全部变量和参数。
    /// 不在任何函数/过程里时，返回文档顶层 (函数/过程之外) 的变量。
    pub fn variables_in_scope(&self, document: DocumentId, pos: Position) -> Vec<&Symbol> {
        let symbols = self.symbols_in_document(document);

        let enclosing = symbols
            .iter()
            .filter(|s| s.kind.is_callable() && s.range.contains_inclusive(pos))
            .min_by_key(|s| (s.range.end.line - s.range.start.line, s.range.end.character));

        match enclosing {
            Some(scope) => symbols
                .iter()
                .filter(|s| s.kind.is_value() && scope.range.contains_range(&s.range))
                .collect(),
            None => {
                let scopes: Vec<_> = symbols
                    .iter()
                    .filter(|s| s.kind.is_callable())
                    .map(|s| s.range)
                    .collect();
                symbols
                    .iter()
                    .filter(|s| s.kind == SymbolKind::Variable)
                    .filter(|s| !scopes.iter().any(|r| r.contains_range(&s.range)))
                    .collect()
            }
        }
    }
}
