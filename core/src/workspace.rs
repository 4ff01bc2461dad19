use crate::language::{self, CompletionItem, Diagnostic, Hover};
use crate::parser;
use crate::source::{DocumentId, DocumentStore};
use crate::symbols::{self, SymbolIndex};
use crate::utils::Position;

/// 所有打开文档的状态：最新文本和各自的符号表。
/// 单线程使用，更新和查询由调用方串行化。
#[derive(Debug, Default)]
pub struct Workspace {
    pub documents: DocumentStore,
    pub index: SymbolIndex,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入口：文档打开或变化 (全量文本)
    pub fn on_document_changed(&mut self, uri: &str, version: i32, text: String) -> DocumentId {
        let id = self.documents.upsert(uri, version, text);
        self.rebuild_symbols(id);
        id
    }

    /// 文档关闭：丢弃文本和符号表
    pub fn on_document_closed(&mut self, uri: &str) -> Option<DocumentId> {
        let id = self.documents.close(uri)?;
        self.index.remove(id);
        log::debug!("document {} ({}) closed", id, uri);
        Some(id)
    }

    fn rebuild_symbols(&mut self, id: DocumentId) {
        let Some(document) = self.documents.get(id) else {
            return;
        };

        // ==========================================
        // Step 1: Parsing (语法解析)
        // ==========================================
        let output = parser::parse(&document.text);

        // ==========================================
        // Step 2: Symbols (符号提取，整表替换)
        // ==========================================
        let symbols = symbols::extract(&output.items, id);
        log::debug!(
            "document {} ({}) v{}: {} items, {} syntax errors, {} symbols",
            id,
            document.uri,
            document.version,
            output.items.len(),
            output.errors.len(),
            symbols.len()
        );
        self.index.update(id, symbols);
    }

    /// 语法诊断 + 行级规则。文档未打开时返回空。
    pub fn diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        match self.documents.get_by_uri(uri) {
            Some(document) => language::collect_diagnostics(&document.text),
            None => Vec::new(),
        }
    }

    pub fn completions(&self, uri: &str, pos: Position) -> Vec<CompletionItem> {
        let Some(id) = self.documents.id_of(uri) else {
            return Vec::new();
        };
        language::completions(&self.index, &self.documents[id], id, pos)
    }

    pub fn hover(&self, uri: &str, pos: Position) -> Option<Hover> {
        let id = self.documents.id_of(uri)?;
        language::hover(&self.index, &self.documents[id], id, pos)
    }

    /// 当前打开的全部文档 URI，按打开顺序
    pub fn open_uris(&self) -> Vec<String> {
        self.documents.iter().map(|(_, d)| d.uri.clone()).collect()
    }
}
