use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use crate::source::{Document, DocumentId};

/// 按 URI 管理打开的文档，并给每份文档分配稳定的编号
#[derive(Debug, Default)]
pub struct DocumentStore {
    ids: HashMap<String, DocumentId>,
    documents: BTreeMap<DocumentId, Document>,
    next_id: usize,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// didOpen / didChange：已打开则整体替换文本，否则登记新文档
    pub fn upsert(&mut self, uri: &str, version: i32, text: String) -> DocumentId {
        if let Some(&id) = self.ids.get(uri) {
            if let Some(doc) = self.documents.get_mut(&id) {
                doc.replace(version, text);
            }
            return id;
        }

        let id = DocumentId::new(self.next_id);
        self.next_id += 1;
        self.ids.insert(uri.to_string(), id);
        self.documents
            .insert(id, Document::new(uri.to_string(), version, text));
        id
    }

    pub fn close(&mut self, uri: &str) -> Option<DocumentId> {
        let id = self.ids.remove(uri)?;
        self.documents.remove(&id);
        Some(id)
    }

    pub fn id_of(&self, uri: &str) -> Option<DocumentId> {
        self.ids.get(uri).copied()
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_by_uri(&self, uri: &str) -> Option<&Document> {
        self.get(self.id_of(uri)?)
    }

    /// 按打开顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &Document)> {
        self.documents.iter().map(|(&id, doc)| (id, doc))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Index<DocumentId> for DocumentStore {
    type Output = Document;

    fn index(&self, index: DocumentId) -> &Self::Output {
        &self.documents[&index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopen_gets_fresh_id() {
        let mut store = DocumentStore::new();
        let a = store.upsert("file:///a.4gl", 1, "LET x = 1".into());
        let b = store.upsert("file:///b.4gl", 1, String::new());
        assert_ne!(a, b);

        // 同一 URI 更新保持编号
        assert_eq!(store.upsert("file:///a.4gl", 2, "LET x = 2".into()), a);
        assert_eq!(store[a].text, "LET x = 2");
        assert_eq!(store[a].version, 2);

        assert_eq!(store.close("file:///a.4gl"), Some(a));
        assert!(store.get(a).is_none());
        let again = store.upsert("file:///a.4gl", 1, String::new());
        assert_ne!(again, a);
        assert_eq!(store.len(), 2);
    }
}
