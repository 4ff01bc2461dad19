use fourgl::parser::parse;
use fourgl::source::DocumentId;
use fourgl::symbols::{Symbol, SymbolIndex, SymbolKind, extract};
use fourgl::utils::Position;

fn symbols_of(src: &str, document: DocumentId) -> Vec<Symbol> {
    extract(&parse(src).items, document)
}

fn names<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> Vec<&'a str> {
    symbols.into_iter().map(|s| s.name.as_str()).collect()
}

const SCOPES: &str = "DEFINE g INTEGER
FUNCTION f(p CHAR)
  DEFINE v INTEGER
  IF p THEN
    DEFINE inner INTEGER
  ENDIF
END
PROCEDURE q()
  DEFINE w INTEGER
END
DEFINE tail INTEGER";

fn scoped_index() -> (SymbolIndex, DocumentId) {
    let doc = DocumentId::new(0);
    let mut index = SymbolIndex::new();
    index.update(doc, symbols_of(SCOPES, doc));
    (index, doc)
}

#[test]
fn test_preorder_flattening() {
    let doc = DocumentId::new(3);
    let symbols = symbols_of("FUNCTION f(p CHAR)\nDEFINE v INTEGER\nEND", doc);

    let summary: Vec<_> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(
        summary,
        vec![
            ("f", SymbolKind::Function),
            ("p", SymbolKind::Parameter),
            ("v", SymbolKind::Variable),
        ]
    );
    assert!(symbols.iter().all(|s| s.document == doc));
    assert_eq!(symbols[1].data_type.as_deref(), Some("CHAR"));
    assert_eq!(symbols[2].range.start, Position::new(1, 7));
}

#[test]
fn test_details() {
    let symbols = symbols_of(
        "FUNCTION add(a INTEGER, b INTEGER) RETURNING INTEGER\nEND\nPROCEDURE log_it(msg VARCHAR(80))\nEND",
        DocumentId::new(0),
    );
    let details: Vec<_> = symbols.iter().map(|s| s.detail.as_str()).collect();
    assert_eq!(
        details,
        vec![
            "function add(a: INTEGER, b: INTEGER): INTEGER",
            "parameter a: INTEGER",
            "parameter b: INTEGER",
            "procedure log_it(msg: VARCHAR(80))",
            "parameter msg: VARCHAR(80)",
        ]
    );
    assert_eq!(symbols[0].data_type.as_deref(), Some("INTEGER"));
    assert_eq!(symbols[3].data_type, None);
}

#[test]
fn test_extract_is_repeatable() {
    let output = parse(SCOPES);
    let first = extract(&output.items, DocumentId::new(1));
    let second = extract(&output.items, DocumentId::new(1));
    assert_eq!(first, second);
    assert_eq!(
        names(&first),
        vec!["g", "f", "p", "v", "inner", "q", "w", "tail"]
    );
}

#[test]
fn test_empty_names_are_skipped() {
    let symbols = symbols_of("FUNCTION (a INTEGER)\nEND", DocumentId::new(0));
    assert_eq!(names(&symbols), vec!["a"]);
    assert_eq!(symbols[0].kind, SymbolKind::Parameter);
}

#[test]
fn test_update_replaces_whole_table() {
    let doc = DocumentId::new(0);
    let mut index = SymbolIndex::new();
    index.update(doc, symbols_of("DEFINE a INTEGER", doc));
    index.update(doc, symbols_of("DEFINE b INTEGER", doc));
    assert_eq!(names(index.symbols_in_document(doc)), vec!["b"]);

    assert!(index.remove(doc).is_some());
    assert!(index.symbols_in_document(doc).is_empty());
    assert!(index.remove(doc).is_none());
}

#[test]
fn test_find_at() {
    let (index, doc) = scoped_index();

    let hit = index.find_at(doc, Position::new(0, 7)).unwrap();
    assert_eq!(hit.name, "g");
    // 闭区间：名字末尾之后的那一列也算
    let hit = index.find_at(doc, Position::new(0, 16)).unwrap();
    assert_eq!(hit.name, "g");

    // 函数区间覆盖函数体，先存的函数先命中
    let hit = index.find_at(doc, Position::new(2, 9)).unwrap();
    assert_eq!(hit.name, "f");
    assert_eq!(hit.kind, SymbolKind::Function);

    assert!(index.find_at(doc, Position::new(0, 2)).is_none());
    assert!(index.find_at(doc, Position::new(11, 0)).is_none());
    assert!(index.find_at(DocumentId::new(9), Position::new(0, 7)).is_none());
}

#[test]
fn test_find_by_name_across_documents() {
    let mut index = SymbolIndex::new();
    for n in 0..2 {
        let doc = DocumentId::new(n);
        index.update(doc, symbols_of("FUNCTION helper()\nDEFINE x INTEGER\nEND", doc));
    }

    let found = index.find_by_name("helper", None);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].document, DocumentId::new(0));
    assert_eq!(found[1].document, DocumentId::new(1));

    assert_eq!(index.find_by_name("helper", Some(SymbolKind::Function)).len(), 2);
    assert!(index.find_by_name("helper", Some(SymbolKind::Variable)).is_empty());
    assert_eq!(index.find_by_name("x", Some(SymbolKind::Variable)).len(), 2);
    // 区分大小写
    assert!(index.find_by_name("Helper", None).is_empty());

    assert_eq!(names(index.functions()), vec!["helper", "helper"]);
    assert_eq!(index.procedures().count(), 0);
    assert_eq!(index.all_symbols().count(), 4);
}

#[test]
fn test_variables_in_scope() {
    let (index, doc) = scoped_index();

    // 函数体里：参数和函数内部 (含嵌套块) 的变量
    let vars = index.variables_in_scope(doc, Position::new(2, 5));
    assert_eq!(names(vars), vec!["p", "v", "inner"]);

    let vars = index.variables_in_scope(doc, Position::new(8, 4));
    assert_eq!(names(vars), vec!["w"]);

    // 不在任何函数/过程里：只有顶层变量
    let vars = index.variables_in_scope(doc, Position::new(0, 2));
    assert_eq!(names(vars), vec!["g", "tail"]);
    let vars = index.variables_in_scope(doc, Position::new(10, 2));
    assert_eq!(names(vars), vec!["g", "tail"]);
}

#[test]
fn test_symbol_serializes_without_document() {
    let symbols = symbols_of("DEFINE total DECIMAL(10,2)", DocumentId::new(4));
    let json = serde_json::to_value(&symbols[0]).unwrap();
    assert_eq!(json["name"], "total");
    assert_eq!(json["kind"], "variable");
    assert_eq!(json["data_type"], "DECIMAL(10,2)");
    assert_eq!(json["range"]["start"]["character"], 7);
    assert!(json.get("document").is_none());
}
