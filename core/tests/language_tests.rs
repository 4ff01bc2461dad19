use fourgl::Workspace;
use fourgl::language::builtins::BUILTIN_FUNCTIONS;
use fourgl::language::{
    CompletionKind, Diagnostic, DiagnosticSource, Severity, collect_diagnostics, lint,
};
use fourgl::token::TokenKind;
use fourgl::utils::{Position, Range};

fn range(line: u32, start: u32, end: u32) -> Range {
    Range::new(Position::new(line, start), Position::new(line, end))
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

// ==========================================
// Lint
// ==========================================

#[test]
fn test_single_character_variable() {
    let diagnostics = lint("LET x = 1");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].source, DiagnosticSource::Semantic);
    assert_eq!(diagnostics[0].range, range(0, 4, 5));
    assert_eq!(
        diagnostics[0].message,
        "Single-character variable 'x' may be unclear"
    );

    // 比较运算不是赋值
    assert!(lint("IF x == 1 THEN").is_empty());
    assert!(lint("LET total = 1").is_empty());
}

#[test]
fn test_sql_rules() {
    let diagnostics = lint("SELECT name\nSELECT a INTO b FROM t\nINSERT INTO t\nUPDATE t");
    assert_eq!(
        messages(&diagnostics),
        vec![
            "SELECT statement missing FROM clause",
            "INSERT statement missing VALUES or SELECT clause",
            "UPDATE statement missing SET clause",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.source == DiagnosticSource::Sql));
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
    // 整行
    assert_eq!(diagnostics[0].range, range(0, 0, 11));
    assert_eq!(diagnostics[2].range.start.line, 3);

    // 关键字不在行首时不检查
    assert!(lint("LET sql = 'select name'").is_empty());
}

#[test]
fn test_form_rules() {
    let diagnostics = lint("FORM f\nFORM g (a, b)\nINPUT name\nINPUT name FROM f");
    assert_eq!(
        messages(&diagnostics),
        vec![
            "FORM statement may be missing field definitions",
            "INPUT statement may be missing FROM clause",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.source == DiagnosticSource::Form));
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_date_literals() {
    let diagnostics = lint("LET due = '2023-02-30'");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].source, DiagnosticSource::DataType);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].message, "Invalid date format: 2023-02-30");
    assert_eq!(diagnostics[0].range, range(0, 11, 21));

    assert!(lint("LET due = '2024-02-29'").is_empty());
}

#[test]
fn test_deprecated_types() {
    let diagnostics = lint("DEFINE amount money");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].range, range(0, 14, 19));
    assert_eq!(
        diagnostics[0].message,
        "Data type 'MONEY' is deprecated, consider using modern alternatives"
    );

    // 整词匹配
    assert!(lint("DEFINE context VARCHAR(10)").is_empty());
}

#[test]
fn test_control_flow_rules() {
    let diagnostics = lint("IF a > 1\n  WHILE  \nWHILE a > 1");
    assert_eq!(
        messages(&diagnostics),
        vec![
            "IF statement missing THEN clause",
            "WHILE loop may be missing loop body",
        ]
    );
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[1].severity, Severity::Warning);
    assert_eq!(diagnostics[1].range.start.line, 1);
    assert!(
        diagnostics
            .iter()
            .all(|d| d.source == DiagnosticSource::ControlFlow)
    );
}

#[test]
fn test_comment_lines_are_skipped() {
    assert!(lint("# SELECT x\n  -- IF a\n# LET y = 1").is_empty());
}

// ==========================================
// Diagnostics
// ==========================================

#[test]
fn test_parser_errors_come_first() {
    let text = "IF a > 1\nLET y = 2\n";
    let all = collect_diagnostics(text);
    let lints = lint(text);
    assert!(!lints.is_empty());

    let split = all.len() - lints.len();
    assert!(split > 0);
    assert!(all[..split].iter().all(|d| d.source == DiagnosticSource::Parser));
    assert!(all[..split].iter().all(|d| d.severity == Severity::Error));
    assert_eq!(&all[split..], lints.as_slice());
    assert_eq!(all[0].message, "Expected 'THEN' after condition");
}

#[test]
fn test_diagnostic_serialized_shape() {
    let diagnostics = lint("SELECT name");
    let json = serde_json::to_value(&diagnostics[0]).unwrap();
    assert_eq!(json["source"], "4gl-sql");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["message"], "SELECT statement missing FROM clause");
    assert_eq!(json["range"]["end"]["character"], 11);
    assert_eq!(DiagnosticSource::ControlFlow.to_string(), "4gl-controlflow");
}

// ==========================================
// Completion
// ==========================================

const PROGRAM: &str = "FUNCTION compute(a INTEGER) RETURNING INTEGER
  DEFINE total INTEGER
  LET total = to
END
PROCEDURE show_it()
END
";

fn workspace_with(uri: &str, text: &str) -> Workspace {
    let mut workspace = Workspace::new();
    workspace.on_document_changed(uri, 1, text.to_string());
    workspace
}

#[test]
fn test_completion_filters_by_prefix() {
    let workspace = workspace_with("file:///a.4gl", PROGRAM);
    let items = workspace.completions("file:///a.4gl", Position::new(2, 16));

    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["total", "TODAY"]);

    assert_eq!(items[0].kind, CompletionKind::Variable);
    assert_eq!(items[0].detail.as_deref(), Some("variable total: INTEGER"));
    assert_eq!(items[0].sort_key.as_deref(), Some("2_total"));
    assert!(!items[0].is_snippet);

    assert_eq!(items[1].kind, CompletionKind::Function);
    assert_eq!(items[1].insert_text, "TODAY($1)");
    assert!(items[1].is_snippet);
    assert_eq!(
        items[1].documentation.as_deref(),
        Some("Returns the current system date")
    );
}

#[test]
fn test_completion_mid_word_uses_text_before_cursor() {
    let text = PROGRAM.replace("= to\n", "= totem\n");
    let workspace = workspace_with("file:///a.4gl", &text);

    // tot|em
    let items = workspace.completions("file:///a.4gl", Position::new(2, 17));
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["total"]);

    // LET to|tal
    let items = workspace.completions("file:///a.4gl", Position::new(2, 8));
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["total", "TODAY"]);
}

#[test]
fn test_completion_groups_without_prefix() {
    let workspace = workspace_with("file:///a.4gl", PROGRAM);
    let items = workspace.completions("file:///a.4gl", Position::new(6, 0));

    assert_eq!(
        items.len(),
        2 + TokenKind::KEYWORDS.len() + BUILTIN_FUNCTIONS.len()
    );
    assert_eq!(items[0].label, "compute");
    assert_eq!(items[0].insert_text, "compute($1)");
    assert_eq!(
        items[0].detail.as_deref(),
        Some("function compute(a: INTEGER): INTEGER")
    );
    assert_eq!(items[1].label, "show_it");
    assert_eq!(items[1].kind, CompletionKind::Procedure);
    assert_eq!(items[2].kind, CompletionKind::Keyword);
    // 顶层位置看不到函数内部的变量
    assert!(items.iter().all(|i| i.kind != CompletionKind::Variable));

    let sort_keys: Vec<_> = items.iter().filter_map(|i| i.sort_key.clone()).collect();
    assert_eq!(sort_keys.len(), items.len());
    assert!(sort_keys[0].starts_with("0_") && sort_keys[1].starts_with("1_"));
    assert!(sort_keys.last().unwrap().starts_with("4_"));
}

#[test]
fn test_sql_context_keywords() {
    let workspace = workspace_with("file:///q.4gl", "SELECT a FROM t j\nLET k = j");

    let items = workspace.completions("file:///q.4gl", Position::new(0, 17));
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["JOIN"]);
    assert_eq!(items[0].detail.as_deref(), Some("SQL Keyword"));

    // 非 SQL 行不追加
    let items = workspace.completions("file:///q.4gl", Position::new(1, 9));
    assert!(items.iter().all(|i| i.label != "JOIN"));
}

#[test]
fn test_completion_for_unknown_document() {
    let workspace = Workspace::new();
    assert!(
        workspace
            .completions("file:///missing.4gl", Position::new(0, 0))
            .is_empty()
    );
}

// ==========================================
// Hover
// ==========================================

const HOVER: &str = "DEFINE counter INTEGER
FUNCTION calc(x INTEGER) RETURNING INTEGER
  RETURN UPPER(x)
END
CALL calc(1)
CALL unknown_thing(123)";

fn hover_text(workspace: &Workspace, line: u32, character: u32) -> Option<String> {
    workspace
        .hover("file:///h.4gl", Position::new(line, character))
        .map(|h| h.contents)
}

#[test]
fn test_hover_builtin_and_keyword() {
    let workspace = workspace_with("file:///h.4gl", HOVER);

    assert_eq!(
        hover_text(&workspace, 2, 10).unwrap(),
        "**UPPER** (Built-in Function)\n\n**Returns:** VARCHAR\n\n**Syntax:** `UPPER(string)`\n\nConverts string to uppercase"
    );
    assert_eq!(
        hover_text(&workspace, 2, 3).unwrap(),
        "**RETURN** (Keyword)\n\nReturns a value from a function or exits a procedure"
    );
}

#[test]
fn test_hover_symbols() {
    let workspace = workspace_with("file:///h.4gl", HOVER);

    assert_eq!(
        hover_text(&workspace, 0, 9).unwrap(),
        "**counter** (variable)\n\n**Type:** INTEGER\n\nvariable counter: INTEGER\n\n*Local variable*"
    );

    // 调用处不在任何符号区间里，按名字找
    assert_eq!(
        hover_text(&workspace, 4, 6).unwrap(),
        "**calc** (function)\n\n**Type:** INTEGER"
    );
}

#[test]
fn test_hover_fallbacks() {
    let workspace = workspace_with("file:///h.4gl", HOVER);

    let text = hover_text(&workspace, 5, 7).unwrap();
    assert!(text.starts_with("**unknown_thing**\n\n*Identifier not found in current scope*"));
    assert!(text.ends_with("- A typo in the identifier name"));

    // 数字、空白
    assert_eq!(hover_text(&workspace, 5, 20), None);
    assert_eq!(hover_text(&workspace, 2, 1), None);
}

// ==========================================
// Workspace
// ==========================================

#[test]
fn test_workspace_lifecycle() {
    let mut workspace = Workspace::new();
    let id = workspace.on_document_changed("file:///w.4gl", 1, "DEFINE a INTEGER".to_string());
    assert_eq!(workspace.index.symbols_in_document(id).len(), 1);

    // 同一 URI 更新保持编号，符号表整体替换
    let again = workspace.on_document_changed(
        "file:///w.4gl",
        2,
        "DEFINE b INTEGER\nDEFINE c INTEGER".to_string(),
    );
    assert_eq!(again, id);
    assert_eq!(workspace.index.symbols_in_document(id).len(), 2);
    assert_eq!(workspace.documents[id].version, 2);
    assert_eq!(workspace.open_uris(), vec!["file:///w.4gl".to_string()]);

    assert_eq!(workspace.diagnostics("file:///w.4gl").len(), 0);

    assert_eq!(workspace.on_document_closed("file:///w.4gl"), Some(id));
    assert!(workspace.index.symbols_in_document(id).is_empty());
    assert!(workspace.diagnostics("file:///w.4gl").is_empty());
    assert!(workspace.hover("file:///w.4gl", Position::new(0, 7)).is_none());
    assert_eq!(workspace.on_document_closed("file:///w.4gl"), None);

    // 重新打开拿到新编号
    let reopened = workspace.on_document_changed("file:///w.4gl", 1, "SELECT x".to_string());
    assert_ne!(reopened, id);
    let diagnostics = workspace.diagnostics("file:///w.4gl");
    assert_eq!(
        messages(&diagnostics),
        vec!["SELECT statement missing FROM clause"]
    );
}
