//! core 类型与协议类型之间的转换

use fourgl::language::{CompletionItem, CompletionKind, Diagnostic, Hover, Severity};
use fourgl::utils::{Position, Range};
use lsp_types as lsp;

pub fn position(pos: Position) -> lsp::Position {
    lsp::Position::new(pos.line, pos.character)
}

pub fn from_position(pos: lsp::Position) -> Position {
    Position::new(pos.line, pos.character)
}

pub fn range(range: Range) -> lsp::Range {
    lsp::Range::new(position(range.start), position(range.end))
}

pub fn diagnostic(diag: Diagnostic) -> lsp::Diagnostic {
    lsp::Diagnostic {
        range: range(diag.range),
        severity: Some(match diag.severity {
            Severity::Error => lsp::DiagnosticSeverity::ERROR,
            Severity::Warning => lsp::DiagnosticSeverity::WARNING,
        }),
        source: Some(diag.source.as_str().to_string()),
        message: diag.message,
        ..Default::default()
    }
}

pub fn completion_item(item: CompletionItem) -> lsp::CompletionItem {
    lsp::CompletionItem {
        kind: Some(match item.kind {
            CompletionKind::Function => lsp::CompletionItemKind::FUNCTION,
            CompletionKind::Procedure => lsp::CompletionItemKind::METHOD,
            CompletionKind::Variable => lsp::CompletionItemKind::VARIABLE,
            CompletionKind::Keyword => lsp::CompletionItemKind::KEYWORD,
        }),
        detail: item.detail,
        documentation: item.documentation.map(lsp::Documentation::String),
        insert_text: Some(item.insert_text),
        insert_text_format: Some(if item.is_snippet {
            lsp::InsertTextFormat::SNIPPET
        } else {
            lsp::InsertTextFormat::PLAIN_TEXT
        }),
        sort_text: item.sort_key,
        label: item.label,
        ..Default::default()
    }
}

pub fn hover(hover: Hover) -> lsp::Hover {
    lsp::Hover {
        contents: lsp::HoverContents::Markup(lsp::MarkupContent {
            kind: lsp::MarkupKind::Markdown,
            value: hover.contents,
        }),
        range: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourgl::language::DiagnosticSource;

    #[test]
    fn diagnostic_keeps_source_tag() {
        let core = Diagnostic::warning(
            DiagnosticSource::DataType,
            Range::new(Position::new(2, 4), Position::new(2, 9)),
            "Data type 'MONEY' is deprecated, consider using modern alternatives",
        );
        let converted = diagnostic(core);
        assert_eq!(converted.severity, Some(lsp::DiagnosticSeverity::WARNING));
        assert_eq!(converted.source.as_deref(), Some("4gl-datatype"));
        assert_eq!(converted.range.start, lsp::Position::new(2, 4));
        assert_eq!(converted.range.end, lsp::Position::new(2, 9));
    }

    #[test]
    fn snippet_completion() {
        let item = CompletionItem {
            label: "compute".to_string(),
            kind: CompletionKind::Function,
            detail: Some("function compute(a: INTEGER): INTEGER".to_string()),
            documentation: None,
            insert_text: "compute($1)".to_string(),
            is_snippet: true,
            sort_key: Some("0_compute".to_string()),
        };
        let converted = completion_item(item);
        assert_eq!(converted.label, "compute");
        assert_eq!(converted.kind, Some(lsp::CompletionItemKind::FUNCTION));
        assert_eq!(converted.insert_text_format, Some(lsp::InsertTextFormat::SNIPPET));
        assert_eq!(converted.sort_text.as_deref(), Some("0_compute"));
    }

    #[test]
    fn positions_round_trip() {
        let pos = Position::new(7, 3);
        assert_eq!(from_position(position(pos)), pos);
    }
}
