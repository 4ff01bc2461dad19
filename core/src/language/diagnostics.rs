use crate::language::lint;
use crate::parser::{self, ParseError};
use crate::utils::Range;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// 产出诊断的规则族，序列化为固定标签，展示层原样使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticSource {
    #[serde(rename = "4gl-parser")]
    Parser,
    #[serde(rename = "4gl-semantic")]
    Semantic,
    #[serde(rename = "4gl-sql")]
    Sql,
    #[serde(rename = "4gl-form")]
    Form,
    #[serde(rename = "4gl-datatype")]
    DataType,
    #[serde(rename = "4gl-controlflow")]
    ControlFlow,
}

impl DiagnosticSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticSource::Parser => "4gl-parser",
            DiagnosticSource::Semantic => "4gl-semantic",
            DiagnosticSource::Sql => "4gl-sql",
            DiagnosticSource::Form => "4gl-form",
            DiagnosticSource::DataType => "4gl-datatype",
            DiagnosticSource::ControlFlow => "4gl-controlflow",
        }
    }
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub source: DiagnosticSource,
}

impl Diagnostic {
    pub fn error(source: DiagnosticSource, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            range,
            message: message.into(),
            source,
        }
    }

    pub fn warning(source: DiagnosticSource, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            range,
            message: message.into(),
            source,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::error(DiagnosticSource::Parser, err.range, err.message)
    }
}

/// 语法诊断在前，行级规则在后。每次调用都重新解析。
pub fn collect_diagnostics(text: &str) -> Vec<Diagnostic> {
    let output = parser::parse(text);
    let mut diagnostics: Vec<Diagnostic> =
        output.errors.into_iter().map(Diagnostic::from).collect();
    diagnostics.extend(lint(text));
    diagnostics
}
