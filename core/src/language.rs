//! 建立在符号表之上的语言服务：诊断、补全、悬停

pub mod builtins;
mod completion;
mod diagnostics;
mod hover;
mod lint;

pub use completion::{CompletionItem, CompletionKind, completions};
pub use diagnostics::{Diagnostic, DiagnosticSource, Severity, collect_diagnostics};
pub use hover::{Hover, hover};
pub use lint::lint;

/// UTF-16 码元长度，行列坐标都按它算
pub(crate) fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}
