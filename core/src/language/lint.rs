use std::sync::LazyLock;

use regex::Regex;

use crate::language::utf16_len;
use crate::language::{Diagnostic, DiagnosticSource};
use crate::utils::{Position, Range};

// 行首关键字，忽略大小写，整词匹配
static SELECT: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("SELECT"));
static INSERT: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("INSERT"));
static UPDATE: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("UPDATE"));
static FORM: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("FORM"));
static INPUT: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("INPUT"));
static IF: LazyLock<Regex> = LazyLock::new(|| keyword_at_start("IF"));

static FROM_OR_INTO: LazyLock<Regex> = LazyLock::new(|| word_anywhere("FROM|INTO"));
static VALUES_OR_SELECT: LazyLock<Regex> = LazyLock::new(|| word_anywhere("VALUES|SELECT"));
static SET: LazyLock<Regex> = LazyLock::new(|| word_anywhere("SET"));
static FROM: LazyLock<Regex> = LazyLock::new(|| word_anywhere("FROM"));
static THEN: LazyLock<Regex> = LazyLock::new(|| word_anywhere("THEN"));

static LONE_WHILE: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)^\s*WHILE\s*$"));
static ASSIGNMENT_TARGET: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*="));
static DATE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b([0-9]{4})-([0-9]{2})-([0-9]{2})\b"));
static DEPRECATED_TYPE: LazyLock<Regex> =
    LazyLock::new(|| word_anywhere("MONEY|SMALLFLOAT|BYTE|TEXT"));

/// 不当作变量名的赋值左侧
const NOT_VARIABLES: &[&str] = &["LET", "IF", "WHILE", "FOR", "FUNCTION", "PROCEDURE"];

fn build(pattern: &str) -> Regex {
    // 模式都是编译期常量，这里失败只能是写错了模式
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid lint pattern {pattern:?}: {e}"))
}

fn keyword_at_start(word: &str) -> Regex {
    build(&format!(r"(?i)^\s*{word}\b"))
}

fn word_anywhere(words: &str) -> Regex {
    build(&format!(r"(?i)\b(?:{words})\b"))
}

/// 逐行检查常见问题。这些规则只看单行文本，与解析结果无关。
pub fn lint(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || trimmed.starts_with("--") {
            continue;
        }

        let mut checker = LineChecker {
            line_number: index as u32,
            line,
            diagnostics: &mut diagnostics,
        };
        checker.check_assignments();
        checker.check_sql();
        checker.check_form();
        checker.check_data_types();
        checker.check_control_flow();
    }
    log::trace!("lint produced {} diagnostics", diagnostics.len());
    diagnostics
}

struct LineChecker<'a> {
    line_number: u32,
    line: &'a str,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl LineChecker<'_> {
    /// 整行区间
    fn whole_line(&self) -> Range {
        Range::new(
            Position::new(self.line_number, 0),
            Position::new(self.line_number, utf16_len(self.line)),
        )
    }

    /// 字节区间 [start, end) 转成本行的 UTF-16 区间
    fn span(&self, start: usize, end: usize) -> Range {
        let start_col = utf16_len(&self.line[..start]);
        let end_col = start_col + utf16_len(&self.line[start..end]);
        Range::new(
            Position::new(self.line_number, start_col),
            Position::new(self.line_number, end_col),
        )
    }

    fn check_assignments(&mut self) {
        for caps in ASSIGNMENT_TARGET.captures_iter(self.line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // ==、<=、>=、!= 是比较，不是赋值
            if self.line[whole.end()..].starts_with('=') {
                continue;
            }
            let text = name.as_str();
            if NOT_VARIABLES.iter().any(|k| k.eq_ignore_ascii_case(text)) {
                continue;
            }
            if text.len() == 1 {
                let range = self.span(name.start(), name.end());
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticSource::Semantic,
                    range,
                    format!("Single-character variable '{}' may be unclear", text),
                ));
            }
        }
    }

    fn check_sql(&mut self) {
        let line = self.line;
        if SELECT.is_match(line) && !FROM_OR_INTO.is_match(line) {
            self.line_error(DiagnosticSource::Sql, "SELECT statement missing FROM clause");
        }
        if INSERT.is_match(line) && !VALUES_OR_SELECT.is_match(line) {
            self.line_error(
                DiagnosticSource::Sql,
                "INSERT statement missing VALUES or SELECT clause",
            );
        }
        if UPDATE.is_match(line) && !SET.is_match(line) {
            self.line_error(DiagnosticSource::Sql, "UPDATE statement missing SET clause");
        }
    }

    fn check_form(&mut self) {
        let line = self.line;
        if FORM.is_match(line) && !line.contains('(') {
            self.line_warning(
                DiagnosticSource::Form,
                "FORM statement may be missing field definitions",
            );
        }
        if INPUT.is_match(line) && !FROM.is_match(line) {
            self.line_warning(DiagnosticSource::Form, "INPUT statement may be missing FROM clause");
        }
    }

    fn check_data_types(&mut self) {
        for caps in DATE_LITERAL.captures_iter(self.line) {
            let Some(whole) = caps.get(0) else { continue };
            let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            let valid = match (field(1), field(2), field(3)) {
                (Some(y), Some(m), Some(d)) => is_valid_date(y, m, d),
                _ => false,
            };
            if !valid {
                let range = self.span(whole.start(), whole.end());
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticSource::DataType,
                    range,
                    format!("Invalid date format: {}", whole.as_str()),
                ));
            }
        }

        for found in DEPRECATED_TYPE.find_iter(self.line) {
            let range = self.span(found.start(), found.end());
            self.diagnostics.push(Diagnostic::warning(
                DiagnosticSource::DataType,
                range,
                format!(
                    "Data type '{}' is deprecated, consider using modern alternatives",
                    found.as_str().to_ascii_uppercase()
                ),
            ));
        }
    }

    fn check_control_flow(&mut self) {
        let line = self.line;
        if IF.is_match(line) && !THEN.is_match(line) {
            self.line_error(DiagnosticSource::ControlFlow, "IF statement missing THEN clause");
        }
        if LONE_WHILE.is_match(line) {
            self.line_warning(DiagnosticSource::ControlFlow, "WHILE loop may be missing loop body");
        }
    }

    fn line_error(&mut self, source: DiagnosticSource, message: &str) {
        let range = self.whole_line();
        self.diagnostics.push(Diagnostic::error(source, range, message));
    }

    fn line_warning(&mut self, source: DiagnosticSource, message: &str) {
        let range = self.whole_line();
        self.diagnostics.push(Diagnostic::warning(source, range, message));
    }
}

/// 公历日期校验，含闰年
fn is_valid_date(year: u32, month: u32, day: u32) -> bool {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}
