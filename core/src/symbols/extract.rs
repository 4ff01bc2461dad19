use crate::ast::*;
use crate::source::DocumentId;
use crate::symbols::{Symbol, SymbolKind};
use crate::utils::Range;

/// 先序遍历：声明本身在前，然后是参数，最后是函数体里的变量。
/// 名字为空的声明 (解析失败留下的) 不产出符号。
pub fn extract(items: &[Item], document: DocumentId) -> Vec<Symbol> {
    let mut collector = Collector {
        document,
        symbols: Vec::new(),
    };
    for item in items {
        collector.visit_item(item);
    }
    log::trace!(
        "extracted {} symbols from document {}",
        collector.symbols.len(),
        document
    );
    collector.symbols
}

struct Collector {
    document: DocumentId,
    symbols: Vec<Symbol>,
}

impl Collector {
    fn push(
        &mut self,
        name: &str,
        kind: SymbolKind,
        data_type: Option<&str>,
        range: Range,
        detail: String,
    ) {
        if name.is_empty() {
            return;
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            data_type: data_type.map(str::to_string),
            range,
            document: self.document,
            detail,
        });
    }

    fn visit_item(&mut self, item: &Item) {
        match item {
            Item::Function(func) => {
                let mut detail = format!("function {}({})", func.name, signature(&func.params));
                if let Some(ret) = &func.return_type {
                    detail.push_str(": ");
                    detail.push_str(ret);
                }
                self.push(
                    &func.name,
                    SymbolKind::Function,
                    func.return_type.as_deref(),
                    func.range,
                    detail,
                );
                self.visit_params(&func.params);
                self.visit_block(&func.body);
            }
            Item::Procedure(procedure) => {
                let detail = format!(
                    "procedure {}({})",
                    procedure.name,
                    signature(&procedure.params)
                );
                self.push(
                    &procedure.name,
                    SymbolKind::Procedure,
                    None,
                    procedure.range,
                    detail,
                );
                self.visit_params(&procedure.params);
                self.visit_block(&procedure.body);
            }
            Item::Statement(stmt) => self.visit_statement(stmt),
        }
    }

    fn visit_params(&mut self, params: &[Param]) {
        for param in params {
            self.push(
                &param.name,
                SymbolKind::Parameter,
                Some(&param.data_type),
                param.range,
                format!("parameter {}: {}", param.name, param.data_type),
            );
        }
    }

    fn visit_block(&mut self, block: &[Statement]) {
        for stmt in block {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match &stmt.data {
            StatementData::Define(vars) => {
                for var in vars {
                    self.push(
                        &var.name,
                        SymbolKind::Variable,
                        Some(&var.data_type),
                        var.range,
                        format!("variable {}: {}", var.name, var.data_type),
                    );
                }
            }
            StatementData::If {
                then_block,
                else_block,
                ..
            } => {
                self.visit_block(then_block);
                self.visit_block(else_block);
            }
            StatementData::While { body, .. } | StatementData::For { body } => {
                self.visit_block(body);
            }
            // 表达式里不会出现声明
            StatementData::Let { .. }
            | StatementData::Call { .. }
            | StatementData::Return(_)
            | StatementData::Sql(_)
            | StatementData::Expression(_) => {}
        }
    }
}

fn signature(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.data_type))
        .collect::<Vec<_>>()
        .join(", ")
}
