mod node;

pub use node::Node;

// --- 顶级结构 ---

/// 顶层既可以是函数/过程定义，也可以是散落在外面的语句 (全局 DEFINE 等)
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDefinition),
    Procedure(ProcedureDefinition),
    Statement(Statement),
}

impl Item {
    pub fn range(&self) -> crate::utils::Range {
        match self {
            Item::Function(f) => f.range,
            Item::Procedure(p) => p.range,
            Item::Statement(s) => s.range,
        }
    }
}

/// FUNCTION name(params) [RETURNING type] ... END
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinitionData {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<String>,
    pub body: Vec<Statement>,
}
pub type FunctionDefinition = Node<FunctionDefinitionData>;

/// PROCEDURE name(params) ... END
/// 过程没有返回类型，类型上就不给这个字段
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDefinitionData {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
}
pub type ProcedureDefinition = Node<ProcedureDefinitionData>;

/// 参数: name TYPE
#[derive(Debug, Clone, PartialEq)]
pub struct ParamData {
    pub name: String,
    pub data_type: String,
}
pub type Param = Node<ParamData>;

/// DEFINE 里的一个变量声明
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarationData {
    pub name: String,
    pub data_type: String,
}
pub type VariableDeclaration = Node<VariableDeclarationData>;

// --- 语句 ---

#[derive(Debug, Clone, PartialEq)]
pub enum StatementData {
    /// DEFINE a INTEGER, b CHAR(20)
    Define(Vec<VariableDeclaration>),
    /// LET name = expr
    Let { variable: String, value: Expression },
    /// IF cond THEN ... [ELSE ...] ENDIF
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        else_block: Vec<Statement>,
    },
    /// WHILE cond ... ENDWHILE
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    /// FOR ... ENDFOR，循环头不解析
    For { body: Vec<Statement> },
    /// CALL name[(args)]
    Call { name: String, args: Vec<Expression> },
    /// RETURN [expr]
    Return(Option<Expression>),
    /// SELECT/INSERT/UPDATE/DELETE，只记录种类和区间
    Sql(SqlKind),
    /// 裸表达式语句
    Expression(Expression),
}
pub type Statement = Node<StatementData>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    Select,
    Insert,
    Update,
    Delete,
}

// --- 表达式 ---

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionData {
    Identifier(String),
    Literal(Literal),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        name: String,
        args: Vec<Expression>,
    },
    /// 解析失败时的占位，错误已经记录在 diagnostics 里
    Error,
}
pub type Expression = Node<ExpressionData>;

/// 字面量保留原始文本 (字符串带引号，数字可能是 1.2.3)
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
        }
    }
}
