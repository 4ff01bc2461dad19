//! 内置函数和关键字说明。静态只读表，进程内共享。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub return_type: &'static str,
    pub description: &'static str,
    pub syntax: &'static str,
}

macro_rules! builtins {
    ($($name:literal => $ret:literal, $syntax:literal, $desc:literal;)*) => {
        pub const BUILTIN_FUNCTIONS: &[BuiltinFunction] = &[
            $(BuiltinFunction {
                name: $name,
                return_type: $ret,
                description: $desc,
                syntax: $syntax,
            }),*
        ];
    };
}

builtins! {
    "TODAY"  => "DATE",     "TODAY()",                       "Returns the current system date";
    "NOW"    => "DATETIME", "NOW()",                         "Returns the current system date and time";
    "LENGTH" => "INTEGER",  "LENGTH(string)",                "Returns the length of a string";
    "SUBSTR" => "VARCHAR",  "SUBSTR(string, start, length)", "Returns a substring from a string";
    "UPPER"  => "VARCHAR",  "UPPER(string)",                 "Converts string to uppercase";
    "LOWER"  => "VARCHAR",  "LOWER(string)",                 "Converts string to lowercase";
    "TRIM"   => "VARCHAR",  "TRIM(string)",                  "Removes leading and trailing spaces";
    "ABS"    => "DECIMAL",  "ABS(number)",                   "Returns the absolute value of a number";
    "ROUND"  => "DECIMAL",  "ROUND(number, places)",         "Rounds a number to specified decimal places";
    "FLOOR"  => "INTEGER",  "FLOOR(number)",                 "Returns the largest integer less than or equal to the number";
    "CEIL"   => "INTEGER",  "CEIL(number)",                  "Returns the smallest integer greater than or equal to the number";
    "ISNULL" => "INTEGER",  "ISNULL(value)",                 "Returns 1 if the value is null, 0 otherwise";
    "NVL"    => "VARCHAR",  "NVL(value, alternative)",       "Returns alternative value if the first value is null";
}

/// 关键字 => 说明
pub const KEYWORD_DOCS: &[(&str, &str)] = &[
    // --- 声明 ---
    ("FUNCTION", "Defines a user-defined function that returns a value"),
    ("PROCEDURE", "Defines a user-defined procedure that performs actions"),
    ("DEFINE", "Declares variables with their data types"),
    ("LET", "Assigns a value to a variable"),
    // --- 控制流 ---
    ("IF", "Conditional statement for branching logic"),
    ("THEN", "Used with IF statements to specify the condition block"),
    ("ELSE", "Specifies alternative block for IF statements"),
    ("ENDIF", "Closes an IF statement block"),
    ("WHILE", "Creates a loop that continues while condition is true"),
    ("ENDWHILE", "Closes a WHILE loop block"),
    ("FOR", "Creates a counting loop or iteration"),
    ("ENDFOR", "Closes a FOR loop block"),
    ("RETURN", "Returns a value from a function or exits a procedure"),
    ("CALL", "Invokes a function or procedure"),
    // --- SQL ---
    ("SELECT", "SQL statement to query data from tables"),
    ("INSERT", "SQL statement to add new rows to a table"),
    ("UPDATE", "SQL statement to modify existing rows in a table"),
    ("DELETE", "SQL statement to remove rows from a table"),
    ("WHERE", "SQL clause to specify conditions for filtering"),
    ("FROM", "SQL clause to specify source tables"),
    ("INTO", "SQL clause to specify target for INSERT or SELECT"),
    ("VALUES", "SQL clause to specify values for INSERT"),
    // --- 数据类型 ---
    ("INTEGER", "Whole number data type (-2,147,483,648 to 2,147,483,647)"),
    ("DECIMAL", "Fixed-point decimal number data type"),
    ("CHAR", "Fixed-length character string data type"),
    ("VARCHAR", "Variable-length character string data type"),
    ("DATE", "Date data type (YYYY-MM-DD format)"),
    ("DATETIME", "Date and time data type"),
    // --- 逻辑 ---
    ("AND", "Logical AND operator"),
    ("OR", "Logical OR operator"),
    ("NOT", "Logical NOT operator"),
];

/// SQL 上下文里额外补全的关键字
pub const SQL_CONTEXT_KEYWORDS: &[&str] = &["JOIN", "INNER", "LEFT", "RIGHT", "OUTER"];

/// FORM 上下文里额外补全的关键字
pub const FORM_CONTEXT_KEYWORDS: &[&str] =
    &["INPUT", "DISPLAY", "CONSTRUCT", "MENU", "PROMPT", "MESSAGE"];

/// 忽略大小写
pub fn builtin_function(name: &str) -> Option<&'static BuiltinFunction> {
    BUILTIN_FUNCTIONS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
}

/// 忽略大小写
pub fn keyword_doc(word: &str) -> Option<&'static str> {
    KEYWORD_DOCS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(word))
        .map(|&(_, doc)| doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn lookups_ignore_case() {
        assert_eq!(builtin_function("substr").map(|f| f.return_type), Some("VARCHAR"));
        assert!(builtin_function("SUBSTRING").is_none());
        assert_eq!(keyword_doc("endif"), Some("Closes an IF statement block"));
    }

    #[test]
    fn documented_keywords_are_lexer_keywords() {
        for (keyword, _) in KEYWORD_DOCS {
            assert!(
                TokenKind::lookup_keyword(keyword).is_some(),
                "{keyword} is documented but not lexed as a keyword"
            );
        }
    }
}
