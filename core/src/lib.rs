// core/src/lib.rs

pub mod ast;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod symbols;
pub mod token;
pub mod utils;

pub mod workspace;
pub use workspace::Workspace;
