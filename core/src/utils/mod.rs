mod position;
mod span;

pub use position::{Position, Range};
pub use span::Span;
