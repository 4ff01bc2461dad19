use crate::utils::Range;
use core::ops::Deref;

/// 带源码区间的 AST 节点。子节点独占所有权，没有父指针。
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub range: Range,
    pub data: T,
}

impl<T> Node<T> {
    pub fn new(range: Range, data: T) -> Self {
        Self { range, data }
    }
}

impl<T> Deref for Node<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
