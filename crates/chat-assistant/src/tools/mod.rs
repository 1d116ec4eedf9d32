//! A set of built-in tools that models can use.

mod knowledge_base;

pub use knowledge_base::{Entry as KnowledgeBaseEntry, KnowledgeBase};
