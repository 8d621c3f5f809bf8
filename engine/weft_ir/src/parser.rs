//! The source-parser boundary contract.
//!
//! The grammar that turns template source text into the tagged tree is an
//! external collaborator. The engine only depends on this trait; the one
//! parser shipped in-tree is [`crate::json::JsonAstParser`] for the
//! pre-parsed wire form.

use crate::Node;

/// Syntax failure from a [`TemplateParser`].
///
/// Fatal only for the top-level parse of the entry template; parse failures
/// of imported or included resources are caught at the call site and
/// degrade to an undefined value.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("syntax error at line {line}: expected {expected}, found {found}")]
pub struct ParseError {
    pub line: u32,
    pub expected: String,
    pub found: String,
}

/// Turns template source text into a statement list.
pub trait TemplateParser {
    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError>;
}
