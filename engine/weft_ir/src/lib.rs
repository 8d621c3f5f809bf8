//! Weft IR - AST types and wire codec for the Weft template engine.
//!
//! A template is an ordered list of statements: bare text interleaved with
//! opcode-tagged nodes. The canonical wire form is a JSON array tree whose
//! first element per node is the integer opcode (see [`Opcode`]); [`json`]
//! converts between that form and the typed [`Node`] tree.
//!
//! Trees are immutable snapshots: optimizer passes rebuild rather than
//! mutate, and convergence is detected with structural equality, so `Node`
//! derives `PartialEq` throughout.
//!
//! The source-text grammar is a boundary collaborator: this crate only
//! defines the [`TemplateParser`] contract and the [`ParseError`] it fails
//! with, plus [`json::JsonAstParser`] for the pre-parsed wire form.

mod node;
mod opcode;
mod parser;

pub mod json;

pub use node::{
    BinaryOp, CallExpr, CallName, ForLoop, IfBranch, MacroDecl, MapEntry, MapKey, Node,
    PathSegment, SelectorBase, UnaryOp,
};
pub use opcode::Opcode;
pub use parser::{ParseError, TemplateParser};
