//! The crate's error surface, in one import spot.
//!
//! Evaluation itself is total and has no error type: template- and
//! data-level mistakes log a warning and continue as undefined values.
//! What can fail is the boundary - parsing the entry template and loading
//! resources - and contract violations assert.

pub use weft_ir::ParseError;

pub use crate::resource::ResourceError;
