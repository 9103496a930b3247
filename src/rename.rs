//! Rule-driven batch renaming.
//!
//! Names are always re-derived from each item's immutable original base name, so changing a
//! rule never compounds with an earlier result.

pub(crate) mod pipeline;
pub(crate) mod rules;
