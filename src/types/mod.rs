//! Strongly-typed domain types for safer APIs.
//!
//! Newtyped indices keep the two axes of the store apart at compile time:
//! a `StackIndex` names a column, a `LayerIndex` names a row. Both are
//! `#[repr(transparent)]` over `usize`, so the safety is free.

mod indices;

pub use indices::{LayerIndex, StackIndex};
