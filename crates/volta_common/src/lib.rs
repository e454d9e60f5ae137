//! Shared foundational types used across the Volta HDL compiler.
//!
//! This crate provides the value types every later stage agrees on:
//! four-state logic scalars, packed logic vectors, and the common result
//! type for fallible internal operations.

#![warn(missing_docs)]

pub mod logic;
pub mod logic_vec;
pub mod result;

pub use logic::Logic;
pub use logic_vec::LogicVec;
pub use result::{InternalError, VoltaResult};
