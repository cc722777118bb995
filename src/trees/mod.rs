//! Succinct tree representations.
//!
//! - [`BalancedParens`] - a bitvector viewed as a balanced parenthesis
//!   string, with excess-based search primitives.
//! - [`Navigator`] / [`Node`] - full ordinal-tree navigation on top of the
//!   encoding.

mod bp;
mod navigator;

pub use bp::BalancedParens;
pub use navigator::{Children, Navigator, Node, Nodes};
