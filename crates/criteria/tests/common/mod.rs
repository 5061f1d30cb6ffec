//! Test infrastructure for the criteria compiler.
//!
//! Shared resolvers, compilers and assertion helpers used across the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
