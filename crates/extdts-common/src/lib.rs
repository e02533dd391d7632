//! Common types and utilities for the extdts declaration compiler.
//!
//! This crate provides the pieces every stage of the pipeline shares:
//! - The error taxonomy (`ParseError`, `FeatureError`, `RenderError`, `CompileError`)
//! - Compiler limits and thresholds
//! - Reserved-name escaping used symmetrically by the parser and renderer

// Error taxonomy - every failure in the core is fatal
pub mod diagnostics;
pub use diagnostics::{CompileError, FeatureError, ParseError, RenderError};

// Centralized limits and thresholds
pub mod limits;

// Reserved word and identifier escaping
pub mod naming;

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod naming_tests;
