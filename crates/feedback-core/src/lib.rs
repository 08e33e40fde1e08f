//! Core types and trait definitions for the translation feedback store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod ranking;
pub mod seed;
pub mod store;
pub mod target;
pub mod translation;
pub mod validate;

pub use error::{Error, Result, ValidationError};

/// Row id of a [`target::Target`].
pub type TargetId = i64;

/// Row id of a [`translation::Translation`].
pub type TranslationId = i64;

/// Identifier shared by every ranking row of one evaluation pass.
pub type EvalId = i64;
