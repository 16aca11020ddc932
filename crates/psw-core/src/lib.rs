//! # psw-core
//!
//! Core types, traits, and utilities for the PSW budgeting wizard.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases and the service result pattern
//! - Core traits (Identifiable, Entity, Patch)
//! - Identifier helpers
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
