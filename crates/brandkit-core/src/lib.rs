//! Core types and trait definitions for the Brandkit onboarding service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod analyzer;
pub mod brain;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod onboarding;
pub mod store;
pub mod user;
pub mod workspace;

pub use error::{Error, Result};
