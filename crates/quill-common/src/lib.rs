//! Common utilities for the Quill engine.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod warning;
