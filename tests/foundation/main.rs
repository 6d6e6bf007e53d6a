//! Integration tests for Layer 0: Foundation
//!
//! Tests for row ids, link ranges, errors, and detector configuration.

mod config;
mod errors;
