//! Integration tests for Layer 3: Matching
//!
//! Tests cross-event matching between independently assembled stores.
