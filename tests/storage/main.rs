//! Integration tests for Layer 2: Storage
//!
//! Tests for the event store, range-linked resolution, and entity views.

mod fixtures;
mod resolution;
mod views;
