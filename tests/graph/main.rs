//! Integration tests for Layer 1: Graph
//!
//! Tests the decay graph as built from event stores: ancestry queries,
//! caching, and concurrent first construction.

mod ancestry;
mod caching;
