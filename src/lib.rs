//! edmview - Columnar HEP event records with navigable entity views
//!
//! This crate re-exports all layers of the edmview system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: edmview_matching   - Cross-event particle matching
//! Layer 2: edmview_storage    - Columnar event store, relationship resolution, entity views
//! Layer 1: edmview_graph      - Decay graph, ancestor/descendant queries
//! Layer 0: edmview_foundation - Core types (row ids, link ranges, Error, config)
//! ```

pub use edmview_foundation as foundation;
pub use edmview_graph as graph;
pub use edmview_matching as matching;
pub use edmview_storage as storage;
