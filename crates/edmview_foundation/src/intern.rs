//! Interning for detector labels.
//!
//! Hit tables carry a detector label per row. Labels repeat heavily, so each
//! distinct name is stored once and rows hold a small [`DetectorLabel`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned detector label identifier.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DetectorLabel(pub(crate) u32);

impl DetectorLabel {
    /// Returns the raw index of this label.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DetectorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DetectorLabel({})", self.0)
    }
}

/// Interner mapping detector names to [`DetectorLabel`]s and back.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Labels {
    names: Vec<Arc<str>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<Arc<str>, DetectorLabel>,
}

impl Labels {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a detector name, returning its label.
    pub fn intern(&mut self, name: &str) -> DetectorLabel {
        if let Some(label) = self.get(name) {
            if !self.index.contains_key(name) {
                self.index.insert(Arc::clone(&self.names[label.0 as usize]), label);
            }
            return label;
        }
        let label =
            DetectorLabel(u32::try_from(self.names.len()).expect("too many detector labels"));
        let arc: Arc<str> = name.into();
        self.names.push(arc.clone());
        self.index.insert(arc, label);
        label
    }

    /// Looks up a previously interned name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<DetectorLabel> {
        self.index
            .get(name)
            .copied()
            .or_else(|| {
                // The reverse map is not serialized; fall back to a scan after deserialization.
                self.names
                    .iter()
                    .position(|n| n.as_ref() == name)
                    .and_then(|i| u32::try_from(i).ok())
                    .map(DetectorLabel)
            })
    }

    /// Resolves a label back to its name.
    #[must_use]
    pub fn resolve(&self, label: DetectorLabel) -> Option<&str> {
        self.names.get(label.0 as usize).map(AsRef::as_ref)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no label has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
