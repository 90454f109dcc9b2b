// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ZERO_NODE_ID_VALUE: u64 = 0;

static LAST_NODE_ID_VALUE: AtomicU64 = AtomicU64::new(ZERO_NODE_ID_VALUE);

/// Stable node identifier.
///
/// Generated once when a node is created and never reassigned. Identifiers
/// are unique across all in-memory nodes within a single process, even
/// across multiple trees.
///
/// Ids survive persistence: they serialize as plain integers, and
/// deserializing a tree advances the process-wide counter past the largest
/// loaded id so that freshly generated ids never collide with ids restored
/// from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Generate a new, unique identifier.
    ///
    /// Only the first [`u64::MAX`] identifiers are guaranteed to be unique.
    ///
    /// ```
    /// # use im_ordtree::NodeId;
    /// let foo_id = NodeId::new();
    /// let bar_id = NodeId::new();
    /// assert_ne!(foo_id, bar_id);
    /// ```
    #[allow(clippy::new_without_default)] // Prevent unintended generation of new identifiers
    pub fn new() -> Self {
        loop {
            // No memory ordering guarantees when invoking this function.
            // We only need to ensure that the next value is unique.
            let last_value = LAST_NODE_ID_VALUE.fetch_add(1, Ordering::Relaxed);
            // fetch_add() performs a wrapping add, so we need to do the same
            let next_value = last_value.wrapping_add(1);
            if let Some(next_value) = NonZeroU64::new(next_value) {
                return Self(next_value);
            }
            // Looping happens only on overflow and at most once during each call.
        }
    }

    /// Restore an identifier from its persisted integer value.
    ///
    /// Returns `None` for the reserved zero value. Advances the id counter
    /// so subsequently generated ids remain unique.
    pub(crate) fn from_persisted(value: u64) -> Option<Self> {
        let id = NonZeroU64::new(value)?;
        LAST_NODE_ID_VALUE.fetch_max(value, Ordering::Relaxed);
        Some(Self(id))
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0.get())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Self::from_persisted(value)
            .ok_or_else(|| serde::de::Error::custom("node id must be a positive integer"))
    }
}
