//! Per-request extraction cache.

use crate::RawPayload;
use std::collections::HashMap;
use talaria_core::KindSlot;

/// Caches successful extractions for the duration of one request.
///
/// Each request location is extracted at most once no matter how many
/// parameters read from it. Failed extractions are not cached, so a
/// later unit reading the same slot retries.
///
/// # Example
///
/// ```rust
/// use talaria_extract::{ExtractCache, RawPayload};
/// use talaria_core::KindSlot;
/// use serde_json::json;
///
/// let mut cache = ExtractCache::new();
/// assert!(cache.get(KindSlot::Query).is_none());
///
/// cache.insert(KindSlot::Query, RawPayload::Json(json!({"page": "2"})));
/// assert!(cache.get(KindSlot::Query).is_some());
/// ```
#[derive(Debug, Default)]
pub struct ExtractCache {
    slots: HashMap<KindSlot, RawPayload>,
}

impl ExtractCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached payload for a slot, if any.
    #[must_use]
    pub fn get(&self, slot: KindSlot) -> Option<&RawPayload> {
        self.slots.get(&slot)
    }

    /// Stores a successfully extracted payload.
    pub fn insert(&mut self, slot: KindSlot, payload: RawPayload) {
        self.slots.insert(slot, payload);
    }

    /// Returns the number of cached slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_round_trip() {
        let mut cache = ExtractCache::new();
        assert!(cache.is_empty());

        cache.insert(KindSlot::Path, RawPayload::Json(json!({"id": "1"})));
        cache.insert(KindSlot::Body, RawPayload::Json(json!({"name": "a"})));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(KindSlot::Path).is_some());
        assert!(cache.get(KindSlot::Header).is_none());
    }
}
