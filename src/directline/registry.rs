//! In-memory registry of active conversations.

use dashmap::DashMap;

use crate::directline::types::ConversationRecord;

/// Process-wide map of active conversations.
///
/// Populated when a conversation is started, emptied when it is cleared;
/// lifetime equals process lifetime (no persistence). Message sending and
/// activity polling act on caller-supplied identifiers and never consult
/// this registry.
pub struct ConversationRegistry {
    records: DashMap<String, ConversationRecord>,
}

impl ConversationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Insert a record keyed by its conversation id.
    pub fn insert(&self, record: ConversationRecord) {
        self.records.insert(record.conversation_id.clone(), record);
    }

    /// Remove the record for a conversation.
    ///
    /// Returns `false` when the conversation was not registered; a missing
    /// entry is a no-op, never an error.
    #[must_use]
    pub fn remove(&self, conversation_id: &str) -> bool {
        self.records.remove(conversation_id).is_some()
    }

    /// Look up the record for a conversation.
    #[must_use]
    pub fn get(&self, conversation_id: &str) -> Option<ConversationRecord> {
        self.records
            .get(conversation_id)
            .map(|record| record.value().clone())
    }

    /// Check whether a conversation is registered.
    #[must_use]
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.records.contains_key(conversation_id)
    }

    /// Number of active conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ConversationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
