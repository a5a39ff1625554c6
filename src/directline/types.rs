//! Wire and registry types for the Direct Line relay.

use serde::{Deserialize, Serialize};

/// A conversation as issued by the relay's conversation-creation endpoint.
///
/// The relay speaks `camelCase` on the wire; missing fields are a
/// deserialization error and surface through the standard failure path.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Opaque conversation identifier issued by the relay.
    pub conversation_id: String,
    /// Bearer credential scoped to this conversation.
    pub token: String,
    /// Out-of-band real-time activity stream URL (stored, never dialed).
    pub stream_url: String,
}

/// Registry value for an active conversation.
///
/// Created when a conversation is started, dropped when it is cleared,
/// immutable in between.
#[derive(Clone, Debug)]
pub struct ConversationRecord {
    /// Opaque conversation identifier issued by the relay.
    pub conversation_id: String,
    /// Bearer credential scoped to this conversation.
    pub token: String,
    /// Out-of-band real-time activity stream URL.
    pub stream_url: String,
}

impl From<&Conversation> for ConversationRecord {
    fn from(conversation: &Conversation) -> Self {
        Self {
            conversation_id: conversation.conversation_id.clone(),
            token: conversation.token.clone(),
            stream_url: conversation.stream_url.clone(),
        }
    }
}

/// The sender identity attached to an outbound activity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelAccount {
    /// Channel account identifier.
    pub id: String,
}

/// A message activity submitted to the relay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    /// Activity type discriminator (`"message"` for user messages).
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Sender identity.
    pub from: ChannelAccount,
    /// Message text.
    pub text: String,
}

impl Activity {
    /// Build a message activity with the fixed `user` sender identity.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            activity_type: "message".to_string(),
            from: ChannelAccount {
                id: "user".to_string(),
            },
            text: text.into(),
        }
    }
}
