use serde::{Deserialize, Serialize};

/// Notifications pushed by the backend over `/ws/{user_id}`.
///
/// Payload fields are carried along for logging only. Clients treat every
/// push as an invalidation signal and re-fetch instead of merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    /// A text message was posted to one of the user's conversations
    NewMessage {
        #[serde(default)]
        conversation_id: Option<String>,
        #[serde(default)]
        translated_for: Option<String>,
        #[serde(default)]
        message: Option<serde_json::Value>,
    },

    /// A file was uploaded to one of the user's conversations
    NewFile {
        #[serde(default)]
        conversation_id: Option<String>,
        #[serde(default)]
        message: Option<serde_json::Value>,
    },

    /// Any other notification type
    #[serde(other)]
    Unknown,
}

impl PushEvent {
    /// Whether this push should invalidate the message and content views.
    pub fn is_refresh(&self) -> bool {
        matches!(self, Self::NewMessage { .. } | Self::NewFile { .. })
    }

    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            Self::NewMessage { conversation_id, .. } | Self::NewFile { conversation_id, .. } => {
                conversation_id.as_deref()
            }
            Self::Unknown => None,
        }
    }
}
