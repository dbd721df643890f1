use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Messaging network a contact, group, channel or conversation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Whatsapp,
    Telegram,
    Whatgram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Whatsapp, Platform::Telegram, Platform::Whatgram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Telegram => "telegram",
            Self::Whatgram => "whatgram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(Self::Whatsapp),
            "telegram" => Ok(Self::Telegram),
            "whatgram" => Ok(Self::Whatgram),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// Which entity list a content fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Contacts,
    Groups,
    Channels,
}

impl ContentKind {
    /// REST collection name, also the locale key of the tab label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Groups => "groups",
            Self::Channels => "channels",
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contacts" | "contact" => Ok(Self::Contacts),
            "groups" | "group" => Ok(Self::Groups),
            "channels" | "channel" => Ok(Self::Channels),
            other => Err(format!("unknown content kind '{}'", other)),
        }
    }
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_true() -> bool {
    true
}

/// The authenticated account as returned by `/auth/verify-code`.
///
/// This record is also what gets persisted for session restore, so every
/// field the backend may omit carries a serde default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub phone: String,
    #[serde(default = "default_language")]
    pub interface_language: String,
    #[serde(default = "default_language")]
    pub preferred_language: String,
    #[serde(default = "default_true")]
    pub auto_translate: bool,
    #[serde(default)]
    pub whatsapp_connected: bool,
    #[serde(default)]
    pub telegram_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub platform: Platform,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, with = "timestamp::option")]
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub invite_link: Option<String>,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub admin_ids: Vec<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub subscriber_count: u32,
    #[serde(default)]
    pub can_subscribers_message: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub invite_link: Option<String>,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub admin_ids: Vec<String>,
    #[serde(default)]
    pub subscriber_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    pub platform: Platform,
    #[serde(default = "default_conversation_type")]
    pub conversation_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub last_activity: Option<DateTime<Utc>>,
}

fn default_conversation_type() -> String {
    "private".to_string()
}

/// Attachment metadata embedded in a file message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub platform: Platform,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    /// Language code -> translated text, filled in by the backend.
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub file_message: Option<FileMessage>,
    #[serde(default)]
    pub auto_detected_language: Option<String>,
}

fn default_message_type() -> String {
    "text".to_string()
}

impl Message {
    pub fn is_file(&self) -> bool {
        self.file_message.is_some()
    }
}
