use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{FileMessage, Platform, User};
use crate::timestamp;

// -- Auth --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub phone: String,
    /// Seconds until the issued code expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

// -- Language --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub interface_language: String,
    pub preferred_language: String,
    pub auto_translate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSettingsResponse {
    pub interface_language: String,
    pub preferred_language: String,
    pub auto_translate: bool,
    #[serde(default)]
    pub supported_languages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

// -- Messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: String,
    /// Contact id for 1:1 chats, empty for groups and channels.
    pub receiver_id: String,
    pub content: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    pub file_message: FileMessage,
    pub message_id: String,
    #[serde(default)]
    pub message_type: String,
}

// -- Groups & channels --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub platform: Platform,
    pub is_public: bool,
    pub member_phones: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub description: Option<String>,
    pub platform: Platform,
    pub is_public: bool,
    pub can_subscribers_message: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberAction {
    Add,
    Remove,
    Promote,
    Demote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMemberRequest {
    pub group_id: String,
    pub user_phone: String,
    pub action: MemberAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMemberResponse {
    #[serde(default)]
    pub message: String,
    pub member_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeResponse {
    #[serde(default)]
    pub message: String,
    pub subscriber_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub message: String,
}

// -- Unified inbox --

/// Display info for the chat an inbox entry belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub subscriber_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: String,
    /// Content in the reader's preferred language when a translation exists.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub original_content: Option<String>,
    #[serde(default)]
    pub file_message: Option<FileMessage>,
    pub platform: Platform,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default)]
    pub chat_info: Option<ChatInfo>,
    pub conversation_id: String,
    #[serde(default)]
    pub auto_detected_language: Option<String>,
    #[serde(default)]
    pub has_translation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedInbox {
    pub messages: Vec<InboxMessage>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub user_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStat {
    #[serde(rename = "_id")]
    pub platform: Platform,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCounts {
    pub individual: u64,
    pub groups: u64,
    pub channels: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxStats {
    #[serde(default)]
    pub platform_stats: Vec<PlatformStat>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default)]
    pub chat_counts: ChatCounts,
    #[serde(default)]
    pub supported_platforms: Vec<Platform>,
}

// -- Errors --

/// Error body returned by the backend on non-success statuses.
///
/// `detail` is usually a string, but request validation failures carry a
/// list of objects instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            serde_json::Value::String(s) => f.write_str(s),
            serde_json::Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                        Some(msg) => msg.to_string(),
                        None => item.to_string(),
                    })
                    .collect();
                f.write_str(&msgs.join("; "))
            }
            other => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_renders_string_and_list_forms() {
        let plain: ErrorBody =
            serde_json::from_str(r#"{"detail":"Invalid or expired verification code"}"#).unwrap();
        assert_eq!(plain.to_string(), "Invalid or expired verification code");

        let listed: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","phone"],"msg":"field required"},{"msg":"bad code"}]}"#,
        )
        .unwrap();
        assert_eq!(listed.to_string(), "field required; bad code");
    }

    #[test]
    fn verify_response_tolerates_sparse_user() {
        let body = r#"{
            "access_token": "tok",
            "token_type": "bearer",
            "user": {"id": "u1", "phone": "+905551234567", "username": "user_4567",
                     "hashed_password": null, "created_at": "2024-05-01T10:20:30.5"}
        }"#;
        let resp: VerifyCodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.user.phone, "+905551234567");
        assert_eq!(resp.user.interface_language, "tr");
        assert!(resp.user.auto_translate);
        assert!(!resp.user.whatsapp_connected);
        assert!(resp.user.created_at.is_some());
    }
}
