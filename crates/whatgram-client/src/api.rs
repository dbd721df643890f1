//! Typed REST client for the backend's `/api` surface.
//!
//! Every authenticated call goes through [`ApiClient::send`], which turns a
//! 401 into a full session teardown before reporting
//! [`ClientError::Unauthorized`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use whatgram_types::api::{
    ConnectResponse, CreateChannelRequest, CreateGroupRequest, ErrorBody, GroupMemberRequest,
    GroupMemberResponse, InboxStats, LanguageSettings, LanguageSettingsResponse, LanguagesResponse,
    MemberAction, RequestCodeRequest, RequestCodeResponse, SendMessageRequest, StatusMessage,
    SubscribeResponse, TranslateRequest, TranslateResponse, UnifiedInbox, UploadResponse,
    VerifyCodeRequest, VerifyCodeResponse,
};
use whatgram_types::models::{Channel, Contact, ContentKind, Conversation, Group, Message, Platform};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::LogoutReason;
use crate::session::SessionContext;

/// A file queued for upload. Contents are read only when it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
}

impl PendingFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| ClientError::Validation(format!("not a file path: {}", path.display())))?;
        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One fetched entity list.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentList {
    Contacts(Vec<Contact>),
    Groups(Vec<Group>),
    Channels(Vec<Channel>),
}

impl ContentList {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Contacts(_) => ContentKind::Contacts,
            Self::Groups(_) => ContentKind::Groups,
            Self::Channels(_) => ContentKind::Channels,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Contacts(v) => v.len(),
            Self::Groups(v) => v.len(),
            Self::Channels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base: config.api_base(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, authed: bool) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!("{} {}", status.as_u16(), resp.url().path());

        if status == StatusCode::UNAUTHORIZED && authed {
            warn!("Backend rejected the session token, logging out");
            if let Err(e) = self.session.teardown(LogoutReason::Unauthorized) {
                error!("Session teardown after 401 failed: {}", e);
            }
            return Err(ClientError::Unauthorized);
        }

        let body = resp.text().await?;
        if !status.is_success() {
            let detail = error_detail(status, &body);
            warn!("Request failed with {}: {}", status.as_u16(), detail);
            return Err(ClientError::Api { status, detail });
        }

        Ok(serde_json::from_str(&body)?)
    }

    // -- Auth --

    pub async fn request_code(&self, phone: &str) -> Result<RequestCodeResponse> {
        let req = self
            .public(Method::POST, "/auth/request-code")
            .json(&RequestCodeRequest { phone: phone.to_string() });
        self.send(req, false).await
    }

    pub async fn verify_code(&self, phone: &str, code: &str) -> Result<VerifyCodeResponse> {
        let req = self.public(Method::POST, "/auth/verify-code").json(&VerifyCodeRequest {
            phone: phone.to_string(),
            code: code.to_string(),
        });
        self.send(req, false).await
    }

    // -- Language --

    pub async fn language_settings(&self) -> Result<LanguageSettingsResponse> {
        let req = self.authed(Method::GET, "/user/language-settings")?;
        self.send(req, true).await
    }

    pub async fn update_language_settings(&self, settings: &LanguageSettings) -> Result<StatusMessage> {
        let req = self.authed(Method::POST, "/user/language-settings")?.json(settings);
        self.send(req, true).await
    }

    pub async fn languages(&self) -> Result<LanguagesResponse> {
        let req = self.authed(Method::GET, "/languages")?;
        self.send(req, true).await
    }

    pub async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        let req = self.authed(Method::POST, "/translate")?.json(request);
        self.send(req, true).await
    }

    // -- Content --

    pub async fn list_contacts(&self, platform: Platform) -> Result<Vec<Contact>> {
        let req = self.authed(Method::GET, "/contacts")?.query(&[("platform", platform.as_str())]);
        self.send(req, true).await
    }

    pub async fn list_groups(&self, platform: Platform) -> Result<Vec<Group>> {
        let req = self.authed(Method::GET, "/groups")?.query(&[("platform", platform.as_str())]);
        self.send(req, true).await
    }

    pub async fn list_channels(&self, platform: Platform) -> Result<Vec<Channel>> {
        let req = self.authed(Method::GET, "/channels")?.query(&[("platform", platform.as_str())]);
        self.send(req, true).await
    }

    pub async fn list_content(&self, platform: Platform, kind: ContentKind) -> Result<ContentList> {
        Ok(match kind {
            ContentKind::Contacts => ContentList::Contacts(self.list_contacts(platform).await?),
            ContentKind::Groups => ContentList::Groups(self.list_groups(platform).await?),
            ContentKind::Channels => ContentList::Channels(self.list_channels(platform).await?),
        })
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group> {
        let req = self.authed(Method::POST, "/groups")?.json(request);
        self.send(req, true).await
    }

    pub async fn create_channel(&self, request: &CreateChannelRequest) -> Result<Channel> {
        let req = self.authed(Method::POST, "/channels")?.json(request);
        self.send(req, true).await
    }

    pub async fn manage_group_member(
        &self,
        group_id: &str,
        user_phone: &str,
        action: MemberAction,
    ) -> Result<GroupMemberResponse> {
        let body = GroupMemberRequest {
            group_id: group_id.to_string(),
            user_phone: user_phone.to_string(),
            action,
        };
        let req = self.authed(Method::POST, &format!("/groups/{}/members", group_id))?.json(&body);
        self.send(req, true).await
    }

    pub async fn subscribe_channel(&self, channel_id: &str) -> Result<SubscribeResponse> {
        let req = self.authed(Method::POST, &format!("/channels/{}/subscribe", channel_id))?;
        self.send(req, true).await
    }

    pub async fn connect_platform(&self, platform: Platform) -> Result<ConnectResponse> {
        let req = self.authed(Method::POST, &format!("/connect/{}", platform))?;
        self.send(req, true).await
    }

    pub async fn init_mock_data(&self) -> Result<StatusMessage> {
        let req = self.authed(Method::POST, "/init-mock-data")?;
        self.send(req, true).await
    }

    // -- Conversations --

    pub async fn list_conversations(&self, platform: Platform) -> Result<Vec<Conversation>> {
        let req = self
            .authed(Method::GET, "/conversations")?
            .query(&[("platform", platform.as_str())]);
        self.send(req, true).await
    }

    /// Get-or-create the 1:1 conversation with `participant_id`.
    pub async fn open_conversation(&self, participant_id: &str, platform: Platform) -> Result<Conversation> {
        let req = self
            .authed(Method::POST, "/conversations")?
            .query(&[("participant_id", participant_id), ("platform", platform.as_str())]);
        self.send(req, true).await
    }

    pub async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let req = self.authed(Method::GET, &format!("/conversations/{}/messages", conversation_id))?;
        self.send(req, true).await
    }

    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<Message> {
        let req = self.authed(Method::POST, "/messages")?.json(request);
        self.send(req, true).await
    }

    pub async fn upload_file(
        &self,
        file: &PendingFile,
        conversation_id: &str,
        receiver_id: &str,
        platform: Platform,
    ) -> Result<UploadResponse> {
        let data = tokio::fs::read(&file.path).await?;
        debug!("Uploading {} ({} bytes)", file.name, data.len());

        let form = Form::new()
            .part("file", Part::bytes(data).file_name(file.name.clone()))
            .text("conversation_id", conversation_id.to_string())
            .text("receiver_id", receiver_id.to_string())
            .text("platform", platform.as_str());

        let req = self.authed(Method::POST, "/upload")?.multipart(form);
        self.send(req, true).await
    }

    // -- Inbox --

    pub async fn unified_inbox(&self, limit: u32, offset: u32) -> Result<UnifiedInbox> {
        let req = self
            .authed(Method::GET, "/unified-inbox")?
            .query(&[("limit", limit), ("offset", offset)]);
        self.send(req, true).await
    }

    pub async fn inbox_stats(&self) -> Result<InboxStats> {
        let req = self.authed(Method::GET, "/inbox-stats")?;
        self.send(req, true).await
    }
}

/// The backend's `detail` message, else the raw body, else the status text.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.to_string();
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}
