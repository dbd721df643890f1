//! View state of a logged-in session: the active platform tab, the loaded
//! entity lists, the selected chat and its messages, queued uploads, and
//! the per-view translation cache.
//!
//! A `Workspace` has a single owner and is only mutated through `&mut self`,
//! so a push-triggered reload can never interleave with a user action.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use whatgram_types::api::{
    CreateChannelRequest, CreateGroupRequest, GroupMemberResponse, MemberAction, SendMessageRequest,
    SubscribeResponse, TranslateRequest,
};
use whatgram_types::events::PushEvent;
use whatgram_types::models::{Channel, Contact, ContentKind, Group, Message, Platform};

use crate::api::{ApiClient, ContentList, PendingFile};
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, Notice};
use crate::live::LiveSignal;
use crate::session::SessionContext;

/// Something the user can open a chat with.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTarget {
    Contact(Contact),
    Group(Group),
    Channel(Channel),
}

impl ChatTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Contact(c) => &c.id,
            Self::Group(g) => &g.id,
            Self::Channel(c) => &c.id,
        }
    }
}

/// The open chat. Only one can be open at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Contact { contact: Contact, conversation_id: String },
    Group { group: Group, conversation_id: String },
    Channel { channel: Channel, conversation_id: String },
}

impl Selection {
    pub fn conversation_id(&self) -> &str {
        match self {
            Self::Contact { conversation_id, .. }
            | Self::Group { conversation_id, .. }
            | Self::Channel { conversation_id, .. } => conversation_id,
        }
    }

    /// Contact id for 1:1 chats, empty otherwise.
    pub fn receiver_id(&self) -> &str {
        match self {
            Self::Contact { contact, .. } => &contact.id,
            _ => "",
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Contact { .. } => ContentKind::Contacts,
            Self::Group { .. } => ContentKind::Groups,
            Self::Channel { .. } => ContentKind::Channels,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Contact { contact, .. } => &contact.name,
            Self::Group { group, .. } => &group.name,
            Self::Channel { channel, .. } => &channel.name,
        }
    }
}

/// True when `message` was detected in a language other than `user_language`.
pub fn needs_translation(message: &Message, user_language: &str) -> bool {
    message.content.as_deref().is_some_and(|c| !c.is_empty())
        && message
            .auto_detected_language
            .as_deref()
            .is_some_and(|lang| lang != user_language)
}

/// Split a comma-separated phone list, dropping blanks.
pub fn split_member_phones(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Workspace {
    api: ApiClient,
    session: Arc<SessionContext>,
    platform: Platform,
    kind: ContentKind,
    contacts: Vec<Contact>,
    groups: Vec<Group>,
    channels: Vec<Channel>,
    selection: Option<Selection>,
    messages: Vec<Message>,
    pending_files: Vec<PendingFile>,
    connections: HashMap<Platform, bool>,
    translations: HashMap<(String, String), String>,
}

impl Workspace {
    /// Requires an authenticated session; connection flags start from the
    /// user record, with WhatGram always connected.
    pub fn new(api: ApiClient, session: Arc<SessionContext>) -> Result<Self> {
        let user = session.user().ok_or(ClientError::NotAuthenticated)?;
        let connections = HashMap::from([
            (Platform::Whatsapp, user.whatsapp_connected),
            (Platform::Telegram, user.telegram_connected),
            (Platform::Whatgram, true),
        ]);

        Ok(Self {
            api,
            session,
            platform: Platform::Whatsapp,
            kind: ContentKind::Contacts,
            contacts: Vec::new(),
            groups: Vec::new(),
            channels: Vec::new(),
            selection: None,
            messages: Vec::new(),
            pending_files: Vec::new(),
            connections,
            translations: HashMap::new(),
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_files(&self) -> &[PendingFile] {
        &self.pending_files
    }

    // -- Content --

    /// Switch tab and reload its list. Changing the content kind closes the
    /// open chat; a platform-only switch keeps it.
    pub async fn set_tab(&mut self, platform: Platform, kind: ContentKind) -> Result<()> {
        if kind != self.kind {
            self.clear_selection();
        }
        self.platform = platform;
        self.kind = kind;
        self.load_content().await
    }

    /// Replace the current tab's entity list with a fresh fetch.
    pub async fn load_content(&mut self) -> Result<()> {
        let list = self.api.list_content(self.platform, self.kind).await.inspect_err(|e| {
            warn!("Loading {} for {} failed: {}", self.kind.as_str(), self.platform, e);
        })?;
        debug!("Loaded {} {} for {}", list.len(), self.kind.as_str(), self.platform);

        match list {
            ContentList::Contacts(v) => self.contacts = v,
            ContentList::Groups(v) => self.groups = v,
            ContentList::Channels(v) => self.channels = v,
        }
        Ok(())
    }

    /// Look up an entity of `kind` by id in the loaded lists.
    pub fn find_target(&self, kind: ContentKind, id: &str) -> Result<ChatTarget> {
        let found = match kind {
            ContentKind::Contacts => self.contacts.iter().find(|c| c.id == id).cloned().map(ChatTarget::Contact),
            ContentKind::Groups => self.groups.iter().find(|g| g.id == id).cloned().map(ChatTarget::Group),
            ContentKind::Channels => self.channels.iter().find(|c| c.id == id).cloned().map(ChatTarget::Channel),
        };
        found.ok_or_else(|| ClientError::ConversationNotFound(id.to_string()))
    }

    pub fn is_connected(&self, platform: Platform) -> bool {
        self.connections.get(&platform).copied().unwrap_or(false)
    }

    pub async fn connect_platform(&mut self, platform: Platform) -> Result<()> {
        if platform == Platform::Whatgram {
            return Ok(());
        }

        let resp = self.api.connect_platform(platform).await.inspect_err(|e| {
            warn!("Connecting {} failed: {}", platform, e);
        })?;
        info!("{}: {}", platform, resp.message);

        self.connections.insert(platform, true);
        self.session.update_user(|user| match platform {
            Platform::Whatsapp => user.whatsapp_connected = true,
            Platform::Telegram => user.telegram_connected = true,
            Platform::Whatgram => {}
        })?;
        self.session
            .notify(ClientEvent::Notice(Notice::success("platformConnected").with_platform(platform)));
        Ok(())
    }

    pub async fn create_group(
        &mut self,
        name: &str,
        description: Option<&str>,
        member_phones: &str,
        is_public: bool,
    ) -> Result<Group> {
        let name = required_name(name)?;
        let request = CreateGroupRequest {
            name,
            description: description.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string),
            platform: self.platform,
            is_public,
            member_phones: split_member_phones(member_phones),
        };

        let group = self.api.create_group(&request).await?;
        info!("Created group {} ({})", group.name, group.id);
        self.session.notify(ClientEvent::Notice(Notice::success("groupCreated")));
        self.load_content().await?;
        Ok(group)
    }

    pub async fn create_channel(
        &mut self,
        name: &str,
        description: Option<&str>,
        is_public: bool,
        can_subscribers_message: bool,
    ) -> Result<Channel> {
        let name = required_name(name)?;
        let request = CreateChannelRequest {
            name,
            description: description.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string),
            platform: self.platform,
            is_public,
            can_subscribers_message,
        };

        let channel = self.api.create_channel(&request).await?;
        info!("Created channel {} ({})", channel.name, channel.id);
        self.session.notify(ClientEvent::Notice(Notice::success("channelCreated")));
        self.load_content().await?;
        Ok(channel)
    }

    pub async fn subscribe_channel(&mut self, channel_id: &str) -> Result<SubscribeResponse> {
        let resp = self.api.subscribe_channel(channel_id).await?;
        self.load_content().await?;
        Ok(resp)
    }

    pub async fn manage_group_member(
        &mut self,
        group_id: &str,
        user_phone: &str,
        action: MemberAction,
    ) -> Result<GroupMemberResponse> {
        let resp = self.api.manage_group_member(group_id, user_phone.trim(), action).await?;
        self.load_content().await?;
        Ok(resp)
    }

    // -- Conversation --

    /// Open a chat and load its history. On failure the previous selection
    /// is kept.
    pub async fn select_chat(&mut self, target: ChatTarget) -> Result<()> {
        let selection = match target {
            ChatTarget::Contact(contact) => {
                let conversation = self.api.open_conversation(&contact.id, contact.platform).await?;
                Selection::Contact { contact, conversation_id: conversation.id }
            }
            ChatTarget::Group(group) => {
                let conversations = self.api.list_conversations(group.platform).await?;
                let conversation = conversations
                    .into_iter()
                    .find(|c| c.group_id.as_deref() == Some(group.id.as_str()))
                    .ok_or_else(|| ClientError::ConversationNotFound(group.id.clone()))?;
                Selection::Group { group, conversation_id: conversation.id }
            }
            ChatTarget::Channel(channel) => {
                let conversations = self.api.list_conversations(channel.platform).await?;
                let conversation = conversations
                    .into_iter()
                    .find(|c| c.channel_id.as_deref() == Some(channel.id.as_str()))
                    .ok_or_else(|| ClientError::ConversationNotFound(channel.id.clone()))?;
                Selection::Channel { channel, conversation_id: conversation.id }
            }
        };

        info!("Opened {} ({})", selection.title(), selection.conversation_id());
        self.selection = Some(selection);
        self.load_messages().await
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.messages.clear();
        self.translations.clear();
    }

    /// Replace the message list for the open chat. No-op without one.
    pub async fn load_messages(&mut self) -> Result<()> {
        let Some(selection) = &self.selection else {
            return Ok(());
        };
        let conversation_id = selection.conversation_id().to_string();

        let messages = self.api.messages(&conversation_id).await.inspect_err(|e| {
            warn!("Loading messages for {} failed: {}", conversation_id, e);
        })?;
        debug!("Loaded {} messages for {}", messages.len(), conversation_id);
        self.messages = messages;
        Ok(())
    }

    /// Send a text message to the open chat. Blank input is ignored.
    pub async fn send_message(&mut self, content: &str) -> Result<Option<Message>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let selection = self.selection.as_ref().ok_or(ClientError::NoSelection)?;

        let request = SendMessageRequest {
            conversation_id: selection.conversation_id().to_string(),
            receiver_id: selection.receiver_id().to_string(),
            content: content.to_string(),
            platform: self.platform,
        };
        let sent = self.api.send_message(&request).await.inspect_err(|e| {
            warn!("Sending message failed: {}", e);
        })?;

        self.load_messages().await?;
        Ok(Some(sent))
    }

    pub fn add_pending_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let file = PendingFile::new(path)?;
        if !file.path.is_file() {
            return Err(ClientError::Validation(format!("no such file: {}", file.path.display())));
        }
        self.pending_files.push(file);
        Ok(())
    }

    pub fn clear_pending_files(&mut self) {
        self.pending_files.clear();
    }

    /// Upload queued files one at a time. The first failure stops the
    /// batch. Either way the queue is cleared and messages are reloaded.
    pub async fn upload_files(&mut self) -> Result<usize> {
        if self.pending_files.is_empty() {
            return Ok(0);
        }
        let selection = self.selection.clone().ok_or(ClientError::NoSelection)?;
        let files = std::mem::take(&mut self.pending_files);

        let mut uploaded = 0;
        let mut failure = None;
        for file in &files {
            match self
                .api
                .upload_file(file, selection.conversation_id(), selection.receiver_id(), self.platform)
                .await
            {
                Ok(resp) => {
                    debug!("Uploaded {} as {}", file.name, resp.message_id);
                    uploaded += 1;
                }
                Err(e) => {
                    warn!("Upload of {} failed, {} file(s) skipped: {}", file.name, files.len() - uploaded - 1, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        let reloaded = self.load_messages().await;
        match failure {
            Some(e) => Err(e),
            None => reloaded.map(|_| uploaded),
        }
    }

    /// Translation of `message` into `target`: the backend-provided one if
    /// present, else a cached or freshly fetched one.
    pub async fn translate_message(&mut self, message: &Message, target: &str) -> Result<String> {
        if let Some(text) = message.translations.get(target) {
            return Ok(text.clone());
        }
        let key = (message.id.clone(), target.to_string());
        if let Some(text) = self.translations.get(&key) {
            return Ok(text.clone());
        }

        let text = message
            .content
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ClientError::Validation("message has no text to translate".into()))?;
        let request = TranslateRequest {
            text,
            target_language: target.to_string(),
            source_language: message.auto_detected_language.clone(),
        };

        let resp = self.api.translate(&request).await?;
        self.translations.insert(key, resp.translated_text.clone());
        Ok(resp.translated_text)
    }

    /// Convenience for [`translate_message`](Self::translate_message) by id.
    pub async fn translate_by_id(&mut self, message_id: &str, target: &str) -> Result<String> {
        let message = self
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("no message '{}' in this chat", message_id)))?;
        self.translate_message(&message, target).await
    }

    pub fn cached_translation(&self, message_id: &str, target: &str) -> Option<&str> {
        self.translations
            .get(&(message_id.to_string(), target.to_string()))
            .map(String::as_str)
    }

    // -- Live updates --

    /// Coarse invalidation: one message reload, then one content reload.
    pub async fn handle_push(&mut self, event: &PushEvent) -> Result<()> {
        if !event.is_refresh() {
            return Ok(());
        }
        debug!("Refreshing after push for {:?}", event.conversation_id());
        let messages = self.load_messages().await;
        let content = self.load_content().await;
        messages.and(content)
    }

    pub async fn handle_signal(&mut self, signal: LiveSignal) -> Result<()> {
        match signal {
            LiveSignal::Refresh(event) => self.handle_push(&event).await,
            LiveSignal::Closed => {
                if self.session.is_authenticated() {
                    self.session.notify(ClientEvent::Notice(Notice::info("connectionLost")));
                }
                Ok(())
            }
        }
    }
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("name is required".into()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: Option<&str>, detected: Option<&str>) -> Message {
        serde_json::from_value(serde_json::json!({
            "id": "m1",
            "sender_id": "u2",
            "content": content,
            "timestamp": "2024-05-01T10:20:30",
            "platform": "telegram",
            "auto_detected_language": detected,
        }))
        .unwrap()
    }

    #[test]
    fn translation_needed_only_for_foreign_text() {
        assert!(needs_translation(&message(Some("hello"), Some("en")), "tr"));
        assert!(!needs_translation(&message(Some("merhaba"), Some("tr")), "tr"));
        assert!(!needs_translation(&message(Some("hello"), None), "tr"));
        assert!(!needs_translation(&message(None, Some("en")), "tr"));
    }

    #[test]
    fn member_phones_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            split_member_phones(" +905551234567, ,+905559876543 ,"),
            vec!["+905551234567", "+905559876543"]
        );
        assert!(split_member_phones("").is_empty());
    }

    #[test]
    fn selection_receiver_is_contact_only() {
        let contact: Contact = serde_json::from_value(serde_json::json!({
            "id": "c1", "name": "Ayşe", "platform": "whatsapp"
        }))
        .unwrap();
        let group: Group = serde_json::from_value(serde_json::json!({
            "id": "g1", "name": "Aile", "platform": "whatsapp"
        }))
        .unwrap();

        let direct = Selection::Contact { contact, conversation_id: "conv-1".into() };
        assert_eq!(direct.receiver_id(), "c1");
        assert_eq!(direct.kind(), ContentKind::Contacts);

        let grouped = Selection::Group { group, conversation_id: "conv-2".into() };
        assert_eq!(grouped.receiver_id(), "");
        assert_eq!(grouped.conversation_id(), "conv-2");
    }
}
