use std::fmt;

use whatgram_types::models::Platform;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked to log out
    Explicit,
    /// The backend answered 401 to an authenticated request
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing notification.
///
/// `key` names a locale string; `detail` carries the backend message or
/// other free text that cannot be translated.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub key: &'static str,
    pub platform: Option<Platform>,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(key: &'static str) -> Self {
        Self { level: NoticeLevel::Success, key, platform: None, detail: None }
    }

    pub fn info(key: &'static str) -> Self {
        Self { level: NoticeLevel::Info, key, platform: None, detail: None }
    }

    pub fn error(key: &'static str, detail: impl fmt::Display) -> Self {
        Self { level: NoticeLevel::Error, key, platform: None, detail: Some(detail.to_string()) }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Render in `language`, appending the detail when present.
    pub fn render(&self, language: &str) -> String {
        let platform = self.platform.map(|p| whatgram_locale::t(p.as_str(), language));
        let text = match &platform {
            Some(name) => whatgram_locale::translate_key(self.key, language, &[("platform", name)]),
            None => whatgram_locale::t(self.key, language),
        };
        match &self.detail {
            Some(detail) => format!("{}: {}", text, detail),
            None => text,
        }
    }
}

/// Broadcast to every subscriber of a [`SessionContext`](crate::session::SessionContext).
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SessionStarted { user_id: String },
    SessionEnded { reason: LogoutReason },
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_renders_platform_and_detail() {
        let ok = Notice::success("platformConnected").with_platform(Platform::Telegram);
        assert_eq!(ok.render("en"), "Telegram connected successfully!");

        let failed = Notice::error("verificationFailed", "Invalid or expired verification code");
        assert_eq!(
            failed.render("en"),
            "Verification failed: Invalid or expired verification code"
        );
    }
}
