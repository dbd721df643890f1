//! Phone + one-time-code login.
//!
//! The flow is a small state machine:
//!
//! ```text
//! Unauthenticated -> PhoneEntry -> CodeEntry -> Authenticated
//!                        ^            |
//!                        +-- change --+
//! ```
//!
//! Any state returns to `Unauthenticated` on logout or when the backend
//! rejects the token.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};
use whatgram_types::api::{LanguageSettings, RequestCodeResponse};
use whatgram_types::models::User;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, LogoutReason, Notice};
use crate::session::{Session, SessionContext};

/// How long a requested code stays valid; resend is locked until then.
pub const CODE_COOLDOWN: Duration = Duration::from_secs(300);

/// Length of the one-time code.
pub const CODE_LENGTH: usize = 6;

/// Time left before a code expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    deadline: Instant,
}

impl Countdown {
    pub fn start(duration: Duration) -> Self {
        Self { deadline: Instant::now() + duration }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// `m:ss`, rounded up to the next whole second.
    pub fn clock(&self) -> String {
        let remaining = self.remaining();
        let mut secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Localized "code expires in m:ss" line.
    pub fn label(&self, language: &str) -> String {
        let clock = self.clock();
        let (minutes, seconds) = clock.split_once(':').unwrap_or(("0", "00"));
        whatgram_locale::translate_key(
            "codeExpires",
            language,
            &[("minutes", &minutes), ("seconds", &seconds)],
        )
    }
}

#[derive(Debug, Clone)]
pub enum AuthState {
    Unauthenticated,
    PhoneEntry,
    CodeEntry { phone: String, countdown: Countdown },
    Authenticated(Session),
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::PhoneEntry => "phone-entry",
            Self::CodeEntry { .. } => "code-entry",
            Self::Authenticated(_) => "authenticated",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<Countdown> {
        match self {
            Self::CodeEntry { countdown, .. } => Some(*countdown),
            _ => None,
        }
    }

    /// Open (or return to) the phone form.
    pub(crate) fn enter_phone(&mut self) -> Result<()> {
        if self.is_authenticated() {
            return Err(ClientError::InvalidState("already logged in".into()));
        }
        *self = Self::PhoneEntry;
        Ok(())
    }

    /// A code may be requested from the phone form, or again for the same
    /// number once the previous code's countdown has run out.
    pub(crate) fn check_can_request(&self, phone: &str) -> Result<()> {
        match self {
            Self::Unauthenticated | Self::PhoneEntry => Ok(()),
            Self::CodeEntry { phone: pending, .. } if pending != phone => Err(ClientError::InvalidState(format!(
                "a code was sent to {}, change the number first",
                pending
            ))),
            Self::CodeEntry { countdown, .. } if countdown.is_expired() => Ok(()),
            Self::CodeEntry { countdown, .. } => Err(ClientError::InvalidState(format!(
                "a code was already sent, resend available in {}",
                countdown.clock()
            ))),
            Self::Authenticated(_) => Err(ClientError::InvalidState("already logged in".into())),
        }
    }

    pub(crate) fn code_sent(&mut self, phone: String) {
        *self = Self::CodeEntry { phone, countdown: Countdown::start(CODE_COOLDOWN) };
    }

    pub(crate) fn pending_phone(&self) -> Result<String> {
        match self {
            Self::CodeEntry { phone, .. } => Ok(phone.clone()),
            other => Err(ClientError::InvalidState(format!(
                "no code requested (state: {})",
                other.name()
            ))),
        }
    }
}

/// Normalize a typed code and check it is exactly six digits.
pub fn validate_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Validation(format!("verification code must be {} digits", CODE_LENGTH)));
    }
    Ok(code.to_string())
}

pub fn validate_phone(phone: &str) -> Result<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ClientError::Validation("phone number is required".into()));
    }
    Ok(phone.to_string())
}

/// Drives the login flow against the backend.
#[derive(Clone)]
pub struct AuthManager {
    api: ApiClient,
    session: Arc<SessionContext>,
}

impl AuthManager {
    pub fn new(api: ApiClient, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    /// Resume a persisted session without touching the network. Without
    /// one, the flow moves to phone entry.
    pub fn restore_session(&self) -> Result<Option<User>> {
        let restored = self.session.restore()?;
        if restored.is_none() {
            self.begin()?;
        }
        Ok(restored)
    }

    pub fn begin(&self) -> Result<()> {
        self.session.update_state(|state| state.enter_phone())
    }

    pub async fn request_code(&self, phone: &str) -> Result<RequestCodeResponse> {
        let phone = validate_phone(phone)?;
        self.session.update_state(|state| state.check_can_request(&phone))?;

        match self.api.request_code(&phone).await {
            Ok(resp) => {
                info!("Verification code requested for {}", phone);
                self.session.update_state(|state| {
                    state.code_sent(phone);
                    Ok(())
                })?;
                self.session.notify(ClientEvent::Notice(Notice::success("codeSent")));
                Ok(resp)
            }
            Err(e) => {
                warn!("Code request for {} failed: {}", phone, e);
                Err(e)
            }
        }
    }

    /// Request a fresh code for the phone already entered.
    pub async fn resend_code(&self) -> Result<RequestCodeResponse> {
        let phone = self.session.state().pending_phone()?;
        self.request_code(&phone).await
    }

    /// Back from the code form to the phone form.
    pub fn change_phone(&self) -> Result<()> {
        self.session.update_state(|state| {
            state.pending_phone()?;
            state.enter_phone()
        })
    }

    /// Submit the code for `phone`; on success the session is persisted
    /// and active. Only valid after a code was requested.
    pub async fn verify_code(&self, phone: &str, code: &str) -> Result<User> {
        let phone = validate_phone(phone)?;
        let code = validate_code(code)?;
        let pending = self.session.state().pending_phone()?;
        if pending != phone {
            return Err(ClientError::InvalidState(format!("the code was sent to {}, not {}", pending, phone)));
        }

        match self.api.verify_code(&phone, &code).await {
            Ok(resp) => {
                let user = resp.user.clone();
                self.session.activate(resp.access_token, resp.user)?;
                info!("Logged in as {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(e) => {
                warn!("Verification for {} failed: {}", phone, e);
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session.teardown(LogoutReason::Explicit)
    }

    /// Localized countdown line while a code is pending.
    pub fn countdown_label(&self) -> Option<String> {
        let countdown = self.session.state().countdown()?;
        Some(countdown.label(&self.session.language()))
    }

    /// Save settings server-side, then merge them into the stored user.
    pub async fn update_language_settings(&self, settings: LanguageSettings) -> Result<User> {
        for code in [&settings.interface_language, &settings.preferred_language] {
            if !whatgram_locale::is_supported(code) {
                return Err(ClientError::Validation(format!("unsupported language '{}'", code)));
            }
        }

        if let Err(e) = self.api.update_language_settings(&settings).await {
            warn!("Saving language settings failed: {}", e);
            return Err(e);
        }

        let user = self.session.update_user(|user| {
            user.interface_language = settings.interface_language.clone();
            user.preferred_language = settings.preferred_language.clone();
            user.auto_translate = settings.auto_translate;
        })?;
        self.session.notify(ClientEvent::Notice(Notice::success("languageSettingsSaved")));
        Ok(user)
    }

    /// Current server-side settings.
    pub async fn language_settings(&self) -> Result<LanguageSettings> {
        let resp = self.api.language_settings().await?;
        Ok(LanguageSettings {
            interface_language: resp.interface_language,
            preferred_language: resp.preferred_language,
            auto_translate: resp.auto_translate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_must_be_six_digits() {
        assert_eq!(validate_code(" 123456 ").unwrap(), "123456");
        assert!(validate_code("12345").is_err());
        assert!(validate_code("1234567").is_err());
        assert!(validate_code("12a456").is_err());
        assert!(validate_code("").is_err());
    }

    #[test]
    fn blank_phone_is_rejected() {
        assert!(validate_phone("   ").is_err());
        assert_eq!(validate_phone(" +905551234567 ").unwrap(), "+905551234567");
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_down_to_zero() {
        let countdown = Countdown::start(CODE_COOLDOWN);
        assert_eq!(countdown.clock(), "5:00");
        assert_eq!(countdown.label("en"), "Code expires in 5:00 minutes");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(countdown.clock(), "4:59");
        assert_eq!(countdown.label("tr"), "Kod 4:59 dakika geçerli");

        tokio::time::advance(Duration::from_secs(290)).await;
        assert_eq!(countdown.clock(), "0:09");
        assert!(!countdown.is_expired());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(countdown.clock(), "0:00");
        assert!(countdown.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn resend_is_locked_until_countdown_expires() {
        let mut state = AuthState::Unauthenticated;
        state.enter_phone().unwrap();
        state.check_can_request("+905551234567").unwrap();
        state.code_sent("+905551234567".into());

        assert!(matches!(state.check_can_request("+905551234567"), Err(ClientError::InvalidState(_))));

        tokio::time::advance(CODE_COOLDOWN).await;
        state.check_can_request("+905551234567").unwrap();
        assert_eq!(state.pending_phone().unwrap(), "+905551234567");

        // An expired code still does not open the door to another number.
        assert!(matches!(state.check_can_request("+905559876543"), Err(ClientError::InvalidState(_))));
    }

    #[test]
    fn change_phone_only_from_code_entry() {
        let mut state = AuthState::PhoneEntry;
        assert!(state.pending_phone().is_err());

        state.code_sent("+1".into());
        assert_eq!(state.name(), "code-entry");
        state.enter_phone().unwrap();
        assert_eq!(state.name(), "phone-entry");
    }
}
