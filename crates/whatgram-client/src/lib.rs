pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod live;
pub mod session;
pub mod workspace;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use whatgram_store::Database;

pub use api::{ApiClient, ContentList, PendingFile};
pub use auth::{AuthManager, AuthState};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::{ClientEvent, LogoutReason, Notice, NoticeLevel};
pub use live::LiveSignal;
pub use session::{Session, SessionContext};
pub use workspace::{ChatTarget, Selection, Workspace};

/// Entry point tying the store, session, REST client and live channel
/// together.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    session: Arc<SessionContext>,
    api: ApiClient,
}

impl Client {
    pub fn new(config: ClientConfig, store: Database) -> Result<Self> {
        let session = SessionContext::new(Arc::new(store), config.language.clone());
        let api = ApiClient::new(&config, session.clone())?;
        Ok(Self { config, session, api })
    }

    /// Open the on-disk session store named by the config.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let store = Database::open(&config.state_path)?;
        Self::new(config, store)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> AuthManager {
        AuthManager::new(self.api.clone(), self.session.clone())
    }

    pub fn workspace(&self) -> Result<Workspace> {
        Workspace::new(self.api.clone(), self.session.clone())
    }

    /// Bring an authenticated session online: seed demo data, then open
    /// the push channel. Returns the receiver for live signals.
    pub async fn go_live(&self) -> Result<mpsc::UnboundedReceiver<LiveSignal>> {
        let user = self.session.user().ok_or(ClientError::NotAuthenticated)?;

        match self.api.init_mock_data().await {
            Ok(resp) => info!("Demo data: {}", resp.message),
            Err(ClientError::Unauthorized) => return Err(ClientError::Unauthorized),
            Err(e) => warn!("Demo data initialization failed: {}", e),
        }

        let url = self.config.ws_url(&user.id)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = live::connect(&url, tx).await?;
        self.session.attach_live(handle);
        Ok(rx)
    }
}
