use std::sync::Arc;

use tracing::info;

use flame_store::{AuthStore, ClientStorage, Database};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::ApiClient;

pub type AppContext = Arc<AppContextInner>;

/// Everything views share: config, the API client and the session store.
/// Built once at startup and handed to every view explicitly.
pub struct AppContextInner {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub auth: AuthStore,
}

/// Where the UI should be showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Feed,
    Profile,
    Matches,
    Chat(String),
}

impl AppContextInner {
    /// Open the on-disk store, restore any saved session, and wire it all up.
    pub fn bootstrap(config: ClientConfig) -> Result<AppContext> {
        let storage: Arc<dyn ClientStorage> = Arc::new(Database::open(&config.store_path)?);
        Self::with_storage(config, Some(storage))
    }

    /// `None` storage gives a detached store: nothing is read or persisted.
    pub fn with_storage(
        config: ClientConfig,
        storage: Option<Arc<dyn ClientStorage>>,
    ) -> Result<AppContext> {
        let auth = match storage {
            Some(storage) => AuthStore::new(storage),
            None => AuthStore::detached(),
        };
        auth.init()?;

        let api = ApiClient::new(config.api_url.clone());
        info!("Client ready against {}", api.base_url());

        Ok(Arc::new(Self { config, api, auth }))
    }

    pub fn require_token(&self) -> Result<String> {
        self.auth.token().ok_or(ClientError::NotAuthenticated)
    }

    /// First screen after startup.
    pub fn landing(&self) -> Route {
        if self.auth.is_authenticated() {
            Route::Feed
        } else {
            Route::Welcome
        }
    }
}
