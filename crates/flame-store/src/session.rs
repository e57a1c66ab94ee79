use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use flame_types::models::{Session, UserBasic};

use crate::storage::ClientStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Holder of the current session.
///
/// Token and identity live in a single `Option<Session>`, so the store can
/// never hold one without the other. Writes persist first and only then
/// update memory, both under the same write lock.
pub struct AuthStore {
    session: RwLock<Option<Session>>,
    storage: Option<Arc<dyn ClientStorage>>,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            session: RwLock::new(None),
            storage: Some(storage),
        }
    }

    /// A store with no backing storage; `init` is a no-op and nothing persists.
    pub fn detached() -> Self {
        Self {
            session: RwLock::new(None),
            storage: None,
        }
    }

    /// Load a previously persisted session, if any.
    pub fn init(&self) -> Result<()> {
        let Some(storage) = &self.storage else {
            debug!("No client storage, skipping session restore");
            return Ok(());
        };

        let token = storage.get(TOKEN_KEY)?;
        let user = storage.get(USER_KEY)?;

        let restored = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<UserBasic>(&user) {
                Ok(user) => Some(Session { token, user }),
                Err(e) => {
                    warn!("Stored user is unreadable ({}), clearing session", e);
                    storage.remove_all(&[TOKEN_KEY, USER_KEY])?;
                    None
                }
            },
            (None, None) => None,
            _ => {
                warn!("Stored session is half-written, clearing it");
                storage.remove_all(&[TOKEN_KEY, USER_KEY])?;
                None
            }
        };

        if let Some(session) = &restored {
            info!("Restored session for {}", session.user.email);
        }
        *self.write()? = restored;
        Ok(())
    }

    pub fn set(&self, token: String, user: UserBasic) -> Result<()> {
        let mut guard = self.write()?;
        if let Some(storage) = &self.storage {
            let user_json = serde_json::to_string(&user)?;
            storage.set_all(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;
        }
        *guard = Some(Session { token, user });
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let mut guard = self.write()?;
        if let Some(storage) = &self.storage {
            storage.remove_all(&[TOKEN_KEY, USER_KEY])?;
        }
        *guard = None;
        Ok(())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn user(&self) -> Option<UserBasic> {
        self.session().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Option<Session>>> {
        self.session
            .write()
            .map_err(|e| anyhow!("session lock poisoned: {}", e))
    }
}
