use std::path::PathBuf;

use chrono::Utc;
use tracing::warn;

use crate::{config, error::AppError, spotify::auth, types::Token};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Owns the persisted OAuth token and refreshes it when it is about to expire.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Loads the token saved by `moodlist auth`.
    ///
    /// # Errors
    ///
    /// Fails with [`AppError::Auth`] when no token was saved yet.
    pub async fn load() -> Result<Self, AppError> {
        let content = async_fs::read_to_string(Self::token_path())
            .await
            .map_err(|_| AppError::Auth("no saved token, run `moodlist auth` first".to_string()))?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), AppError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Access token, refreshed first when it is about to expire. A failed
    /// refresh keeps the old token; the catalog then reports 401s.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match auth::refresh_token(&self.token.refresh_token).await {
                Ok(token) => {
                    self.token = token;
                    if let Err(e) = self.persist().await {
                        warn!(error = %e, "failed to persist refreshed token");
                    }
                }
                Err(e) => warn!(error = %e, "token refresh failed"),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache").join("token.json")
    }
}
