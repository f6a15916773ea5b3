use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, management::TokenManager, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    info!("Opening the Spotify login page...");

    let token = match spotify::auth::login(shared_state).await {
        Ok(token) => token,
        Err(e) => error!("Login failed: {}", e),
    };

    if let Err(e) = TokenManager::new(token).persist().await {
        error!("Failed to save token: {}", e);
    }

    success!("Logged in. Run `moodlist generate <mood>` to build a playlist.");
}
