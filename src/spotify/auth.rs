use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config,
    error::AppError,
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    /// Refresh responses may omit the refresh token; the previous one then
    /// stays valid.
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the authorize URL for a PKCE login.
pub fn authorize_url(client_id: &str, code_challenge: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = config::spotify_apiauth_url(),
        client_id = client_id,
        redirect_uri = config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = config::spotify_scope().replace(' ', "%20"),
    )
}

/// Runs the OAuth 2.0 Authorization Code + PKCE flow.
///
/// Starts the local callback server, opens the authorize URL in the browser and
/// waits until the callback handler stored a token in `shared_state`. The
/// playlist pipeline never calls this; it only consumes the resulting access
/// token.
///
/// # Errors
///
/// Fails when the client id is not configured or when no token arrives within
/// two minutes.
pub async fn login(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, AppError> {
    let client_id = config::spotify_client_id()?;
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(&client_id, &code_challenge);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state)
        .await
        .ok_or_else(|| AppError::Auth("authentication failed or timed out".to_string()))
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        if let Some(token) = shared_state
            .lock()
            .await
            .as_ref()
            .and_then(|pkce| pkce.token.clone())
        {
            return Some(token);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for a token using the PKCE verifier.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, AppError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body: TokenResponse = res.json().await?;
    Ok(body.into_token(None))
}

/// Exchanges a refresh token for a fresh access token.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, AppError> {
    let client_id = config::spotify_client_id()?;

    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body: TokenResponse = res.json().await?;
    Ok(body.into_token(Some(refresh_token)))
}
