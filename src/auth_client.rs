//! Authenticated API client with bearer tokens and one-shot refresh

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::navigator::Navigator;
use crate::request::{ApiRequest, ApiResponse, RequestBody};
use crate::token_store::TokenStore;
use crate::types::AuthTokens;
use async_singleflight::Group;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Path of the token refresh endpoint, relative to the API root
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Macro to check HTTP response status and return error if not successful
macro_rules! check_response {
    ($response:expr, $error_msg:expr) => {
        if !$response.status().is_success() {
            let status = $response.status();
            let text = $response.text().await.unwrap_or_default();
            return Err(ClientError::Authentication(format!(
                "{} with status {}: {}",
                $error_msg, status, text
            )));
        }
    };
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the backend rotates refresh tokens
    #[serde(default)]
    refresh: Option<String>,
}

/// A request in flight, remembered so it can be replayed once
struct PendingRequest {
    request: ApiRequest,
    /// Set once the request has been replayed after a refresh
    retried: bool,
    /// Access token the latest attempt was sent with
    sent_with: Option<String>,
}

/// Authenticated API client
///
/// Attaches `Authorization: Bearer <access>` from the token store to every
/// request. A 401 triggers one refresh of the access token followed by one
/// replay of the original request; if the refresh fails the session is
/// ended and the navigator is asked to show the sign-in view.
///
/// Construct once per session and share the returned `Arc`.
pub struct ApiClient {
    config: ClientConfig,
    token_store: TokenStore,
    navigator: Arc<dyn Navigator>,
    http_client: Client,
    /// Singleflight group so concurrent 401s sharing a refresh token trigger one refresh call
    /// Error type is String because singleflight requires shared error type
    token_refresh_singleflight: Group<String, String>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `config` - API root and timeout
    /// * `token_store` - Where the token pair is persisted
    /// * `navigator` - Invoked when the session cannot be recovered
    pub fn new(config: ClientConfig, token_store: TokenStore, navigator: Arc<dyn Navigator>) -> Result<Arc<Self>> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        info!(
            api_root = %config.api_root,
            authenticated = %token_store.contains(),
            "API client created"
        );

        Ok(Arc::new(Self {
            config,
            token_store,
            navigator,
            http_client,
            token_refresh_singleflight: Group::new(),
        }))
    }

    /// Create a client whose token store is described by the configuration
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Arc<Self>> {
        let token_store = config.token_store()?;
        Self::new(config, token_store, navigator)
    }

    /// Send a request, refreshing the access token once on 401
    ///
    /// Non-2xx responses come back as [`ClientError::Api`]; a response that
    /// was only successful after a refresh is indistinguishable from one that
    /// succeeded first time.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut pending = PendingRequest {
            request,
            retried: false,
            sent_with: None,
        };

        loop {
            let response = self.dispatch(&mut pending).await?;

            if response.status != StatusCode::UNAUTHORIZED {
                return response.error_for_status();
            }

            if pending.retried {
                warn!(path = %pending.request.path, "Request rejected again after token refresh");
                return response.error_for_status();
            }

            let Some(tokens) = self.token_store.get() else {
                debug!(path = %pending.request.path, "Unauthorized with no stored tokens");
                return response.error_for_status();
            };

            // The stored token changed since this attempt was sent (another
            // request refreshed it, or a session started), so just replay
            let token_changed = pending.sent_with.as_deref() != Some(tokens.access.as_str());

            if !token_changed {
                if let Err(e) = self.refresh_access_token(&tokens.refresh).await {
                    warn!(path = %pending.request.path, error = %e, "Token refresh failed, ending session");
                    self.force_logout();
                    return response.error_for_status();
                }
            }

            pending.retried = true;
        }
    }

    /// Send a request and deserialize its JSON response
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.request(request).await?.json()
    }

    /// Refresh the access token, joining any refresh already in flight for
    /// the same refresh token. Returns the new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let key = refresh_token.to_string();
        let (success_opt, error_opt, _shared) = self
            .token_refresh_singleflight
            .work(&key, async {
                match self.do_refresh(&key).await {
                    Ok(new_tokens) => Ok(new_tokens.access),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await;

        // Convert singleflight result to Result type
        match (success_opt, error_opt) {
            (Some(token), None) => Ok(token),
            (None, Some(err_str)) => Err(ClientError::Authentication(err_str)),
            _ => Err(ClientError::Authentication("Unknown error during token refresh".to_string())),
        }
    }

    /// Drop the stored tokens and route to sign-in
    pub(crate) fn force_logout(&self) {
        if let Err(e) = self.token_store.clear() {
            error!(error = %e, "Failed to clear stored tokens");
        }
        self.redirect_to_sign_in();
    }

    pub(crate) fn redirect_to_sign_in(&self) {
        self.navigator.redirect_to_sign_in();
    }

    /// Get the token store (for advanced usage)
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn dispatch(&self, pending: &mut PendingRequest) -> Result<ApiResponse> {
        let request = &pending.request;
        let url = self.config.url(&request.path);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(files) => builder.multipart(RequestBody::to_form(files)?),
        };

        pending.sent_with = match self.token_store.get() {
            Some(tokens) => {
                builder = builder.bearer_auth(&tokens.access);
                Some(tokens.access)
            }
            None => None,
        };

        debug!(
            method = %request.method,
            path = %request.path,
            retried = %pending.retried,
            authenticated = %pending.sent_with.is_some(),
            "Dispatching request"
        );

        let response = ApiResponse::read(builder.send().await?).await?;

        debug!(path = %request.path, status = %response.status, "Received response");
        Ok(response)
    }

    /// Exchange the refresh token for a new access token and persist it
    async fn do_refresh(&self, refresh_token: &str) -> Result<AuthTokens> {
        let url = self.config.url(REFRESH_PATH);

        let response = self
            .http_client
            .post(&url)
            .json(&RefreshRequest { refresh: refresh_token })
            .send()
            .await?;

        check_response!(response, "Token refresh failed");

        let refreshed: RefreshResponse = response.json().await?;

        let new_tokens = match refreshed.refresh {
            Some(rotated) => {
                let tokens = AuthTokens::new(refreshed.access, rotated);
                self.token_store.store(&tokens)?;
                tokens
            }
            None => self.token_store.update_access(&refreshed.access)?.ok_or_else(|| {
                ClientError::Authentication("Session ended while the token was being refreshed".to_string())
            })?,
        };

        info!("Access token refreshed successfully");
        Ok(new_tokens)
    }
}
