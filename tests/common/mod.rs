// Shared helpers for integration tests

#![allow(dead_code)]

use aarogya_rs_client::{ApiClient, AuthTokens, ClientConfig, Navigator, TokenStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Navigator that counts sign-in redirects
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_sign_in(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Client pointed at a mock server, with an optional pre-stored session
pub fn client_for(server_url: &str, tokens: Option<AuthTokens>) -> (Arc<ApiClient>, Arc<RecordingNavigator>) {
    let store = TokenStore::in_memory();
    if let Some(tokens) = tokens {
        store.store(&tokens).unwrap();
    }
    client_with_store(server_url, store)
}

pub fn client_with_store(server_url: &str, store: TokenStore) -> (Arc<ApiClient>, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(ClientConfig::new(server_url), store, navigator.clone()).unwrap();
    (client, navigator)
}

pub fn session() -> AuthTokens {
    AuthTokens::new("access-1", "refresh-1")
}

pub const PROFILE_BODY: &str = r#"{"username": "asha", "email": "asha@example.com", "age": 34,
    "gender": "Female", "weight_kg": "62.50", "height_cm": "165.00"}"#;
