//! Sign-in navigation hook
//!
//! When a session cannot be recovered the client sends the user back to the
//! unauthenticated entry point. The embedding application decides what that
//! means (a route change, a prompt, exiting a CLI).

use std::sync::Arc;
use tracing::info;

pub trait Navigator: Send + Sync + 'static {
    /// Route the user to the sign-in view
    fn redirect_to_sign_in(&self);
}

/// Navigator that only logs the redirect
pub struct NavigatorNoop {}

impl Navigator for NavigatorNoop {
    fn redirect_to_sign_in(&self) {
        info!("Session ended, sign-in required");
    }
}

impl NavigatorNoop {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn redirect_to_sign_in(&self) {
        self()
    }
}
