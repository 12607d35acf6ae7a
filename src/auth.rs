//! Account flows: registration, OTP verification, login and logout

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::{AccessClaims, AuthTokens};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Length of the emailed verification code
pub const OTP_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ClientError::Validation("Username is required.".to_string()));
        }
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ClientError::Validation("Password is required.".to_string()));
        }
        if self.password != self.password2 {
            return Err(ClientError::Validation("Passwords do not match.".to_string()));
        }
        Ok(())
    }
}

/// Backend acknowledgement carrying a human readable message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerifyOtpResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

/// Outcome of a successful verification
#[derive(Debug, Clone)]
pub struct Verification {
    pub message: Option<String>,
    /// True if the backend issued tokens and a session was started
    pub signed_in: bool,
}

#[derive(Debug, Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if valid {
        Ok(())
    } else {
        Err(ClientError::Validation(format!("{email:?} is not a valid email address.")))
    }
}

fn normalize_otp(otp: &str) -> Result<&str> {
    let otp = otp.trim();
    if otp.len() != OTP_LENGTH || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Validation(format!("Enter the {OTP_LENGTH}-digit code from your email.")));
    }
    Ok(otp)
}

impl ApiClient {
    /// Create an inactive account; the backend emails a verification code
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse> {
        request.validate()?;
        let response = self
            .request(ApiRequest::post("/auth/register/").json(request)?)
            .await?;
        info!(email = %request.email, "Registration submitted, awaiting verification");
        // 201 may carry a message; an empty body is fine too
        Ok(response.json().unwrap_or_default())
    }

    /// Activate the account with the emailed code
    ///
    /// When the backend answers with a token pair the session starts
    /// immediately.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Verification> {
        validate_email(email)?;
        let otp = normalize_otp(otp)?;

        let response: VerifyOtpResponse = self
            .json(ApiRequest::post("/auth/verify-otp/").json(&VerifyOtpRequest { email, otp })?)
            .await?;

        let signed_in = match (response.access, response.refresh) {
            (Some(access), Some(refresh)) => {
                self.token_store().store(&AuthTokens::new(access, refresh))?;
                true
            }
            _ => false,
        };

        info!(email = %email, signed_in = %signed_in, "Account verified");
        Ok(Verification {
            message: response.message,
            signed_in,
        })
    }

    /// Ask the backend to send a fresh verification code
    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse> {
        validate_email(email)?;
        let response = self
            .request(ApiRequest::post("/auth/resend-otp/").json(&EmailRequest { email })?)
            .await?;
        Ok(response.json().unwrap_or_default())
    }

    /// Sign in and persist the issued token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ClientError::Validation("Password is required.".to_string()));
        }

        let tokens: AuthTokens = self
            .json(ApiRequest::post("/auth/login/").json(&LoginRequest { email, password })?)
            .await?;

        if !tokens.is_complete() {
            return Err(ClientError::InvalidResponse("Login response is missing a token".to_string()));
        }

        self.token_store().store(&tokens)?;
        info!(email = %email, "Logged in, tokens stored");
        Ok(tokens)
    }

    /// End the session and return to the sign-in view
    pub fn logout(&self) -> Result<()> {
        self.token_store().clear()?;
        info!("Logged out");
        self.redirect_to_sign_in();
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_store().contains()
    }

    /// Claims of the current access token, if signed in
    pub fn current_claims(&self) -> Option<AccessClaims> {
        self.token_store().get().and_then(|tokens| tokens.access_claims().ok())
    }
}
