//! Aarogya Rust Client
//!
//! A Rust client library for the Aarogya health-tracking API, with bearer
//! token authentication, persisted sessions and transparent token refresh.

pub mod auth;
pub mod auth_client;
pub mod config;
pub mod dashboard;
pub mod diet;
pub mod error;
pub mod health_metrics;
pub mod medicines;
pub mod navigator;
pub mod profile;
pub mod reports;
pub mod request;
pub mod symptoms;
pub mod token_store;
pub mod types;

pub use auth::{RegisterRequest, Verification};
pub use auth_client::ApiClient;
pub use config::ClientConfig;
pub use dashboard::{DashboardData, Meal, WeightTrend};
pub use diet::{ActivityLevel, DietPlan, DietPlanRequest};
pub use error::{ClientError, Result};
pub use medicines::Medicine;
pub use navigator::{Navigator, NavigatorNoop};
pub use profile::{Profile, ProfileUpdate};
pub use reports::ReportFile;
pub use request::{ApiRequest, ApiResponse};
pub use symptoms::{Severity, Symptom, SymptomCheckResult, SymptomChecker, SymptomDuration, SymptomForm};
pub use token_store::{FileStorage, MemoryStorage, TokenStorage, TokenStore};
pub use types::{AccessClaims, AuthTokens, Gender};
