//! User profile

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::health_metrics::{calculate_bmi, calculate_bmr, optional_number, Bmi};
use crate::request::ApiRequest;
use crate::types::Gender;
use serde::{Deserialize, Serialize};
use tracing::info;

const PROFILE_PATH: &str = "/auth/profile/";

/// Profile as returned by the backend; health fields stay empty until the
/// user fills them in
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "optional_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "optional_number")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub height_cm: Option<f64>,
}

impl Profile {
    /// All fields needed for BMI/BMR are filled in
    pub fn is_complete(&self) -> bool {
        self.age.is_some() && self.gender.is_some() && self.weight_kg.is_some() && self.height_cm.is_some()
    }

    pub fn bmi(&self) -> Option<Bmi> {
        calculate_bmi(self.weight_kg?, self.height_cm?)
    }

    pub fn bmr(&self) -> Option<f64> {
        calculate_bmr(self.weight_kg?, self.height_cm?, self.age?, self.gender?)
    }

    /// Editable part of this profile, as a starting point for an update
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            age: self.age,
            gender: self.gender,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
        }
    }
}

fn optional_gender<'de, D>(deserializer: D) -> std::result::Result<Option<Gender>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

impl ProfileUpdate {
    pub const MIN_AGE: u32 = 1;
    pub const MAX_AGE: u32 = 100;

    pub fn validate(&self) -> Result<()> {
        if let Some(age) = self.age {
            if !(Self::MIN_AGE..=Self::MAX_AGE).contains(&age) {
                return Err(ClientError::Validation(format!(
                    "Age must be between {} and {}.",
                    Self::MIN_AGE,
                    Self::MAX_AGE
                )));
            }
        }
        if self.weight_kg.is_some_and(|w| !(w > 0.0)) {
            return Err(ClientError::Validation("Weight must be a positive number.".to_string()));
        }
        if self.height_cm.is_some_and(|h| !(h > 0.0)) {
            return Err(ClientError::Validation("Height must be a positive number.".to_string()));
        }
        if self.gender.is_none() {
            return Err(ClientError::Validation("Gender is required.".to_string()));
        }
        Ok(())
    }
}

impl ApiClient {
    pub async fn get_profile(&self) -> Result<Profile> {
        self.json(ApiRequest::get(PROFILE_PATH)).await
    }

    /// Save profile changes. The backend also records a weight entry for
    /// today when a weight is given.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        update.validate()?;
        let profile: Profile = self.json(ApiRequest::put(PROFILE_PATH).json(update)?).await?;
        info!(complete = %profile.is_complete(), "Profile updated");
        Ok(profile)
    }
}
