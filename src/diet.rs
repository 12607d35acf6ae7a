//! Diet and workout plan generation

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::Gender;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Super Active")]
    SuperActive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietPlanRequest {
    pub age: u32,
    pub gender: Gender,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    pub activity_level: ActivityLevel,
}

impl DietPlanRequest {
    /// Plans are only generated for adults
    pub const MIN_AGE: u32 = 18;

    pub fn validate(&self) -> Result<()> {
        if self.age < Self::MIN_AGE {
            return Err(ClientError::Validation(format!(
                "Diet plans are available from age {}.",
                Self::MIN_AGE
            )));
        }
        // BMR is only defined for Male and Female
        if self.gender == Gender::Other {
            return Err(ClientError::Validation("Select Male or Female to generate a diet plan.".to_string()));
        }
        if !(self.weight > 0.0) {
            return Err(ClientError::Validation("Weight must be a positive number.".to_string()));
        }
        if !(self.height > 0.0) {
            return Err(ClientError::Validation("Height must be a positive number.".to_string()));
        }
        Ok(())
    }
}

/// Generated plan; `diet_plan` and `workout_plan` are markdown
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DietPlan {
    pub bmi: f64,
    pub bmi_category: String,
    pub bmr: f64,
    pub diet_plan: String,
    pub workout_plan: String,
}

impl ApiClient {
    pub async fn generate_diet_plan(&self, request: &DietPlanRequest) -> Result<DietPlan> {
        request.validate()?;
        self.json(ApiRequest::post("/diet-plans/generate/").json(request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(age: u32) -> DietPlanRequest {
        DietPlanRequest {
            age,
            gender: Gender::Female,
            weight: 58.0,
            height: 162.0,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }

    #[test]
    fn test_payload() {
        let payload = serde_json::to_value(request(29)).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "age": 29, "gender": "Female", "weight": 58.0, "height": 162.0,
                "activity_level": "Moderately Active"
            })
        );
    }

    #[test]
    fn test_validation() {
        assert!(request(29).validate().is_ok());
        assert!(request(17).validate().is_err());

        let no_height = DietPlanRequest { height: 0.0, ..request(29) };
        assert!(no_height.validate().is_err());

        let other = DietPlanRequest {
            gender: Gender::Other,
            ..request(29)
        };
        assert!(matches!(other.validate(), Err(ClientError::Validation(_))));
        assert!(DietPlanRequest { gender: Gender::Male, ..request(29) }.validate().is_ok());
    }

    #[test]
    fn test_plan_response() {
        let plan: DietPlan = serde_json::from_str(
            "{\"bmi\": 22.1, \"bmi_category\": \"Normal weight\", \"bmr\": 1302, \
              \"diet_plan\": \"## Diet Plan\", \"workout_plan\": \"## Workout Plan\"}",
        )
        .unwrap();
        assert_eq!(plan.bmr, 1302.0);
        assert!(plan.diet_plan.starts_with("##"));
    }
}
