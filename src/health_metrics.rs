//! BMI and BMR estimates
//!
//! The backend computes the authoritative figures; these give an immediate
//! preview while the user edits their profile.

use crate::types::Gender;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::NormalWeight
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obesity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obesity => "Obesity",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl Bmi {
    /// Value rounded to one decimal place for display
    pub fn rounded(&self) -> f64 {
        (self.value * 10.0).round() / 10.0
    }
}

/// Body Mass Index from weight (kg) and height (cm)
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<Bmi> {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    Some(Bmi {
        value,
        category: BmiCategory::from_bmi(value),
    })
}

/// Basal Metabolic Rate (kcal/day), Mifflin-St Jeor, rounded
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> Option<f64> {
    if !(weight_kg > 0.0 && height_cm > 0.0) || age == 0 {
        return None;
    }
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let adjusted = match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    };
    Some(adjusted.round())
}

/// A figure the backend reports either as a number or as a placeholder
/// such as `"N/A"` when the profile is incomplete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Text("N/A".to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Deserialize an optional number that may arrive as a decimal string
/// (`"70.50"`), a JSON number, an empty string or null
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<MetricValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MetricValue::Number(n)) => Ok(Some(n)),
        Some(MetricValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(MetricValue::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}
