//! Dashboard data, weight and meal logging, weight trend

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::health_metrics::MetricValue;
use crate::request::ApiRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Window the backend returns weight entries for
pub const WEIGHT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub user: Option<DashboardUser>,
    pub health_snapshot: HealthSnapshot,
    #[serde(default)]
    pub weight_progress: Vec<WeightEntry>,
    #[serde(default)]
    pub symptom_history: Vec<SymptomHistoryEntry>,
    /// Empty object when today's tracker could not be loaded
    #[serde(default)]
    pub diet_tracker: Option<DietTracker>,
}

impl DashboardData {
    pub fn weight_trend(&self) -> WeightTrend {
        WeightTrend::from_entries(&self.weight_progress)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardUser {
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthSnapshot {
    pub bmi: BmiSnapshot,
    pub bmr: BmrSnapshot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BmiSnapshot {
    pub value: MetricValue,
    /// A BMI category, or a hint such as "Please complete your profile"
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BmrSnapshot {
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightEntry {
    pub timestamp: NaiveDate,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymptomHistoryEntry {
    pub predicted_disease: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DietTracker {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub breakfast_completed: bool,
    #[serde(default)]
    pub lunch_completed: bool,
    #[serde(default)]
    pub dinner_completed: bool,
}

impl DietTracker {
    pub fn completed_meals(&self) -> usize {
        [self.breakfast_completed, self.lunch_completed, self.dinner_completed]
            .into_iter()
            .filter(|done| *done)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Meal {
    #[serde(rename = "breakfast_completed")]
    Breakfast,
    #[serde(rename = "lunch_completed")]
    Lunch,
    #[serde(rename = "dinner_completed")]
    Dinner,
}

#[derive(Debug, Serialize)]
struct LogWeightRequest {
    weight: f64,
}

#[derive(Debug, Serialize)]
struct LogMealRequest {
    meal: Meal,
    status: bool,
}

/// Weight entries ordered by day, ready for charting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTrend {
    pub points: Vec<WeightEntry>,
}

impl WeightTrend {
    pub fn from_entries(entries: &[WeightEntry]) -> Self {
        let mut points = entries.to_vec();
        points.sort_by_key(|entry| entry.timestamp);
        // One entry per day; a later entry for the same day wins
        points.reverse();
        points.dedup_by_key(|entry| entry.timestamp);
        points.reverse();
        Self { points }
    }

    pub fn latest(&self) -> Option<&WeightEntry> {
        self.points.last()
    }

    /// Latest weight minus earliest weight in the window
    pub fn net_change(&self) -> Option<f64> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => Some(last.weight_kg - first.weight_kg),
            _ => None,
        }
    }

    pub fn days_logged(&self) -> usize {
        self.points.len()
    }

    /// Share of days in the window with a logged weight, as a whole percentage
    pub fn adherence_percent(&self) -> u32 {
        let percent = (self.days_logged() as f64 / f64::from(WEIGHT_WINDOW_DAYS) * 100.0).round();
        percent.min(100.0) as u32
    }
}

impl ApiClient {
    pub async fn dashboard_data(&self) -> Result<DashboardData> {
        self.json(ApiRequest::get("/dashboard/data/")).await
    }

    /// Record today's weight; a second entry on the same day replaces the first
    pub async fn log_weight(&self, weight_kg: f64) -> Result<()> {
        if !(weight_kg > 0.0 && weight_kg.is_finite()) {
            return Err(ClientError::Validation("Weight must be a positive number.".to_string()));
        }
        self.request(ApiRequest::post("/dashboard/log-weight/").json(&LogWeightRequest { weight: weight_kg })?)
            .await?;
        info!(weight_kg = %weight_kg, "Weight logged");
        Ok(())
    }

    /// Mark a meal in today's diet tracker as done or not done
    pub async fn log_meal(&self, meal: Meal, completed: bool) -> Result<DietTracker> {
        self.json(
            ApiRequest::post("/dashboard/log-meal/").json(&LogMealRequest {
                meal,
                status: completed,
            })?,
        )
        .await
    }
}
