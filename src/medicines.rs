//! Medicine lookup

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use serde::Deserialize;
use tracing::debug;

/// Shortest search term the client will send
pub const MIN_SEARCH_LEN: usize = 2;

/// A medicine record, either from the backend's catalogue or looked up
/// online by the backend when the catalogue has no match
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Medicine {
    pub medicine_name: String,
    #[serde(default)]
    pub medicine_type: Option<String>,
    #[serde(default)]
    pub treats_disease: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub meal_relation: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default)]
    pub routine: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    /// Set for records found online, naming where they came from
    #[serde(default)]
    pub source: Option<String>,
}

impl Medicine {
    /// Record comes from the backend's own catalogue
    pub fn is_catalogued(&self) -> bool {
        self.source.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

impl ApiClient {
    pub async fn search_medicines(&self, term: &str) -> Result<Vec<Medicine>> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Err(ClientError::Validation(format!(
                "Enter at least {MIN_SEARCH_LEN} characters to search."
            )));
        }

        let results: Vec<Medicine> = self
            .json(ApiRequest::get("/medicines/search/").query("search", term))
            .await?;

        debug!(term = %term, results = %results.len(), "Medicine search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_record() {
        let medicine: Medicine = serde_json::from_str(
            r#"{"medicine_name": "Paracetamol", "medicine_type": "Allopathic", "treats_disease": "Fever",
                "frequency": "Every 6 hours", "meal_relation": "After meal", "routine": null,
                "side_effects": "Nausea", "contraindications": "Liver disease"}"#,
        )
        .unwrap();
        assert!(medicine.is_catalogued());
        assert_eq!(medicine.routine, None);
    }

    #[test]
    fn test_online_record() {
        let medicine: Medicine = serde_json::from_str(
            r#"{"medicine_name": "Ibuprofen", "treats_disease": "Pain", "side_effects": "Heartburn",
                "frequency": "Follow prescription instructions", "meal_relation": "Check with pharmacist",
                "source": "Drugs.com", "price": "Varies"}"#,
        )
        .unwrap();
        assert!(!medicine.is_catalogued());
        assert_eq!(medicine.medicine_type, None);
    }
}
