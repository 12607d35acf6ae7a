//! Symptom checker: symptom catalogue, the multi-step form and submission

use crate::auth_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::types::Gender;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symptom {
    Fever,
    Fatigue,
    Chills,
    BodyAche,
    ExcessiveThirst,
    Headache,
    SoreThroat,
    Cough,
    ShortnessOfBreath,
    RunnyNose,
    Sneezing,
    Nausea,
    Vomiting,
    Diarrhea,
    AbdominalPain,
    JointPain,
    Rash,
    BackPain,
    Anxiety,
    Insomnia,
    Depression,
    BlurredVision,
    FrequentUrination,
    BurningSensationUrination,
}

impl Symptom {
    pub const ALL: [Symptom; 24] = [
        Self::Fever,
        Self::Fatigue,
        Self::Chills,
        Self::BodyAche,
        Self::ExcessiveThirst,
        Self::Headache,
        Self::SoreThroat,
        Self::Cough,
        Self::ShortnessOfBreath,
        Self::RunnyNose,
        Self::Sneezing,
        Self::Nausea,
        Self::Vomiting,
        Self::Diarrhea,
        Self::AbdominalPain,
        Self::JointPain,
        Self::Rash,
        Self::BackPain,
        Self::Anxiety,
        Self::Insomnia,
        Self::Depression,
        Self::BlurredVision,
        Self::FrequentUrination,
        Self::BurningSensationUrination,
    ];

    /// Field name in the prediction payload
    pub fn key(&self) -> &'static str {
        match self {
            Self::Fever => "fever",
            Self::Fatigue => "fatigue",
            Self::Chills => "chills",
            Self::BodyAche => "body_ache",
            Self::ExcessiveThirst => "excessive_thirst",
            Self::Headache => "headache",
            Self::SoreThroat => "sore_throat",
            Self::Cough => "cough",
            Self::ShortnessOfBreath => "shortness_of_breath",
            Self::RunnyNose => "runny_nose",
            Self::Sneezing => "sneezing",
            Self::Nausea => "nausea",
            Self::Vomiting => "vomiting",
            Self::Diarrhea => "diarrhea",
            Self::AbdominalPain => "abdominal_pain",
            Self::JointPain => "joint_pain",
            Self::Rash => "rash",
            Self::BackPain => "back_pain",
            Self::Anxiety => "anxiety",
            Self::Insomnia => "insomnia",
            Self::Depression => "depression",
            Self::BlurredVision => "blurred_vision",
            Self::FrequentUrination => "frequent_urination",
            Self::BurningSensationUrination => "burning_sensation_urination",
        }
    }

    /// Display label, e.g. "Shortness Of Breath"
    pub fn label(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn group(&self) -> SymptomGroup {
        SymptomGroup::ALL
            .into_iter()
            .find(|group| group.symptoms().contains(self))
            .unwrap_or(SymptomGroup::GeneralSystemic)
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sections the symptom step is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomGroup {
    GeneralSystemic,
    HeadRespiratory,
    Gastrointestinal,
    MusculoskeletalSkin,
    NeurologicalMental,
    Urinary,
}

impl SymptomGroup {
    pub const ALL: [SymptomGroup; 6] = [
        Self::GeneralSystemic,
        Self::HeadRespiratory,
        Self::Gastrointestinal,
        Self::MusculoskeletalSkin,
        Self::NeurologicalMental,
        Self::Urinary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::GeneralSystemic => "General & Systemic",
            Self::HeadRespiratory => "Head & Respiratory",
            Self::Gastrointestinal => "Gastrointestinal",
            Self::MusculoskeletalSkin => "Musculoskeletal & Skin",
            Self::NeurologicalMental => "Neurological & Mental State",
            Self::Urinary => "Urinary",
        }
    }

    pub fn symptoms(&self) -> &'static [Symptom] {
        use Symptom::*;
        match self {
            Self::GeneralSystemic => &[Fever, Fatigue, Chills, BodyAche, ExcessiveThirst],
            Self::HeadRespiratory => &[Headache, SoreThroat, Cough, ShortnessOfBreath, RunnyNose, Sneezing],
            Self::Gastrointestinal => &[Nausea, Vomiting, Diarrhea, AbdominalPain],
            Self::MusculoskeletalSkin => &[JointPain, Rash, BackPain],
            Self::NeurologicalMental => &[Anxiety, Insomnia, Depression, BlurredVision],
            Self::Urinary => &[FrequentUrination, BurningSensationUrination],
        }
    }
}

/// Severity scale, sent as 0-3
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    #[default]
    None = 0,
    Mild = 1,
    Moderate = 2,
    Severe = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::None, Self::Mild, Self::Moderate, Self::Severe];

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| ClientError::Validation(format!("Severity must be 0-3, got {value}")))
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymptomDuration {
    #[default]
    #[serde(rename = "1-3 days")]
    OneToThreeDays,
    #[serde(rename = "4-7 days")]
    FourToSevenDays,
    #[serde(rename = "more than a week")]
    MoreThanAWeek,
}

/// Answers collected by the symptom checker
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomForm {
    pub age: Option<u32>,
    pub gender: Gender,
    pub duration: SymptomDuration,
    severities: BTreeMap<Symptom, Severity>,
}

impl Default for SymptomForm {
    fn default() -> Self {
        Self {
            age: None,
            gender: Gender::Male,
            duration: SymptomDuration::default(),
            severities: BTreeMap::new(),
        }
    }
}

impl SymptomForm {
    pub const MIN_AGE: u32 = 1;
    pub const MAX_AGE: u32 = 120;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&mut self, symptom: Symptom, severity: Severity) {
        if severity == Severity::None {
            self.severities.remove(&symptom);
        } else {
            self.severities.insert(symptom, severity);
        }
    }

    pub fn severity(&self, symptom: Symptom) -> Severity {
        self.severities.get(&symptom).copied().unwrap_or_default()
    }

    /// Symptoms rated above None
    pub fn reported(&self) -> impl Iterator<Item = (Symptom, Severity)> + '_ {
        self.severities.iter().map(|(symptom, severity)| (*symptom, *severity))
    }

    /// Checks for the first step
    pub fn validate_demographics(&self) -> Result<()> {
        match self.age {
            Some(age) if (Self::MIN_AGE..=Self::MAX_AGE).contains(&age) => Ok(()),
            _ => Err(ClientError::Validation(format!(
                "Please enter a valid age between {} and {}.",
                Self::MIN_AGE,
                Self::MAX_AGE
            ))),
        }
    }

    /// Checks before submission
    pub fn validate(&self) -> Result<()> {
        self.validate_demographics()?;
        if self.severities.is_empty() {
            return Err(ClientError::Validation(
                "Please rate at least one symptom as Mild, Moderate, or Severe.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Every symptom is sent, unrated ones as 0
impl Serialize for SymptomForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + Symptom::ALL.len()))?;
        map.serialize_entry("age", &self.age)?;
        map.serialize_entry("gender", &self.gender)?;
        map.serialize_entry("primary_symptom_duration", &self.duration)?;
        for symptom in Symptom::ALL {
            map.serialize_entry(symptom.key(), &self.severity(symptom))?;
        }
        map.end()
    }
}

/// Informational treatment overview for the predicted condition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Treatment {
    #[serde(default)]
    pub medicine_name: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub meal_relation: Option<String>,
    #[serde(default)]
    pub routine: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub contraindications: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymptomCheckResult {
    pub predicted_disease: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Most likely conditions with their probability, best first
    #[serde(default)]
    pub top_3_predictions: Vec<(String, f64)>,
    #[serde(default)]
    pub allopathic_treatment: Treatment,
    #[serde(default)]
    pub ayurvedic_treatment: Treatment,
}

/// Where the symptom checker currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerStep {
    Demographics,
    Symptoms,
    Result,
}

/// The symptom checker's two input steps followed by the result
#[derive(Debug, Clone)]
pub struct SymptomChecker {
    step: CheckerStep,
    pub form: SymptomForm,
    result: Option<SymptomCheckResult>,
}

impl Default for SymptomChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SymptomChecker {
    pub fn new() -> Self {
        Self {
            step: CheckerStep::Demographics,
            form: SymptomForm::new(),
            result: None,
        }
    }

    pub fn step(&self) -> CheckerStep {
        self.step
    }

    pub fn result(&self) -> Option<&SymptomCheckResult> {
        self.result.as_ref()
    }

    /// Move from demographics to symptoms once the age is valid
    pub fn next_step(&mut self) -> Result<CheckerStep> {
        match self.step {
            CheckerStep::Demographics => {
                self.form.validate_demographics()?;
                self.step = CheckerStep::Symptoms;
            }
            CheckerStep::Symptoms | CheckerStep::Result => {}
        }
        Ok(self.step)
    }

    pub fn previous_step(&mut self) -> CheckerStep {
        if self.step == CheckerStep::Symptoms {
            self.step = CheckerStep::Demographics;
        }
        self.step
    }

    /// Submit the answers and move to the result step
    pub async fn submit(&mut self, client: &ApiClient) -> Result<&SymptomCheckResult> {
        if self.step != CheckerStep::Symptoms {
            return Err(ClientError::Validation(
                "Complete the previous step before submitting.".to_string(),
            ));
        }
        let result = client.check_symptoms(&self.form).await?;
        self.step = CheckerStep::Result;
        Ok(self.result.insert(result))
    }

    /// Start over with a blank form
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl ApiClient {
    pub async fn check_symptoms(&self, form: &SymptomForm) -> Result<SymptomCheckResult> {
        form.validate()?;
        let result: SymptomCheckResult = self
            .json(ApiRequest::post("/symptoms/check/").json(form)?)
            .await?;
        info!(
            predicted_disease = %result.predicted_disease,
            reported = %form.severities.len(),
            "Symptom check finished"
        );
        Ok(result)
    }
}
