//! Patient profiles and classification prompts.
//!
//! A [`PatientProfile`] is built once per classification request from unvalidated
//! [`PatientInput`]. Its structured fields are rendered as short clauses that are placed in front
//! of the free-text symptoms to form the prompt sent to the ranking oracle.

use crate::validation::{
    validate_finite_measurement, validate_not_blank, validate_patient_age,
    validate_positive_measurement,
};
use crate::TriageResult;
use medirank_types::{BloodPressure, Gender};

/// Raw, unvalidated patient fields as supplied by a caller.
#[derive(Clone, Debug, Default)]
pub struct PatientInput {
    pub symptoms: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub candidate_labels: Option<Vec<String>>,
}

/// A validated patient description for one classification request.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientProfile {
    symptoms: String,
    weight: Option<f64>,
    height: Option<f64>,
    blood_pressure: Option<BloodPressure>,
    temperature: Option<f64>,
    age: Option<u32>,
    gender: Option<Gender>,
    candidate_labels: Vec<String>,
}

impl PatientProfile {
    /// Creates a profile holding only symptoms.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if the symptoms are blank.
    pub fn from_symptoms(symptoms: impl Into<String>) -> TriageResult<Self> {
        Self::try_from(PatientInput {
            symptoms: symptoms.into(),
            ..PatientInput::default()
        })
    }

    /// The free-text symptoms, exactly as supplied.
    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Caller-supplied candidate labels; empty when none were given.
    pub fn candidate_labels(&self) -> &[String] {
        &self.candidate_labels
    }

    /// Renders the present structured fields as clauses.
    ///
    /// Order is fixed: age, gender, weight, height, blood pressure, temperature. Absent fields
    /// produce nothing.
    pub fn feature_clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();

        if let Some(age) = self.age {
            clauses.push(format!("Age: {age}"));
        }
        if let Some(gender) = self.gender {
            clauses.push(format!("Gender: {gender}"));
        }
        if let Some(weight) = self.weight {
            clauses.push(format!("Weight: {weight} kg"));
        }
        if let Some(height) = self.height {
            clauses.push(format!("Height: {height} cm"));
        }
        if let Some(bp) = &self.blood_pressure {
            clauses.push(format!("Blood Pressure: {bp}"));
        }
        if let Some(temperature) = self.temperature {
            clauses.push(format!("Temperature: {temperature}°C"));
        }

        clauses
    }

    /// The structured clauses joined with `", "`. Empty when no structured field is set.
    pub fn structured_info(&self) -> String {
        self.feature_clauses().join(", ")
    }

    /// Builds the classification prompt.
    ///
    /// Structured information, when present, always precedes the symptoms:
    /// `"<structured>. Symptoms: <symptoms>"`. Otherwise the symptoms are returned verbatim.
    pub fn build_prompt(&self) -> String {
        let structured_info = self.structured_info();
        if structured_info.is_empty() {
            self.symptoms.clone()
        } else {
            format!("{structured_info}. Symptoms: {}", self.symptoms)
        }
    }
}

impl TryFrom<PatientInput> for PatientProfile {
    type Error = crate::TriageError;

    fn try_from(input: PatientInput) -> TriageResult<Self> {
        validate_not_blank("symptoms", &input.symptoms)?;

        let weight = input
            .weight
            .map(|w| validate_positive_measurement("weight", w))
            .transpose()?;
        let height = input
            .height
            .map(|h| validate_positive_measurement("height", h))
            .transpose()?;
        let temperature = input
            .temperature
            .map(|t| validate_finite_measurement("temperature", t))
            .transpose()?;
        let age = input.age.map(validate_patient_age).transpose()?;
        let blood_pressure = input
            .blood_pressure
            .as_deref()
            .map(BloodPressure::parse)
            .transpose()?;
        let gender = input
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()?;

        Ok(Self {
            symptoms: input.symptoms,
            weight,
            height,
            blood_pressure,
            temperature,
            age,
            gender,
            candidate_labels: input.candidate_labels.unwrap_or_default(),
        })
    }
}
