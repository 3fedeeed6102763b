//! Request and response bodies of the REST API.

use medirank_core::{Classification, DosageRecommendation, PatientInput};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Symptoms and optional vitals to rank candidate diseases against.
///
/// `text`, `blood_pressure` and `diseases` are accepted as aliases of `symptoms`,
/// `bloodPressure` and `candidateLabels`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyReq {
    /// Patient symptoms or description.
    #[serde(alias = "text")]
    pub symptoms: String,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Blood pressure as `systolic/diastolic`, e.g. `120/80`.
    #[serde(alias = "blood_pressure")]
    pub blood_pressure: Option<String>,
    /// Body temperature in Celsius.
    pub temperature: Option<f64>,
    /// Age in years.
    pub age: Option<i64>,
    /// One of `male`, `female` or `other`.
    pub gender: Option<String>,
    /// Diseases to consider instead of the default list (max 100).
    #[serde(alias = "diseases")]
    pub candidate_labels: Option<Vec<String>>,
}

impl From<ClassifyReq> for PatientInput {
    fn from(req: ClassifyReq) -> Self {
        PatientInput {
            symptoms: req.symptoms,
            weight: req.weight,
            height: req.height,
            blood_pressure: req.blood_pressure,
            temperature: req.temperature,
            age: req.age,
            gender: req.gender,
            candidate_labels: req.candidate_labels,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionRes {
    pub disease: String,
    pub score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRes {
    pub predicted_disease: String,
    pub predictions: Vec<PredictionRes>,
}

impl ClassifyRes {
    /// Returns `None` when the ranking is empty, which the pipeline never produces.
    pub fn from_classification(classification: Classification) -> Option<Self> {
        let predicted_disease = classification.predicted_disease()?.to_string();
        let predictions = classification
            .ranking
            .into_predictions()
            .into_iter()
            .map(|p| PredictionRes {
                disease: p.label,
                score: p.score,
            })
            .collect();

        Some(Self {
            predicted_disease,
            predictions,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DosageReq {
    /// ICD code of the diagnosed condition, matched case-insensitively.
    pub icd: String,
    /// Patient age in whole years.
    pub age: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDosageRes {
    pub medication: String,
    pub recommended_dosage: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DosageRes {
    pub disease: String,
    pub medications: Vec<MedicationDosageRes>,
}

impl From<DosageRecommendation> for DosageRes {
    fn from(rec: DosageRecommendation) -> Self {
        Self {
            disease: rec.disease,
            medications: rec
                .medications
                .into_iter()
                .map(|m| MedicationDosageRes {
                    medication: m.medication,
                    recommended_dosage: m.recommended_dosage,
                })
                .collect(),
        }
    }
}
