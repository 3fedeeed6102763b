//! Disease and medication catalog.
//!
//! The catalog maps ICD codes to diseases and the medications used to treat them, each with its
//! own ordered age-dosage rules. It is loaded once at startup and never modified afterwards.

use crate::dosage::{resolve_dosage, AgeDosageRule};
use crate::files::load_data_file;
use crate::{TriageError, TriageResult};
use medirank_types::IcdCode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A medication and its age-dosage rules, in priority order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage_by_age: Vec<AgeDosageRule>,
}

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRecord {
    pub icd_code: IcdCode,
    pub disease_name: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

/// The dosage resolved for one medication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDosage {
    pub medication: String,
    pub recommended_dosage: String,
}

/// Dosages for every medication of a disease, resolved for one age.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DosageRecommendation {
    pub disease: String,
    pub medications: Vec<MedicationDosage>,
}

/// A malformed age range found while checking the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDefect {
    pub icd_code: String,
    pub medication: String,
    pub age_range: String,
    pub reason: String,
}

/// Read-only collection of [`DiseaseRecord`]s.
#[derive(Clone, Debug, Default)]
pub struct MedicationCatalog {
    records: Vec<DiseaseRecord>,
}

impl MedicationCatalog {
    pub fn new(records: Vec<DiseaseRecord>) -> Self {
        Self { records }
    }

    /// Loads a catalog from a JSON or YAML array of disease records.
    ///
    /// Malformed age ranges do not stop loading; each one is logged as a warning and will be
    /// reported again as an error if a request reaches it.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let records: Vec<DiseaseRecord> = load_data_file(path)?;
        let catalog = Self::new(records);

        for defect in catalog.rule_defects() {
            tracing::warn!(
                icd_code = %defect.icd_code,
                medication = %defect.medication,
                age_range = %defect.age_range,
                "malformed dosage rule in catalog: {}",
                defect.reason
            );
        }
        tracing::info!(
            diseases = catalog.len(),
            path = %path.display(),
            "loaded medication catalog"
        );

        Ok(catalog)
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds the first record whose ICD code matches `icd_code`, ignoring ASCII case.
    pub fn find(&self, icd_code: &IcdCode) -> Option<&DiseaseRecord> {
        self.records.iter().find(|r| r.icd_code == *icd_code)
    }

    /// Resolves a dosage for every medication of the disease identified by `icd_code`.
    ///
    /// Each medication's rules are evaluated independently against the same age. A medication
    /// without a matching rule gets the "No dosage rule found" text.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - no record matches the code (`NotFound`),
    /// - a rule evaluated for this age is malformed (`RuleFormat`).
    pub fn recommend(&self, icd_code: &IcdCode, age: i64) -> TriageResult<DosageRecommendation> {
        let record = self
            .find(icd_code)
            .ok_or_else(|| TriageError::NotFound(icd_code.to_string()))?;

        let medications = record
            .medications
            .iter()
            .map(|medication| {
                let dosage = resolve_dosage(age, &medication.dosage_by_age)?;
                Ok(MedicationDosage {
                    medication: medication.name.clone(),
                    recommended_dosage: dosage.to_string(),
                })
            })
            .collect::<TriageResult<Vec<_>>>()?;

        Ok(DosageRecommendation {
            disease: record.disease_name.clone(),
            medications,
        })
    }

    /// Parses every age range in the catalog and lists the ones that are malformed.
    pub fn rule_defects(&self) -> Vec<RuleDefect> {
        let mut defects = Vec::new();
        for record in &self.records {
            for medication in &record.medications {
                for rule in &medication.dosage_by_age {
                    if let Err(err) = rule.range() {
                        let reason = match err {
                            TriageError::RuleFormat { reason, .. } => reason.to_string(),
                            other => other.to_string(),
                        };
                        defects.push(RuleDefect {
                            icd_code: record.icd_code.to_string(),
                            medication: medication.name.clone(),
                            age_range: rule.age_range.clone(),
                            reason,
                        });
                    }
                }
            }
        }
        defects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NO_DOSAGE_RULE_FOUND;
    use std::fs;
    use tempfile::TempDir;

    fn icd(code: &str) -> IcdCode {
        IcdCode::parse(code).unwrap()
    }

    fn asthma_catalog() -> MedicationCatalog {
        MedicationCatalog::new(vec![
            DiseaseRecord {
                icd_code: icd("J45"),
                disease_name: "Asthma".into(),
                medications: vec![
                    Medication {
                        name: "Salbutamol inhaler".into(),
                        dosage_by_age: vec![
                            AgeDosageRule::new("0-4", "100 mcg as needed via spacer"),
                            AgeDosageRule::new("5+", "100-200 mcg as needed"),
                        ],
                    },
                    Medication {
                        name: "Prednisolone".into(),
                        dosage_by_age: vec![
                            AgeDosageRule::new("2-11", "1-2 mg/kg once daily for 3 days"),
                            AgeDosageRule::new("12+", "40-50 mg once daily for 5 days"),
                        ],
                    },
                ],
            },
            DiseaseRecord {
                icd_code: icd("J45"),
                disease_name: "Shadowed duplicate".into(),
                medications: vec![],
            },
        ])
    }

    #[test]
    fn test_recommend_resolves_each_medication_independently() {
        let catalog = asthma_catalog();

        let rec = catalog.recommend(&icd("J45"), 3).unwrap();
        assert_eq!(rec.disease, "Asthma");
        assert_eq!(
            rec.medications,
            vec![
                MedicationDosage {
                    medication: "Salbutamol inhaler".into(),
                    recommended_dosage: "100 mcg as needed via spacer".into(),
                },
                MedicationDosage {
                    medication: "Prednisolone".into(),
                    recommended_dosage: "1-2 mg/kg once daily for 3 days".into(),
                },
            ]
        );

        let rec = catalog.recommend(&icd("J45"), 1).unwrap();
        assert_eq!(rec.medications[0].recommended_dosage, "100 mcg as needed via spacer");
        assert_eq!(rec.medications[1].recommended_dosage, NO_DOSAGE_RULE_FOUND);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = asthma_catalog();
        let upper = catalog.recommend(&icd("J45"), 30).unwrap();
        let lower = catalog.recommend(&icd("j45"), 30).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_first_matching_record_wins() {
        let catalog = asthma_catalog();
        assert_eq!(catalog.find(&icd("j45")).unwrap().disease_name, "Asthma");
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let err = asthma_catalog()
            .recommend(&icd("ZZZZZ"), 30)
            .expect_err("unknown code");
        assert!(matches!(&err, TriageError::NotFound(code) if code == "ZZZZZ"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_malformed_rule_is_surfaced() {
        let catalog = MedicationCatalog::new(vec![DiseaseRecord {
            icd_code: icd("N39.0"),
            disease_name: "Urinary tract infection".into(),
            medications: vec![Medication {
                name: "Nitrofurantoin".into(),
                dosage_by_age: vec![AgeDosageRule::new("twelve+", "50 mg")],
            }],
        }]);

        let err = catalog
            .recommend(&icd("n39.0"), 40)
            .expect_err("malformed rule");
        assert!(matches!(err, TriageError::RuleFormat { .. }));
        assert!(!err.is_client_error());

        let defects = catalog.rule_defects();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].medication, "Nitrofurantoin");
        assert_eq!(defects[0].age_range, "twelve+");
    }

    #[test]
    fn test_load_yaml_catalog() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("medications.yaml");
        fs::write(
            &path,
            r#"
- icdCode: J45
  diseaseName: Asthma
  medications:
    - name: Salbutamol inhaler
      dosageByAge:
        - ageRange: "0-4"
          dosage: 100 mcg
        - ageRange: "5+"
          dosage: 200 mcg
"#,
        )
        .unwrap();

        let catalog = MedicationCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.rule_defects().is_empty());
        let rec = catalog.recommend(&icd("j45"), 9).unwrap();
        assert_eq!(rec.medications[0].recommended_dosage, "200 mcg");
    }

    #[test]
    fn test_load_rejects_record_with_empty_icd_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("medications.json");
        fs::write(
            &path,
            r#"[{"icdCode": "  ", "diseaseName": "Nothing", "medications": []}]"#,
        )
        .unwrap();

        let err = MedicationCatalog::load(&path).expect_err("empty ICD code");
        assert!(matches!(err, TriageError::JsonDeserialization { .. }));
    }
}
