use clap::{Parser, Subcommand};
use medirank_core::constants::DEFAULT_MEDICATION_CATALOG_FILE;
use medirank_core::{IcdCode, MedicationCatalog, PatientInput, PatientProfile};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medirank")]
#[command(about = "MediRank triage toolkit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the classification prompt built from symptoms and vitals
    Prompt {
        /// Free-text symptoms
        symptoms: String,
        /// Age in years
        #[arg(long)]
        age: Option<i64>,
        /// One of male, female or other
        #[arg(long)]
        gender: Option<String>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Blood pressure as systolic/diastolic, e.g. 120/80
        #[arg(long)]
        blood_pressure: Option<String>,
        /// Body temperature in Celsius
        #[arg(long)]
        temperature: Option<f64>,
    },
    /// Resolve age-appropriate dosages for an ICD code
    Dosage {
        /// ICD code, matched case-insensitively
        icd: String,
        /// Patient age in whole years
        age: i64,
        /// Medication catalog file (JSON or YAML)
        #[arg(long, default_value = DEFAULT_MEDICATION_CATALOG_FILE)]
        catalog: PathBuf,
        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check every age range in the medication catalog
    CheckCatalog {
        /// Medication catalog file (JSON or YAML)
        #[arg(long, default_value = DEFAULT_MEDICATION_CATALOG_FILE)]
        catalog: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prompt {
            symptoms,
            age,
            gender,
            weight,
            height,
            blood_pressure,
            temperature,
        }) => {
            let profile = PatientProfile::try_from(PatientInput {
                symptoms,
                weight,
                height,
                blood_pressure,
                temperature,
                age,
                gender,
                candidate_labels: None,
            })?;
            println!("{}", profile.build_prompt());
        }
        Some(Commands::Dosage {
            icd,
            age,
            catalog,
            json,
        }) => {
            let catalog = MedicationCatalog::load(&catalog)?;
            let icd = IcdCode::parse(&icd)?;
            let rec = catalog.recommend(&icd, age)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                println!("{} ({})", rec.disease, icd);
                for m in rec.medications {
                    println!("  {}: {}", m.medication, m.recommended_dosage);
                }
            }
        }
        Some(Commands::CheckCatalog { catalog }) => {
            let path = catalog;
            let catalog = MedicationCatalog::load(&path)?;
            let defects = catalog.rule_defects();
            if defects.is_empty() {
                println!(
                    "{}: {} diseases, all age ranges valid",
                    path.display(),
                    catalog.len()
                );
            } else {
                for d in &defects {
                    eprintln!(
                        "{} / {}: invalid age range '{}': {}",
                        d.icd_code, d.medication, d.age_range, d.reason
                    );
                }
                return Err(format!("{} malformed age range(s) in {}", defects.len(), path.display()).into());
            }
        }
        None => {
            println!("Use 'medirank --help' for commands");
        }
    }

    Ok(())
}
