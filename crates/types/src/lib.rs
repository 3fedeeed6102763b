//! # MediRank Types
//!
//! Validated value types shared by the core service, the REST API and the CLI.
//!
//! Every type here can only be constructed through a checking constructor, so code holding one
//! never has to re-validate it.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static BLOOD_PRESSURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2,3})/(\d{2,3})$").expect("blood pressure pattern is a valid regex")
});

/// Errors raised when a structured clinical value fails validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("blood pressure must look like 'systolic/diastolic' with 2-3 digits each, got '{0}'")]
    BloodPressure(String),
    #[error("gender must be one of male, female or other, got '{0}'")]
    Gender(String),
    #[error("ICD code cannot be empty")]
    EmptyIcdCode,
}

/// An ICD disease code such as `J45` or `J06.9`.
///
/// The code is stored as written (trimmed). Comparison against other codes ignores ASCII case,
/// which is how catalog lookups match.
#[derive(Debug, Clone)]
pub struct IcdCode(String);

impl IcdCode {
    /// Parses an ICD code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyIcdCode` if nothing remains after trimming.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyIcdCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when `other` names the same code, ignoring ASCII case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl PartialEq for IcdCode {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for IcdCode {}

impl fmt::Display for IcdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IcdCode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for IcdCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for IcdCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IcdCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A blood pressure reading in `systolic/diastolic` form, e.g. `120/80`.
///
/// The original text is kept so prompts echo the reading exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodPressure {
    raw: String,
    systolic: u16,
    diastolic: u16,
}

impl BloodPressure {
    /// Parses a reading matching `^\d{2,3}/\d{2,3}$`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::BloodPressure` for anything else, including surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        let caps = BLOOD_PRESSURE_PATTERN
            .captures(input)
            .ok_or_else(|| ValueError::BloodPressure(input.to_owned()))?;

        // Both groups are 2-3 ASCII digits, which always fit a u16.
        let systolic = caps[1]
            .parse()
            .map_err(|_| ValueError::BloodPressure(input.to_owned()))?;
        let diastolic = caps[2]
            .parse()
            .map_err(|_| ValueError::BloodPressure(input.to_owned()))?;

        Ok(Self {
            raw: input.to_owned(),
            systolic,
            diastolic,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn systolic(&self) -> u16 {
        self.systolic
    }

    pub fn diastolic(&self) -> u16 {
        self.diastolic
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for BloodPressure {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Patient gender as accepted by the classification endpoint.
///
/// Only the exact lowercase spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValueError::Gender(s.to_owned())),
        }
    }
}
