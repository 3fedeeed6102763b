//! Age-based dosage rules.
//!
//! Each medication carries an ordered list of rules mapping an age range to a dosage text.
//! Ranges are written either as a closed interval `min-max` (both ends inclusive) or as an
//! open-ended `min+`. Resolution is first-match-wins: the earliest rule whose range contains the
//! age decides, even if later rules overlap it.

use crate::constants::NO_DOSAGE_RULE_FOUND;
use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed age range in whole years.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeRange {
    /// `min-max`, inclusive at both ends.
    Closed { min: u32, max: u32 },
    /// `min+`, any age at or above `min`.
    From { min: u32 },
}

impl AgeRange {
    /// Parses `min-max` or `min+`. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::RuleFormat` when a bound is not a non-negative integer, the separator
    /// is missing, or `min` is greater than `max`.
    pub fn parse(input: &str) -> TriageResult<Self> {
        let malformed = |reason| TriageError::RuleFormat {
            range: input.to_string(),
            reason,
        };
        let trimmed = input.trim();

        if let Some(min) = trimmed.strip_suffix('+') {
            let min = parse_bound(min).ok_or_else(|| malformed("lower bound is not an integer"))?;
            return Ok(AgeRange::From { min });
        }

        let (min, max) = trimmed
            .split_once('-')
            .ok_or_else(|| malformed("expected 'min-max' or 'min+'"))?;
        let min = parse_bound(min).ok_or_else(|| malformed("lower bound is not an integer"))?;
        let max = parse_bound(max).ok_or_else(|| malformed("upper bound is not an integer"))?;
        if min > max {
            return Err(malformed("lower bound is greater than upper bound"));
        }

        Ok(AgeRange::Closed { min, max })
    }

    /// True when `age` lies inside the range. Negative ages never match.
    pub fn contains(&self, age: i64) -> bool {
        match *self {
            AgeRange::Closed { min, max } => i64::from(min) <= age && age <= i64::from(max),
            AgeRange::From { min } => age >= i64::from(min),
        }
    }
}

fn parse_bound(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl FromStr for AgeRange {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeRange::Closed { min, max } => write!(f, "{min}-{max}"),
            AgeRange::From { min } => write!(f, "{min}+"),
        }
    }
}

/// One age rule as written in the catalog.
///
/// The range stays in its textual form until it is evaluated, so a malformed rule is reported at
/// the point it would have been used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeDosageRule {
    pub age_range: String,
    pub dosage: String,
}

impl AgeDosageRule {
    pub fn new(age_range: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            age_range: age_range.into(),
            dosage: dosage.into(),
        }
    }

    pub fn range(&self) -> TriageResult<AgeRange> {
        AgeRange::parse(&self.age_range)
    }
}

/// Returns the dosage of the first rule whose range contains `age`.
///
/// When no rule matches, returns [`NO_DOSAGE_RULE_FOUND`]; that is a normal outcome.
///
/// # Errors
///
/// Returns `TriageError::RuleFormat` for the first rule, in list order, whose range cannot be
/// parsed. Rules after a match are not evaluated.
pub fn resolve_dosage(age: i64, rules: &[AgeDosageRule]) -> TriageResult<&str> {
    for rule in rules {
        if rule.range()?.contains(age) {
            return Ok(&rule.dosage);
        }
    }
    Ok(NO_DOSAGE_RULE_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paediatric_rules() -> Vec<AgeDosageRule> {
        vec![
            AgeDosageRule::new("0-2", "A"),
            AgeDosageRule::new("3-12", "B"),
            AgeDosageRule::new("13+", "C"),
        ]
    }

    #[test]
    fn test_parse_closed_and_open_ranges() {
        assert_eq!(AgeRange::parse("0-2").unwrap(), AgeRange::Closed { min: 0, max: 2 });
        assert_eq!(AgeRange::parse(" 3 - 12 ").unwrap(), AgeRange::Closed { min: 3, max: 12 });
        assert_eq!(AgeRange::parse("65+").unwrap(), AgeRange::From { min: 65 });
        assert_eq!(AgeRange::parse("7-7").unwrap(), AgeRange::Closed { min: 7, max: 7 });
    }

    #[test]
    fn test_parse_rejects_malformed_ranges() {
        for input in ["", "12", "a-b", "3-", "-3", "+", "x+", "3-12-20", "3.5-12", "12-3", "1 2+"] {
            let err = AgeRange::parse(input).expect_err(input);
            assert!(
                matches!(&err, TriageError::RuleFormat { range, .. } if range == input),
                "unexpected error for {input:?}: {err}"
            );
        }
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        assert_eq!(AgeRange::Closed { min: 3, max: 12 }.to_string(), "3-12");
        assert_eq!(AgeRange::From { min: 13 }.to_string(), "13+");
    }

    #[test]
    fn test_resolve_picks_matching_band() {
        let rules = paediatric_rules();
        assert_eq!(resolve_dosage(5, &rules).unwrap(), "B");
        assert_eq!(resolve_dosage(15, &rules).unwrap(), "C");
        assert_eq!(resolve_dosage(0, &rules).unwrap(), "A");
        assert_eq!(resolve_dosage(2, &rules).unwrap(), "A");
        assert_eq!(resolve_dosage(12, &rules).unwrap(), "B");
        assert_eq!(resolve_dosage(200, &rules).unwrap(), "C");
    }

    #[test]
    fn test_resolve_without_match_returns_sentinel() {
        let rules = paediatric_rules();
        assert_eq!(resolve_dosage(-1, &rules).unwrap(), NO_DOSAGE_RULE_FOUND);

        let adults_only = vec![AgeDosageRule::new("18-64", "adult dose")];
        assert_eq!(resolve_dosage(70, &adults_only).unwrap(), "No dosage rule found");
        assert_eq!(resolve_dosage(30, &[]).unwrap(), NO_DOSAGE_RULE_FOUND);
    }

    #[test]
    fn test_resolve_first_match_wins_on_overlap() {
        let rules = vec![AgeDosageRule::new("0-10", "X"), AgeDosageRule::new("5-15", "Y")];
        assert_eq!(resolve_dosage(7, &rules).unwrap(), "X");
        assert_eq!(resolve_dosage(11, &rules).unwrap(), "Y");
    }

    #[test]
    fn test_resolve_surfaces_malformed_rule_before_a_later_match() {
        let rules = vec![
            AgeDosageRule::new("0-2", "A"),
            AgeDosageRule::new("three-12", "B"),
            AgeDosageRule::new("13+", "C"),
        ];

        assert_eq!(resolve_dosage(1, &rules).unwrap(), "A");
        let err = resolve_dosage(20, &rules).expect_err("malformed rule must not be skipped");
        assert!(matches!(err, TriageError::RuleFormat { range, .. } if range == "three-12"));
    }

    #[test]
    fn test_rule_deserializes_from_camel_case() {
        let rule: AgeDosageRule =
            serde_json::from_str(r#"{"ageRange": "13+", "dosage": "2 puffs"}"#).unwrap();
        assert_eq!(rule, AgeDosageRule::new("13+", "2 puffs"));
    }
}
