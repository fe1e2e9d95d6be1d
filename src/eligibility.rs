//! Scheme eligibility rules and their evaluation against a citizen profile
//!
//! Each rule a scheme defines is checked once. A check lands in exactly one
//! of three lists: `matched`, `failed` (the profile contradicts the rule) or
//! `missing` (the profile lacks the field). Any failure makes the citizen
//! ineligible; otherwise a missing field makes them partially eligible.

use crate::records::Scheme;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State value that makes a state rule accept every profile
pub const CENTRAL_STATE: &str = "central";

/// Score of a partially eligible result
pub const PARTIAL_SCORE: u8 = 50;

/// Criteria a scheme may restrict; empty lists and `None` bounds mean
/// the criterion is not checked
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityRules {
    pub state_specific: Vec<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    /// Annual household income ceiling in rupees
    pub max_income: Option<u64>,
    pub required_category: Vec<String>,
    pub occupation_required: Vec<String>,
}

/// What the citizen has told us about themselves
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub state: Option<String>,
    pub age: Option<u32>,
    pub income: Option<u64>,
    /// Social category, e.g. `sc`, `st`, `obc`, `general`
    pub category: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    State,
    Age,
    Income,
    Category,
    Occupation,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::State => "state",
            Criterion::Age => "age",
            Criterion::Income => "income",
            Criterion::Category => "category",
            Criterion::Occupation => "occupation",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Fully Eligible")]
    FullyEligible,
    #[serde(rename = "Partially Eligible")]
    PartiallyEligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::FullyEligible => "Fully Eligible",
            Verdict::PartiallyEligible => "Partially Eligible",
            Verdict::NotEligible => "Not Eligible",
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            Verdict::FullyEligible => 100,
            Verdict::PartiallyEligible => PARTIAL_SCORE,
            Verdict::NotEligible => 0,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Outcome of checking one profile against one scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub scheme_id: String,
    pub name: String,
    pub score: u8,
    pub status: Verdict,
    pub matched: Vec<Criterion>,
    pub failed: Vec<Criterion>,
    pub missing: Vec<Criterion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Default)]
struct Outcome {
    matched: Vec<Criterion>,
    failed: Vec<Criterion>,
    missing: Vec<Criterion>,
}

impl Outcome {
    /// Record one check. `passed` is `None` when the profile field is absent.
    fn record(&mut self, criterion: Criterion, passed: Option<bool>) {
        match passed {
            None => self.missing.push(criterion),
            Some(true) => self.matched.push(criterion),
            Some(false) => self.failed.push(criterion),
        }
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

/// Check `profile` against the rules of `scheme`.
///
/// A scheme without rules is open to everyone.
pub fn evaluate(profile: &Profile, scheme: &Scheme) -> EligibilityResult {
    let Some(rules) = &scheme.rules else {
        return EligibilityResult {
            scheme_id: scheme.id.clone(),
            name: scheme.name.clone(),
            score: Verdict::FullyEligible.score(),
            status: Verdict::FullyEligible,
            matched: Vec::new(),
            failed: Vec::new(),
            missing: Vec::new(),
            explanation: Some("No specific rules defined for this scheme.".to_string()),
        };
    };

    let mut outcome = Outcome::default();

    if !rules.state_specific.is_empty() {
        let passed = profile.state.as_deref().map(|state| {
            contains_ignore_case(&rules.state_specific, state)
                || contains_ignore_case(&rules.state_specific, CENTRAL_STATE)
        });
        outcome.record(Criterion::State, passed);
    }

    if rules.min_age.is_some() || rules.max_age.is_some() {
        let passed = profile.age.map(|age| {
            !matches!(rules.min_age, Some(min) if age < min)
                && !matches!(rules.max_age, Some(max) if age > max)
        });
        outcome.record(Criterion::Age, passed);
    }

    if let Some(max) = rules.max_income {
        outcome.record(Criterion::Income, profile.income.map(|income| income <= max));
    }

    if !rules.required_category.is_empty() {
        let passed = profile
            .category
            .as_deref()
            .map(|category| contains_ignore_case(&rules.required_category, category));
        outcome.record(Criterion::Category, passed);
    }

    if !rules.occupation_required.is_empty() {
        let passed = profile
            .occupation
            .as_deref()
            .map(|occupation| contains_ignore_case(&rules.occupation_required, occupation));
        outcome.record(Criterion::Occupation, passed);
    }

    let status = if !outcome.failed.is_empty() {
        Verdict::NotEligible
    } else if !outcome.missing.is_empty() {
        Verdict::PartiallyEligible
    } else {
        Verdict::FullyEligible
    };

    tracing::debug!(
        "{} for {}: {} matched, {} failed, {} missing",
        status,
        scheme.id,
        outcome.matched.len(),
        outcome.failed.len(),
        outcome.missing.len()
    );

    EligibilityResult {
        scheme_id: scheme.id.clone(),
        name: scheme.name.clone(),
        score: status.score(),
        status,
        matched: outcome.matched,
        failed: outcome.failed,
        missing: outcome.missing,
        explanation: None,
    }
}

/// Evaluate every scheme and order the results best first. Equal scores
/// keep the catalog order.
pub fn rank(profile: &Profile, schemes: &[Scheme]) -> Vec<EligibilityResult> {
    let mut results: Vec<EligibilityResult> =
        schemes.iter().map(|scheme| evaluate(profile, scheme)).collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}
