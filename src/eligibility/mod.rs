//! Eligibility evaluation.
//!
//! A student is eligible for a company when every criterion holds: CGPA, 10th and
//! 12th marks at or above the thresholds, backlogs at or below the limit, and the
//! branch among the accepted ones. Missing profile values never satisfy a criterion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Eligibility, StudentProfile};

/// A single eligibility criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Cgpa,
    TenthMarks,
    TwelfthMarks,
    Backlogs,
    Branch,
}

/// What an empty accepted-branch list means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchPolicy {
    /// No branch restriction
    #[default]
    Unrestricted,
    /// Nobody qualifies
    Closed,
}

impl FromStr for BranchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unrestricted" => Ok(BranchPolicy::Unrestricted),
            "closed" => Ok(BranchPolicy::Closed),
            other => Err(format!(
                "expected `unrestricted` or `closed`, got `{}`",
                other
            )),
        }
    }
}

/// Academic values taken into account. Any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcademicProfile {
    pub cgpa: Option<f64>,
    pub tenth_marks: Option<f64>,
    pub twelfth_marks: Option<f64>,
    pub branch: Option<String>,
    pub backlogs: Option<u32>,
}

impl From<&StudentProfile> for AcademicProfile {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            cgpa: Some(profile.cgpa),
            tenth_marks: Some(profile.tenth_marks),
            twelfth_marks: Some(profile.twelfth_marks),
            branch: Some(profile.branch.clone()),
            backlogs: Some(profile.backlogs),
        }
    }
}

/// Outcome of an evaluation with the criteria that were not met, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible: bool,
    pub unmet: Vec<Criterion>,
}

/// Evaluate every criterion and report which ones fail.
pub fn evaluate(
    profile: &AcademicProfile,
    criteria: &Eligibility,
    policy: BranchPolicy,
) -> EligibilityReport {
    let mut unmet = Vec::new();

    if !at_least(profile.cgpa, criteria.cgpa) {
        unmet.push(Criterion::Cgpa);
    }
    if !at_least(profile.tenth_marks, criteria.tenth) {
        unmet.push(Criterion::TenthMarks);
    }
    if !at_least(profile.twelfth_marks, criteria.twelfth) {
        unmet.push(Criterion::TwelfthMarks);
    }
    if !profile
        .backlogs
        .is_some_and(|backlogs| backlogs <= criteria.backlogs)
    {
        unmet.push(Criterion::Backlogs);
    }
    if !branch_accepted(profile.branch.as_deref(), &criteria.branches, policy) {
        unmet.push(Criterion::Branch);
    }

    EligibilityReport {
        eligible: unmet.is_empty(),
        unmet,
    }
}

// NaN compares false, so a NaN value fails like a missing one.
fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

fn branch_accepted(branch: Option<&str>, accepted: &[String], policy: BranchPolicy) -> bool {
    let Some(branch) = branch.map(str::trim).filter(|b| !b.is_empty()) else {
        return false;
    };

    if accepted.is_empty() {
        return policy == BranchPolicy::Unrestricted;
    }

    accepted.iter().any(|b| b.trim() == branch)
}
