// Copyright (c) 2025 - Cowboy AI, Inc.
//! Check results and the run report
//!
//! A report is the ordered list of every check's outcome. Checks that could
//! not be evaluated (resource not found, ambiguous, transport failure) are
//! recorded as `Errored`, distinct from `Failed` invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::{CheckOutcome, NamingContext};
use crate::exit_codes;

/// Outcome category of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The invariant held
    Passed,
    /// The invariant did not hold
    Failed,
    /// The check could not be evaluated
    Errored,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
        };
        f.write_str(label)
    }
}

/// Outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub description: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    pub fn pass(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: CheckStatus::Passed,
            detail: None,
        }
    }

    pub fn fail(description: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            description: description.into(),
            status: CheckStatus::Failed,
            detail: Some(detail.to_string()),
        }
    }

    pub fn error(description: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            description: description.into(),
            status: CheckStatus::Errored,
            detail: Some(detail.to_string()),
        }
    }

    /// Record the outcome of a pure check
    pub fn from_outcome(description: impl Into<String>, outcome: CheckOutcome) -> Self {
        match outcome {
            Ok(()) => Self::pass(description),
            Err(failure) => Self::fail(description, failure),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.description)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n        {}", detail)?;
        }
        Ok(())
    }
}

/// Tally of results by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl ReportCounts {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }
}

/// Ordered results of one verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    pub component: String,
    pub deployment_identifier: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub results: Vec<CheckResult>,
}

impl Report {
    /// Start an empty report for `naming`
    pub fn new(naming: &NamingContext, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            component: naming.component().to_string(),
            deployment_identifier: naming.deployment_identifier().to_string(),
            started_at,
            finished_at: None,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
    }

    pub fn counts(&self) -> ReportCounts {
        self.results
            .iter()
            .fold(ReportCounts::default(), |mut counts, result| {
                match result.status {
                    CheckStatus::Passed => counts.passed += 1,
                    CheckStatus::Failed => counts.failed += 1,
                    CheckStatus::Errored => counts.errored += 1,
                }
                counts
            })
    }

    /// True iff every check passed
    pub fn passed(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    /// Results that did not pass, in run order
    pub fn problems(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Process exit code: non-zero iff any check did not pass
    pub fn exit_code(&self) -> u8 {
        let counts = self.counts();
        if counts.failed > 0 {
            exit_codes::INVARIANT_FAILED
        } else if counts.errored > 0 {
            exit_codes::CHECK_ERRORED
        } else {
            exit_codes::PASSED
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "vpc-verify {}-{} (run {})",
            self.component, self.deployment_identifier, self.run_id
        )?;
        for result in &self.results {
            writeln!(f, "  {}", result)?;
        }
        let counts = self.counts();
        write!(
            f,
            "{} checks: {} passed, {} failed, {} errored",
            counts.total(),
            counts.passed,
            counts.failed,
            counts.errored
        )
    }
}
