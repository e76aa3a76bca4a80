//! Batch operation outcomes
//!
//! A batch never aborts on a single failure. Each attempted branch yields one
//! [`DeleteResult`]; [`BatchDeleteResult`] keeps them in input order together
//! with the success/failure counts.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Options for a delete batch, decided by the caller before execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Report what would be deleted without deleting
    pub dry_run: bool,

    /// Delete even if the branch has unmerged commits
    pub force: bool,

    /// Log each item while the batch runs
    pub verbose: bool,
}

/// Why a single branch could not be processed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteFailure {
    #[error("Invalid branch name")]
    InvalidBranchName,

    #[error("Branch does not exist")]
    BranchNotFound,

    #[error("Cannot delete current or main branch")]
    ProtectedBranch,

    #[error("Delete operation failed{}", reason_suffix(.reason))]
    OperationFailed { reason: Option<String> },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

impl Serialize for DeleteFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome for one branch. `error` is set exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub success: bool,
    pub branch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DeleteFailure>,
}

impl DeleteResult {
    pub fn succeeded(branch_name: impl Into<String>) -> Self {
        Self {
            success: true,
            branch_name: branch_name.into(),
            error: None,
        }
    }

    pub fn failed(branch_name: impl Into<String>, failure: DeleteFailure) -> Self {
        Self {
            success: false,
            branch_name: branch_name.into(),
            error: Some(failure),
        }
    }
}

/// Aggregate of a batch, `total == success + failed == results.len()`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDeleteResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<DeleteResult>,
}

impl BatchDeleteResult {
    /// Builds the aggregate from per-item results, preserving their order
    pub fn from_results(results: Vec<DeleteResult>) -> Self {
        let success = results.iter().filter(|r| r.success).count();

        Self {
            total: results.len(),
            success,
            failed: results.len() - success,
            results,
        }
    }

    /// True when nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeleteResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn successes(&self) -> impl Iterator<Item = &DeleteResult> {
        self.results.iter().filter(|r| r.success)
    }
}
