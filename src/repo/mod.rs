//! # Branch Repository Provider
//!
//! Everything gitt knows about branches comes through [`BranchProvider`]:
//! the snapshot listing, live existence checks, and the delete/switch
//! primitives. [`GitCli`] implements it by running the `git` binary; tests
//! substitute an in-memory provider.
//!
//! ## Error Mapping
//!
//! | Situation | Error |
//! |-----------|-------|
//! | Not inside a work tree | [`RepoError::NotARepository`] |
//! | `git status` refused | [`RepoError::PermissionDenied`] |
//! | `git` missing from `PATH` | [`RepoError::GitUnavailable`] |
//! | Unexpected non-zero exit | [`RepoError::CommandFailed`] |
//!
//! Expected refusals (an unmerged branch under `git branch -d`, a dirty work
//! tree on switch) are `Ok(false)`, not errors.

mod git;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Branch;

pub use git::{BranchDetails, GitCli};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not a git repository: {0}. Run this command from inside a git work tree.")]
    NotARepository(PathBuf),

    #[error("No permission to access git repository: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to run git: {0}")]
    GitUnavailable(#[source] std::io::Error),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected git output: {0}")]
    UnexpectedOutput(String),
}

/// Source of branch facts and branch mutations
pub trait BranchProvider {
    /// Full snapshot of local branches, in git's listing order
    fn list_branches(&self) -> Result<Vec<Branch>, RepoError>;

    /// Live check that a local branch exists
    fn branch_exists(&self, name: &str) -> Result<bool, RepoError>;

    /// Deletes a local branch; `Ok(false)` when git refuses
    fn delete_branch(&self, name: &str, force: bool) -> Result<bool, RepoError>;

    /// Checks out a branch; `Ok(false)` when git refuses
    fn switch_branch(&self, name: &str) -> Result<bool, RepoError>;

    /// True when the work tree has staged, unstaged or untracked changes
    fn has_uncommitted_changes(&self) -> Result<bool, RepoError>;

    /// True when `name` is fully reachable from `main_branch`
    fn is_branch_merged(&self, name: &str, main_branch: &str) -> Result<bool, RepoError>;

    /// Name of the repository's default branch
    fn main_branch_name(&self) -> Result<String, RepoError>;
}
