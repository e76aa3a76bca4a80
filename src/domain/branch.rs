//! Branch snapshot model
//!
//! A [`Branch`] is a point-in-time view of one local ref. Snapshots are never
//! updated in place: after a mutation the manager refetches a new list.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BranchNameError {
    #[error("Invalid branch name: '{0}'")]
    InvalidBranchName(String),
}

fn name_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(r"^[A-Za-z0-9/._-]+$").expect("branch name grammar is valid"))
}

/// A branch name accepted by batch operations.
///
/// Only alphanumerics, `/`, `.`, `_` and `-` are allowed, and the name must
/// not be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Returns true if `name` matches the accepted grammar
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty() && name_grammar().is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BranchName {
    type Err = BranchNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(BranchNameError::InvalidBranchName(s.to_string()))
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One local branch as observed when the snapshot was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Short ref name, unique within a snapshot
    pub name: String,

    /// Checked out in the working tree
    pub is_current: bool,

    /// The repository's default branch
    pub is_main: bool,

    /// Short hash and subject of the tip commit (display only)
    pub last_commit: String,

    /// Committer date of the tip commit (display only)
    pub last_commit_date: String,

    /// Fully reachable from the main branch
    pub is_merged: bool,
}

impl Branch {
    /// Creates an unmerged, unprotected branch with no commit info
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_current: false,
            is_main: false,
            last_commit: String::new(),
            last_commit_date: String::new(),
            is_merged: false,
        }
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    pub fn main(mut self) -> Self {
        self.is_main = true;
        self
    }

    pub fn merged(mut self) -> Self {
        self.is_merged = true;
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>, date: impl Into<String>) -> Self {
        self.last_commit = commit.into();
        self.last_commit_date = date.into();
        self
    }

    /// Protected branches (current or main) are never deleted
    pub fn is_protected(&self) -> bool {
        self.is_current || self.is_main
    }

    /// Short label describing the branch's role
    pub fn label(&self) -> Option<&'static str> {
        if self.is_current {
            Some("current")
        } else if self.is_main {
            Some("main")
        } else if self.is_merged {
            Some("merged")
        } else {
            None
        }
    }
}
