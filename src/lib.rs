//! gitt - Git branch management
//!
//! Filters local branches by keyword, regex and merge status, deletes
//! them in batches with per-branch results, and switches between them.
//! Current and main branches are never deleted.
//!
//! The git repository sits behind [`repo::BranchProvider`]; [`GitCli`]
//! drives the `git` binary and [`BranchManager`] holds the branch
//! snapshot the operations work on.

pub mod cli;
pub mod config;
pub mod domain;
pub mod manager;
pub mod output;
pub mod repo;

pub use domain::{BatchDeleteResult, Branch, DeleteOptions, DeleteResult, FilterOptions};
pub use manager::BranchManager;
pub use repo::{BranchProvider, GitCli, RepoError};
