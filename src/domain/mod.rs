//! Domain models for gitt
//!
//! Contains the branch filtering and batch bookkeeping logic without any
//! I/O concerns.

mod batch;
mod branch;
pub mod filter;

pub use batch::{BatchDeleteResult, DeleteFailure, DeleteOptions, DeleteResult};
pub use branch::{Branch, BranchName, BranchNameError};
pub use filter::{filter_branches, filter_stats, BranchStats, FilterConfigError, FilterOptions};
