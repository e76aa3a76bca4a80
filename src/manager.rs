//! Branch manager
//!
//! Holds the branch snapshot for one command invocation and runs the batch
//! operations against a [`BranchProvider`]. Batches are strictly sequential,
//! one provider call at a time in input order, and a failing item never stops
//! the items after it.

use crate::domain::{
    filter_branches, filter_stats, BatchDeleteResult, Branch, BranchName, BranchStats, DeleteFailure,
    DeleteOptions, DeleteResult, FilterConfigError, FilterOptions,
};
use crate::output::Output;
use crate::repo::{BranchProvider, RepoError};

/// Snapshot holder and batch executor
pub struct BranchManager<P: BranchProvider> {
    provider: P,
    output: Output,
    branches: Vec<Branch>,
    stale: bool,
}

impl<P: BranchProvider> BranchManager<P> {
    /// Takes the initial snapshot. Failure here is fatal to the command.
    pub fn initialize(provider: P, output: Output) -> Result<Self, RepoError> {
        let branches = provider.list_branches()?;
        output.verbose_ctx("init", &format!("Found {} branches", branches.len()));

        Ok(Self {
            provider,
            output,
            branches,
            stale: false,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// All branches in the snapshot, protected ones included
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn current_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|b| b.is_current)
    }

    pub fn main_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|b| b.is_main)
    }

    fn find(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// True after a mutation that the snapshot does not reflect yet
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replaces the snapshot with a fresh listing
    pub fn refresh(&mut self) -> Result<(), RepoError> {
        self.branches = self.provider.list_branches()?;
        self.stale = false;
        self.output
            .verbose_ctx("refresh", &format!("Found {} branches", self.branches.len()));
        Ok(())
    }

    /// Branches selected by `options`, validated first
    pub fn filtered_branches(&self, options: &FilterOptions) -> Result<Vec<Branch>, FilterConfigError> {
        filter_branches(&self.branches, options)
    }

    /// Stats over the snapshot and the subset selected by `options`
    pub fn stats(&self, options: &FilterOptions) -> Result<BranchStats, FilterConfigError> {
        let filtered = self.filtered_branches(options)?;
        Ok(filter_stats(&self.branches, &filtered))
    }

    /// Deletes (or previews deleting) each named branch in order
    pub fn delete_branches<S: AsRef<str>>(&mut self, names: &[S], options: DeleteOptions) -> BatchDeleteResult {
        let log = if options.verbose {
            self.output.with_verbose()
        } else {
            self.output
        };

        let action = if options.dry_run { "preview" } else { "delete" };
        log.verbose_ctx("delete", &format!("Starting to {} {} branches", action, names.len()));

        let results: Vec<DeleteResult> = names
            .iter()
            .map(|name| self.delete_one(name.as_ref(), options, &log))
            .collect();

        let batch = BatchDeleteResult::from_results(results);

        if !options.dry_run && batch.success > 0 {
            self.stale = true;
        }

        log.verbose_ctx(
            "delete",
            &format!(
                "{} summary: {} total, {} succeeded, {} failed",
                if options.dry_run { "Preview" } else { "Delete" },
                batch.total,
                batch.success,
                batch.failed
            ),
        );

        batch
    }

    fn delete_one(&self, name: &str, options: DeleteOptions, log: &Output) -> DeleteResult {
        let outcome = self.check_deletable(name, log).and_then(|branch| {
            if options.dry_run {
                log.verbose_ctx("delete", &format!("[dry run] Would delete branch: {}", branch));
                return Ok(());
            }

            match self.provider.delete_branch(branch.as_str(), options.force) {
                Ok(true) => Ok(()),
                Ok(false) => Err(DeleteFailure::OperationFailed { reason: None }),
                Err(e) => Err(DeleteFailure::OperationFailed {
                    reason: Some(e.to_string()),
                }),
            }
        });

        match outcome {
            Ok(()) => {
                if !options.dry_run {
                    log.verbose_ctx("delete", &format!("Deleted branch: {}", name));
                }
                DeleteResult::succeeded(name)
            }
            Err(failure) => {
                log.verbose_ctx("delete", &format!("Failed to delete branch {}: {}", name, failure));
                DeleteResult::failed(name, failure)
            }
        }
    }

    fn check_deletable(&self, name: &str, log: &Output) -> Result<BranchName, DeleteFailure> {
        let branch: BranchName = name.parse().map_err(|e: crate::domain::BranchNameError| {
            log.verbose_ctx("delete", &e.to_string());
            DeleteFailure::InvalidBranchName
        })?;

        match self.provider.branch_exists(branch.as_str()) {
            Ok(true) => {}
            Ok(false) => return Err(DeleteFailure::BranchNotFound),
            Err(e) => {
                return Err(DeleteFailure::OperationFailed {
                    reason: Some(e.to_string()),
                })
            }
        }

        if self.find(branch.as_str()).is_some_and(Branch::is_protected) {
            return Err(DeleteFailure::ProtectedBranch);
        }

        Ok(branch)
    }

    /// Filters the snapshot and deletes the result. An empty selection
    /// returns a zero-valued batch without touching the provider.
    pub fn delete_branches_by_filter(
        &mut self,
        filter: &FilterOptions,
        options: DeleteOptions,
    ) -> Result<BatchDeleteResult, FilterConfigError> {
        let filtered = self.filtered_branches(filter)?;

        if filtered.is_empty() {
            self.output.verbose_ctx("delete", "No branches match the filter criteria");
            return Ok(BatchDeleteResult::default());
        }

        let names: Vec<String> = filtered.into_iter().map(|b| b.name).collect();
        Ok(self.delete_branches(&names, options))
    }

    /// Checks out `name`. Returns false for unknown branches and refusals.
    ///
    /// The snapshot is marked stale on success; callers refresh it.
    pub fn switch_branch(&mut self, name: &str) -> bool {
        let Some(branch) = self.find(name) else {
            self.output.verbose_ctx("switch", &format!("Unknown branch: {}", name));
            return false;
        };

        if branch.is_current {
            self.output.verbose_ctx("switch", &format!("Already on branch: {}", name));
            return true;
        }

        match self.provider.has_uncommitted_changes() {
            Ok(true) => self.output.warning(
                "You have uncommitted changes. Please commit or stash them before switching branches.",
            ),
            Ok(false) => {}
            Err(e) => self
                .output
                .verbose_ctx("switch", &format!("Could not check work tree status: {}", e)),
        }

        match self.provider.switch_branch(name) {
            Ok(true) => {
                self.stale = true;
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.output.verbose_ctx("switch", &format!("Switch to {} failed: {}", name, e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;

    use super::*;

    /// In-memory provider recording every mutation
    #[derive(Default)]
    struct FakeRepo {
        branches: RefCell<Vec<Branch>>,
        refuse_unforced: HashSet<String>,
        dirty: bool,
        deletes: RefCell<Vec<(String, bool)>>,
        switches: RefCell<Vec<String>>,
        exists_calls: Cell<usize>,
    }

    impl FakeRepo {
        fn with(branches: Vec<Branch>) -> Self {
            Self {
                branches: RefCell::new(branches),
                ..Self::default()
            }
        }

        /// Simulates another process deleting a branch behind our back
        fn remove_externally(&self, name: &str) {
            self.branches.borrow_mut().retain(|b| b.name != name);
        }
    }

    impl BranchProvider for FakeRepo {
        fn list_branches(&self) -> Result<Vec<Branch>, RepoError> {
            Ok(self.branches.borrow().clone())
        }

        fn branch_exists(&self, name: &str) -> Result<bool, RepoError> {
            self.exists_calls.set(self.exists_calls.get() + 1);
            Ok(self.branches.borrow().iter().any(|b| b.name == name))
        }

        fn delete_branch(&self, name: &str, force: bool) -> Result<bool, RepoError> {
            self.deletes.borrow_mut().push((name.to_string(), force));
            if !force && self.refuse_unforced.contains(name) {
                return Ok(false);
            }
            self.remove_externally(name);
            Ok(true)
        }

        fn switch_branch(&self, name: &str) -> Result<bool, RepoError> {
            self.switches.borrow_mut().push(name.to_string());
            if self.dirty {
                return Ok(false);
            }
            for branch in self.branches.borrow_mut().iter_mut() {
                branch.is_current = branch.name == name;
            }
            Ok(true)
        }

        fn has_uncommitted_changes(&self) -> Result<bool, RepoError> {
            Ok(self.dirty)
        }

        fn is_branch_merged(&self, name: &str, _main_branch: &str) -> Result<bool, RepoError> {
            Ok(self
                .branches
                .borrow()
                .iter()
                .any(|b| b.name == name && b.is_merged))
        }

        fn main_branch_name(&self) -> Result<String, RepoError> {
            Ok("main".to_string())
        }
    }

    fn sample() -> Vec<Branch> {
        vec![
            Branch::new("main").main().merged(),
            Branch::new("develop").current(),
            Branch::new("feature/login").merged(),
            Branch::new("feature/signup"),
            Branch::new("bugfix/crash"),
        ]
    }

    fn manager(repo: FakeRepo) -> BranchManager<FakeRepo> {
        BranchManager::initialize(repo, Output::default()).unwrap()
    }

    #[test]
    fn initialize_takes_snapshot() {
        let mgr = manager(FakeRepo::with(sample()));

        assert_eq!(mgr.branches().len(), 5);
        assert_eq!(mgr.current_branch().map(|b| b.name.as_str()), Some("develop"));
        assert_eq!(mgr.main_branch().map(|b| b.name.as_str()), Some("main"));
        assert!(!mgr.is_stale());
    }

    #[test]
    fn mixed_batch_reports_each_item_in_order() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr.delete_branches(&["feature/signup", "nope", "main"], DeleteOptions::default());

        assert_eq!((batch.total, batch.success, batch.failed), (3, 1, 2));
        let order: Vec<_> = batch.results.iter().map(|r| r.branch_name.as_str()).collect();
        assert_eq!(order, ["feature/signup", "nope", "main"]);
        assert_eq!(batch.results[1].error, Some(DeleteFailure::BranchNotFound));
        assert_eq!(batch.results[2].error, Some(DeleteFailure::ProtectedBranch));
        assert_ne!(
            batch.results[1].error.as_ref().unwrap().to_string(),
            batch.results[2].error.as_ref().unwrap().to_string()
        );
        assert_eq!(mgr.provider().deletes.borrow().len(), 1);
    }

    #[test]
    fn invalid_name_is_rejected_before_provider_calls() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr.delete_branches(&["bad name", ""], DeleteOptions::default());

        assert_eq!(batch.failed, 2);
        assert!(batch
            .results
            .iter()
            .all(|r| r.error == Some(DeleteFailure::InvalidBranchName)));
        assert_eq!(mgr.provider().exists_calls.get(), 0);
    }

    #[test]
    fn validated_name_reaches_provider() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr.delete_branches(&["feature/login"], DeleteOptions::default());

        assert_eq!(batch.success, 1);
        assert_eq!(mgr.provider().exists_calls.get(), 1);
        assert_eq!(mgr.provider().deletes.borrow()[0].0, "feature/login");
    }

    #[test]
    fn existence_is_checked_live() {
        let mut mgr = manager(FakeRepo::with(sample()));
        mgr.provider().remove_externally("bugfix/crash");
        assert!(mgr.branches().iter().any(|b| b.name == "bugfix/crash"));

        let batch = mgr.delete_branches(&["bugfix/crash"], DeleteOptions::default());
        assert_eq!(batch.results[0].error, Some(DeleteFailure::BranchNotFound));
    }

    #[test]
    fn protection_holds_without_the_filter() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr.delete_branches(
            &["develop", "main"],
            DeleteOptions {
                force: true,
                ..DeleteOptions::default()
            },
        );

        assert_eq!(batch.failed, 2);
        assert!(mgr.provider().deletes.borrow().is_empty());
    }

    #[test]
    fn dry_run_never_deletes() {
        let mut mgr = manager(FakeRepo::with(sample()));
        let names = ["feature/login", "feature/signup", "bugfix/crash"];

        let batch = mgr.delete_branches(
            &names,
            DeleteOptions {
                dry_run: true,
                ..DeleteOptions::default()
            },
        );

        assert_eq!(batch.success, names.len());
        assert!(mgr.provider().deletes.borrow().is_empty());
        assert!(!mgr.is_stale());
    }

    #[test]
    fn unforced_refusal_is_an_operation_failure() {
        let mut repo = FakeRepo::with(sample());
        repo.refuse_unforced.insert("feature/signup".to_string());
        let mut mgr = manager(repo);

        let batch = mgr.delete_branches(&["feature/signup", "feature/login"], DeleteOptions::default());

        assert_eq!(
            batch.results[0].error,
            Some(DeleteFailure::OperationFailed { reason: None })
        );
        assert!(batch.results[1].success);
        assert!(mgr.is_stale());
    }

    #[test]
    fn force_is_passed_to_provider() {
        let mut repo = FakeRepo::with(sample());
        repo.refuse_unforced.insert("feature/signup".to_string());
        let mut mgr = manager(repo);

        let batch = mgr.delete_branches(
            &["feature/signup"],
            DeleteOptions {
                force: true,
                ..DeleteOptions::default()
            },
        );

        assert_eq!(batch.success, 1);
        assert_eq!(
            mgr.provider().deletes.borrow().as_slice(),
            &[("feature/signup".to_string(), true)]
        );
    }

    #[test]
    fn delete_by_filter_uses_filter_output() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr
            .delete_branches_by_filter(&FilterOptions::with_keyword("feature"), DeleteOptions::default())
            .unwrap();

        assert_eq!(batch.total, 2);
        assert_eq!(batch.success, 2);
    }

    #[test]
    fn delete_by_filter_with_no_match_touches_nothing() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let batch = mgr
            .delete_branches_by_filter(&FilterOptions::with_keyword("release"), DeleteOptions::default())
            .unwrap();

        assert_eq!(batch, BatchDeleteResult::default());
        assert_eq!(mgr.provider().exists_calls.get(), 0);
        assert!(mgr.provider().deletes.borrow().is_empty());
    }

    #[test]
    fn delete_by_filter_rejects_invalid_options() {
        let mut mgr = manager(FakeRepo::with(sample()));

        let err = mgr
            .delete_branches_by_filter(&FilterOptions::with_keyword(" "), DeleteOptions::default())
            .unwrap_err();

        assert_eq!(err, FilterConfigError::EmptyKeyword);
        assert!(mgr.provider().deletes.borrow().is_empty());
    }

    #[test]
    fn stats_through_manager() {
        let mgr = manager(FakeRepo::with(sample()));

        let stats = mgr.stats(&FilterOptions::with_keyword("feature")).unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.filtered, 2);
        assert_eq!(stats.protected, 2);
        assert_eq!(stats.merged, 2);
        assert_eq!(stats.unmerged, 3);
    }

    #[test]
    fn switch_to_unknown_branch_fails() {
        let mut mgr = manager(FakeRepo::with(sample()));

        assert!(!mgr.switch_branch("does-not-exist"));
        assert!(mgr.provider().switches.borrow().is_empty());
    }

    #[test]
    fn switch_to_current_branch_is_a_no_op() {
        let mut mgr = manager(FakeRepo::with(sample()));

        assert!(mgr.switch_branch("develop"));
        assert!(mgr.provider().switches.borrow().is_empty());
        assert!(!mgr.is_stale());
    }

    #[test]
    fn switch_refused_on_dirty_tree() {
        let mut repo = FakeRepo::with(sample());
        repo.dirty = true;
        let mut mgr = manager(repo);

        assert!(!mgr.switch_branch("feature/signup"));
        assert!(!mgr.is_stale());
    }

    #[test]
    fn switch_marks_snapshot_stale_until_refresh() {
        let mut mgr = manager(FakeRepo::with(sample()));

        assert!(mgr.switch_branch("feature/signup"));
        assert!(mgr.is_stale());
        // not refreshed yet: the old flags are still visible
        assert_eq!(mgr.current_branch().map(|b| b.name.as_str()), Some("develop"));

        mgr.refresh().unwrap();
        assert!(!mgr.is_stale());
        assert_eq!(mgr.current_branch().map(|b| b.name.as_str()), Some("feature/signup"));
    }

    #[test]
    fn filtering_does_not_touch_snapshot() {
        let mgr = manager(FakeRepo::with(sample()));
        let options = FilterOptions::with_regex("^feature/");

        let first = mgr.filtered_branches(&options).unwrap();
        let second = mgr.filtered_branches(&options).unwrap();

        assert_eq!(first, second);
        assert_eq!(mgr.branches(), sample().as_slice());
    }
}
