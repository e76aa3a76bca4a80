//! `git` subprocess provider
//!
//! Runs the `git` binary inside the repository root and parses its text
//! output into [`Branch`] snapshots.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Serialize;

use super::{BranchProvider, RepoError};
use crate::domain::Branch;

const BRANCH_FORMAT: &str =
    "--format=%(refname:short)%09%(HEAD)%09%(committerdate:iso)%09%(objectname:short) %(subject)";

const ORIGIN_HEAD_PREFIX: &str = "refs/remotes/origin/";

/// Detail view of a single branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchDetails {
    pub name: String,
    pub last_commit: String,
    pub last_commit_date: String,
    pub author: String,
    pub is_merged: bool,
}

/// Provider backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    main_override: Option<String>,
}

impl GitCli {
    /// Locates the work tree containing `dir` and checks it is accessible
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, RepoError> {
        let dir = dir.as_ref();

        let toplevel = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .map_err(RepoError::GitUnavailable)?;

        if !toplevel.status.success() {
            let stderr = String::from_utf8_lossy(&toplevel.stderr);
            if stderr.contains("dubious ownership") {
                return Err(RepoError::PermissionDenied(dir.to_path_buf()));
            }
            return Err(RepoError::NotARepository(dir.to_path_buf()));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&toplevel.stdout).trim());

        let status = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(&root)
            .output()
            .map_err(RepoError::GitUnavailable)?;

        if !status.status.success() {
            return Err(RepoError::PermissionDenied(root));
        }

        Ok(Self {
            root,
            main_override: None,
        })
    }

    /// Uses `name` as the main branch instead of detecting it
    pub fn with_main_branch(mut self, name: Option<String>) -> Self {
        self.main_override = name;
        self
    }

    /// Returns the work tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<Output, RepoError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(RepoError::GitUnavailable)
    }

    fn stdout(&self, args: &[&str]) -> Result<String, RepoError> {
        let output = self.run(args)?;

        if !output.status.success() {
            return Err(RepoError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn succeeds(&self, args: &[&str]) -> Result<bool, RepoError> {
        Ok(self.run(args)?.status.success())
    }

    /// Names of local branches merged into `main_branch`, falling back to
    /// `origin/<main>` and then to an empty set
    fn merged_into(&self, main_branch: &str) -> Result<HashSet<String>, RepoError> {
        let remote_main = format!("origin/{}", main_branch);

        for target in [main_branch, remote_main.as_str()] {
            let output = self.run(&["branch", "--merged", target, "--format=%(refname:short)"])?;
            if output.status.success() {
                return Ok(parse_name_list(&String::from_utf8_lossy(&output.stdout))
                    .into_iter()
                    .collect());
            }
        }

        Ok(HashSet::new())
    }

    /// Remote-tracking branches, without the symbolic `<remote>/HEAD` entries
    pub fn remote_branches(&self) -> Result<Vec<String>, RepoError> {
        let listing = self.stdout(&["branch", "-r", "--format=%(refname:short)"])?;

        Ok(parse_name_list(&listing)
            .into_iter()
            .filter(|name| !name.ends_with("/HEAD") && name.contains('/'))
            .collect())
    }

    /// Last commit, author and merge status for one branch
    pub fn branch_details(&self, name: &str) -> Result<BranchDetails, RepoError> {
        let reference = format!("refs/heads/{}", name);
        let log = self.stdout(&["log", "-1", "--format=%h %s%x09%ci%x09%an", &reference, "--"])?;
        let main_branch = self.main_branch_name()?;

        let (last_commit, last_commit_date, author) = parse_log_line(&log)?;

        Ok(BranchDetails {
            name: name.to_string(),
            last_commit,
            last_commit_date,
            author,
            is_merged: self.is_branch_merged(name, &main_branch)?,
        })
    }
}

impl BranchProvider for GitCli {
    fn list_branches(&self) -> Result<Vec<Branch>, RepoError> {
        let main_branch = self.main_branch_name()?;
        let merged = self.merged_into(&main_branch)?;
        let listing = self.stdout(&["for-each-ref", BRANCH_FORMAT, "refs/heads/"])?;

        parse_branch_listing(&listing, &main_branch, &merged)
    }

    fn branch_exists(&self, name: &str) -> Result<bool, RepoError> {
        let reference = format!("refs/heads/{}", name);
        self.succeeds(&["show-ref", "--verify", "--quiet", &reference])
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<bool, RepoError> {
        let flag = if force { "-D" } else { "-d" };
        self.succeeds(&["branch", flag, "--", name])
    }

    fn switch_branch(&self, name: &str) -> Result<bool, RepoError> {
        if self.has_uncommitted_changes()? {
            return Ok(false);
        }
        self.succeeds(&["checkout", name, "--"])
    }

    fn has_uncommitted_changes(&self) -> Result<bool, RepoError> {
        Ok(!self.stdout(&["status", "--porcelain"])?.trim().is_empty())
    }

    fn is_branch_merged(&self, name: &str, main_branch: &str) -> Result<bool, RepoError> {
        Ok(self.merged_into(main_branch)?.contains(name))
    }

    fn main_branch_name(&self) -> Result<String, RepoError> {
        if let Some(name) = &self.main_override {
            return Ok(name.clone());
        }

        let origin_head = self.run(&["symbolic-ref", "refs/remotes/origin/HEAD"])?;
        if origin_head.status.success() {
            if let Some(name) = parse_origin_head(&String::from_utf8_lossy(&origin_head.stdout)) {
                return Ok(name);
            }
        }

        let candidates = [
            ("refs/remotes/origin/main", "main"),
            ("refs/remotes/origin/master", "master"),
            ("refs/heads/main", "main"),
            ("refs/heads/master", "master"),
        ];
        for (reference, name) in candidates {
            if self.succeeds(&["show-ref", "--verify", "--quiet", reference])? {
                return Ok(name.to_string());
            }
        }

        Ok("main".to_string())
    }
}

/// Parses `for-each-ref` output produced with [`BRANCH_FORMAT`]
pub(crate) fn parse_branch_listing(
    listing: &str,
    main_branch: &str,
    merged: &HashSet<String>,
) -> Result<Vec<Branch>, RepoError> {
    listing
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(4, '\t');
            let name = fields.next().unwrap_or_default().trim();
            let head = fields.next();
            let date = fields.next();
            let commit = fields.next();

            let (Some(head), Some(date), Some(commit)) = (head, date, commit) else {
                return Err(RepoError::UnexpectedOutput(format!("branch listing line: {}", line)));
            };

            Ok(Branch {
                name: name.to_string(),
                is_current: head.trim() == "*",
                is_main: name == main_branch,
                last_commit: commit.trim().to_string(),
                last_commit_date: date.trim().to_string(),
                is_merged: merged.contains(name),
            })
        })
        .collect()
}

/// Extracts the branch name from `refs/remotes/origin/<name>`
pub(crate) fn parse_origin_head(output: &str) -> Option<String> {
    output
        .trim()
        .strip_prefix(ORIGIN_HEAD_PREFIX)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_name_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_log_line(output: &str) -> Result<(String, String, String), RepoError> {
    let line = output.trim();
    let mut fields = line.splitn(3, '\t');

    match (fields.next(), fields.next(), fields.next()) {
        (Some(commit), Some(date), Some(author)) => {
            Ok((commit.to_string(), date.to_string(), author.to_string()))
        }
        _ => Err(RepoError::UnexpectedOutput(format!("log line: {}", line))),
    }
}
