//! Branch filter engine
//!
//! Selects the branches a batch operation may touch. Protected branches are
//! always dropped first; the merge-status, keyword and regex stages then run
//! as a pipeline over what is left.
//!
//! Every function here is pure: it borrows the input slice and returns a new
//! `Vec`, so filtering the same snapshot twice yields the same result.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::branch::Branch;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterConfigError {
    #[error("Cannot use both keyword and regex filters simultaneously")]
    KeywordAndRegex,

    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error("Invalid regular expression pattern: {0}")]
    InvalidRegex(String),
}

/// Filter configuration. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Substring to look for in the branch name
    pub keyword: Option<String>,

    /// Pattern searched for anywhere in the branch name
    pub regex: Option<String>,

    /// Keep the branches that do NOT match the keyword/regex
    pub exclude: bool,

    /// `Some(false)` drops merged branches, `Some(true)` keeps them,
    /// `None` skips merge-based filtering entirely
    pub include_merged: Option<bool>,

    /// Match keyword/regex with case sensitivity
    pub case_sensitive: bool,
}

impl FilterOptions {
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    pub fn with_regex(pattern: impl Into<String>) -> Self {
        Self {
            regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Checks the options before any filtering happens
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        if self.keyword.is_some() && self.regex.is_some() {
            return Err(FilterConfigError::KeywordAndRegex);
        }

        if let Some(keyword) = &self.keyword {
            if keyword.trim().is_empty() {
                return Err(FilterConfigError::EmptyKeyword);
            }
        }

        if let Some(pattern) = &self.regex {
            compile(pattern, self.case_sensitive)?;
        }

        Ok(())
    }

    /// Returns true if a keyword or regex is set
    pub fn has_pattern(&self) -> bool {
        self.keyword.is_some() || self.regex.is_some()
    }
}

fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, FilterConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| FilterConfigError::InvalidRegex(e.to_string()))
}

/// Returns true if `name` contains `keyword`, honoring case sensitivity
pub fn keyword_matches(name: &str, keyword: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        name.contains(keyword)
    } else {
        name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Keeps (or with `exclude`, drops) branches whose name contains `keyword`
pub fn filter_by_keyword(branches: &[Branch], keyword: &str, options: &FilterOptions) -> Vec<Branch> {
    branches
        .iter()
        .filter(|b| keyword_matches(&b.name, keyword, options.case_sensitive) != options.exclude)
        .cloned()
        .collect()
}

/// Keeps (or with `exclude`, drops) branches whose name matches `pattern`
///
/// The search is unanchored: a match anywhere in the name counts.
pub fn filter_by_regex(
    branches: &[Branch],
    pattern: &str,
    options: &FilterOptions,
) -> Result<Vec<Branch>, FilterConfigError> {
    let regex = compile(pattern, options.case_sensitive)?;

    Ok(branches
        .iter()
        .filter(|b| regex.is_match(&b.name) != options.exclude)
        .cloned()
        .collect())
}

/// Drops merged branches unless `include_merged` is true
pub fn filter_by_merge_status(branches: &[Branch], include_merged: bool) -> Vec<Branch> {
    branches
        .iter()
        .filter(|b| include_merged || !b.is_merged)
        .cloned()
        .collect()
}

/// Drops the current and main branches
pub fn filter_protected_branches(branches: &[Branch]) -> Vec<Branch> {
    branches.iter().filter(|b| !b.is_protected()).cloned().collect()
}

/// Runs the full pipeline: validate, protect, merge status, keyword, regex
pub fn filter_branches(
    branches: &[Branch],
    options: &FilterOptions,
) -> Result<Vec<Branch>, FilterConfigError> {
    options.validate()?;

    let mut filtered = filter_protected_branches(branches);

    if let Some(include_merged) = options.include_merged {
        filtered = filter_by_merge_status(&filtered, include_merged);
    }

    if let Some(keyword) = &options.keyword {
        filtered = filter_by_keyword(&filtered, keyword, options);
    }

    if let Some(pattern) = &options.regex {
        filtered = filter_by_regex(&filtered, pattern, options)?;
    }

    Ok(filtered)
}

/// Summary counters for a snapshot and a filtered subset of it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchStats {
    pub total: usize,
    pub filtered: usize,
    pub protected: usize,
    pub merged: usize,
    pub unmerged: usize,
}

/// Computes stats over the whole snapshot; only `filtered` looks at the subset
pub fn filter_stats(all: &[Branch], filtered: &[Branch]) -> BranchStats {
    let total = all.len();
    let merged = all.iter().filter(|b| b.is_merged).count();

    BranchStats {
        total,
        filtered: filtered.len(),
        protected: all.iter().filter(|b| b.is_protected()).count(),
        merged,
        unmerged: total - merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Branch> {
        vec![
            Branch::new("main").main().merged().with_commit("abc123 Initial commit", "2023-01-01"),
            Branch::new("feature/new-feature").current(),
            Branch::new("feature/old-feature").merged(),
            Branch::new("bugfix/issue-123"),
            Branch::new("hotfix/urgent-fix").merged(),
        ]
    }

    fn names(branches: &[Branch]) -> Vec<&str> {
        branches.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn keyword_filter_matches_substring() {
        let result = filter_by_keyword(&sample(), "feature", &FilterOptions::default());
        assert_eq!(names(&result), ["feature/new-feature", "feature/old-feature"]);
    }

    #[test]
    fn keyword_filter_is_case_insensitive_by_default() {
        let result = filter_by_keyword(&sample(), "FEATURE", &FilterOptions::default());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn keyword_filter_case_sensitive() {
        let options = FilterOptions {
            case_sensitive: true,
            ..FilterOptions::default()
        };
        assert!(filter_by_keyword(&sample(), "FEATURE", &options).is_empty());
    }

    #[test]
    fn keyword_filter_exclude() {
        let options = FilterOptions {
            exclude: true,
            ..FilterOptions::default()
        };
        let result = filter_by_keyword(&sample(), "feature", &options);
        assert_eq!(names(&result), ["main", "bugfix/issue-123", "hotfix/urgent-fix"]);
    }

    #[test]
    fn regex_filter_is_unanchored() {
        let result = filter_by_regex(&sample(), "fix", &FilterOptions::default()).unwrap();
        assert_eq!(names(&result), ["bugfix/issue-123", "hotfix/urgent-fix"]);
    }

    #[test]
    fn regex_filter_case_handling() {
        let insensitive = filter_by_regex(&sample(), "FEATURE/.*", &FilterOptions::default()).unwrap();
        assert_eq!(insensitive.len(), 2);

        let options = FilterOptions {
            case_sensitive: true,
            ..FilterOptions::default()
        };
        let sensitive = filter_by_regex(&sample(), "FEATURE/.*", &options).unwrap();
        assert!(sensitive.is_empty());
    }

    #[test]
    fn regex_filter_exclude() {
        let options = FilterOptions {
            exclude: true,
            ..FilterOptions::default()
        };
        let result = filter_by_regex(&sample(), "^feature/", &options).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|b| !b.name.starts_with("feature/")));
    }

    #[test]
    fn regex_filter_rejects_bad_pattern() {
        let err = filter_by_regex(&sample(), "[", &FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterConfigError::InvalidRegex(_)));
    }

    #[test]
    fn protected_branches_are_dropped() {
        let result = filter_protected_branches(&sample());
        assert_eq!(names(&result), ["feature/old-feature", "bugfix/issue-123", "hotfix/urgent-fix"]);
    }

    #[test]
    fn merge_status_filter() {
        let unmerged = filter_by_merge_status(&sample(), false);
        assert_eq!(names(&unmerged), ["feature/new-feature", "bugfix/issue-123"]);

        let all = filter_by_merge_status(&sample(), true);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn pipeline_without_options_only_drops_protected() {
        let result = filter_branches(&sample(), &FilterOptions::default()).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn pipeline_include_merged_is_tri_state() {
        let drop_merged = FilterOptions {
            include_merged: Some(false),
            ..FilterOptions::default()
        };
        assert_eq!(names(&filter_branches(&sample(), &drop_merged).unwrap()), ["bugfix/issue-123"]);

        let keep_merged = FilterOptions {
            include_merged: Some(true),
            ..FilterOptions::default()
        };
        assert_eq!(filter_branches(&sample(), &keep_merged).unwrap().len(), 3);
    }

    #[test]
    fn pipeline_combines_keyword_and_merge_status() {
        let options = FilterOptions {
            keyword: Some("feature".into()),
            include_merged: Some(false),
            ..FilterOptions::default()
        };
        // the only unmerged feature branch is checked out
        assert!(filter_branches(&sample(), &options).unwrap().is_empty());
    }

    #[test]
    fn pipeline_never_returns_protected() {
        let options = FilterOptions::with_regex(".*");
        let result = filter_branches(&sample(), &options).unwrap();
        assert!(result.iter().all(|b| !b.is_protected()));
    }

    #[test]
    fn pipeline_fails_fast_on_invalid_options() {
        let options = FilterOptions {
            keyword: Some("x".into()),
            regex: Some("y".into()),
            ..FilterOptions::default()
        };
        assert_eq!(filter_branches(&sample(), &options), Err(FilterConfigError::KeywordAndRegex));
    }

    #[test]
    fn validate_rules() {
        let both = FilterOptions {
            keyword: Some("x".into()),
            regex: Some("y".into()),
            ..FilterOptions::default()
        };
        assert_eq!(both.validate(), Err(FilterConfigError::KeywordAndRegex));
        assert_eq!(FilterOptions::with_keyword("").validate(), Err(FilterConfigError::EmptyKeyword));
        assert_eq!(FilterOptions::with_keyword("   ").validate(), Err(FilterConfigError::EmptyKeyword));
        assert!(matches!(
            FilterOptions::with_regex("[").validate(),
            Err(FilterConfigError::InvalidRegex(_))
        ));
        assert_eq!(FilterOptions::with_keyword("x").validate(), Ok(()));
        assert_eq!(FilterOptions::default().validate(), Ok(()));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FilterConfigError::KeywordAndRegex.to_string(),
            "Cannot use both keyword and regex filters simultaneously"
        );
        assert_eq!(FilterConfigError::EmptyKeyword.to_string(), "Keyword cannot be empty");
    }

    #[test]
    fn stats_cover_whole_snapshot() {
        let all = vec![
            Branch::new("main").main().merged(),
            Branch::new("wip").current(),
            Branch::new("feature/a").merged(),
            Branch::new("b"),
            Branch::new("c"),
        ];
        let subset = filter_branches(&all, &FilterOptions::with_keyword("feature")).unwrap();

        let stats = filter_stats(&all, &subset);
        assert_eq!(
            stats,
            BranchStats {
                total: 5,
                filtered: 1,
                protected: 2,
                merged: 2,
                unmerged: 3,
            }
        );
    }

    #[test]
    fn stats_on_empty_snapshot() {
        assert_eq!(filter_stats(&[], &[]), BranchStats::default());
    }
}
