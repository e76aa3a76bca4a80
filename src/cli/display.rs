//! Text rendering for branch lists, stats and batch results

use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::{BatchDeleteResult, Branch, BranchStats};

const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Human-readable age of a git ISO date, or the raw string if unparseable
pub fn commit_age(date: &str, now: DateTime<Utc>) -> String {
    match DateTime::<FixedOffset>::parse_from_str(date.trim(), GIT_DATE_FORMAT) {
        Ok(then) => format_age(now.signed_duration_since(then.with_timezone(&Utc))),
        Err(_) => date.to_string(),
    }
}

fn format_age(age: chrono::Duration) -> String {
    let unit = |n: i64, name: &str| {
        if n == 1 {
            format!("1 {} ago", name)
        } else {
            format!("{} {}s ago", n, name)
        }
    };

    match age.num_seconds() {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => unit(s / 60, "minute"),
        s if s < 86_400 => unit(s / 3_600, "hour"),
        s if s < 30 * 86_400 => unit(s / 86_400, "day"),
        s if s < 365 * 86_400 => unit(s / (30 * 86_400), "month"),
        s => unit(s / (365 * 86_400), "year"),
    }
}

fn marker(branch: &Branch) -> char {
    if branch.is_current {
        '*'
    } else {
        ' '
    }
}

/// Prints one line per branch: marker, name, age, tip commit, role
pub fn branches(branches: &[Branch], now: DateTime<Utc>) {
    let width = branches.iter().map(|b| b.name.len()).max().unwrap_or(0);

    for branch in branches {
        let role = branch.label().map(|l| format!(" ({})", l)).unwrap_or_default();
        println!(
            "{} {:<width$}  {:<16} {}{}",
            marker(branch),
            branch.name,
            commit_age(&branch.last_commit_date, now),
            branch.last_commit,
            role,
            width = width
        );
    }
}

pub fn stats(stats: &BranchStats) {
    println!("Branch Statistics");
    println!("{}", "=".repeat(40));
    println!("Total branches:     {}", stats.total);
    println!("Filtered branches:  {}", stats.filtered);
    println!("Protected branches: {}", stats.protected);
    println!("Merged branches:    {}", stats.merged);
    println!("Unmerged branches:  {}", stats.unmerged);
}

pub fn delete_preview(branches: &[Branch]) {
    println!("Branches to be deleted:");
    for branch in branches {
        let role = branch.label().map(|l| format!(" ({})", l)).unwrap_or_default();
        println!("  - {}{}", branch.name, role);
    }
    println!();
    println!("Total branches to delete: {}", branches.len());
}

pub fn delete_results(result: &BatchDeleteResult, dry_run: bool) {
    let action = if dry_run { "previewed" } else { "deleted" };

    println!("Delete Results");
    println!("{}", "=".repeat(40));
    println!("Total processed:      {}", result.total);
    println!("Successfully {}: {}", action, result.success);
    println!("Failed:               {}", result.failed);

    if result.failed > 0 {
        println!();
        println!("Failed:");
        for item in result.failures() {
            let reason = item.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
            println!("  [!] {}: {}", item.branch_name, reason);
        }
    }

    if result.success > 0 {
        println!();
        println!("Successfully {}:", action);
        for item in result.successes() {
            println!("  [x] {}", item.branch_name);
        }
    }

    if dry_run {
        println!();
        println!("This was a dry run. No branches were actually deleted.");
    }
}

pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        "branch"
    } else {
        "branches"
    }
}
