//! Read-only commands (list, stats, show)

use anyhow::{bail, Result};
use chrono::Utc;

use super::app::{FilterArgs, Session};
use super::display;
use crate::repo::BranchProvider;

/// List local branches, filtered unless `all` is set
pub fn local(session: &Session, filter: &FilterArgs, all: bool) -> Result<()> {
    let output = session.output;

    let branches = if all {
        session.manager.branches().to_vec()
    } else {
        session.manager.filtered_branches(&session.filter_options(filter))?
    };
    output.verbose_ctx("list", &format!("Listing {} branches", branches.len()));

    if output.is_json() {
        output.data(&branches);
    } else if branches.is_empty() {
        println!("No branches found");
    } else {
        println!("Found {} {}:", branches.len(), display::plural(branches.len()));
        display::branches(&branches, Utc::now());
    }

    Ok(())
}

/// List remote-tracking branches
pub fn remote(session: &Session) -> Result<()> {
    let output = session.output;
    let remotes = session.manager.provider().remote_branches()?;

    if output.is_json() {
        output.data(&remotes);
    } else if remotes.is_empty() {
        println!("No remote branches found");
    } else {
        for name in &remotes {
            println!("  {}", name);
        }
    }

    Ok(())
}

pub fn stats(session: &Session, filter: &FilterArgs) -> Result<()> {
    let stats = session.manager.stats(&session.filter_options(filter))?;

    if session.output.is_json() {
        session.output.data(&stats);
    } else {
        display::stats(&stats);
    }

    Ok(())
}

pub fn show(session: &Session, name: &str) -> Result<()> {
    let output = session.output;
    let provider = session.manager.provider();

    if !provider.branch_exists(name)? {
        bail!("Branch does not exist: {}", name);
    }

    let details = provider.branch_details(name)?;
    let snapshot = session.manager.branches().iter().find(|b| b.name == name);

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": details.name,
            "last_commit": details.last_commit,
            "last_commit_date": details.last_commit_date,
            "author": details.author,
            "is_merged": details.is_merged,
            "is_current": snapshot.is_some_and(|b| b.is_current),
            "is_main": snapshot.is_some_and(|b| b.is_main),
        }));
    } else {
        println!("Branch: {}", details.name);
        println!("{}", "-".repeat(40));
        println!("Last commit: {}", details.last_commit);
        println!(
            "Date:        {} ({})",
            details.last_commit_date,
            display::commit_age(&details.last_commit_date, Utc::now())
        );
        println!("Author:      {}", details.author);
        println!("Merged:      {}", if details.is_merged { "yes" } else { "no" });
        if let Some(role) = snapshot.and_then(|b| b.label()).filter(|l| *l != "merged") {
            println!("Role:        {}", role);
        }
    }

    Ok(())
}
