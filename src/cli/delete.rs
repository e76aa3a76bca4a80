//! Delete command and the interactive `branch` entry point

use anyhow::{bail, Result};

use super::app::{FilterArgs, Session};
use super::tui::{self, PickerMode, PickerOutcome};
use super::{display, prompt, switch};
use crate::domain::{BatchDeleteResult, DeleteOptions, FilterOptions};

/// `gitt branch`: stats, then an interactive delete or switch
pub fn branch_menu(session: &mut Session) -> Result<()> {
    let stats = session.manager.stats(&FilterOptions::default())?;
    if session.output.is_json() {
        session.output.data(&stats);
        return Ok(());
    }
    display::stats(&stats);
    session.output.blank();

    let deletable = session.manager.filtered_branches(&FilterOptions::default())?;
    let outcome = tui::pick(
        &session.output,
        None,
        session.manager.branches(),
        &deletable,
        false,
    )?;

    match outcome {
        PickerOutcome::Delete(names) => {
            let options = DeleteOptions {
                verbose: session.output.is_verbose(),
                ..DeleteOptions::default()
            };
            let result = session.manager.delete_branches(&names, options);
            report(session, &result, false);
        }
        PickerOutcome::Switch(name) => switch::run(session, Some(&name))?,
        PickerOutcome::Cancelled => session.output.info("Operation cancelled"),
    }

    Ok(())
}

/// `gitt delete`: filtered batch delete, or interactive selection without
/// a keyword/regex
pub fn run(session: &mut Session, filter: &FilterArgs, dry_run: bool, force: bool, yes: bool) -> Result<()> {
    let options = session.filter_options(filter);
    options.validate()?;

    let delete_options = DeleteOptions {
        dry_run,
        force,
        verbose: session.output.is_verbose(),
    };

    if !session.output.is_json() {
        display::stats(&session.manager.stats(&options)?);
        session.output.blank();
    }

    if options.has_pattern() {
        let skip_confirm = force || yes || dry_run || !session.config.repo.confirm_delete;
        by_filter(session, &options, delete_options, skip_confirm)
    } else {
        interactive(session, delete_options)
    }
}

fn by_filter(
    session: &mut Session,
    options: &FilterOptions,
    delete_options: DeleteOptions,
    skip_confirm: bool,
) -> Result<()> {
    let output = session.output;
    let filtered = session.manager.filtered_branches(options)?;
    output.verbose_ctx("delete", &format!("{} branches match the filter", filtered.len()));

    if filtered.is_empty() {
        if output.is_json() {
            report(session, &BatchDeleteResult::default(), delete_options.dry_run);
        } else {
            output.warning("No branches match the filter criteria");
        }
        return Ok(());
    }

    if !output.is_json() {
        display::delete_preview(&filtered);
        output.blank();
    }

    if !skip_confirm {
        let question = format!(
            "Are you sure you want to delete {} {}?",
            filtered.len(),
            display::plural(filtered.len())
        );
        if !prompt::confirm(&question)? {
            output.info("Operation cancelled");
            return Ok(());
        }
    }

    let result = session.manager.delete_branches_by_filter(options, delete_options)?;
    report(session, &result, delete_options.dry_run);
    Ok(())
}

fn interactive(session: &mut Session, delete_options: DeleteOptions) -> Result<()> {
    let output = session.output;
    if output.is_json() {
        bail!("Interactive selection is not available with --format json; pass --filter or --regex");
    }

    let deletable = session.manager.filtered_branches(&FilterOptions::default())?;

    if deletable.is_empty() {
        output.info("No branches available for deletion");
        return Ok(());
    }

    let outcome = tui::pick(
        &output,
        Some(PickerMode::Delete),
        session.manager.branches(),
        &deletable,
        delete_options.dry_run,
    )?;

    let PickerOutcome::Delete(names) = outcome else {
        output.info("Operation cancelled");
        return Ok(());
    };

    let result = session.manager.delete_branches(&names, delete_options);
    report(session, &result, delete_options.dry_run);
    Ok(())
}

fn report(session: &Session, result: &BatchDeleteResult, dry_run: bool) {
    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "dry_run": dry_run,
            "total": result.total,
            "success": result.success,
            "failed": result.failed,
            "results": result.results,
        }));
    } else {
        display::delete_results(result, dry_run);
    }
}
