//! Switch command

use anyhow::{bail, Result};

use super::app::Session;
use super::tui::{self, PickerMode, PickerOutcome};

pub fn run(session: &mut Session, name: Option<&str>) -> Result<()> {
    let output = session.output;

    let target = match name {
        Some(name) => name.to_string(),
        None => {
            if output.is_json() {
                bail!("Interactive selection is not available with --format json; pass a branch name");
            }
            if session.manager.branches().is_empty() {
                output.info("No branches found");
                return Ok(());
            }

            let outcome = tui::pick(
                &output,
                Some(PickerMode::Switch),
                session.manager.branches(),
                &[],
                false,
            )?;

            match outcome {
                PickerOutcome::Switch(name) => name,
                _ => {
                    output.info("Operation cancelled");
                    return Ok(());
                }
            }
        }
    };

    if !session.manager.branches().iter().any(|b| b.name == target) {
        bail!("Unknown branch: {}", target);
    }

    if !session.manager.switch_branch(&target) {
        bail!("Failed to switch to branch: {}", target);
    }

    if session.manager.is_stale() {
        session.manager.refresh()?;
    }
    let current = session.manager.current_branch().map(|b| b.name.clone());
    output.verbose_ctx("switch", &format!("Current branch after refresh: {:?}", current));

    if output.is_json() {
        output.data(&serde_json::json!({
            "switched": true,
            "branch": target,
        }));
    } else {
        output.success(&format!("Switched to branch: {}", target));
    }

    Ok(())
}
