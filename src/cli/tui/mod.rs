//! Interactive branch picker
//!
//! A small ratatui front end used by `branch`, `delete` without a pattern,
//! and `switch` without a name. It only chooses; the caller performs the
//! deletion or checkout through the manager.

mod event;
mod picker;
mod view;

use std::io::{self, stdout, Stdout};
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::domain::Branch;
use crate::output::Output;
use event::{Event, EventHandler};
use picker::Picker;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Delete,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Branch names in listing order
    Delete(Vec<String>),
    Switch(String),
    Cancelled,
}

/// Runs the picker until the user chooses or quits.
///
/// `start` skips the mode menu. `deletable` is what delete mode offers;
/// switch mode offers every branch in `all`.
pub fn pick(
    output: &Output,
    start: Option<PickerMode>,
    all: &[Branch],
    deletable: &[Branch],
    dry_run: bool,
) -> Result<PickerOutcome> {
    output.verbose_ctx("tui", &format!("Opening picker with {} branches", all.len()));

    let mut picker = Picker::new(start, all, deletable, dry_run);
    let mut terminal = init_terminal()?;
    let events = EventHandler::new(250);

    // terminal must be restored even if drawing panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_loop(&mut terminal, &mut picker, &events)));
    let restore_result = restore_terminal();

    match result {
        Ok(inner) => {
            restore_result?;
            inner?;
            Ok(picker.into_outcome())
        }
        Err(payload) => {
            if let Some(s) = payload.downcast_ref::<&str>() {
                Err(anyhow!("Picker panicked: {}", s))
            } else if let Some(s) = payload.downcast_ref::<String>() {
                Err(anyhow!("Picker panicked: {}", s))
            } else {
                Err(anyhow!("Picker panicked with unknown error"))
            }
        }
    }
}

fn run_loop(terminal: &mut Terminal, picker: &mut Picker, events: &EventHandler) -> Result<()> {
    while picker.outcome().is_none() {
        terminal.draw(|frame| view::draw(frame, picker))?;

        match events.next()? {
            Event::Key(key) => picker.handle_key(key),
            Event::Redraw => {}
        }
    }
    Ok(())
}

fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(ratatui::Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
