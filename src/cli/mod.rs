//! # Command-Line Interface
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `branch` | Statistics, then an interactive delete or switch |
//! | `delete` | Filtered batch delete (`-f`/`-r`), or interactive selection |
//! | `switch` | Checkout by name, or pick from a list |
//! | `list` | Filtered local branches, `--all`, or `--remote` |
//! | `stats` | Totals for the current filter |
//! | `show` | Details of one branch |
//!
//! ## Output Formats
//!
//! All commands accept `--format text|json`. Without the flag the global
//! config decides, then text.
//!
//! ## Verbose Mode
//!
//! ```bash
//! gitt -v delete -f feature --dry-run
//! ```
//!
//! Call [`run()`] to parse arguments and execute the command.

mod app;
mod delete;
mod display;
mod list;
mod prompt;
mod switch;
mod tui;

pub use app::{run, Cli, Commands, FilterArgs};
pub use crate::output::{Output, OutputFormat};
