//! Picker state and key handling
//!
//! Kept free of terminal I/O so the key bindings can be tested directly.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{PickerMode, PickerOutcome};
use crate::domain::filter::keyword_matches;
use crate::domain::Branch;

/// Entries of the mode menu, in display order
pub const MENU: [(PickerMode, &str); 2] = [
    (PickerMode::Delete, "Delete branches"),
    (PickerMode::Switch, "Switch branch"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Menu,
    List,
    Search(String),
    Confirm,
}

pub struct Picker {
    all: Vec<Branch>,
    deletable: Vec<Branch>,
    mode: PickerMode,
    stage: Stage,
    menu_index: usize,
    cursor: usize,
    selected: BTreeSet<String>,
    query: Option<String>,
    status: Option<String>,
    dry_run: bool,
    outcome: Option<PickerOutcome>,
}

impl Picker {
    /// Starts at the mode menu when `mode` is `None`
    pub fn new(mode: Option<PickerMode>, all: &[Branch], deletable: &[Branch], dry_run: bool) -> Self {
        Self {
            all: all.to_vec(),
            deletable: deletable.to_vec(),
            mode: mode.unwrap_or(PickerMode::Delete),
            stage: if mode.is_some() { Stage::List } else { Stage::Menu },
            menu_index: 0,
            cursor: 0,
            selected: BTreeSet::new(),
            query: None,
            status: None,
            dry_run,
            outcome: None,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The active search text, including one still being typed
    pub fn query(&self) -> Option<&str> {
        match &self.stage {
            Stage::Search(buffer) => Some(buffer.as_str()),
            _ => self.query.as_deref(),
        }
    }

    pub fn outcome(&self) -> Option<&PickerOutcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> PickerOutcome {
        self.outcome.unwrap_or(PickerOutcome::Cancelled)
    }

    /// Branches shown in the list for the current mode and search
    pub fn visible(&self) -> Vec<&Branch> {
        let source = match self.mode {
            PickerMode::Delete => &self.deletable,
            PickerMode::Switch => &self.all,
        };

        match self.query().filter(|q| !q.is_empty()) {
            Some(query) => source
                .iter()
                .filter(|b| keyword_matches(&b.name, query, false))
                .collect(),
            None => source.iter().collect(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.outcome = Some(PickerOutcome::Cancelled);
            return;
        }

        match self.stage.clone() {
            Stage::Menu => self.handle_menu_key(key.code),
            Stage::List => self.handle_list_key(key.code),
            Stage::Search(buffer) => self.handle_search_key(key.code, buffer),
            Stage::Confirm => self.handle_confirm_key(key.code),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.menu_index = self.menu_index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.menu_index = (self.menu_index + 1).min(MENU.len() - 1),
            KeyCode::Enter => {
                self.mode = MENU[self.menu_index].0;
                self.stage = Stage::List;
                self.cursor = 0;
                if self.mode == PickerMode::Delete && self.deletable.is_empty() {
                    self.status = Some("No branches available for deletion".to_string());
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.outcome = Some(PickerOutcome::Cancelled),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let visible_len = self.visible().len();
        self.status = None;

        match code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < visible_len {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') if self.mode == PickerMode::Delete => {
                let name = self.visible().get(self.cursor).map(|b| b.name.clone());
                if let Some(name) = name {
                    if !self.selected.remove(&name) {
                        self.selected.insert(name);
                    }
                }
            }
            KeyCode::Char('a') if self.mode == PickerMode::Delete => {
                let names: Vec<String> = self.visible().iter().map(|b| b.name.clone()).collect();
                self.selected.extend(names);
            }
            KeyCode::Char('n') if self.mode == PickerMode::Delete => self.selected.clear(),
            KeyCode::Char('/') => {
                let current = self.query.clone().unwrap_or_default();
                self.stage = Stage::Search(current);
            }
            KeyCode::Enter => self.pick(),
            KeyCode::Esc if self.query.is_some() => {
                self.query = None;
                self.cursor = 0;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.outcome = Some(PickerOutcome::Cancelled),
            _ => {}
        }
    }

    fn pick(&mut self) {
        match self.mode {
            PickerMode::Switch => {
                let name = self.visible().get(self.cursor).map(|b| b.name.clone());
                if let Some(name) = name {
                    self.outcome = Some(PickerOutcome::Switch(name));
                }
            }
            PickerMode::Delete => {
                if self.selected.is_empty() {
                    self.status = Some("Please select at least one branch".to_string());
                } else {
                    self.stage = Stage::Confirm;
                }
            }
        }
    }

    fn handle_search_key(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Char(c) => {
                buffer.push(c);
                self.stage = Stage::Search(buffer);
                self.cursor = 0;
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.stage = Stage::Search(buffer);
                self.cursor = 0;
            }
            KeyCode::Enter => {
                let query = buffer.trim().to_string();
                self.query = if query.is_empty() { None } else { Some(query) };
                self.stage = Stage::List;
                self.cursor = 0;
            }
            KeyCode::Esc => {
                self.stage = Stage::List;
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                // listing order, not selection order
                let names = self
                    .deletable
                    .iter()
                    .filter(|b| self.selected.contains(&b.name))
                    .map(|b| b.name.clone())
                    .collect();
                self.outcome = Some(PickerOutcome::Delete(names));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.stage = Stage::List,
            _ => {}
        }
    }
}
