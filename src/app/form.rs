use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::core::{Command, Note, Operation};
use crate::input::map_key_event;
use crate::io::{NoteStore, contains_separator};
use crate::ui::{UiModel, draw};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Action,
    Notes,
    Name,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
}

#[derive(Debug, Clone)]
pub enum Dialog {
    Info {
        title: String,
        message: String,
    },
    Error {
        message: String,
    },
    ConfirmOverwrite {
        file_name: String,
        path: PathBuf,
        text: String,
        choice: ConfirmChoice,
    },
}

/// Full-screen form with the same four operations as the text menu.
pub struct FormState {
    store: NoteStore,
    pub action: Operation,
    pub notes: Vec<Note>,
    pub selected: Option<usize>,
    pub name: String,
    pub body: String,
    pub focus: Focus,
    pub status: String,
    pub dialog: Option<Dialog>,
    pub running: bool,
    pub needs_redraw: bool,
}

impl FormState {
    pub fn new(store: NoteStore) -> Self {
        let mut state = Self {
            store,
            action: Operation::Read,
            notes: Vec::new(),
            selected: None,
            name: String::new(),
            body: String::new(),
            focus: Focus::Action,
            status: "Ready.".to_string(),
            dialog: None,
            running: true,
            needs_redraw: true,
        };
        state.refresh_notes(None);
        state.update_fields();
        state
    }

    pub fn body_editable(&self) -> bool {
        matches!(self.action, Operation::Create | Operation::Append)
    }

    pub fn shows_notes(&self) -> bool {
        !matches!(self.action, Operation::Create)
    }

    pub fn shows_name(&self) -> bool {
        matches!(self.action, Operation::Create)
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected.and_then(|idx| self.notes.get(idx))
    }

    pub fn hint(&self) -> &'static str {
        match self.action {
            Operation::List => "Refresh to see all files, then run the action.",
            Operation::Read => "Select a note and run the action to view it.",
            Operation::Create => "Enter a name plus body text, then run the action.",
            Operation::Append => "Select a note, enter extra text, then run the action.",
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Action];
        if self.shows_notes() {
            order.push(Focus::Notes);
        }
        if self.shows_name() {
            order.push(Focus::Name);
        }
        if self.body_editable() {
            order.push(Focus::Body);
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let len = order.len();
        self.focus = if forward {
            order[(idx + 1) % len]
        } else {
            order[(idx + len - 1) % len]
        };
    }

    fn set_action(&mut self, action: Operation) {
        self.action = action;
        self.update_fields();
    }

    fn update_fields(&mut self) {
        if self.action == Operation::Create {
            self.body.clear();
        }
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::Action;
        }
        self.status = self.hint().to_string();
    }

    /// Re-scans the directory. `select` wins over the previous selection.
    pub fn refresh_notes(&mut self, select: Option<&str>) {
        let previous = self.selected_note().map(|n| n.name.clone());
        let notes = match self.store.list_notes() {
            Ok(notes) => notes,
            Err(e) => {
                debug!(error = %e, "listing notes failed");
                self.dialog = Some(Dialog::Error {
                    message: format!("Could not list notes: {e}"),
                });
                return;
            }
        };
        self.notes = notes;

        let wanted = select.map(str::to_string).or(previous);
        self.selected = wanted
            .and_then(|name| self.notes.iter().position(|n| n.name == name))
            .or(if self.notes.is_empty() { None } else { Some(0) });
    }

    pub fn handle_command(&mut self, cmd: Command) {
        self.needs_redraw = true;
        match cmd {
            Command::Quit => {
                self.running = false;
                return;
            }
            Command::Refresh => {
                self.refresh_notes(None);
                return;
            }
            _ => {}
        }

        if self.dialog.is_some() {
            self.handle_dialog_command(cmd);
            return;
        }

        match cmd {
            Command::Run => self.execute_action(),
            Command::FocusNext => self.cycle_focus(true),
            Command::FocusPrev => self.cycle_focus(false),
            _ => match self.focus {
                Focus::Action => match cmd {
                    Command::Left | Command::Up => self.set_action(self.action.prev()),
                    Command::Right | Command::Down => self.set_action(self.action.next()),
                    Command::Confirm => self.execute_action(),
                    _ => {}
                },
                Focus::Notes => match cmd {
                    Command::Up => self.move_selection(-1),
                    Command::Down => self.move_selection(1),
                    Command::Confirm => self.execute_action(),
                    _ => {}
                },
                Focus::Name => match cmd {
                    Command::Insert(c) => self.name.push(c),
                    Command::Backspace => {
                        self.name.pop();
                    }
                    Command::Confirm => self.execute_action(),
                    _ => {}
                },
                Focus::Body => match cmd {
                    Command::Insert(c) => self.body.push(c),
                    Command::NewLine => self.body.push('\n'),
                    Command::Backspace => {
                        self.body.pop();
                    }
                    _ => {}
                },
            },
        }
    }

    fn handle_dialog_command(&mut self, cmd: Command) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog {
            Dialog::Info { .. } | Dialog::Error { .. } => {
                if !matches!(cmd, Command::Confirm | Command::NewLine | Command::Dismiss) {
                    self.dialog = Some(dialog);
                }
            }
            Dialog::ConfirmOverwrite {
                file_name,
                path,
                text,
                choice,
            } => {
                let decision = match cmd {
                    Command::Insert('y') | Command::Insert('Y') => Some(ConfirmChoice::Yes),
                    Command::Insert('n') | Command::Insert('N') | Command::Dismiss => {
                        Some(ConfirmChoice::No)
                    }
                    Command::Confirm | Command::NewLine => Some(choice),
                    _ => None,
                };
                match decision {
                    Some(ConfirmChoice::Yes) => self.save_new_note(&path, &text),
                    Some(ConfirmChoice::No) => {
                        self.status = "Pick a different name.".to_string();
                    }
                    None => {
                        let choice = match (cmd, choice) {
                            (Command::Left | Command::Right, ConfirmChoice::Yes) => {
                                ConfirmChoice::No
                            }
                            (Command::Left | Command::Right, ConfirmChoice::No) => {
                                ConfirmChoice::Yes
                            }
                            (_, current) => current,
                        };
                        self.dialog = Some(Dialog::ConfirmOverwrite {
                            file_name,
                            path,
                            text,
                            choice,
                        });
                    }
                }
            }
        }
    }

    fn move_selection(&mut self, direction: isize) {
        if self.notes.is_empty() {
            self.selected = None;
            return;
        }
        let len = self.notes.len();
        let idx = self.selected.unwrap_or(0);
        self.selected = Some(if direction < 0 {
            (idx + len - 1) % len
        } else {
            (idx + 1) % len
        });
    }

    fn info(&mut self, title: &str, message: &str) {
        self.dialog = Some(Dialog::Info {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: String) {
        debug!(%message, "form action failed");
        self.dialog = Some(Dialog::Error { message });
    }

    pub fn execute_action(&mut self) {
        match self.action {
            Operation::List => self.handle_list(),
            Operation::Read => self.handle_read(),
            Operation::Create => self.handle_create(),
            Operation::Append => self.handle_append(),
        }
    }

    fn handle_list(&mut self) {
        self.refresh_notes(None);
        let lines: Vec<String> = self
            .notes
            .iter()
            .enumerate()
            .map(|(idx, n)| format!("{}. {} ({} bytes)", idx + 1, n.name, n.size))
            .collect();
        self.body = if lines.is_empty() {
            "No notes found.".to_string()
        } else {
            lines.join("\n")
        };
        self.status = "Listed available notes.".to_string();
    }

    fn handle_read(&mut self) {
        let Some(note) = self.selected_note().cloned() else {
            self.info("Select a note", "Please choose a note first.");
            return;
        };
        match self.store.read(&note) {
            Ok(content) => {
                self.body = if content.is_empty() {
                    "(empty)".to_string()
                } else {
                    content
                };
                self.status = format!("Showing {}.", note.name);
            }
            Err(e) => self.error(format!("Could not read {}: {e}", note.name)),
        }
    }

    fn handle_create(&mut self) {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            self.info("Missing name", "Enter a note name.");
            return;
        }
        if contains_separator(&name) {
            self.info("Invalid name", "Please enter only a file name, not a path.");
            return;
        }
        let text = self.body.trim().to_string();
        if text.is_empty() {
            self.info("Missing text", "Enter some text for the note.");
            return;
        }

        match self.store.create_target(&name) {
            Ok((path, true)) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.dialog = Some(Dialog::ConfirmOverwrite {
                    file_name,
                    path,
                    text,
                    choice: ConfirmChoice::No,
                });
            }
            Ok((path, false)) => self.save_new_note(&path, &text),
            Err(e) => self.error(format!("Could not list notes: {e}")),
        }
    }

    fn save_new_note(&mut self, path: &std::path::Path, text: &str) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Err(e) = self.store.write(path, text) {
            self.error(format!("Could not save {file_name}: {e}"));
            return;
        }
        info!(note = %file_name, "saved from form");
        self.status = format!("Saved {file_name}.");
        self.refresh_notes(Some(&file_name));
    }

    fn handle_append(&mut self) {
        let Some(note) = self.selected_note().cloned() else {
            self.info("Select a note", "Choose a note to append to.");
            return;
        };
        let text = self.body.trim().to_string();
        if text.is_empty() {
            self.info("Missing text", "Enter text to append.");
            return;
        }

        if let Err(e) = self.store.append(&note.path, &text) {
            self.error(format!("Could not append to {}: {e}", note.name));
            return;
        }
        self.body.clear();
        self.status = format!("Appended to {}.", note.name);
        self.refresh_notes(Some(&note.name));
    }
}

pub fn run_form(store: NoteStore) -> Result<()> {
    let mut state = FormState::new(store);
    let (_guard, mut terminal) = setup_terminal()?;

    while state.running {
        if state.needs_redraw {
            terminal.draw(|f| {
                draw(
                    f,
                    UiModel {
                        action: state.action,
                        notes: &state.notes,
                        selected: state.selected,
                        name: &state.name,
                        body: &state.body,
                        body_editable: state.body_editable(),
                        shows_notes: state.shows_notes(),
                        shows_name: state.shows_name(),
                        focus: state.focus,
                        status: &state.status,
                        dialog: state.dialog.as_ref(),
                    },
                );
            })?;
            state.needs_redraw = false;
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => {
                    let multiline = state.focus == Focus::Body && state.dialog.is_none();
                    if let Some(cmd) = map_key_event(key, multiline) {
                        state.handle_command(cmd);
                    }
                }
                Event::Resize(..) => state.needs_redraw = true,
                _ => {}
            }
        }
    }

    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn setup_terminal() -> Result<(TerminalGuard, Terminal<CrosstermBackend<io::Stdout>>)> {
    enable_raw_mode().context("enabling raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("enter alternate screen")?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        hook(panic_info);
    }));

    let guard = TerminalGuard;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend).context("creating terminal")?;
    Ok((guard, terminal))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{ConfirmChoice, Dialog, Focus, FormState};
    use crate::core::{Command, Operation};
    use crate::io::NoteStore;

    fn type_text(state: &mut FormState, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                state.handle_command(Command::NewLine);
            } else {
                state.handle_command(Command::Insert(c));
            }
        }
    }

    fn form_for(action: Operation, store: NoteStore) -> FormState {
        let mut state = FormState::new(store);
        while state.action != action {
            state.handle_command(Command::Right);
        }
        state
    }

    #[test]
    fn starts_on_read_with_first_note_selected() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("b.txt"), "b").expect("write");
        fs::write(dir.path().join("A.txt"), "a").expect("write");
        let state = FormState::new(NoteStore::new(dir.path()));

        assert_eq!(state.action, Operation::Read);
        assert_eq!(state.selected_note().map(|n| n.name.as_str()), Some("A.txt"));
        assert_eq!(state.status, "Select a note and run the action to view it.");
    }

    #[test]
    fn create_saves_and_selects_new_note() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "a").expect("write");
        let mut state = form_for(Operation::Create, NoteStore::new(dir.path()));
        assert!(state.shows_name());

        state.handle_command(Command::FocusNext);
        assert_eq!(state.focus, Focus::Name);
        type_text(&mut state, "zeta");
        state.handle_command(Command::FocusNext);
        assert_eq!(state.focus, Focus::Body);
        type_text(&mut state, "  first\nsecond \n");
        state.handle_command(Command::Run);

        assert_eq!(
            fs::read_to_string(dir.path().join("zeta.txt")).expect("read"),
            "first\nsecond\n"
        );
        assert_eq!(state.status, "Saved zeta.txt.");
        assert_eq!(state.notes.len(), 2);
        assert_eq!(state.selected_note().map(|n| n.name.as_str()), Some("zeta.txt"));
    }

    #[test]
    fn create_over_existing_needs_confirmation() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("keep.txt"), "original\n").expect("write");
        let mut state = form_for(Operation::Create, NoteStore::new(dir.path()));
        state.name = "keep".to_string();
        state.body = "replacement".to_string();

        state.handle_command(Command::Run);
        assert!(matches!(
            state.dialog,
            Some(Dialog::ConfirmOverwrite {
                choice: ConfirmChoice::No,
                ..
            })
        ));
        state.handle_command(Command::Confirm);
        assert!(state.dialog.is_none());
        assert_eq!(
            fs::read_to_string(dir.path().join("keep.txt")).expect("read"),
            "original\n"
        );

        state.handle_command(Command::Run);
        state.handle_command(Command::Left);
        state.handle_command(Command::Confirm);
        assert_eq!(
            fs::read_to_string(dir.path().join("keep.txt")).expect("read"),
            "replacement\n"
        );
    }

    #[test]
    fn create_over_unlisted_file_asks_first() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("main.rs"), "fn main() {}\n").expect("write");
        let mut state = form_for(Operation::Create, NoteStore::new(dir.path()));
        state.name = "main.rs".to_string();
        state.body = "clobbered".to_string();

        state.handle_command(Command::Run);
        assert!(matches!(
            state.dialog,
            Some(Dialog::ConfirmOverwrite { ref file_name, .. }) if file_name == "main.rs"
        ));
        state.handle_command(Command::Dismiss);
        assert_eq!(
            fs::read_to_string(dir.path().join("main.rs")).expect("read"),
            "fn main() {}\n"
        );
    }

    #[test]
    fn create_validates_inputs_without_writing() {
        let dir = tempdir().expect("tempdir");
        let mut state = form_for(Operation::Create, NoteStore::new(dir.path()));

        state.handle_command(Command::Run);
        assert!(matches!(state.dialog, Some(Dialog::Info { ref title, .. }) if title == "Missing name"));
        state.handle_command(Command::Dismiss);

        state.name = "../escape".to_string();
        state.body = "text".to_string();
        state.handle_command(Command::Run);
        assert!(matches!(state.dialog, Some(Dialog::Info { ref title, .. }) if title == "Invalid name"));
        state.handle_command(Command::Dismiss);

        state.name = "blank".to_string();
        state.body = "   \n ".to_string();
        state.handle_command(Command::Run);
        assert!(matches!(state.dialog, Some(Dialog::Info { ref title, .. }) if title == "Missing text"));

        assert!(fs::read_dir(dir.path()).expect("read dir").next().is_none());
    }

    #[test]
    fn append_writes_and_clears_text() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("draft.txt"), "hello\n").expect("write");
        let mut state = form_for(Operation::Append, NoteStore::new(dir.path()));

        state.body = "world".to_string();
        state.handle_command(Command::Run);
        assert_eq!(
            fs::read_to_string(dir.path().join("draft.txt")).expect("read"),
            "hello\n\nworld\n"
        );
        assert!(state.body.is_empty());
        assert_eq!(state.status, "Appended to draft.txt.");
        assert_eq!(state.selected_note().map(|n| n.size), Some(13));
    }

    #[test]
    fn append_and_read_need_a_selection() {
        let dir = tempdir().expect("tempdir");
        let mut state = form_for(Operation::Append, NoteStore::new(dir.path()));
        state.body = "text".to_string();
        state.handle_command(Command::Run);
        assert!(matches!(state.dialog, Some(Dialog::Info { ref title, .. }) if title == "Select a note"));

        let mut state = FormState::new(NoteStore::new(dir.path()));
        state.handle_command(Command::Run);
        assert!(matches!(state.dialog, Some(Dialog::Info { .. })));
    }

    #[test]
    fn read_and_list_fill_output_pane() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "").expect("write");
        fs::write(dir.path().join("b.txt"), "bee\n").expect("write");
        let mut state = FormState::new(NoteStore::new(dir.path()));

        state.handle_command(Command::Run);
        assert_eq!(state.body, "(empty)");

        state.handle_command(Command::FocusNext);
        state.handle_command(Command::Down);
        state.handle_command(Command::Confirm);
        assert_eq!(state.body, "bee\n");
        assert_eq!(state.status, "Showing b.txt.");

        let mut state = form_for(Operation::List, NoteStore::new(dir.path()));
        state.handle_command(Command::Run);
        assert_eq!(state.body, "1. a.txt (0 bytes)\n2. b.txt (4 bytes)");
    }

    #[test]
    fn refresh_picks_up_external_changes() {
        let dir = tempdir().expect("tempdir");
        let mut state = FormState::new(NoteStore::new(dir.path()));
        assert!(state.notes.is_empty());

        fs::write(dir.path().join("late.txt"), "x").expect("write");
        state.handle_command(Command::Refresh);
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.selected, Some(0));
    }

    #[test]
    fn listing_failure_shows_error_dialog() {
        let dir = tempdir().expect("tempdir");
        let state = FormState::new(NoteStore::new(dir.path().join("missing")));
        assert!(matches!(state.dialog, Some(Dialog::Error { .. })));
    }

    #[test]
    fn focus_skips_hidden_fields() {
        let dir = tempdir().expect("tempdir");
        let mut state = FormState::new(NoteStore::new(dir.path()));
        state.handle_command(Command::FocusNext);
        assert_eq!(state.focus, Focus::Notes);
        state.handle_command(Command::FocusNext);
        assert_eq!(state.focus, Focus::Action);

        state.handle_command(Command::Right);
        assert_eq!(state.action, Operation::Create);
        state.handle_command(Command::FocusPrev);
        assert_eq!(state.focus, Focus::Body);
    }
}
