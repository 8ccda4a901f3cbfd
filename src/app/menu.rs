use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::app::ops;
use crate::core::MenuChoice;
use crate::io::NoteStore;
use crate::prompt::Console;

/// Prints the farewell for Ctrl+C and returns the exit status to use.
pub fn on_interrupt(out: &mut impl Write) -> i32 {
    let _ = writeln!(out, "\nExiting.");
    let _ = out.flush();
    0
}

/// Runs the numbered menu until the user picks Exit or input ends.
pub fn run_menu<R: BufRead, W: Write>(store: &NoteStore, console: &mut Console<R, W>) -> Result<()> {
    loop {
        let out = console.out();
        writeln!(out, "Note Manager")?;
        for (key, choice) in MenuChoice::MENU {
            writeln!(out, " {key}. {}", choice.label())?;
        }

        let Some(input) = console.read_line("Choose an option: ")? else {
            writeln!(console.out(), "\nGoodbye!")?;
            return Ok(());
        };
        match MenuChoice::parse(&input) {
            None => writeln!(console.out(), "Invalid option. Try again.\n")?,
            Some(MenuChoice::Exit) => {
                writeln!(console.out(), "Goodbye!")?;
                return Ok(());
            }
            Some(MenuChoice::Run(op)) => {
                debug!(?op, "menu dispatch");
                ops::dispatch(op, store, console)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use tempfile::tempdir;

    use super::{on_interrupt, run_menu};
    use crate::io::NoteStore;
    use crate::prompt::Console;

    fn session(store: &NoteStore, input: &str) -> String {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run_menu(store, &mut console).expect("menu");
        String::from_utf8(console.into_output()).expect("utf8")
    }

    #[test]
    fn full_session_creates_appends_and_reads() {
        let dir = tempdir().expect("tempdir");
        let store = NoteStore::new(dir.path());

        let out = session(
            &store,
            "3\ndraft\nhello\n\n4\n1\nworld\n\n2\ndraft\n1\n0\n",
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("draft.txt")).expect("read"),
            "hello\n\nworld\n"
        );
        assert!(out.contains("--- draft.txt ---\nhello\n\nworld\n"));
        assert!(out.contains("  1. draft.txt (13 bytes)"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn invalid_option_loops_back() {
        let dir = tempdir().expect("tempdir");
        let store = NoteStore::new(dir.path());
        let out = session(&store, "9\n0\n");
        assert!(out.contains("Invalid option. Try again."));
        assert_eq!(out.matches("Note Manager").count(), 2);
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let dir = tempdir().expect("tempdir");
        let store = NoteStore::new(dir.path());
        let out = session(&store, "1\n");
        assert!(out.contains("No notes found."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn menu_lists_every_entry() {
        let dir = tempdir().expect("tempdir");
        let store = NoteStore::new(dir.path());
        let out = session(&store, "0\n");
        for line in [
            " 1. List notes",
            " 2. Read a note",
            " 3. Create / overwrite a note",
            " 4. Append to a note",
            " 0. Exit",
        ] {
            assert!(out.contains(line), "missing {line}");
        }
    }

    #[test]
    fn interrupt_says_goodbye_and_succeeds() {
        let mut out = Vec::new();
        assert_eq!(on_interrupt(&mut out), 0);
        assert_eq!(String::from_utf8(out).expect("utf8"), "\nExiting.\n");
    }
}
