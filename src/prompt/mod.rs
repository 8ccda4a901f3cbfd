use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::core::Note;
use crate::io::{NoteStore, contains_separator};

/// Line-oriented console. Blocks on `input` for every prompt.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one line without its terminator.
    /// Returns `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Collects lines until an empty line or end of input.
    ///
    /// The result is trimmed; an empty string means no text was entered.
    pub fn read_multiline_text(&mut self, label: &str) -> io::Result<String> {
        writeln!(self.output, "\n{label}")?;
        writeln!(self.output, "Enter text. Submit an empty line to finish.\n")?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line("> ")? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n").trim().to_string())
    }

    /// Asks for a note name until one passes the existence rules.
    ///
    /// Empty input or end of input cancels and yields `None`.
    pub fn read_note_name(
        &mut self,
        store: &NoteStore,
        prompt: &str,
        must_exist: bool,
        allow_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        loop {
            let raw = match self.read_line(&format!("{prompt} "))? {
                Some(line) => line.trim().to_string(),
                None => String::new(),
            };
            if raw.is_empty() {
                writeln!(self.output, "Cancelled.\n")?;
                return Ok(None);
            }
            if contains_separator(&raw) {
                debug!(name = %raw, "rejected name with path separator");
                writeln!(self.output, "Please enter only a file name, not a path.")?;
                continue;
            }

            if must_exist {
                match store.find(&raw)? {
                    Some(note) => return Ok(Some(note.path)),
                    None => {
                        writeln!(self.output, "That note does not exist. Try again.")?;
                        continue;
                    }
                }
            }

            let (path, taken) = store.create_target(&raw)?;
            if !taken || allow_overwrite {
                return Ok(Some(path));
            }
            if self.confirm("Note exists. Overwrite? [y/N]: ")? {
                return Ok(Some(path));
            }
            writeln!(self.output, "Pick a different name.\n")?;
        }
    }

    /// Only an explicit `y` counts as yes.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.read_line(prompt)?.unwrap_or_default();
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    /// Lists the notes and lets the user pick one by 1-based number or name.
    pub fn select_note(&mut self, store: &NoteStore) -> Result<Option<Note>> {
        let notes = store.list_notes()?;
        if notes.is_empty() {
            writeln!(self.output, "\nNo notes to select. Create one first.\n")?;
            return Ok(None);
        }
        write_listing(&mut self.output, &notes)?;

        let choice = self
            .read_line("Select a note by number or name: ")?
            .unwrap_or_default();
        let choice = choice.trim();
        if choice.is_empty() {
            writeln!(self.output, "Cancelled.\n")?;
            return Ok(None);
        }

        if choice.chars().all(|c| c.is_ascii_digit()) {
            let picked = choice
                .parse::<usize>()
                .ok()
                .filter(|idx| (1..=notes.len()).contains(idx))
                .map(|idx| notes[idx - 1].clone());
            if picked.is_none() {
                writeln!(self.output, "Invalid selection.\n")?;
            }
            return Ok(picked);
        }

        if !contains_separator(choice) {
            if let Some(note) = store.find(choice)? {
                return Ok(Some(note));
            }
        }
        writeln!(self.output, "Note not found.\n")?;
        Ok(None)
    }
}

pub fn write_listing(out: &mut impl Write, notes: &[Note]) -> io::Result<()> {
    writeln!(out, "\nAvailable notes:")?;
    for (idx, note) in notes.iter().enumerate() {
        writeln!(out, " {:>2}. {} ({} bytes)", idx + 1, note.name, note.size)?;
    }
    writeln!(out)
}
