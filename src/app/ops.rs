use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::core::Operation;
use crate::io::NoteStore;
use crate::prompt::{Console, write_listing};

pub fn dispatch<R: BufRead, W: Write>(
    op: Operation,
    store: &NoteStore,
    console: &mut Console<R, W>,
) -> Result<()> {
    match op {
        Operation::List => list_notes(store, console),
        Operation::Read => read_note(store, console),
        Operation::Create => create_note(store, console),
        Operation::Append => append_to_note(store, console),
    }
}

pub fn list_notes<R: BufRead, W: Write>(
    store: &NoteStore,
    console: &mut Console<R, W>,
) -> Result<()> {
    let notes = store.list_notes()?;
    if notes.is_empty() {
        writeln!(console.out(), "\nNo notes found. Create one from the menu!\n")?;
        return Ok(());
    }
    write_listing(console.out(), &notes)?;
    Ok(())
}

pub fn read_note<R: BufRead, W: Write>(
    store: &NoteStore,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(note) = console.select_note(store)? else {
        return Ok(());
    };
    let content = store.read(&note)?;

    let out = console.out();
    writeln!(out, "\n--- {} ---", note.name)?;
    if content.is_empty() {
        writeln!(out, "(empty)")?;
    } else {
        writeln!(out, "{content}")?;
    }
    writeln!(out, "{}\n", "-".repeat(note.name.chars().count() + 8))?;
    Ok(())
}

pub fn create_note<R: BufRead, W: Write>(
    store: &NoteStore,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(path) = console.read_note_name(store, "Enter a name for the new note:", false, false)?
    else {
        return Ok(());
    };
    let text = console.read_multiline_text("Add the body of your note:")?;
    if text.is_empty() {
        writeln!(console.out(), "No text entered; note not saved.\n")?;
        return Ok(());
    }

    store
        .write(&path, &text)
        .with_context(|| format!("creating note {}", path.display()))?;
    writeln!(console.out(), "Saved {}.\n", display_name(&path))?;
    Ok(())
}

pub fn append_to_note<R: BufRead, W: Write>(
    store: &NoteStore,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(note) = console.select_note(store)? else {
        return Ok(());
    };
    let text = console.read_multiline_text(&format!("Append text to {}:", note.name))?;
    if text.is_empty() {
        writeln!(console.out(), "No text entered; nothing changed.\n")?;
        return Ok(());
    }

    store
        .append(&note.path, &text)
        .with_context(|| format!("appending to note {}", note.path.display()))?;
    writeln!(console.out(), "Updated {}.\n", note.name)?;
    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
