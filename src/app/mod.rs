mod form;
mod menu;
mod ops;

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::io::{NoteStore, contains_separator, normalize_name};
use crate::prompt::{Console, write_listing};

pub use form::{ConfirmChoice, Dialog, Focus};

#[derive(Parser, Debug)]
#[command(author, version, about = "Notepad - plain-text note manager")]
struct Cli {
    /// Directory holding the notes.
    #[arg(long, env = "NOTES_DIR", value_name = "DIR", global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Numbered text menu (default).
    Menu,
    /// Full-screen form.
    Form,
    /// Print every note with its size.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print a note.
    Read { name: String },
    /// Write a note from stdin.
    Create {
        name: String,
        /// Replace an existing note.
        #[arg(long)]
        force: bool,
    },
    /// Append stdin to a note.
    Append { name: String },
}

fn default_notes_root() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("notepad")
        .join("notes"))
}

fn ensure_notes_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("creating notes root {}", root.display()))?;
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let notes_root = match cli.dir {
        Some(dir) => dir,
        None => default_notes_root()?,
    };
    ensure_notes_root(&notes_root)?;
    let store = NoteStore::new(notes_root);
    debug!(root = %store.root().display(), "using notes directory");

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            install_interrupt_handler()?;
            let stdin = io::stdin();
            let mut console = Console::new(stdin.lock(), io::stdout());
            menu::run_menu(&store, &mut console)
        }
        Commands::Form => form::run_form(store),
        Commands::List { json } => print_listing(&store, json, &mut io::stdout()),
        Commands::Read { name } => print_note(&store, &name, &mut io::stdout()),
        Commands::Create { name, force } => {
            let text = read_stdin_text()?;
            create_from_text(&store, &name, &text, force, &mut io::stdout())
        }
        Commands::Append { name } => {
            let text = read_stdin_text()?;
            append_from_text(&store, &name, &text, &mut io::stdout())
        }
    }
}

/// Ctrl+C while the menu waits for input exits successfully.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        let code = menu::on_interrupt(&mut io::stdout());
        std::process::exit(code);
    })
    .context("installing Ctrl+C handler")
}

fn read_stdin_text() -> Result<String> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("reading note text from stdin")?;
    Ok(raw.trim().to_string())
}

fn checked_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        bail!("note name cannot be empty");
    }
    if contains_separator(name) {
        bail!("note name must be a file name, not a path: {name}");
    }
    Ok(name)
}

fn print_listing(store: &NoteStore, json: bool, out: &mut impl Write) -> Result<()> {
    let notes = store.list_notes()?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &notes).context("serializing note list")?;
        writeln!(out)?;
    } else if notes.is_empty() {
        writeln!(out, "No notes found.")?;
    } else {
        write_listing(out, &notes)?;
    }
    Ok(())
}

fn print_note(store: &NoteStore, raw: &str, out: &mut impl Write) -> Result<()> {
    let name = checked_name(raw)?;
    let note = store
        .find(name)?
        .with_context(|| format!("note not found: {}", normalize_name(name)))?;
    let content = store.read(&note)?;
    if content.is_empty() {
        writeln!(out, "(empty)")?;
    } else {
        write!(out, "{content}")?;
    }
    Ok(())
}

fn create_from_text(
    store: &NoteStore,
    raw: &str,
    text: &str,
    force: bool,
    out: &mut impl Write,
) -> Result<()> {
    let name = checked_name(raw)?;
    if text.is_empty() {
        writeln!(out, "No text entered; note not saved.")?;
        return Ok(());
    }
    let (path, taken) = store.create_target(name)?;
    if taken && !force {
        bail!("note already exists: {} (use --force)", path.display());
    }
    store.write(&path, text)?;
    info!(path = %path.display(), "created from stdin");
    let saved = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    writeln!(out, "Saved {saved}.")?;
    Ok(())
}

fn append_from_text(store: &NoteStore, raw: &str, text: &str, out: &mut impl Write) -> Result<()> {
    let name = checked_name(raw)?;
    let note = store
        .find(name)?
        .with_context(|| format!("note not found: {}", normalize_name(name)))?;
    if text.is_empty() {
        writeln!(out, "No text entered; nothing changed.")?;
        return Ok(());
    }
    store.append(&note.path, text)?;
    writeln!(out, "Updated {}.", note.name)?;
    Ok(())
}
