mod filesystem;

pub use filesystem::{NoteStore, contains_separator, normalize_name};
