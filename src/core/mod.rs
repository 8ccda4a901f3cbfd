mod commands;
mod note;

pub use commands::{Command, MenuChoice, Operation};
pub use note::Note;
