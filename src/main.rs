mod app;
mod core;
mod input;
mod io;
mod prompt;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the menu.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NOTES_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    app::run()
}
