//! a full-screen host monitor for the terminal.

use {
    sparta_mon::{App, Config},
    std::{fs::OpenOptions, sync::Mutex},
    tracing::info,
};

type Error = Box<dyn std::error::Error>;

fn main() -> Result<(), Error> {
    let config = Config::from_env();
    setup_logging(&config)?;

    App::new(&config).run()?;

    Ok(())
}

/// sends logs to the file named by `SPARTA_LOG`, if any.
///
/// the terminal belongs to the dashboard, so nothing is logged unless a file is given.
fn setup_logging(config: &Config) -> Result<(), Error> {
    let Config { log, log_level, .. } = config;
    let Some(path) = log else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(*log_level)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(path = %path.display(), level = %log_level, "logging started");
    Ok(())
}
