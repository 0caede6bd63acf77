mod cli;
mod commands;
mod config;
mod logging;
mod model;
mod storage;
mod timer;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::str::FromStr;
use tracing::{debug, warn};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let flag_level = args
        .log_level
        .as_deref()
        .map(|raw| {
            tracing::Level::from_str(raw.trim())
                .map_err(|_| anyhow!("unsupported log level `{}`", raw))
        })
        .transpose()?;
    if let Some(level) = flag_level {
        logging::init_logging(level)?;
    }

    let session = commands::Session::open()?;
    if flag_level.is_none() {
        match session.settings.level() {
            Ok(level) => logging::init_logging(level)?,
            Err(err) => {
                logging::init_logging(config::DEFAULT_LOG_LEVEL)?;
                warn!(error = %err, "falling back to the default log level");
            }
        }
    }
    debug!(
        path = %session.store.slot_path(storage::SETTINGS_SLOT).display(),
        "settings loaded"
    );

    let command = args.command.unwrap_or(cli::Command::Cal {
        year: None,
        month: None,
        ad: false,
    });
    if !matches!(command, cli::Command::Settings { .. }) {
        session.ensure_valid()?;
    }
    match command {
        cli::Command::Cal { year, month, ad } => commands::cal(&session, year, month, ad),
        cli::Command::Convert(convert) => commands::convert(&session, convert),
        cli::Command::Today => commands::today(&session),
        cli::Command::Task { action } => match action {
            cli::TaskCommand::Add { title, date } => commands::task_add(&session, title, date),
            cli::TaskCommand::List { date, all } => commands::task_list(&session, date, all),
            cli::TaskCommand::Done { task_id, date } => {
                commands::task_done(&session, task_id, date)
            }
            cli::TaskCommand::Rm { task_id, date } => commands::task_rm(&session, task_id, date),
        },
        cli::Command::Timer { sessions } => commands::timer(&session, sessions),
        cli::Command::Settings { action } => match action.unwrap_or(cli::SettingsCommand::Show) {
            cli::SettingsCommand::Show => commands::settings_show(&session),
            cli::SettingsCommand::Set {
                focus,
                short_break,
                long_break,
                long_break_every,
                level,
            } => commands::settings_set(
                &session,
                focus,
                short_break,
                long_break,
                long_break_every,
                level,
            ),
        },
    }
}
