use super::stats::parse_date;
use crate::{
    db::{db::Db, pomodoro_config::PomodoroConfigs, pomodoro_sessions::PomodoroSessions},
    libs::{config::PomodoroConfig, dashboard::render_pomodoro_config, messages::Message, stats::local_day_bounds, view::View},
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PomodoroArgs {
    #[command(subcommand)]
    command: PomodoroCommand,
}

#[derive(Debug, Subcommand)]
enum PomodoroCommand {
    /// Show or change the timer settings
    Config {
        /// Edit the settings interactively
        #[arg(short, long)]
        edit: bool,
        /// Restore the default settings
        #[arg(short, long, conflicts_with = "edit")]
        reset: bool,
        /// Write the settings panel as HTML to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// List the sessions of a day
    History {
        /// Day to list: 'today' or YYYY-MM-DD
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// Rate a session or attach notes to it
    Annotate {
        /// Session id, as shown by `history`
        id: i64,
        /// Productivity rating from 1 to 10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: Option<u8>,
        #[arg(short, long)]
        notes: Option<String>,
        /// What the session was spent on
        #[arg(short, long)]
        activity: Option<String>,
    },
}

pub fn cmd(args: PomodoroArgs) -> Result<()> {
    let db = Db::new()?;

    match args.command {
        PomodoroCommand::Config { edit, reset, html } => {
            let configs = PomodoroConfigs::new(&db);
            let config = if reset {
                let config = configs.reset()?;
                msg_success!(Message::PomodoroConfigReset);
                config
            } else if edit {
                let config = PomodoroConfig::init(&configs.load()?)?;
                configs.save(&config)?;
                msg_success!(Message::PomodoroConfigSaved);
                config
            } else {
                configs.load()?
            };

            match html {
                Some(path) => {
                    fs::write(&path, render_pomodoro_config(&config))?;
                    msg_success!(Message::HtmlWritten(path.display().to_string()));
                }
                None => {
                    msg_print!(Message::PomodoroConfigHeader, true);
                    View::pomodoro_config(&config)?;
                }
            }
        }
        PomodoroCommand::History { date } => {
            let date = parse_date(&date)?;
            let (from, to) = local_day_bounds(date);
            let sessions = PomodoroSessions::new(&db).fetch_range(from.timestamp(), to.timestamp())?;
            let label = date.format("%Y-%m-%d").to_string();

            if sessions.is_empty() {
                msg_info!(Message::NoSessionsForDate(label));
                return Ok(());
            }
            msg_print!(Message::SessionsHeader(label), true);
            View::sessions(&sessions)?;
        }
        PomodoroCommand::Annotate {
            id,
            rating,
            notes,
            activity,
        } => {
            let sessions = PomodoroSessions::new(&db);
            if sessions.get(id)?.is_none() {
                return Err(msg_error_anyhow!(Message::SessionNotFound(id)));
            }
            let session = sessions.annotate(id, rating, notes, activity)?;
            msg_success!(Message::SessionAnnotated(id));
            View::sessions(&[session])?;
        }
    }

    Ok(())
}
