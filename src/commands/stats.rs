use crate::{
    db::{db::Db, pomodoro_config::PomodoroConfigs, pomodoro_sessions::PomodoroSessions, time_entries::TimeEntries},
    libs::{
        dashboard::render_stats,
        messages::Message,
        stats::{local_day_bounds, StatsReport},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Day to report: 'today' or YYYY-MM-DD
    #[arg(short, long, default_value = "today")]
    date: String,
    /// Write the HTML dashboard to this file instead of printing tables
    #[arg(long)]
    html: Option<PathBuf>,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let db = Db::new()?;
    let report = build_report(&db, date)?;

    if let Some(path) = args.html {
        fs::write(&path, render_stats(&report))?;
        msg_success!(Message::HtmlWritten(path.display().to_string()));
        return Ok(());
    }

    if report.is_empty() {
        msg_info!(Message::StatsEmpty);
        return Ok(());
    }
    msg_print!(Message::StatsHeader(date.format("%Y-%m-%d").to_string()), true);
    View::stats(&report)
}

pub fn build_report(db: &Db, date: NaiveDate) -> Result<StatsReport> {
    let (from, to) = local_day_bounds(date);
    let entries = TimeEntries::new(db).fetch_range(from, to)?;
    let sessions = PomodoroSessions::new(db).fetch_range(from.timestamp(), to.timestamp())?;
    let goal = PomodoroConfigs::new(db).load()?.daily_goal_sessions;
    Ok(StatsReport::build(&entries, &sessions, date, goal))
}

/// Accepts `today` or an ISO date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => msg_bail_anyhow!(Message::InvalidDate(value.to_string())),
    }
}
