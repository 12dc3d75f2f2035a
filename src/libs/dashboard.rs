//! HTML renderers for the host's webview panels.
//!
//! Pure `(data) -> String` functions; the host decides how to display the
//! markup. Every string that can come from the user (project names, file
//! paths, notes) goes through [`escape_html`].

use crate::libs::app_metadata;
use crate::libs::config::PomodoroConfig;
use crate::libs::formatter::format_seconds;
use crate::libs::messages::Message;
use crate::libs::stats::StatsReport;
use std::fmt::Write;

const STYLE: &str = "body{font-family:var(--vscode-font-family,sans-serif);padding:1em}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5em}\
th,td{text-align:left;padding:4px 8px;border-bottom:1px solid #8884}\
td.num{text-align:right;font-variant-numeric:tabular-nums}\
.bar{background:#8883;height:8px;border-radius:4px}\
.bar>div{background:#e55;height:8px;border-radius:4px}\
footer{opacity:.6;font-size:.8em}";

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}<footer>{name} {version}</footer>\n</body>\n</html>\n",
        title = escape_html(title),
        style = STYLE,
        body = body,
        name = escape_html(app_metadata::name()),
        version = escape_html(app_metadata::version()),
    )
}

/// Stats panel for one day.
pub fn render_stats(report: &StatsReport) -> String {
    let mut body = String::new();
    let title = Message::StatsHeader(report.date.format("%Y-%m-%d").to_string()).to_string();

    if report.is_empty() {
        let _ = writeln!(body, "<p>{}</p>", escape_html(&Message::StatsEmpty.to_string()));
        return page(&title, &body);
    }

    let _ = writeln!(
        body,
        "<p>{} <strong>{}</strong> · {} <strong>{}</strong></p>",
        Message::LabelActive,
        format_seconds(report.active_seconds as i64),
        Message::LabelIdle,
        format_seconds(report.idle_seconds as i64)
    );

    for project in &report.projects {
        let _ = writeln!(
            body,
            "<h2>{} <small>{}</small></h2>\n<table>\n<tr><th>{}</th><th>{}</th></tr>",
            escape_html(&project.project),
            format_seconds(project.total_seconds as i64),
            Message::LabelFile,
            Message::LabelTime
        );
        for file in &project.files {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
                escape_html(&file.file),
                format_seconds(file.seconds as i64)
            );
        }
        body.push_str("</table>\n");
    }

    let pomodoro = &report.pomodoro;
    let rows = [
        (Message::LabelCompletedFocus, format!("{} / {}", pomodoro.completed_focus, pomodoro.daily_goal)),
        (Message::LabelFocusTime, format_seconds(pomodoro.focus_seconds)),
        (Message::LabelBreakTime, format_seconds(pomodoro.break_seconds)),
        (Message::LabelInterrupted, pomodoro.interrupted.to_string()),
        (
            Message::LabelAverageRating,
            pomodoro.average_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string()),
        ),
    ];
    let _ = writeln!(body, "<h2>{}</h2>\n<table>", Message::LabelPomodoro);
    for (label, value) in rows {
        let _ = writeln!(body, "<tr><td>{}</td><td class=\"num\">{}</td></tr>", label, value);
    }
    let _ = writeln!(
        body,
        "</table>\n<div class=\"bar\"><div style=\"width:{:.0}%\"></div></div>",
        pomodoro.goal_progress()
    );

    page(&title, &body)
}

/// Labelled Pomodoro settings, shared by the panel and the terminal table.
pub fn pomodoro_config_rows(config: &PomodoroConfig) -> [(Message, String); 10] {
    let on_off = |flag: bool| (if flag { Message::ValueOn } else { Message::ValueOff }).to_string();
    [
        (Message::SettingFocus, Message::ValueMinutes(config.focus_duration_minutes).to_string()),
        (Message::SettingShortBreak, Message::ValueMinutes(config.short_break_duration_minutes).to_string()),
        (Message::SettingLongBreak, Message::ValueMinutes(config.long_break_duration_minutes).to_string()),
        (Message::SettingSessionsUntilLongBreak, config.sessions_until_long_break.to_string()),
        (Message::SettingDailyGoal, Message::ValueSessions(config.daily_goal_sessions).to_string()),
        (Message::SettingAutoStartBreaks, on_off(config.auto_start_breaks)),
        (Message::SettingAutoStartFocus, on_off(config.auto_start_focus)),
        (Message::SettingSoundAlerts, on_off(config.enable_sound_alerts)),
        (Message::SettingDesktopNotifications, on_off(config.enable_desktop_notifications)),
        (Message::SettingStatusBarTimer, on_off(config.enable_status_bar_timer)),
    ]
}

/// Read-only view of the Pomodoro settings.
pub fn render_pomodoro_config(config: &PomodoroConfig) -> String {
    let rows = pomodoro_config_rows(config);

    let mut body = String::from("<table>\n");
    for (label, value) in rows {
        let _ = writeln!(body, "<tr><th>{}</th><td>{}</td></tr>", label, escape_html(&value));
    }
    body.push_str("</table>\n");

    page(&Message::PomodoroConfigHeader.to_string(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn config_panel_lists_every_setting() {
        let html = render_pomodoro_config(&PomodoroConfig::default());
        assert!(html.contains("<tr><th>Short break</th><td>5 min</td></tr>"));
        assert!(html.contains("<tr><th>Auto-start focus</th><td>off</td></tr>"));
        assert!(html.contains("<tr><th>Sound alerts</th><td>on</td></tr>"));
        assert_eq!(html.matches("<tr>").count(), 10);
    }
}
