//! `devpulse watch`: the engine loop behind the editor extension.
//!
//! The host writes one JSON event per line to stdin and reads status,
//! notices and panels from stdout. A single task multiplexes the input, the
//! one-second tick and the idle check, so no two handlers ever interleave.
//! SIGINT, SIGTERM, a `shutdown` event or stdin EOF flush and exit.

use crate::db::db::Db;
use crate::libs::alerts::AlertObserver;
use crate::libs::config::Config;
use crate::libs::engine::Engine;
use crate::libs::host::{parse_event, HostEvent, HostOutput};
use crate::libs::messages::Message;
use crate::libs::notifier::DesktopNotifier;
use crate::libs::pomodoro::IDLE_CHECK_INTERVAL_SECS;
use crate::libs::sound::SystemSound;
use crate::libs::tracker::TICK_MILLIS;
use crate::msg_debug;
use anyhow::Result;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

pub async fn cmd() -> Result<()> {
    let mut engine = match start_engine() {
        Ok(engine) => engine,
        Err(e) => {
            report_startup_failure(&mut tokio::io::stdout(), &e).await;
            return Err(e);
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run(&mut engine, stdin, tokio::io::stdout(), wait_for_shutdown()).await
}

fn start_engine() -> Result<Engine> {
    let db = Db::new()?;
    let config = Config::read()?;
    let notifications = config.notifications.clone().unwrap_or_default();

    let mut engine = Engine::new(&db, &config, Utc::now())?;
    engine.add_observer(Box::new(AlertObserver::new(
        DesktopNotifier,
        SystemSound::new(notifications.sound_file),
        notifications.quiet_hours,
    )));
    Ok(engine)
}

/// Tells the host, which only reads stdout, why the engine could not start.
pub async fn report_startup_failure<W: AsyncWrite + Unpin>(output: &mut W, error: &anyhow::Error) {
    let notice = HostOutput::error(Message::WatchStartFailed(error.to_string()));
    if let Err(e) = write_outputs(output, &[notice]).await {
        warn!(error = %e, "failed to report startup failure");
    }
}

/// Drives `engine` from `input` until EOF, a `shutdown` event or `shutdown` resolving.
///
/// The engine is shut down on every exit, including read and write failures.
pub async fn run<R, W, F>(engine: &mut Engine, input: R, mut output: W, shutdown: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    msg_debug!(Message::WatchStarted);
    let served = serve(engine, input, &mut output, shutdown).await;
    if let Err(e) = &served {
        warn!(error = %e, "watch loop stopped early");
    }

    let outputs = engine.shutdown(Utc::now());
    let flushed = write_outputs(&mut output, &outputs).await;
    msg_debug!(Message::WatchStopped);
    served.and(flushed)
}

async fn serve<R, W, F>(engine: &mut Engine, mut input: R, output: &mut W, shutdown: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut tick = interval(Duration::from_millis(TICK_MILLIS));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut idle_check = interval(Duration::from_secs(IDLE_CHECK_INTERVAL_SECS));
    idle_check.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Both intervals complete their first tick immediately.
    tick.tick().await;
    idle_check.tick().await;
    tokio::pin!(shutdown);

    write_outputs(output, &[HostOutput::Status(engine.status())]).await?;

    // Kept across iterations: a partial line survives a cancelled read.
    let mut buffer = Vec::new();
    loop {
        let outputs = tokio::select! {
            read = input.read_until(b'\n', &mut buffer) => {
                if read? == 0 {
                    break;
                }
                match handle_line(engine, std::mem::take(&mut buffer)) {
                    Some(outputs) => outputs,
                    None => break,
                }
            },
            _ = tick.tick() => engine.tick(Utc::now()),
            _ = idle_check.tick() => engine.idle_check(Utc::now()),
            _ = &mut shutdown => break,
        };
        write_outputs(output, &outputs).await?;
    }
    Ok(())
}

/// Handles one raw input line. `None` means the host asked to shut down.
fn handle_line(engine: &mut Engine, raw: Vec<u8>) -> Option<Vec<HostOutput>> {
    let line = match String::from_utf8(raw) {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "host line is not valid UTF-8");
            return Some(vec![HostOutput::error(Message::MalformedHostLine(e.to_string()))]);
        }
    };
    if line.trim().is_empty() {
        return Some(Vec::new());
    }

    match parse_event(line.trim()) {
        Ok(HostEvent::Shutdown) => None,
        Ok(event) => Some(engine.handle(event, Utc::now())),
        Err(e) => {
            warn!(error = %e, "malformed host line");
            Some(vec![HostOutput::error(Message::MalformedHostLine(e.to_string()))])
        }
    }
}

async fn write_outputs<W: AsyncWrite + Unpin>(output: &mut W, outputs: &[HostOutput]) -> Result<()> {
    if outputs.is_empty() {
        return Ok(());
    }
    let mut buffer = String::new();
    for item in outputs {
        buffer.push_str(&item.to_line()?);
        buffer.push('\n');
    }
    output.write_all(buffer.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
