//! Audio cues played through the operating system's own playback tools.
//!
//! There is no audio library in the stack; instead a list of playback
//! commands is probed in order (`afplay` on macOS, `paplay`, `aplay` and
//! `canberra-gtk-play` on Linux, PowerShell's `Media.SoundPlayer` on
//! Windows). The first command that is installed and has a sound file to
//! play is spawned and reaped on a background thread. When nothing is
//! available the cue is skipped.

use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Which event a sound announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    FocusComplete,
    BreakComplete,
    GoalReached,
}

/// Plays sound cues.
pub trait SoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<()>;
}

/// One way of playing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl PlaybackCommand {
    fn new(program: &'static str, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn is_available(&self) -> bool {
        find_in_path(self.program).is_some()
    }
}

/// Plays cues with whatever the platform offers.
#[derive(Debug, Clone, Default)]
pub struct SystemSound {
    /// Overrides the per-cue default files.
    pub sound_file: Option<PathBuf>,
}

impl SystemSound {
    pub fn new(sound_file: Option<PathBuf>) -> Self {
        Self { sound_file }
    }

    /// Playback commands for `cue` in the order they are tried on this platform.
    pub fn strategies(&self, cue: SoundCue) -> Vec<PlaybackCommand> {
        let file = |default: &str| -> Option<String> {
            let path = self.sound_file.clone().unwrap_or_else(|| PathBuf::from(default));
            path.exists().then(|| path.to_string_lossy().into_owned())
        };

        let mut commands = Vec::new();
        if cfg!(target_os = "macos") {
            let default = match cue {
                SoundCue::FocusComplete => "/System/Library/Sounds/Glass.aiff",
                SoundCue::BreakComplete => "/System/Library/Sounds/Ping.aiff",
                SoundCue::GoalReached => "/System/Library/Sounds/Hero.aiff",
            };
            if let Some(file) = file(default) {
                commands.push(PlaybackCommand::new("afplay", vec![file]));
            }
        } else if cfg!(target_os = "windows") {
            let default = match cue {
                SoundCue::FocusComplete => r"C:\Windows\Media\chimes.wav",
                SoundCue::BreakComplete => r"C:\Windows\Media\notify.wav",
                SoundCue::GoalReached => r"C:\Windows\Media\tada.wav",
            };
            if let Some(file) = file(default) {
                let script = format!("(New-Object Media.SoundPlayer '{}').PlaySync()", file.replace('\'', "''"));
                commands.push(PlaybackCommand::new("powershell", vec!["-NoProfile".into(), "-Command".into(), script]));
            }
        } else {
            let (default, event_id) = match cue {
                SoundCue::FocusComplete => ("/usr/share/sounds/freedesktop/stereo/complete.oga", "complete"),
                SoundCue::BreakComplete => ("/usr/share/sounds/freedesktop/stereo/bell.oga", "bell"),
                SoundCue::GoalReached => ("/usr/share/sounds/freedesktop/stereo/message.oga", "message"),
            };
            if let Some(file) = file(default) {
                commands.push(PlaybackCommand::new("paplay", vec![file.clone()]));
                commands.push(PlaybackCommand::new("aplay", vec!["-q".into(), file]));
            }
            commands.push(PlaybackCommand::new("canberra-gtk-play", vec!["-i".into(), event_id.into()]));
        }
        commands
    }
}

impl SoundPlayer for SystemSound {
    fn play(&self, cue: SoundCue) -> Result<()> {
        let command = self
            .strategies(cue)
            .into_iter()
            .find(PlaybackCommand::is_available)
            .ok_or_else(|| anyhow!("no sound playback command available for {:?}", cue))?;

        debug!(program = command.program, ?cue, "playing sound");
        spawn_reaped(&command)?;
        Ok(())
    }
}

/// Spawns `command` and waits for it on a detached thread so no zombie is left behind.
fn spawn_reaped(command: &PlaybackCommand) -> Result<JoinHandle<()>> {
    let mut child = Command::new(command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let program = command.program;
    let handle = thread::Builder::new().name("sound-reaper".into()).spawn(move || match child.wait() {
        Ok(status) if !status.success() => debug!(program, %status, "sound player exited with failure"),
        Ok(_) => {}
        Err(e) => warn!(program, error = %e, "failed to wait for sound player"),
    })?;
    Ok(handle)
}

/// First executable named `program` on `PATH`.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        let exe = dir.join(format!("{}.exe", program));
        is_executable(&exe).then_some(exe)
    })
}

fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_custom_file_drops_file_based_strategies() {
        let sound = SystemSound::new(Some(PathBuf::from("/definitely/not/here.wav")));
        let strategies = sound.strategies(SoundCue::FocusComplete);
        assert!(strategies.iter().all(|c| !c.args.iter().any(|a| a.contains("not/here"))));
    }

    #[test]
    fn unknown_program_is_not_found() {
        assert!(find_in_path("devpulse-no-such-player").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn spawned_player_is_reaped() {
        let handle = spawn_reaped(&PlaybackCommand::new("true", Vec::new())).unwrap();
        assert!(handle.join().is_ok());
    }
}
