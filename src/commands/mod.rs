pub mod init;
#[cfg(debug_assertions)]
pub mod migrations;
pub mod pomodoro;
pub mod stats;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Track editor activity, driven by the host over stdin/stdout")]
    Watch,
    #[command(about = "Show tracked time and focus sessions for a day")]
    Stats(stats::StatsArgs),
    #[command(about = "Pomodoro settings and session history", arg_required_else_help = true)]
    Pomodoro(pomodoro::PomodoroArgs),
    #[cfg(debug_assertions)]
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch => watch::cmd().await,
            Commands::Stats(args) => stats::cmd(args),
            Commands::Pomodoro(args) => pomodoro::cmd(args),
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}
