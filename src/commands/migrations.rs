//! `devpulse migrations`: schema version, pending changes and table sizes.
//!
//! Opens the database without migrating so the report shows the file as it is.

use crate::db::db::Db;
use crate::db::migrations::{get_db_version, table_row_counts, MigrationManager};
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version, pending migrations and rows per table
    Status,
    /// List applied migrations
    History,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let conn = Db::new_without_migrations()?;
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(&conn)?;
            msg_print!(Message::DatabaseVersion(version, manager.latest_version()));

            let pending = manager.pending(&conn)?;
            if pending.is_empty() {
                msg_info!(Message::DatabaseUpToDate);
            } else {
                msg_info!(Message::MigrationsFound(pending.len()));
                for (version, name) in pending {
                    msg_print!(Message::PendingMigration(version, name.to_string()));
                }
            }

            View::table_counts(&table_row_counts(&conn)?)?;
        }
        MigrationsCommand::History => {
            msg_print!(Message::MigrationHistory, true);
            View::migration_history(&manager.get_migration_history(&conn)?)?;
        }
    }

    Ok(())
}
