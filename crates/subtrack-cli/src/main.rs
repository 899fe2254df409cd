//! Subtrack CLI - Subscription tracker with renewal reminders
//!
//! Usage:
//!   subtrack init                       Initialize database
//!   subtrack add "Netflix" -c 15.49 -r 2026-03-10
//!   subtrack dashboard                  Spending summary
//!   subtrack remind sync                Re-sync renewal reminders

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            name,
            cost,
            cycle,
            renews,
            category,
            notes,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, &name, cost, &cycle, &renews, &category, &notes)
        }
        Commands::List { query, category } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, query.as_deref(), category.as_deref())
        }
        Commands::Show { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_show(&db, id)
        }
        Commands::Edit {
            id,
            name,
            cost,
            cycle,
            renews,
            category,
            notes,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_edit(
                &db,
                id,
                name,
                cost,
                cycle.as_deref(),
                renews.as_deref(),
                category.as_deref(),
                notes,
            )
        }
        Commands::Remove { id, yes } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_remove(&db, id, yes)
        }
        Commands::Pause { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_set_active(&db, id, false)
        }
        Commands::Resume { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_set_active(&db, id, true)
        }
        Commands::Renew { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_renew(&db, id)
        }
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db)
        }
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::Remind { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(RemindAction::Status) => commands::cmd_remind_status(&db).await,
                Some(RemindAction::Sync) => commands::cmd_remind_sync(&db).await,
                Some(RemindAction::Due) => commands::cmd_remind_due(&db),
                Some(RemindAction::Enable) => commands::cmd_remind_enable(&db).await,
                Some(RemindAction::Disable) => commands::cmd_remind_disable(&db),
                Some(RemindAction::LeadTime { days }) => {
                    commands::cmd_remind_lead_time(&db, days).await
                }
            }
        }
        Commands::Export { output, format } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, output.as_deref(), &format)
        }
        Commands::Backup { action } => match action {
            BackupAction::Create { name, dir } => {
                let db = commands::open_db(&cli.db)?;
                commands::cmd_backup_create(&db, name.as_deref(), dir)
            }
            BackupAction::List { dir } => commands::cmd_backup_list(dir),
            BackupAction::Restore { name, dir, force } => {
                commands::cmd_backup_restore(&cli.db, &name, dir, force)
            }
            BackupAction::Prune { keep, dir, yes } => commands::cmd_backup_prune(keep, dir, yes),
        },
        Commands::Reset { yes } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_reset(&db, yes)
        }
    }
}
