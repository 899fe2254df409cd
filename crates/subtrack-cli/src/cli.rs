//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Subtrack - Know what you're subscribed to
#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Self-hosted subscription tracker with renewal reminders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "subtrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add a subscription
    Add {
        /// Display name (e.g., "Netflix")
        name: String,

        /// Cost per billing cycle
        #[arg(short, long)]
        cost: f64,

        /// Billing cycle: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Next renewal date (YYYY-MM-DD)
        #[arg(short, long)]
        renews: String,

        /// Category: entertainment, productivity, health, education, news,
        /// utilities, gaming, finance, other
        #[arg(long, default_value = "other")]
        category: String,

        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List subscriptions
    List {
        /// Filter by name substring (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one subscription in detail
    Show {
        /// Subscription id
        id: i64,
    },

    /// Edit a subscription
    Edit {
        /// Subscription id
        id: i64,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New cost per billing cycle
        #[arg(long)]
        cost: Option<f64>,

        /// New billing cycle: weekly, monthly, yearly
        #[arg(long)]
        cycle: Option<String>,

        /// New renewal date (YYYY-MM-DD)
        #[arg(long)]
        renews: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a subscription
    Remove {
        /// Subscription id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Pause a subscription (kept in the list, excluded from totals and reminders)
    Pause {
        /// Subscription id
        id: i64,
    },

    /// Resume a paused subscription
    Resume {
        /// Subscription id
        id: i64,
    },

    /// Advance a subscription's renewal date by one billing cycle
    Renew {
        /// Subscription id
        id: i64,
    },

    /// Show spending dashboard
    Dashboard,

    /// Show database status
    Status,

    /// Manage renewal reminders
    Remind {
        #[command(subcommand)]
        action: Option<RemindAction>,
    },

    /// Export subscriptions
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format: json, csv
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Manage database backups
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Clear all subscriptions and reminders (settings are kept)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RemindAction {
    /// Show reminder settings, permission state, and the pending queue
    Status,

    /// Re-sync all reminders from the current subscription list
    Sync,

    /// Print and consume reminders whose trigger time has passed
    Due,

    /// Turn reminders on and sync
    Enable,

    /// Turn reminders off and clear the pending queue
    Disable,

    /// Set how many days before renewal reminders fire (0-14)
    LeadTime {
        /// Days before renewal
        days: u32,
    },
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// Create a new backup
    Create {
        /// Backup name override (defaults to timestamped name)
        #[arg(short, long)]
        name: Option<String>,

        /// Backup directory (defaults to platform data dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// List available backups
    List {
        /// Backup directory (defaults to platform data dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Restore a backup over the current database
    Restore {
        /// Backup name to restore
        name: String,

        /// Backup directory (defaults to platform data dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups, keeping the newest N
    Prune {
        /// Number of backups to keep
        #[arg(short, long, default_value = "7")]
        keep: usize,

        /// Backup directory (defaults to platform data dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
