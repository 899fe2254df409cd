//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `backup` - Backup management commands (create, list, restore, prune)
//! - `core` - Core commands (init, reset) and shared utilities (open_db)
//! - `dashboard` - Dashboard and status commands
//! - `export` - Subscription export command
//! - `remind` - Reminder management commands
//! - `subscriptions` - Subscription CRUD commands

pub mod backup;
pub mod core;
pub mod dashboard;
pub mod export;
pub mod remind;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use backup::*;
pub use core::*;
pub use dashboard::*;
pub use export::*;
pub use remind::*;
pub use subscriptions::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use subtrack_core::models::{BillingCycle, Category};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").context("Invalid date format (use YYYY-MM-DD)")
}

/// Parse a billing cycle argument
pub fn parse_cycle(s: &str) -> Result<BillingCycle> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Parse a category argument
pub fn parse_category(s: &str) -> Result<Category> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Ask for confirmation on the terminal
pub fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;

    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
