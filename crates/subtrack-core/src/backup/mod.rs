//! Backup system with pluggable destinations
//!
//! Backups are consistent snapshots of the live database taken through
//! SQLite's online backup API, then gzip compressed.
//!
//! # Architecture
//!
//! - `BackupDestination` trait defines the interface for storage backends
//! - `LocalDestination` stores backups in a local directory
//!
//! File naming: `subtrack-YYYY-MM-DD-HHMMSS.db.gz`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod local;

pub use local::LocalDestination;

/// Information about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub name: String,
    /// Full path or remote key
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Whether the backup is compressed
    pub compressed: bool,
}

/// Result of a backup operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResult {
    /// Information about the created backup
    pub info: BackupInfo,
    /// Number of subscriptions in the backup
    pub subscriptions: i64,
    /// Number of pending reminders in the backup
    pub pending_reminders: i64,
}

/// Result of a prune operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneResult {
    /// Number of backups deleted
    pub deleted_count: usize,
    /// Names of deleted backups
    pub deleted_names: Vec<String>,
    /// Number of backups retained
    pub retained_count: usize,
    /// Total bytes freed
    pub bytes_freed: u64,
}

/// Backup retention policy: keep the newest N backups
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub keep: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { keep: 7 }
    }
}

impl RetentionPolicy {
    pub fn keep_last(n: usize) -> Self {
        Self { keep: n }
    }
}

/// Trait for backup storage destinations
pub trait BackupDestination: Send + Sync {
    /// Human-readable name for this destination
    fn name(&self) -> &str;

    /// Store a backup file
    ///
    /// Takes a local file path and stores it in the destination.
    /// Returns the stored name/key for the backup.
    fn store(&self, local_path: &Path, backup_name: &str) -> Result<String>;

    /// Retrieve a backup file to the specified local path
    fn retrieve(&self, backup_name: &str, local_path: &Path) -> Result<()>;

    /// List all backups in this destination
    fn list(&self) -> Result<Vec<BackupInfo>>;

    /// Delete a backup
    fn delete(&self, backup_name: &str) -> Result<()>;

    /// Apply retention policy and delete old backups
    fn prune(&self, policy: &RetentionPolicy) -> Result<PruneResult> {
        let mut backups = self.list()?;

        // Sort by creation time, newest first
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut deleted_names = Vec::new();
        let mut bytes_freed = 0u64;

        for backup in backups.iter().skip(policy.keep) {
            if let Err(e) = self.delete(&backup.name) {
                tracing::warn!("Failed to delete backup {}: {}", backup.name, e);
                continue;
            }
            bytes_freed += backup.size;
            deleted_names.push(backup.name.clone());
        }

        let retained_count = backups.len().saturating_sub(deleted_names.len());

        Ok(PruneResult {
            deleted_count: deleted_names.len(),
            deleted_names,
            retained_count,
            bytes_freed,
        })
    }
}

/// Generate a backup filename with timestamp
pub fn generate_backup_name() -> String {
    let now = Utc::now();
    format!("subtrack-{}.db.gz", now.format("%Y-%m-%d-%H%M%S"))
}

/// Parse backup creation time from filename
pub fn parse_backup_time(name: &str) -> Option<DateTime<Utc>> {
    // Expected format: subtrack-YYYY-MM-DD-HHMMSS.db.gz
    let name = name.strip_prefix("subtrack-")?;
    let name = name
        .strip_suffix(".db.gz")
        .or_else(|| name.strip_suffix(".db"))?;

    chrono::NaiveDateTime::parse_from_str(name, "%Y-%m-%d-%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Default backup directory
pub fn default_backup_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subtrack")
        .join("backups")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_backup_name() {
        let name = generate_backup_name();
        assert!(name.starts_with("subtrack-"));
        assert!(name.ends_with(".db.gz"));
    }

    #[test]
    fn test_parse_backup_time() {
        let name = "subtrack-2026-01-15-143022.db.gz";
        let time = parse_backup_time(name).unwrap();
        assert_eq!(
            time.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2026-01-15 14:30:22"
        );
    }

    #[test]
    fn test_parse_backup_time_invalid() {
        assert!(parse_backup_time("invalid.db").is_none());
        assert!(parse_backup_time("subtrack-baddate.db.gz").is_none());
    }

    #[test]
    fn test_default_retention_policy() {
        assert_eq!(RetentionPolicy::default().keep, 7);
        assert_eq!(RetentionPolicy::keep_last(3).keep, 3);
    }
}
