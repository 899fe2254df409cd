//! Database backup operations
//!
//! Snapshots use SQLite's online backup API, which produces a consistent
//! copy while the database is in use, even mid-write under WAL.

use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::info;

use super::Database;
use crate::backup::{
    generate_backup_name, BackupDestination, BackupInfo, BackupResult, PruneResult,
    RetentionPolicy,
};
use crate::error::{Error, Result};

impl Database {
    /// Create a backup of the database
    ///
    /// The snapshot is staged in a temp file and handed to the destination,
    /// which compresses it on store.
    ///
    /// # Arguments
    /// * `destination` - Where to store the backup
    /// * `backup_name` - Optional name override (defaults to timestamped name)
    pub fn create_backup(
        &self,
        destination: &dyn BackupDestination,
        backup_name: Option<&str>,
    ) -> Result<BackupResult> {
        let conn = self.conn()?;

        // Counts before backup, for reporting
        let subscriptions: i64 =
            conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))?;
        let pending_reminders: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pending_reminders",
            [],
            |row| row.get(0),
        )?;

        let name = backup_name
            .map(String::from)
            .unwrap_or_else(generate_backup_name);

        // Stage the snapshot in a temp file
        let temp_backup = NamedTempFile::new()
            .map_err(|e| Error::Backup(format!("Failed to create temp file: {}", e)))?;
        let temp_path = temp_backup.path();

        {
            let mut target = rusqlite::Connection::open(temp_path)
                .map_err(|e| Error::Backup(format!("Failed to open backup target: {}", e)))?;
            let backup = rusqlite::backup::Backup::new(&conn, &mut target)
                .map_err(|e| Error::Backup(format!("Failed to start backup: {}", e)))?;
            backup
                .run_to_completion(100, Duration::from_millis(10), None)
                .map_err(|e| Error::Backup(format!("Backup failed: {}", e)))?;
        }

        info!("Created raw backup at: {}", temp_path.display());

        // Store the backup (compresses it)
        let stored_name = destination.store(temp_path, &name)?;

        let backups = destination.list()?;
        let info = backups
            .into_iter()
            .find(|b| b.name == stored_name)
            .ok_or_else(|| Error::Backup("Backup not found after storing".to_string()))?;

        info!("Backup complete: {} ({} bytes)", info.name, info.size);

        Ok(BackupResult {
            info,
            subscriptions,
            pending_reminders,
        })
    }

    /// Restore a database from backup
    ///
    /// # Arguments
    /// * `destination` - Where the backup is stored
    /// * `backup_name` - Name of the backup to restore
    /// * `target_path` - Where to restore the database
    /// * `force` - Overwrite existing database if present
    pub fn restore_backup(
        destination: &dyn BackupDestination,
        backup_name: &str,
        target_path: &Path,
        force: bool,
    ) -> Result<()> {
        use std::fs;

        if target_path.exists() {
            if !force {
                return Err(Error::Backup(format!(
                    "Database already exists at {}. Use force=true to overwrite.",
                    target_path.display()
                )));
            }

            fs::remove_file(target_path)
                .map_err(|e| Error::Backup(format!("Failed to remove existing database: {}", e)))?;

            // Also remove WAL and SHM sidecars if present
            let _ = fs::remove_file(target_path.with_extension("db-wal"));
            let _ = fs::remove_file(target_path.with_extension("db-shm"));
        }

        destination.retrieve(backup_name, target_path)?;

        info!("Restored backup to: {}", target_path.display());
        Ok(())
    }

    /// List available backups, newest first
    pub fn list_backups(destination: &dyn BackupDestination) -> Result<Vec<BackupInfo>> {
        destination.list()
    }

    /// Apply a retention policy to a destination
    pub fn prune_backups(
        destination: &dyn BackupDestination,
        policy: &RetentionPolicy,
    ) -> Result<PruneResult> {
        destination.prune(policy)
    }
}
