//! Backup management commands (create, list, restore, prune)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use subtrack_core::backup::{default_backup_dir, LocalDestination, RetentionPolicy};
use subtrack_core::db::Database;

fn destination(dir: Option<PathBuf>) -> Result<LocalDestination> {
    let dir = dir.unwrap_or_else(default_backup_dir);
    LocalDestination::new(dir).context("Failed to open backup directory")
}

fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.1} KB", kb)
    } else {
        format!("{:.1} MB", kb / 1024.0)
    }
}

pub fn cmd_backup_create(db: &Database, name: Option<&str>, dir: Option<PathBuf>) -> Result<()> {
    let dest = destination(dir)?;
    let result = db.create_backup(&dest, name)?;

    println!("✅ Backup created: {}", result.info.name);
    println!("   Location: {}", result.info.path);
    println!("   Size: {}", format_size(result.info.size));
    println!(
        "   Contents: {} subscriptions, {} pending reminders",
        result.subscriptions, result.pending_reminders
    );

    Ok(())
}

pub fn cmd_backup_list(dir: Option<PathBuf>) -> Result<()> {
    let dest = destination(dir)?;
    let backups = Database::list_backups(&dest)?;

    if backups.is_empty() {
        println!("No backups found in {}", dest.backup_dir().display());
        println!("Create one with: subtrack backup create");
        return Ok(());
    }

    println!();
    println!("💾 Backups in {}", dest.backup_dir().display());
    println!("   ─────────────────────────────────────────────────────────");
    for backup in &backups {
        println!(
            "   {:42} {:>10}  {}",
            backup.name,
            format_size(backup.size),
            backup.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("   {} backup(s)", backups.len());

    Ok(())
}

pub fn cmd_backup_restore(
    db_path: &Path,
    name: &str,
    dir: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let dest = destination(dir)?;

    Database::restore_backup(&dest, name, db_path, force)
        .context("Restore failed (use --force to overwrite an existing database)")?;

    println!("✅ Restored {} to {}", name, db_path.display());
    Ok(())
}

pub fn cmd_backup_prune(keep: usize, dir: Option<PathBuf>, yes: bool) -> Result<()> {
    let dest = destination(dir)?;
    let backups = Database::list_backups(&dest)?;

    if backups.len() <= keep {
        println!(
            "Nothing to prune ({} backup(s), keeping {})",
            backups.len(),
            keep
        );
        return Ok(());
    }

    let to_delete = backups.len() - keep;
    if !yes
        && !super::confirm(&format!(
            "Delete {} old backup(s), keeping the newest {}?",
            to_delete, keep
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    let result = Database::prune_backups(&dest, &RetentionPolicy::keep_last(keep))?;
    println!(
        "✅ Deleted {} backup(s), freed {}",
        result.deleted_count,
        format_size(result.bytes_freed)
    );

    Ok(())
}
