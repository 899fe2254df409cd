//! Local filesystem backup destination

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use super::{parse_backup_time, BackupDestination, BackupInfo};
use crate::error::{Error, Result};

/// Local filesystem backup destination
pub struct LocalDestination {
    /// Directory where backups are stored
    backup_dir: PathBuf,
}

impl LocalDestination {
    /// Create a new local destination
    ///
    /// Creates the backup directory if it doesn't exist.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Result<Self> {
        let backup_dir = backup_dir.into();

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir).map_err(|e| {
                Error::Backup(format!(
                    "Failed to create backup directory {}: {}",
                    backup_dir.display(),
                    e
                ))
            })?;
            info!("Created backup directory: {}", backup_dir.display());
        }

        Ok(Self { backup_dir })
    }

    fn backup_path(&self, name: &str) -> PathBuf {
        self.backup_dir.join(name)
    }

    /// Get the backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl BackupDestination for LocalDestination {
    fn name(&self) -> &str {
        "local"
    }

    fn store(&self, local_path: &Path, backup_name: &str) -> Result<String> {
        let dest_path = self.backup_path(backup_name);

        if dest_path.exists() {
            return Err(Error::Backup(format!(
                "Backup already exists: {}",
                dest_path.display()
            )));
        }

        if backup_name.ends_with(".gz") {
            // Compress while copying
            let source = File::open(local_path)?;
            let mut reader = BufReader::new(source);

            let dest = File::create(&dest_path)?;
            let writer = BufWriter::new(dest);
            let mut encoder = GzEncoder::new(writer, Compression::default());

            let mut buffer = [0u8; 8192];
            loop {
                let bytes_read = reader.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                encoder.write_all(&buffer[..bytes_read])?;
            }
            encoder.finish()?;
        } else {
            fs::copy(local_path, &dest_path)?;
        }

        info!("Stored backup: {}", dest_path.display());
        Ok(backup_name.to_string())
    }

    fn retrieve(&self, backup_name: &str, local_path: &Path) -> Result<()> {
        let source_path = self.backup_path(backup_name);

        if !source_path.exists() {
            return Err(Error::Backup(format!(
                "Backup not found: {}",
                source_path.display()
            )));
        }

        if backup_name.ends_with(".gz") {
            // Decompress while copying
            let source = File::open(&source_path)?;
            let reader = BufReader::new(source);
            let mut decoder = GzDecoder::new(reader);

            let dest = File::create(local_path)?;
            let mut writer = BufWriter::new(dest);

            let mut buffer = [0u8; 8192];
            loop {
                let bytes_read = decoder.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                writer.write_all(&buffer[..bytes_read])?;
            }
            writer.flush()?;
        } else {
            fs::copy(&source_path, local_path)?;
        }

        info!("Retrieved backup to: {}", local_path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<BackupInfo>> {
        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !name.starts_with("subtrack-") || !name.contains(".db") {
                continue;
            }

            let metadata = entry.metadata()?;
            let created_at = parse_backup_time(&name)
                .or_else(|| {
                    metadata
                        .modified()
                        .ok()
                        .map(chrono::DateTime::<chrono::Utc>::from)
                })
                .unwrap_or_else(chrono::Utc::now);

            backups.push(BackupInfo {
                name: name.clone(),
                path: self.backup_path(&name).display().to_string(),
                size: metadata.len(),
                created_at,
                compressed: name.ends_with(".gz"),
            });
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    fn delete(&self, backup_name: &str) -> Result<()> {
        let path = self.backup_path(backup_name);
        if !path.exists() {
            return Err(Error::Backup(format!("Backup not found: {}", backup_name)));
        }
        fs::remove_file(&path)?;
        info!("Deleted backup: {}", backup_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::RetentionPolicy;

    fn write_source(dir: &Path, contents: &[u8]) -> PathBuf {
        let path = dir.join("source.db");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_store_and_retrieve_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = LocalDestination::new(tmp.path().join("backups")).unwrap();
        let source = write_source(tmp.path(), b"not really a database");

        let name = dest
            .store(&source, "subtrack-2026-01-15-120000.db.gz")
            .unwrap();

        let restored = tmp.path().join("restored.db");
        dest.retrieve(&name, &restored).unwrap();
        assert_eq!(fs::read(&restored).unwrap(), b"not really a database");
    }

    #[test]
    fn test_store_refuses_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = LocalDestination::new(tmp.path().join("backups")).unwrap();
        let source = write_source(tmp.path(), b"data");

        dest.store(&source, "subtrack-2026-01-15-120000.db.gz")
            .unwrap();
        assert!(dest
            .store(&source, "subtrack-2026-01-15-120000.db.gz")
            .is_err());
    }

    #[test]
    fn test_list_and_prune_keep_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = LocalDestination::new(tmp.path().join("backups")).unwrap();
        let source = write_source(tmp.path(), b"data");

        for stamp in ["2026-01-13-120000", "2026-01-14-120000", "2026-01-15-120000"] {
            dest.store(&source, &format!("subtrack-{}.db.gz", stamp))
                .unwrap();
        }

        let listed = dest.list().unwrap();
        assert_eq!(listed.len(), 3);
        // Newest first
        assert_eq!(listed[0].name, "subtrack-2026-01-15-120000.db.gz");

        let result = dest.prune(&RetentionPolicy::keep_last(2)).unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.retained_count, 2);
        assert_eq!(result.deleted_names, vec!["subtrack-2026-01-13-120000.db.gz"]);
        assert_eq!(dest.list().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = LocalDestination::new(tmp.path().join("backups")).unwrap();
        assert!(dest.delete("subtrack-2026-01-15-120000.db.gz").is_err());
    }
}
