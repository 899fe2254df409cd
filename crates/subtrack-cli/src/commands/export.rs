//! Subscription export command

use std::path::Path;

use anyhow::{Context, Result};
use subtrack_core::db::Database;
use subtrack_core::export::{export_subscriptions, ExportFormat};

pub fn cmd_export(db: &Database, output: Option<&Path>, format: &str) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let subs = db.list_subscriptions()?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export_subscriptions(&subs, format, file)?;
            println!(
                "✅ Exported {} subscription{} to {}",
                subs.len(),
                if subs.len() == 1 { "" } else { "s" },
                path.display()
            );
        }
        None => {
            export_subscriptions(&subs, format, std::io::stdout().lock())?;
            println!();
        }
    }

    Ok(())
}
