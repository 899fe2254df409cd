//! Export functionality for subscriptions
//!
//! Supports flat JSON and CSV output of the full subscription list,
//! including the derived monthly-equivalent cost.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Subscription;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {} (valid: csv, json)", s)),
        }
    }
}

/// A subscription row flattened for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionExport {
    pub id: i64,
    pub name: String,
    pub cost: f64,
    pub billing_cycle: String,
    pub monthly_cost: f64,
    pub renewal_date: String,
    pub category: String,
    pub notes: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&Subscription> for SubscriptionExport {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            cost: sub.cost,
            billing_cycle: sub.billing_cycle.as_str().to_string(),
            monthly_cost: sub.monthly_cost(),
            renewal_date: sub.renewal_date.to_string(),
            category: sub.category.as_str().to_string(),
            notes: sub.notes.clone(),
            is_active: sub.is_active,
            created_at: sub.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Write all subscriptions to `writer` in the requested format
pub fn export_subscriptions(
    subscriptions: &[Subscription],
    format: ExportFormat,
    writer: impl Write,
) -> Result<()> {
    let rows: Vec<SubscriptionExport> = subscriptions.iter().map(Into::into).collect();

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, &rows)?;
        }
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingCycle, Category};
    use chrono::{NaiveDate, Utc};

    fn subs() -> Vec<Subscription> {
        vec![
            Subscription {
                id: 1,
                name: "Netflix".to_string(),
                cost: 15.49,
                billing_cycle: BillingCycle::Monthly,
                renewal_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
                category: Category::Entertainment,
                notes: String::new(),
                is_active: true,
                created_at: Utc::now(),
            },
            Subscription {
                id: 2,
                name: "iCloud".to_string(),
                cost: 120.0,
                billing_cycle: BillingCycle::Yearly,
                renewal_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                category: Category::Utilities,
                notes: "family plan".to_string(),
                is_active: false,
                created_at: Utc::now(),
            },
        ]
    }

    #[test]
    fn test_json_export_round_trips() {
        let mut out = Vec::new();
        export_subscriptions(&subs(), ExportFormat::Json, &mut out).unwrap();

        let rows: Vec<SubscriptionExport> = serde_json::from_slice(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Netflix");
        assert_eq!(rows[1].billing_cycle, "yearly");
        assert!((rows[1].monthly_cost - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_csv_export_one_row_per_subscription() {
        let mut out = Vec::new();
        export_subscriptions(&subs(), ExportFormat::Csv, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        // Header plus one line per subscription
        assert_eq!(text.trim_end().lines().count(), 3);
        assert!(text.lines().next().unwrap().contains("monthly_cost"));
        assert!(text.contains("Netflix"));
        assert!(text.contains("family plan"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
