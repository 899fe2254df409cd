//! Subscription operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::dates::next_renewal_date;
use crate::error::{Error, Result};
use crate::models::{BillingCycle, Category, NewSubscription, Subscription, SubscriptionUpdate};

const SELECT_COLUMNS: &str =
    "id, name, cost, billing_cycle, renewal_date, category, notes, is_active, created_at";

/// Map a row in SELECT_COLUMNS order to a Subscription
fn map_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let cycle_str: String = row.get(3)?;
    let renewal_str: String = row.get(4)?;
    let category_str: String = row.get(5)?;
    let created_at_str: String = row.get(8)?;

    Ok(Subscription {
        id: row.get(0)?,
        name: row.get(1)?,
        cost: row.get(2)?,
        billing_cycle: cycle_str.parse().unwrap_or(BillingCycle::Monthly),
        renewal_date: NaiveDate::parse_from_str(&renewal_str, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Utc::now().date_naive()),
        category: category_str.parse().unwrap_or(Category::Other),
        notes: row.get(6)?,
        is_active: row.get(7)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Insert a new subscription, returning its id
    pub fn insert_subscription(&self, new: &NewSubscription) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO subscriptions (name, cost, billing_cycle, renewal_date, category, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                new.name,
                new.cost,
                new.billing_cycle.as_str(),
                new.renewal_date.to_string(),
                new.category.as_str(),
                new.notes,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a subscription by id
    pub fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            &format!("SELECT {} FROM subscriptions WHERE id = ?", SELECT_COLUMNS),
            params![id],
            map_subscription,
        );

        match result {
            Ok(sub) => Ok(Some(sub)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all subscriptions, soonest renewal first
    pub fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subscriptions ORDER BY renewal_date ASC, name ASC",
            SELECT_COLUMNS
        ))?;

        let subscriptions = stmt
            .query_map([], map_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    /// Apply a partial update to a subscription
    ///
    /// `id` and `created_at` are immutable; everything else is replaceable.
    pub fn update_subscription(&self, id: i64, update: &SubscriptionUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = update.name {
            sets.push("name = ?");
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(cost) = update.cost {
            sets.push("cost = ?");
            params_vec.push(Box::new(cost));
        }
        if let Some(cycle) = update.billing_cycle {
            sets.push("billing_cycle = ?");
            params_vec.push(Box::new(cycle.as_str()));
        }
        if let Some(renewal) = update.renewal_date {
            sets.push("renewal_date = ?");
            params_vec.push(Box::new(renewal.to_string()));
        }
        if let Some(category) = update.category {
            sets.push("category = ?");
            params_vec.push(Box::new(category.as_str()));
        }
        if let Some(ref notes) = update.notes {
            sets.push("notes = ?");
            params_vec.push(Box::new(notes.clone()));
        }
        params_vec.push(Box::new(id));

        let sql = format!("UPDATE subscriptions SET {} WHERE id = ?", sets.join(", "));
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let conn = self.conn()?;
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Subscription {}", id)));
        }

        Ok(())
    }

    /// Activate or pause a subscription
    pub fn set_subscription_active(&self, id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE subscriptions SET is_active = ? WHERE id = ?",
            params![active, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Subscription {}", id)));
        }
        Ok(())
    }

    /// Delete a subscription by id
    pub fn delete_subscription(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM subscriptions WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Subscription {}", id)));
        }
        Ok(())
    }

    /// Advance a subscription's renewal date by one billing cycle
    ///
    /// Used after a renewal has been charged, so the record points at the
    /// next one. Returns the updated subscription.
    pub fn advance_subscription_renewal(&self, id: i64) -> Result<Subscription> {
        let sub = self
            .get_subscription(id)?
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))?;

        let next = next_renewal_date(sub.renewal_date, sub.billing_cycle);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE subscriptions SET renewal_date = ? WHERE id = ?",
            params![next.to_string(), id],
        )?;

        Ok(Subscription {
            renewal_date: next,
            ..sub
        })
    }
}
