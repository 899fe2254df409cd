//! Spending aggregates over subscription snapshots
//!
//! All functions here are pure: they take an immutable snapshot of
//! subscriptions and allocate their own output. The caller re-invokes them
//! after any mutation; nothing in this module watches the store.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{Category, CategoryTotal, Subscription};

/// Default window for "renewing soon" queries, in days
pub const DEFAULT_SOON_WINDOW: i64 = 7;

/// Sum of monthly-equivalent costs over active subscriptions.
pub fn monthly_total(subs: &[Subscription]) -> f64 {
    subs.iter()
        .filter(|s| s.is_active)
        .map(|s| s.monthly_cost())
        .sum()
}

/// Yearly projection of the active monthly total.
pub fn yearly_total(subs: &[Subscription]) -> f64 {
    monthly_total(subs) * 12.0
}

/// Monthly spend per category over active subscriptions.
///
/// Categories with a zero sum are omitted. Sorted descending by total;
/// ties keep category declaration order (the sort is stable).
pub fn total_by_category(subs: &[Subscription]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Category::ALL
        .iter()
        .filter_map(|&category| {
            let total: f64 = subs
                .iter()
                .filter(|s| s.is_active && s.category == category)
                .map(|s| s.monthly_cost())
                .sum();
            (total > 0.0).then_some(CategoryTotal { category, total })
        })
        .collect();

    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    totals
}

/// Active subscriptions renewing within `within_days` of `today`, inclusive.
///
/// Overdue subscriptions are excluded. Sorted ascending by days until
/// renewal; ties keep input order (the sort is stable).
pub fn renewing_soon(subs: &[Subscription], today: NaiveDate, within_days: i64) -> Vec<Subscription> {
    let mut soon: Vec<Subscription> = subs
        .iter()
        .filter(|s| s.is_active && s.is_renewing_soon(today, within_days))
        .cloned()
        .collect();

    soon.sort_by_key(|s| s.days_until_renewal(today));
    soon
}

/// Filter by name substring (case-insensitive) and/or exact category.
///
/// Matches both active and inactive subscriptions. An empty query and an
/// unset category act as the identity filter.
pub fn filtered(subs: &[Subscription], query: &str, category: Option<Category>) -> Vec<Subscription> {
    let query_lower = query.to_lowercase();
    subs.iter()
        .filter(|s| {
            let matches_query =
                query.is_empty() || s.name.to_lowercase().contains(&query_lower);
            let matches_category = category.is_none() || category == Some(s.category);
            matches_query && matches_category
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCycle;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn sub(name: &str, cost: f64, category: Category, active: bool, days_out: i64) -> Subscription {
        Subscription {
            id: 0,
            name: name.to_string(),
            cost,
            billing_cycle: BillingCycle::Monthly,
            renewal_date: today() + chrono::Duration::days(days_out),
            category,
            notes: String::new(),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_monthly_total_empty() {
        assert_eq!(monthly_total(&[]), 0.0);
    }

    #[test]
    fn test_monthly_total_ignores_inactive() {
        let subs = vec![
            sub("A", 10.0, Category::Other, true, 30),
            sub("B", 5.0, Category::Other, false, 30),
            sub("C", 20.0, Category::Other, true, 30),
        ];
        assert_eq!(monthly_total(&subs), 30.0);
    }

    #[test]
    fn test_monthly_total_all_inactive() {
        let subs = vec![sub("A", 10.0, Category::Other, false, 30)];
        assert_eq!(monthly_total(&subs), 0.0);
    }

    #[test]
    fn test_yearly_total() {
        let subs = vec![sub("A", 10.0, Category::Other, true, 30)];
        assert_eq!(yearly_total(&subs), 120.0);
    }

    #[test]
    fn test_yearly_total_normalizes_cycles() {
        // 120/yr is 10/mo, so the yearly projection returns to 120
        let mut yearly = sub("A", 120.0, Category::Other, true, 30);
        yearly.billing_cycle = BillingCycle::Yearly;
        assert!((yearly_total(&[yearly]) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_by_category_groups() {
        let subs = vec![
            sub("A", 10.0, Category::Entertainment, true, 30),
            sub("B", 5.0, Category::Entertainment, true, 30),
            sub("C", 8.0, Category::Productivity, true, 30),
        ];
        let breakdown = total_by_category(&subs);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Entertainment);
        assert_eq!(breakdown[0].total, 15.0);
        assert_eq!(breakdown[1].category, Category::Productivity);
        assert_eq!(breakdown[1].total, 8.0);
    }

    #[test]
    fn test_total_by_category_excludes_inactive() {
        let subs = vec![
            sub("A", 10.0, Category::Entertainment, true, 30),
            sub("B", 50.0, Category::Entertainment, false, 30),
        ];
        let breakdown = total_by_category(&subs);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].total, 10.0);
    }

    #[test]
    fn test_total_by_category_omits_zero_sums() {
        let subs = vec![sub("A", 10.0, Category::Entertainment, true, 30)];
        let breakdown = total_by_category(&subs);
        assert!(breakdown.iter().all(|t| t.category != Category::Other));
    }

    #[test]
    fn test_total_by_category_ties_keep_declaration_order() {
        let subs = vec![
            sub("A", 10.0, Category::Gaming, true, 30),
            sub("B", 10.0, Category::Entertainment, true, 30),
        ];
        let breakdown = total_by_category(&subs);
        // Equal totals: Entertainment declares before Gaming
        assert_eq!(breakdown[0].category, Category::Entertainment);
        assert_eq!(breakdown[1].category, Category::Gaming);
    }

    #[test]
    fn test_renewing_soon_window_and_order() {
        let subs = vec![
            sub("Far", 1.0, Category::Other, true, 20),
            sub("Soon1", 1.0, Category::Other, true, 3),
            sub("Soon2", 1.0, Category::Other, true, 1),
        ];
        let result = renewing_soon(&subs, today(), 7);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Soon2");
        assert_eq!(result[1].name, "Soon1");
    }

    #[test]
    fn test_renewing_soon_excludes_inactive_and_overdue() {
        let subs = vec![
            sub("Active", 1.0, Category::Other, true, 2),
            sub("Inactive", 1.0, Category::Other, false, 2),
            sub("Overdue", 1.0, Category::Other, true, -1),
        ];
        let result = renewing_soon(&subs, today(), 7);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Active");
    }

    #[test]
    fn test_renewing_soon_includes_window_edges() {
        let subs = vec![
            sub("Today", 1.0, Category::Other, true, 0),
            sub("Edge", 1.0, Category::Other, true, 7),
        ];
        let result = renewing_soon(&subs, today(), 7);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Today");
        assert_eq!(result[1].name, "Edge");
    }

    #[test]
    fn test_filtered_by_name_case_insensitive() {
        let subs = vec![
            sub("Netflix", 1.0, Category::Entertainment, true, 30),
            sub("Spotify", 1.0, Category::Entertainment, true, 30),
        ];
        let result = filtered(&subs, "NET", None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Netflix");
    }

    #[test]
    fn test_filtered_by_category() {
        let subs = vec![
            sub("A", 1.0, Category::Entertainment, true, 30),
            sub("B", 1.0, Category::Productivity, true, 30),
        ];
        let result = filtered(&subs, "", Some(Category::Entertainment));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "A");
    }

    #[test]
    fn test_filtered_identity() {
        let subs = vec![
            sub("A", 1.0, Category::Other, true, 30),
            sub("B", 1.0, Category::Other, false, 30),
        ];
        // Empty query + unset category returns all input, inactive included
        let result = filtered(&subs, "", None);
        assert_eq!(result.len(), 2);
    }
}
