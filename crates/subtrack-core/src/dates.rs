//! Date arithmetic for renewals and reminder triggers

use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::BillingCycle;

/// Hour of day (local wall time) at which reminders fire
pub const REMINDER_HOUR: u32 = 9;

/// Trigger instant for a reminder: `days_before` calendar days ahead of the
/// renewal date, at 09:00 local.
///
/// If the subtraction is not representable the renewal date itself is used.
pub fn notification_date(renewal_date: NaiveDate, days_before: u32) -> NaiveDateTime {
    let base = renewal_date
        .checked_sub_days(Days::new(u64::from(days_before)))
        .unwrap_or(renewal_date);
    base.and_hms_opt(REMINDER_HOUR, 0, 0)
        .unwrap_or_else(|| base.and_time(NaiveTime::MIN))
}

/// Advance a renewal date by one billing cycle.
///
/// Month and year steps are calendar-aware: chrono clamps to the last day of
/// a shorter target month (Jan 31 + 1 month = Feb 28/29).
pub fn next_renewal_date(date: NaiveDate, cycle: BillingCycle) -> NaiveDate {
    match cycle {
        BillingCycle::Weekly => date.checked_add_days(Days::new(7)).unwrap_or(date),
        BillingCycle::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
        BillingCycle::Yearly => date.checked_add_months(Months::new(12)).unwrap_or(date),
    }
}

/// Human-readable label for a days-until-renewal count.
pub fn renewal_label(days_until_renewal: i64) -> String {
    match days_until_renewal {
        d if d < 0 => "Overdue".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d => format!("In {} days", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_notification_date() {
        let trigger = notification_date(date(2026, 3, 10), 3);
        assert_eq!(trigger.date(), date(2026, 3, 7));
        assert_eq!(trigger.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_notification_date_zero_days() {
        let trigger = notification_date(date(2026, 6, 15), 0);
        assert_eq!(trigger.date(), date(2026, 6, 15));
        assert_eq!(trigger.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_notification_date_crosses_month_boundary() {
        let trigger = notification_date(date(2026, 3, 2), 5);
        assert_eq!(trigger.date(), date(2026, 2, 25));
    }

    #[test]
    fn test_next_renewal_weekly() {
        assert_eq!(
            next_renewal_date(date(2026, 1, 28), BillingCycle::Weekly),
            date(2026, 2, 4)
        );
    }

    #[test]
    fn test_next_renewal_monthly() {
        assert_eq!(
            next_renewal_date(date(2026, 1, 15), BillingCycle::Monthly),
            date(2026, 2, 15)
        );
    }

    #[test]
    fn test_next_renewal_monthly_clamps_month_end() {
        assert_eq!(
            next_renewal_date(date(2026, 1, 31), BillingCycle::Monthly),
            date(2026, 2, 28)
        );
        // Leap year keeps the 29th
        assert_eq!(
            next_renewal_date(date(2028, 1, 31), BillingCycle::Monthly),
            date(2028, 2, 29)
        );
    }

    #[test]
    fn test_next_renewal_yearly() {
        assert_eq!(
            next_renewal_date(date(2025, 6, 1), BillingCycle::Yearly),
            date(2026, 6, 1)
        );
        // Feb 29 clamps to Feb 28 in a common year
        assert_eq!(
            next_renewal_date(date(2028, 2, 29), BillingCycle::Yearly),
            date(2029, 2, 28)
        );
    }

    #[test]
    fn test_renewal_label() {
        assert_eq!(renewal_label(-3), "Overdue");
        assert_eq!(renewal_label(0), "Today");
        assert_eq!(renewal_label(1), "Tomorrow");
        assert_eq!(renewal_label(5), "In 5 days");
    }
}
