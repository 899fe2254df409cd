//! Domain models for subtrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Billing cycle of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// All cycles in declaration order
    pub const ALL: [BillingCycle; 3] = [Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Multiplier to convert a cost in this cycle to a monthly equivalent.
    ///
    /// Weekly uses the conventional 4.33 weeks-per-month constant.
    pub fn monthly_multiplier(&self) -> f64 {
        match self {
            Self::Weekly => 4.33,
            Self::Monthly => 1.0,
            Self::Yearly => 1.0 / 12.0,
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown billing cycle: {}", s)),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Entertainment,
    Productivity,
    Health,
    Education,
    News,
    Utilities,
    Gaming,
    Finance,
    Other,
}

impl Category {
    /// All categories in declaration order.
    ///
    /// Declaration order is also the tie-break order for category breakdowns.
    pub const ALL: [Category; 9] = [
        Self::Entertainment,
        Self::Productivity,
        Self::Health,
        Self::Education,
        Self::News,
        Self::Utilities,
        Self::Gaming,
        Self::Finance,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entertainment => "entertainment",
            Self::Productivity => "productivity",
            Self::Health => "health",
            Self::Education => "education",
            Self::News => "news",
            Self::Utilities => "utilities",
            Self::Gaming => "gaming",
            Self::Finance => "finance",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entertainment => "Entertainment",
            Self::Productivity => "Productivity",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::News => "News",
            Self::Utilities => "Utilities",
            Self::Gaming => "Gaming",
            Self::Finance => "Finance",
            Self::Other => "Other",
        }
    }

    /// Icon glyph for list display
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Entertainment => "🎬",
            Self::Productivity => "💼",
            Self::Health => "❤️",
            Self::Education => "📚",
            Self::News => "📰",
            Self::Utilities => "🔧",
            Self::Gaming => "🎮",
            Self::Finance => "💵",
            Self::Other => "⭕",
        }
    }

    /// Accent color for UI display (e.g., "#ef4444")
    pub fn color(&self) -> &'static str {
        match self {
            Self::Entertainment => "#ef4444",
            Self::Productivity => "#3b82f6",
            Self::Health => "#10b981",
            Self::Education => "#f97316",
            Self::News => "#a855f7",
            Self::Utilities => "#6b7280",
            Self::Gaming => "#6366f1",
            Self::Finance => "#14b8a6",
            Self::Other => "#9ca3af",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entertainment" => Ok(Self::Entertainment),
            "productivity" => Ok(Self::Productivity),
            "health" => Ok(Self::Health),
            "education" => Ok(Self::Education),
            "news" => Ok(Self::News),
            "utilities" => Ok(Self::Utilities),
            "gaming" => Ok(Self::Gaming),
            "finance" => Ok(Self::Finance),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    /// Amount charged per billing cycle
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    /// Date of the next renewal
    pub renewal_date: NaiveDate,
    pub category: Category,
    pub notes: String,
    /// Inactive subscriptions stay stored but are excluded from aggregates
    /// and reminders
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Cost normalized to a monthly equivalent.
    pub fn monthly_cost(&self) -> f64 {
        self.cost * self.billing_cycle.monthly_multiplier()
    }

    /// Calendar days from `today` until the renewal date.
    ///
    /// Negative means the renewal is overdue.
    pub fn days_until_renewal(&self, today: NaiveDate) -> i64 {
        self.renewal_date.signed_duration_since(today).num_days()
    }

    /// True when renewal is within the given number of days (inclusive).
    pub fn is_renewing_soon(&self, today: NaiveDate, within_days: i64) -> bool {
        let d = self.days_until_renewal(today);
        d >= 0 && d <= within_days
    }
}

/// A new subscription to be inserted
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub renewal_date: NaiveDate,
    pub category: Category,
    pub notes: String,
}

impl NewSubscription {
    /// Boundary validation, run before the record reaches the store.
    ///
    /// The aggregation engine assumes well-formed input and never re-checks.
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_fields(&self.name, self.cost)
    }
}

/// Partial edit of a subscription; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub billing_cycle: Option<BillingCycle>,
    pub renewal_date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub notes: Option<String>,
}

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && self.billing_cycle.is_none()
            && self.renewal_date.is_none()
            && self.category.is_none()
            && self.notes.is_none()
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(crate::error::Error::InvalidData(
                    "Subscription name must not be empty".to_string(),
                ));
            }
        }
        if let Some(cost) = self.cost {
            if !(cost > 0.0) {
                return Err(crate::error::Error::InvalidData(format!(
                    "Subscription cost must be positive (got {})",
                    cost
                )));
            }
        }
        Ok(())
    }
}

fn validate_fields(name: &str, cost: f64) -> crate::error::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::error::Error::InvalidData(
            "Subscription name must not be empty".to_string(),
        ));
    }
    if !(cost > 0.0) {
        return Err(crate::error::Error::InvalidData(format!(
            "Subscription cost must be positive (got {})",
            cost
        )));
    }
    Ok(())
}

/// Monthly spend for one category (for breakdowns)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}
