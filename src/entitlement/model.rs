use serde::{Deserialize, Serialize};

/// Raw subscription state as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Active,
    Inactive,
    Cancelled,
}

/// Plan record attached to a subscription. All fields are optional because
/// older subscription rows carry only the per-row limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "planName", default)]
    pub plan_name: Option<String>,
    #[serde(rename = "allowedDays", default)]
    pub allowed_days: Option<u32>,
    #[serde(rename = "noOfProjects", default)]
    pub no_of_projects: Option<u32>,
    #[serde(rename = "noOfSpecs", default)]
    pub no_of_specs: Option<u32>,
}

/// One subscription record for a user. Field names mirror the backend JSON,
/// including the inconsistent casing of the limit fields.
///
/// `None` limits mean unlimited, not zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub status: SubscriptionState,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
    #[serde(rename = "NoofProjects", default)]
    pub no_of_projects: Option<u32>,
    #[serde(rename = "NoofSpecs", default)]
    pub no_of_specs: Option<u32>,
    #[serde(default)]
    pub plan: Option<Plan>,
}

/// Why an expired subscription is expired. The permission outcome is the
/// same for all three; the distinction is surfaced so the UI can word the
/// message correctly instead of collapsing everything into "expired".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryCause {
    /// The active subscription's end date is in the past.
    Lapsed,
    /// The user cancelled; no active record remains.
    Cancelled,
    /// The record was deactivated server-side.
    Inactive,
}

/// Normalized status bucket derived from the subscription records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// No records at all; free-trial limits apply.
    NoSubscription,
    Active,
    /// Active, but the end date is within the warning window.
    ExpiringSoon,
    Expired(ExpiryCause),
}

/// Fully-populated result of evaluating a user's subscription records.
/// Every branch of the evaluator returns one of these; it never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionStatus {
    pub status: StatusKind,
    pub is_active: bool,
    pub is_expired: bool,
    pub has_subscription: bool,
    /// Whole days until the active subscription ends, both dates truncated
    /// to midnight. `None` when there is no active record.
    pub days_until_expiry: Option<i64>,
    /// Human-readable description. Presentation detail, not a contract.
    pub message: String,
}

/// Actions that subscription gating can allow or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    CreateProject,
    OpenProject,
    CreateSpec,
    ExportData,
}

/// Plan tier derived from the subscription records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    FreeTrial,
    Free,
    Weekly,
    Monthly,
    Yearly,
    Expired,
}

impl AccessLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            AccessLevel::FreeTrial => "Free Trial",
            AccessLevel::Free => "Free",
            AccessLevel::Weekly => "Weekly",
            AccessLevel::Monthly => "Monthly",
            AccessLevel::Yearly => "Yearly",
            AccessLevel::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How much of a quota is left. `Unlimited` stands in for the backend's
/// null limit and always permits creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Count(u32),
}

impl Remaining {
    pub fn is_available(&self) -> bool {
        match self {
            Remaining::Unlimited => true,
            Remaining::Count(n) => *n > 0,
        }
    }
}

impl std::fmt::Display for Remaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Remaining::Unlimited => f.write_str("unlimited"),
            Remaining::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Current resource usage counted against the active subscription's limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounters {
    pub projects: u32,
    pub specs: u32,
}

/// Creation permissions plus remaining quota, per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageLimits {
    pub can_create_project: bool,
    pub can_create_spec: bool,
    pub projects_remaining: Remaining,
    pub specs_remaining: Remaining,
}

/// Display summary of the user's plan for badges and account pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDisplayInfo {
    pub name: &'static str,
    pub project_label: String,
    pub spec_label: String,
}
