//! Pure subscription-entitlement evaluation.
//!
//! Everything in this module is a synchronous derivation over subscription
//! records already loaded into memory; there is no I/O. Each function is
//! total: malformed input degrades to a conservative answer instead of
//! panicking.

mod model;

use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};
use tracing::warn;

pub use model::{
    AccessLevel, ActionType, ExpiryCause, Plan, PlanDisplayInfo, Remaining, StatusKind,
    Subscription, SubscriptionState, SubscriptionStatus, UsageCounters, UsageLimits,
};

/// Days before the end date at which the status switches to expiring-soon.
pub const EXPIRY_WARNING_DAYS: i64 = 7;
/// Limits applied when the user has no subscription records at all.
pub const FREE_TRIAL_PROJECT_LIMIT: u32 = 1;
pub const FREE_TRIAL_SPEC_LIMIT: u32 = 1;

fn active_record(subscriptions: &[Subscription]) -> Option<&Subscription> {
    subscriptions
        .iter()
        .find(|s| s.status == SubscriptionState::Active)
}

/// Parse a backend end-date string. The backend emits RFC 3339 timestamps,
/// but older rows carry bare `YYYY-MM-DD` dates.
fn parse_end_date(raw: &str) -> Option<Date> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.date());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &date_only).ok()
}

/// Whole-day difference between the end date and today, both truncated to
/// midnight. Negative when the end date is in the past.
fn days_until(end: Date) -> i64 {
    let today = OffsetDateTime::now_utc().date();
    i64::from(end.to_julian_day()) - i64::from(today.to_julian_day())
}

/// Derive the normalized subscription status from a user's records.
///
/// No records is not an error: the user is on the implicit free trial and
/// is treated as active. Otherwise the first record with an `active` status
/// is authoritative; a non-empty list without one is expired, with the
/// cause taken from the first record so cancelled and inactive users get
/// worded differently.
pub fn check_subscription_status(subscriptions: &[Subscription]) -> SubscriptionStatus {
    if subscriptions.is_empty() {
        return SubscriptionStatus {
            status: StatusKind::NoSubscription,
            is_active: true,
            is_expired: false,
            has_subscription: false,
            days_until_expiry: None,
            message: "No subscription found. Free trial limits apply.".to_string(),
        };
    }

    let Some(active) = active_record(subscriptions) else {
        let cause = match subscriptions[0].status {
            SubscriptionState::Cancelled => ExpiryCause::Cancelled,
            _ => ExpiryCause::Inactive,
        };
        let message = match cause {
            ExpiryCause::Cancelled => "Your subscription was cancelled.",
            _ => "Your subscription is no longer active.",
        };
        return SubscriptionStatus {
            status: StatusKind::Expired(cause),
            is_active: false,
            is_expired: true,
            has_subscription: true,
            days_until_expiry: None,
            message: message.to_string(),
        };
    };

    let end = active.end_date.as_deref().and_then(parse_end_date);
    let Some(end) = end else {
        // The source had no guard here and let NaN arithmetic fall through.
        // An unparsable end date is classified as expired instead.
        warn!(
            end_date = active.end_date.as_deref().unwrap_or("<missing>"),
            "unparsable subscription end date, treating as expired"
        );
        return SubscriptionStatus {
            status: StatusKind::Expired(ExpiryCause::Lapsed),
            is_active: false,
            is_expired: true,
            has_subscription: true,
            days_until_expiry: None,
            message: "Your subscription has expired.".to_string(),
        };
    };

    let days = days_until(end);
    if days < 0 {
        SubscriptionStatus {
            status: StatusKind::Expired(ExpiryCause::Lapsed),
            is_active: false,
            is_expired: true,
            has_subscription: true,
            days_until_expiry: Some(days),
            message: "Your subscription has expired.".to_string(),
        }
    } else if days <= EXPIRY_WARNING_DAYS {
        let noun = if days == 1 { "day" } else { "days" };
        SubscriptionStatus {
            status: StatusKind::ExpiringSoon,
            is_active: true,
            is_expired: false,
            has_subscription: true,
            days_until_expiry: Some(days),
            message: format!("Your subscription expires in {days} {noun}."),
        }
    } else {
        SubscriptionStatus {
            status: StatusKind::Active,
            is_active: true,
            is_expired: false,
            has_subscription: true,
            days_until_expiry: Some(days),
            message: "Your subscription is active.".to_string(),
        }
    }
}

/// Gate a single action on the derived status. Opening an existing project
/// is allowed for everyone except expired users; everything else needs an
/// active (or free-trial) entitlement.
pub fn can_perform_action(subscriptions: &[Subscription], action: ActionType) -> bool {
    let status = check_subscription_status(subscriptions);
    match action {
        ActionType::OpenProject => !status.is_expired,
        ActionType::CreateProject | ActionType::CreateSpec | ActionType::ExportData => {
            status.is_active && !status.is_expired
        }
    }
}

fn remaining(limit: Option<u32>, used: u32) -> Remaining {
    match limit {
        None => Remaining::Unlimited,
        Some(limit) => Remaining::Count(limit.saturating_sub(used)),
    }
}

/// Compute creation permissions against the active subscription's limits.
pub fn check_usage_limits(subscriptions: &[Subscription], usage: &UsageCounters) -> UsageLimits {
    let status = check_subscription_status(subscriptions);
    if status.is_expired {
        return UsageLimits {
            can_create_project: false,
            can_create_spec: false,
            projects_remaining: Remaining::Count(0),
            specs_remaining: Remaining::Count(0),
        };
    }

    let (projects_remaining, specs_remaining) = match active_record(subscriptions) {
        // Free trial: fixed limits regardless of the plan table.
        None => (
            remaining(Some(FREE_TRIAL_PROJECT_LIMIT), usage.projects),
            remaining(Some(FREE_TRIAL_SPEC_LIMIT), usage.specs),
        ),
        Some(record) => (
            remaining(record.no_of_projects, usage.projects),
            remaining(record.no_of_specs, usage.specs),
        ),
    };

    UsageLimits {
        can_create_project: projects_remaining.is_available(),
        can_create_spec: specs_remaining.is_available(),
        projects_remaining,
        specs_remaining,
    }
}

/// Derive the plan tier. Prefers the plan's name; when absent, infers the
/// tier from the record's limit pair using the fixed product table.
pub fn user_access_level(subscriptions: &[Subscription]) -> AccessLevel {
    let status = check_subscription_status(subscriptions);
    if status.is_expired {
        return AccessLevel::Expired;
    }
    let Some(record) = active_record(subscriptions) else {
        return AccessLevel::FreeTrial;
    };

    if let Some(name) = record.plan.as_ref().and_then(|p| p.plan_name.as_deref()) {
        match name.to_ascii_lowercase().as_str() {
            "free" => return AccessLevel::Free,
            "weekly" => return AccessLevel::Weekly,
            "monthly" => return AccessLevel::Monthly,
            "yearly" => return AccessLevel::Yearly,
            _ => {}
        }
    }

    match (record.no_of_projects, record.no_of_specs) {
        (None, None) => AccessLevel::Yearly,
        (Some(1), Some(1)) => AccessLevel::Free,
        (Some(1), Some(5)) => AccessLevel::Weekly,
        (Some(2), None) => AccessLevel::Monthly,
        _ => AccessLevel::FreeTrial,
    }
}

/// True when the user's tier carries no project or spec limits.
pub fn has_unlimited_access(subscriptions: &[Subscription]) -> bool {
    user_access_level(subscriptions) == AccessLevel::Yearly
}

fn quota_label(limit: Remaining, noun: &str) -> String {
    match limit {
        Remaining::Unlimited => format!("Unlimited {noun}s"),
        Remaining::Count(1) => format!("1 {noun}"),
        Remaining::Count(n) => format!("{n} {noun}s"),
    }
}

/// Display summary of the current plan for badges and account pages.
pub fn plan_display_info(subscriptions: &[Subscription]) -> PlanDisplayInfo {
    let level = user_access_level(subscriptions);
    let (projects, specs) = match active_record(subscriptions) {
        None if level == AccessLevel::Expired => (Remaining::Count(0), Remaining::Count(0)),
        None => (
            Remaining::Count(FREE_TRIAL_PROJECT_LIMIT),
            Remaining::Count(FREE_TRIAL_SPEC_LIMIT),
        ),
        Some(record) => (
            record.no_of_projects.map_or(Remaining::Unlimited, Remaining::Count),
            record.no_of_specs.map_or(Remaining::Unlimited, Remaining::Count),
        ),
    };
    PlanDisplayInfo {
        name: level.display_name(),
        project_label: quota_label(projects, "project"),
        spec_label: quota_label(specs, "spec"),
    }
}

/// Whether to nudge the user toward a paid plan: expired or expiring
/// subscriptions always, free-trial users once a quota runs out.
pub fn should_show_upgrade_prompt(subscriptions: &[Subscription], usage: &UsageCounters) -> bool {
    let status = check_subscription_status(subscriptions);
    match status.status {
        StatusKind::Expired(_) | StatusKind::ExpiringSoon => true,
        StatusKind::NoSubscription => {
            let limits = check_usage_limits(subscriptions, usage);
            !limits.can_create_project || !limits.can_create_spec
        }
        StatusKind::Active => false,
    }
}

/// The human-readable status line on its own.
pub fn subscription_message(subscriptions: &[Subscription]) -> String {
    check_subscription_status(subscriptions).message
}

/// Format the active subscription's end date for display, e.g. "Jan 15, 2026".
/// `None` when there is no active record or the date cannot be parsed.
pub fn format_subscription_end_date(subscriptions: &[Subscription]) -> Option<String> {
    let record = active_record(subscriptions)?;
    let end = record.end_date.as_deref().and_then(parse_end_date)?;
    let display = format_description!("[month repr:short] [day padding:none], [year]");
    end.format(&display).ok()
}
