pub mod core;
pub mod entitlement;

pub use crate::core::table::{
    CommitOutcome, FieldValue, MasterDataStore, Row, TableEngine, TableSpec,
};
pub use crate::core::{ApiClient, ApiError, HttpStore, Scope, SessionStore, ValidationError};
pub use crate::entitlement::{
    can_perform_action, check_subscription_status, check_usage_limits, user_access_level,
};
