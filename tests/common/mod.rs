#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from pipeadmin for tests
#[allow(unused_imports)]
pub use pipeadmin::core::table::{
    ColumnSpec, CommitOutcome, EditorKind, FieldValue, JsonMap, MasterDataStore, OptionsSource,
    Row, SortDirection, TableEngine, TableSpec,
};
#[allow(unused_imports)]
pub use pipeadmin::core::{ApiError, Scope, SessionStore, ValidationError};
#[allow(unused_imports)]
pub use pipeadmin::entitlement::{
    AccessLevel, ActionType, ExpiryCause, Remaining, StatusKind, Subscription, SubscriptionState,
    UsageCounters,
};
