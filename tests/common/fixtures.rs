use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pipeadmin::TableEngine;
use pipeadmin::core::table::{JsonMap, MasterDataStore, OptionsSource, TableSpec, screens};
use pipeadmin::core::{ApiError, Scope};
use pipeadmin::entitlement::{Plan, Subscription, SubscriptionState};
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// RFC 3339 end date the given number of days from now (negative = past).
pub fn end_date_days_from_now(days: i64) -> String {
    (OffsetDateTime::now_utc() + Duration::days(days))
        .format(&Rfc3339)
        .expect("formatting a valid timestamp")
}

/// An active subscription ending the given number of days from now.
pub fn active_subscription(days_from_now: i64) -> Subscription {
    Subscription {
        status: SubscriptionState::Active,
        start_date: None,
        end_date: Some(end_date_days_from_now(days_from_now)),
        no_of_projects: Some(2),
        no_of_specs: Some(10),
        plan: None,
    }
}

/// A subscription record with the given raw state and a far-future end date.
pub fn subscription_with_state(state: SubscriptionState) -> Subscription {
    Subscription {
        status: state,
        start_date: None,
        end_date: Some(end_date_days_from_now(365)),
        no_of_projects: Some(1),
        no_of_specs: Some(1),
        plan: None,
    }
}

/// An active subscription with the given limit pair (None = unlimited).
pub fn subscription_with_limits(projects: Option<u32>, specs: Option<u32>) -> Subscription {
    Subscription {
        no_of_projects: projects,
        no_of_specs: specs,
        ..active_subscription(365)
    }
}

/// An active subscription whose plan carries the given name.
pub fn subscription_with_plan(plan_name: &str) -> Subscription {
    Subscription {
        plan: Some(Plan {
            plan_name: Some(plan_name.to_string()),
            ..Plan::default()
        }),
        ..active_subscription(365)
    }
}

/// Convert a `json!` object literal into a backend record.
pub fn record(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A bolt-size record with the usual fields filled in.
pub fn size_record(code: &str, mm: &str, inch: &str) -> JsonMap {
    record(json!({
        "code": code,
        "c_code": format!("C{code}"),
        "size1_size2": mm,
        "size_in_inch": inch,
    }))
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub records: Vec<JsonMap>,
    pub options: HashMap<&'static str, Vec<String>>,
    pub list_calls: usize,
    pub upsert_calls: usize,
    pub delete_calls: usize,
    pub last_upsert: Option<JsonMap>,
    pub last_delete_key: Option<String>,
    pub fail_upserts: bool,
    pub fail_lists: bool,
}

/// In-memory `MasterDataStore` that counts calls, so tests can assert that
/// rejected operations never reach the network.
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    state: Arc<Mutex<StoreState>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<JsonMap>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().records = records;
        store
    }

    fn options_key(source: OptionsSource) -> &'static str {
        match source {
            OptionsSource::Sizes => "sizes",
            OptionsSource::Schedules => "schedules",
        }
    }

    pub fn set_options(&self, source: OptionsSource, options: Vec<String>) {
        self.state
            .lock()
            .unwrap()
            .options
            .insert(Self::options_key(source), options);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.state.lock().unwrap().fail_upserts = fail;
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state.lock().unwrap().fail_lists = fail;
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn upsert_calls(&self) -> usize {
        self.state.lock().unwrap().upsert_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn last_upsert(&self) -> Option<JsonMap> {
        self.state.lock().unwrap().last_upsert.clone()
    }

    pub fn last_delete_key(&self) -> Option<String> {
        self.state.lock().unwrap().last_delete_key.clone()
    }
}

impl MasterDataStore for CountingStore {
    async fn list(&self, _spec: &TableSpec, _scope: &Scope) -> Result<Vec<JsonMap>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_lists {
            return Err(ApiError::network("backend unavailable"));
        }
        Ok(state.records.clone())
    }

    async fn upsert(
        &self,
        _spec: &TableSpec,
        _scope: &Scope,
        record: &JsonMap,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.upsert_calls += 1;
        if state.fail_upserts {
            return Err(ApiError::network("backend rejected the write"));
        }
        state.last_upsert = Some(record.clone());
        Ok(())
    }

    async fn delete(&self, _spec: &TableSpec, _scope: &Scope, key: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        state.last_delete_key = Some(key.to_string());
        Ok(())
    }

    async fn field_options(
        &self,
        source: OptionsSource,
        _scope: &Scope,
    ) -> Result<Vec<String>, ApiError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .options
            .get(Self::options_key(source))
            .cloned()
            .unwrap_or_default())
    }
}

/// Build and load an engine over a counting store for any screen.
pub async fn engine_for(
    spec: TableSpec,
    records: Vec<JsonMap>,
) -> (TableEngine<CountingStore>, CountingStore) {
    let store = CountingStore::with_records(records);
    let mut engine = TableEngine::new(spec, store.clone(), Scope::project("P1"));
    engine.load().await.expect("initial load");
    (engine, store)
}

/// A loaded bolt-sizes engine scoped to a test project.
pub async fn sizes_engine(
    records: Vec<JsonMap>,
) -> (TableEngine<CountingStore>, CountingStore) {
    engine_for(screens::sizes(), records).await
}
