//! Tests for the per-screen table configurations.
//!
//! Tests cover:
//! - Catalog-reference dependent-field recomputation and uniqueness
//! - Component checkbox and group-type select editors
//! - Size-range remote option lists and row deletion

mod common;

use common::*;
use pipeadmin::core::table::screens;
use pretty_assertions::assert_eq;
use serde_json::json;

fn catref_record(code: &str, desc: &str, rating: &str) -> JsonMap {
    let concatenate = if rating.is_empty() {
        format!("{desc}-null")
    } else {
        format!("{desc}-{rating}")
    };
    record(json!({
        "code": code,
        "item_short_desc": desc,
        "rating": rating,
        "concatenate": concatenate,
    }))
}

async fn catref_engine(
    records: Vec<JsonMap>,
) -> (TableEngine<CountingStore>, CountingStore) {
    let store = CountingStore::with_records(records);
    let scope = Scope::project("P1").with_component("C1").with_g_type("VALVE");
    let mut engine = TableEngine::new(screens::catalog_refs(), store.clone(), scope);
    engine.load().await.expect("initial load");
    (engine, store)
}

#[tokio::test]
async fn test_catref_concatenate_is_derived_on_add() -> anyhow::Result<()> {
    let (mut engine, store) = catref_engine(vec![]).await;

    let candidate = Row::new("")
        .with_text("code", "CR1")
        .with_text("item_short_desc", "GATEVALVE")
        .with_text("rating", "150#");
    engine.add_row(candidate).await?;
    assert_eq!(engine.rows()[0].text("concatenate"), "GATEVALVE-150#");

    // Absent rating renders as the literal "null".
    let candidate = Row::new("")
        .with_text("code", "CR2")
        .with_text("item_short_desc", "BALLVALVE");
    engine.add_row(candidate).await?;
    assert_eq!(engine.rows()[0].text("concatenate"), "BALLVALVE-null");

    let record = store.last_upsert().expect("upsert body");
    assert_eq!(record["concatenate"], "BALLVALVE-null");
    Ok(())
}

#[tokio::test]
async fn test_catref_concatenate_recomputed_when_either_source_changes() -> anyhow::Result<()> {
    let (mut engine, store) =
        catref_engine(vec![catref_record("CR1", "GATEVALVE", "150#")]).await;

    engine.begin_edit("CR1", "item_short_desc");
    engine.commit_edit(FieldValue::text("GLOBEVALVE")).await?;
    assert_eq!(engine.row("CR1").unwrap().text("concatenate"), "GLOBEVALVE-150#");

    engine.begin_edit("CR1", "rating");
    engine.commit_edit(FieldValue::text("300#")).await?;
    assert_eq!(engine.row("CR1").unwrap().text("concatenate"), "GLOBEVALVE-300#");

    // The persisted record carries the recomputed value.
    let record = store.last_upsert().expect("upsert body");
    assert_eq!(record["concatenate"], "GLOBEVALVE-300#");
    Ok(())
}

#[tokio::test]
async fn test_catref_derived_conflict_blocks_the_edit() -> anyhow::Result<()> {
    let (mut engine, store) = catref_engine(vec![
        catref_record("CR1", "GATEVALVE", "150#"),
        catref_record("CR2", "GLOBEVALVE", "150#"),
    ])
    .await;

    // Renaming CR2's description would collide with CR1's concatenation.
    engine.begin_edit("CR2", "item_short_desc");
    let err = engine
        .commit_edit(FieldValue::text("GATEVALVE"))
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(ValidationError::DuplicateFields(fields)) => {
            assert_eq!(fields, vec!["CatRef".to_string()]);
        }
        other => panic!("expected duplicate rejection, got {other:?}"),
    }
    assert_eq!(engine.row("CR2").unwrap().text("item_short_desc"), "GLOBEVALVE");
    assert_eq!(engine.row("CR2").unwrap().text("concatenate"), "GLOBEVALVE-150#");
    assert_eq!(store.upsert_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_catref_rollback_restores_derived_field_too() -> anyhow::Result<()> {
    let (mut engine, store) =
        catref_engine(vec![catref_record("CR1", "GATEVALVE", "150#")]).await;

    store.fail_upserts(true);
    engine.begin_edit("CR1", "rating");
    assert!(engine.commit_edit(FieldValue::text("300#")).await.is_err());

    let row = engine.row("CR1").unwrap();
    assert_eq!(row.text("rating"), "150#");
    assert_eq!(row.text("concatenate"), "GATEVALVE-150#");
    Ok(())
}

#[tokio::test]
async fn test_component_checkbox_and_group_type_editors() -> anyhow::Result<()> {
    let (mut engine, store) = engine_for(
        screens::components(),
        vec![record(json!({
            "code": "GV",
            "componentname": "Gate Valve",
            "ratingrequired": false,
            "g_type": "VALVE",
        }))],
    )
    .await;

    // Checkbox cells hold flags, not text.
    engine.begin_edit("GV", "ratingrequired");
    engine.commit_edit(FieldValue::Flag(true)).await?;
    assert!(engine.row("GV").unwrap().flag("ratingrequired"));
    let record = store.last_upsert().expect("upsert body");
    assert_eq!(record["ratingrequired"], true);

    // Group type must come from the fixed list.
    engine.begin_edit("GV", "g_type");
    let err = engine
        .commit_edit(FieldValue::text("WIDGET"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::Format { .. })
    ));
    assert_eq!(engine.row("GV").unwrap().text("g_type"), "VALVE");

    engine.begin_edit("GV", "g_type");
    engine.commit_edit(FieldValue::text("FITTING")).await?;
    assert_eq!(engine.row("GV").unwrap().text("g_type"), "FITTING");
    Ok(())
}

#[tokio::test]
async fn test_size_range_remote_options_and_delete() -> anyhow::Result<()> {
    let store = CountingStore::with_records(vec![record(json!({
        "id": "SR1",
        "size": "1/2\"",
        "schedule": "40S",
    }))]);
    store.set_options(
        OptionsSource::Sizes,
        vec!["1/2\"".to_string(), "3/4\"".to_string()],
    );
    store.set_options(OptionsSource::Schedules, vec!["40S".to_string()]);

    let scope = Scope::project("P1").with_spec("SPEC1");
    let mut engine = TableEngine::new(screens::size_ranges(), store.clone(), scope);
    engine.load().await?;

    let sizes = engine.field_options(OptionsSource::Sizes).await?;
    assert_eq!(sizes, vec!["1/2\"", "3/4\""]);

    assert!(engine.spec().supports_delete());
    engine.delete_row("SR1").await?;
    assert_eq!(engine.rows().len(), 0);
    assert_eq!(store.delete_calls(), 1);
    assert_eq!(store.last_delete_key().as_deref(), Some("SR1"));
    Ok(())
}

#[tokio::test]
async fn test_size_range_numeric_id_keys_rows_and_deletes() -> anyhow::Result<()> {
    // The backend hands out integer ids for id-keyed screens.
    let store = CountingStore::with_records(vec![record(json!({
        "id": 7,
        "size": "1/2\"",
        "schedule": "40S",
    }))]);
    let scope = Scope::project("P1").with_spec("SPEC1");
    let mut engine = TableEngine::new(screens::size_ranges(), store.clone(), scope);
    engine.load().await?;

    // Keyed by the stringified id, not a random fallback token.
    assert_eq!(engine.rows()[0].key, "7");
    assert_eq!(engine.row("7").unwrap().text("id"), "7");

    engine.delete_row("7").await?;
    assert_eq!(store.last_delete_key().as_deref(), Some("7"));
    Ok(())
}

#[tokio::test]
async fn test_size_range_requires_spec_scope() -> anyhow::Result<()> {
    let store = CountingStore::new();
    let mut engine = TableEngine::new(
        screens::size_ranges(),
        store.clone(),
        Scope::project("P1"),
    );
    let err = engine.load().await.unwrap_err();
    assert!(matches!(err, ApiError::ScopeMissing { what: "spec" }));
    assert_eq!(store.list_calls(), 0);
    Ok(())
}
