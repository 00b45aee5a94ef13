//! Generic editable master-data table engine.
//!
//! Every configuration screen (sizes, schedules, ratings, materials,
//! components, construction descriptions, valve sub-types, dimensional
//! standards, catalog references, size ranges) is the same machine: fetch a
//! scoped list, render rows, double-click a cell to edit, validate
//! uniqueness and format client-side, apply optimistically, persist the
//! full merged record, roll back on failure. The engine implements that
//! machine once; `screens` configures it per screen with column metadata.

mod column;
mod command;
pub mod debounce;
mod row;
pub mod screens;

use std::future::Future;

use crate::core::error::{ApiError, ValidationError};
use crate::core::session::{Scope, ScopeRequirement};

pub use column::{ColumnSpec, EditorKind, FormatRule, OptionsSource, SortKind};
pub use command::EditCommand;
pub use row::{FieldValue, JsonMap, Row};

/// Recompute hook for dependent fields (e.g. the catalog-reference
/// concatenation), run on every add and edit before validation.
pub type DeriveFn = fn(&Row) -> Vec<(&'static str, FieldValue)>;

/// Static description of one screen's table: endpoints, response shape,
/// scope requirement and column metadata.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: &'static str,
    pub list_path: &'static str,
    pub upsert_path: &'static str,
    /// Present only on screens that support row deletion (size ranges).
    pub delete_path: Option<&'static str>,
    /// Key of the row array in the list response envelope.
    pub plural_key: &'static str,
    /// Backend field used as the stable client row key when present.
    pub key_field: &'static str,
    pub required_scope: ScopeRequirement,
    pub columns: Vec<ColumnSpec>,
    pub derive: Option<DeriveFn>,
}

impl TableSpec {
    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn supports_delete(&self) -> bool {
        self.delete_path.is_some()
    }
}

/// Persistence backend for a table. The HTTP implementation lives in
/// `core::api`; tests use an in-memory store.
pub trait MasterDataStore {
    fn list(
        &self,
        spec: &TableSpec,
        scope: &Scope,
    ) -> impl Future<Output = Result<Vec<JsonMap>, ApiError>>;
    fn upsert(
        &self,
        spec: &TableSpec,
        scope: &Scope,
        record: &JsonMap,
    ) -> impl Future<Output = Result<(), ApiError>>;
    fn delete(
        &self,
        spec: &TableSpec,
        scope: &Scope,
        key: &str,
    ) -> impl Future<Output = Result<(), ApiError>>;
    fn field_options(
        &self,
        source: OptionsSource,
        scope: &Scope,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>>;
}

/// Outcome of committing an in-place edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Persisted and applied.
    Saved,
    /// New value equals the pre-edit value; edit mode exited, no call made.
    Unchanged,
    /// No cell was in edit mode.
    NotEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
struct EditSession {
    row_key: String,
    field: String,
    /// Value captured at edit start; the revert target.
    original: FieldValue,
}

/// One screen instance's table state. All mutation goes through `&mut self`,
/// so commits to the same cell can never overlap in flight and the revert
/// path cannot race with a later optimistic write.
#[derive(Debug)]
pub struct TableEngine<S> {
    spec: TableSpec,
    store: S,
    scope: Scope,
    rows: Vec<Row>,
    editing: Option<EditSession>,
    sort: Option<(String, SortDirection)>,
}

impl<S: MasterDataStore> TableEngine<S> {
    pub fn new(spec: TableSpec, store: S, scope: Scope) -> Self {
        TableEngine {
            spec,
            store,
            scope,
            rows: Vec::new(),
            editing: None,
            sort: None,
        }
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// The cell currently in edit mode, if any.
    pub fn editing(&self) -> Option<(&str, &str)> {
        self.editing
            .as_ref()
            .map(|s| (s.row_key.as_str(), s.field.as_str()))
    }

    /// Fetch all rows for the current scope. On failure the previous rows
    /// are kept (empty on first load).
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.spec.required_scope.check(&self.scope)?;
        let records = self.store.list(&self.spec, &self.scope).await?;
        self.rows = records
            .into_iter()
            .map(|record| Row::from_record(self.spec.key_field, record))
            .collect();
        self.sort = None;
        Ok(())
    }

    /// Option list for a remote-select column.
    pub async fn field_options(&self, source: OptionsSource) -> Result<Vec<String>, ApiError> {
        self.spec.required_scope.check(&self.scope)?;
        self.store.field_options(source, &self.scope).await
    }

    /// Validate a candidate row against required/format rules and against
    /// every existing row's identity fields. All conflicting fields are
    /// reported together, not just the first.
    pub fn validate_new(&self, candidate: &Row) -> Result<(), ValidationError> {
        self.validate(candidate, None)
    }

    fn validate(&self, candidate: &Row, exclude_key: Option<&str>) -> Result<(), ValidationError> {
        for column in &self.spec.columns {
            let value = candidate.get(column.field);
            let empty = value.is_none_or(FieldValue::is_empty);
            if column.required && empty {
                return Err(ValidationError::Required {
                    field: column.label.to_string(),
                });
            }
            if empty {
                continue;
            }
            let text = candidate.text(column.field);
            if let Some(rule) = column.format {
                rule.check(text).map_err(|reason| ValidationError::Format {
                    field: column.label.to_string(),
                    reason,
                })?;
            }
            if let EditorKind::EnumSelect(options) = column.editor {
                if !options.iter().any(|option| *option == text) {
                    return Err(ValidationError::Format {
                        field: column.label.to_string(),
                        reason: format!("must be one of: {}", options.join(", ")),
                    });
                }
            }
        }

        let mut conflicts = Vec::new();
        for column in self.spec.columns.iter().filter(|c| c.identity) {
            let text = candidate.text(column.field);
            if text.is_empty() {
                continue;
            }
            let taken = self
                .rows
                .iter()
                .filter(|r| exclude_key.is_none_or(|k| r.key != k))
                .any(|r| r.text(column.field) == text);
            if taken {
                conflicts.push(column.label.to_string());
            }
        }
        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::DuplicateFields(conflicts))
        }
    }

    fn apply_derived(&self, row: &mut Row) {
        if let Some(derive) = self.spec.derive {
            for (field, value) in derive(row) {
                row.set(field, value);
            }
        }
    }

    /// Add a new row. Unlike edits this is optimistic-after-success: local
    /// state changes only once the persist call confirms, so a failure
    /// leaves nothing to roll back.
    pub async fn add_row(&mut self, mut candidate: Row) -> Result<&Row, ApiError> {
        self.spec.required_scope.check(&self.scope)?;
        self.apply_derived(&mut candidate);
        self.validate_new(&candidate)?;
        let natural = candidate.text(self.spec.key_field).to_string();
        candidate.key = if natural.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            natural
        };
        let record = candidate.to_record();
        self.store.upsert(&self.spec, &self.scope, &record).await?;
        self.rows.insert(0, candidate);
        Ok(&self.rows[0])
    }

    /// Enter edit mode on a cell. At most one cell is editable across the
    /// whole table: entering a new cell abandons any other uncommitted cell
    /// without reverting (nothing was optimistically changed yet). Returns
    /// false when the cell does not exist.
    pub fn begin_edit(&mut self, key: &str, field: &str) -> bool {
        let Some(row) = self.rows.iter().find(|r| r.key == key) else {
            self.editing = None;
            return false;
        };
        if self.spec.column(field).is_none() {
            self.editing = None;
            return false;
        }
        let original = row
            .get(field)
            .cloned()
            .unwrap_or_else(|| FieldValue::text(""));
        self.editing = Some(EditSession {
            row_key: key.to_string(),
            field: field.to_string(),
            original,
        });
        true
    }

    /// Abandon the current edit without committing (Escape).
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commit the current in-place edit (blur or Enter).
    ///
    /// Edit mode is exited on every path. An unchanged value is a no-op
    /// with no network call; a validation failure leaves the row untouched
    /// with no network call; otherwise the change is applied optimistically
    /// and the full merged record is persisted, rolling back to the
    /// edit-start snapshot if the persist fails.
    pub async fn commit_edit(&mut self, value: FieldValue) -> Result<CommitOutcome, ApiError> {
        let Some(session) = self.editing.take() else {
            return Ok(CommitOutcome::NotEditing);
        };
        if value == session.original {
            return Ok(CommitOutcome::Unchanged);
        }
        let Some(current) = self.rows.iter().find(|r| r.key == session.row_key) else {
            return Ok(CommitOutcome::NotEditing);
        };

        let mut candidate = current.clone();
        candidate.set(session.field.clone(), value);
        self.apply_derived(&mut candidate);

        let mut edit = EditCommand::new(&session.row_key);
        for (field, next) in candidate.fields() {
            let previous = current
                .get(field)
                .cloned()
                .unwrap_or_else(|| FieldValue::text(""));
            if previous != *next {
                edit.push(field, previous, next.clone());
            }
        }

        self.validate(&candidate, Some(&session.row_key))?;

        edit.apply(&mut self.rows);
        let record = candidate.to_record();
        match self.store.upsert(&self.spec, &self.scope, &record).await {
            Ok(()) => Ok(CommitOutcome::Saved),
            Err(err) => {
                edit.rollback(&mut self.rows);
                Err(err)
            }
        }
    }

    /// Delete a row (size ranges only). The confirmation dialog is the
    /// caller's concern; local state changes only after the server confirms.
    pub async fn delete_row(&mut self, key: &str) -> Result<(), ApiError> {
        if !self.spec.supports_delete() {
            return Err(ApiError::network(format!(
                "{} rows cannot be deleted",
                self.spec.name
            )));
        }
        self.spec.required_scope.check(&self.scope)?;
        self.store.delete(&self.spec, &self.scope, key).await?;
        self.rows.retain(|r| r.key != key);
        Ok(())
    }

    /// Local-only sort on a column, flipping direction when the same column
    /// is sorted twice in a row. Never persisted.
    pub fn sort(&mut self, field: &str) {
        let Some(column) = self.spec.column(field) else {
            return;
        };
        let direction = match &self.sort {
            Some((f, SortDirection::Ascending)) if f == field => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        let kind = column.sort;
        self.rows.sort_by(|a, b| {
            let ordering = match kind {
                SortKind::Numeric => {
                    let left = numeric_key(a.text(field));
                    let right = numeric_key(b.text(field));
                    left.partial_cmp(&right)
                        .unwrap_or(std::cmp::Ordering::Equal)
                }
                SortKind::Text => a.text(field).cmp(b.text(field)),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        self.sort = Some((field.to_string(), direction));
    }

    pub fn sort_state(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(f, d)| (f.as_str(), *d))
    }
}

/// Numeric sort key: leading number of the cell text, so values like
/// "600#" and "150#" order numerically. Non-numeric text sorts first.
fn numeric_key(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(f64::MIN)
}
