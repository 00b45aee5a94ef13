use crate::core::table::row::{FieldValue, Row};

/// Optimistic edit applied to local rows before the persist call, with a
/// single shared rollback path for the failure case.
///
/// `previous` and `next` cover every field the edit touches, including
/// dependent fields recomputed from the edited one, so rollback restores
/// the full edit-start snapshot in one step.
#[derive(Debug, Clone)]
pub struct EditCommand {
    pub row_key: String,
    previous: Vec<(String, FieldValue)>,
    next: Vec<(String, FieldValue)>,
}

impl EditCommand {
    pub fn new(row_key: impl Into<String>) -> Self {
        EditCommand {
            row_key: row_key.into(),
            previous: Vec::new(),
            next: Vec::new(),
        }
    }

    /// Record one field transition. No-op transitions are kept too; they
    /// cost nothing and keep the snapshot complete.
    pub fn push(&mut self, field: &str, previous: FieldValue, next: FieldValue) {
        self.previous.push((field.to_string(), previous));
        self.next.push((field.to_string(), next));
    }

    fn write(rows: &mut [Row], key: &str, values: &[(String, FieldValue)]) {
        if let Some(row) = rows.iter_mut().find(|r| r.key == key) {
            for (field, value) in values {
                row.set(field.clone(), value.clone());
            }
        }
    }

    /// Apply the edit to local state (optimistic, before the persist call).
    pub fn apply(&self, rows: &mut [Row]) {
        Self::write(rows, &self.row_key, &self.next);
    }

    /// Revert to the values captured at edit start.
    pub fn rollback(&self, rows: &mut [Row]) {
        Self::write(rows, &self.row_key, &self.previous);
    }
}
