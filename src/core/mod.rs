pub mod api;
pub mod error;
pub mod session;
pub mod table;

pub use api::{ApiClient, HttpStore, UnitWeightApi};
pub use error::{ApiError, DEFAULT_PERSIST_ERROR, ValidationError};
pub use session::{Scope, ScopeRequirement, SessionStore};
pub use table::{
    ColumnSpec, CommitOutcome, EditCommand, EditorKind, FieldValue, FormatRule, JsonMap,
    MasterDataStore, OptionsSource, Row, SortDirection, SortKind, TableEngine, TableSpec,
};
