//! Per-screen table configurations.
//!
//! One `TableSpec` per configuration screen. This metadata is the entire
//! difference between screens; the engine itself is shared.

use crate::core::session::ScopeRequirement;
use crate::core::table::column::{ColumnSpec, FormatRule, OptionsSource};
use crate::core::table::row::{FieldValue, Row};
use crate::core::table::TableSpec;

/// Component group types selectable on the component screen.
pub const G_TYPES: &[&str] = &[
    "PIPE", "FITTING", "FLANGE", "VALVE", "GASKET", "BOLT", "OLET", "TRAP", "STRAINER",
];

pub fn sizes() -> TableSpec {
    TableSpec {
        name: "sizes",
        list_path: "/sizes/get",
        upsert_path: "/sizes/addorupdate",
        delete_path: None,
        plural_key: "sizes",
        key_field: "code",
        required_scope: ScopeRequirement::project(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("c_code", "Client Code").identity().required(),
            ColumnSpec::text("size1_size2", "Size (mm)")
                .identity()
                .required()
                .format(FormatRule::Numeric)
                .numeric_sort(),
            ColumnSpec::text("size_in_inch", "Size (inch)")
                .required()
                .format(FormatRule::SizeInches)
                .numeric_sort(),
            ColumnSpec::text("od", "OD").format(FormatRule::Numeric).numeric_sort(),
        ],
        derive: None,
    }
}

pub fn schedules() -> TableSpec {
    TableSpec {
        name: "schedules",
        list_path: "/schedules/get",
        upsert_path: "/schedules/addorupdate",
        delete_path: None,
        plural_key: "schedules",
        key_field: "code",
        required_scope: ScopeRequirement::project(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("c_code", "Client Code").identity().required(),
            ColumnSpec::text("sch1_sch2", "Schedule").identity().required(),
            ColumnSpec::text("arrange_od", "Arrange OD")
                .format(FormatRule::Numeric)
                .numeric_sort(),
        ],
        derive: None,
    }
}

pub fn ratings() -> TableSpec {
    TableSpec {
        name: "ratings",
        list_path: "/ratings/get",
        upsert_path: "/ratings/addorupdate",
        delete_path: None,
        plural_key: "ratings",
        key_field: "ratingCode",
        required_scope: ScopeRequirement::project(),
        columns: vec![
            ColumnSpec::text("ratingCode", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("c_rating_code", "Client Code").identity().required(),
            ColumnSpec::text("ratingValue", "Rating")
                .identity()
                .required()
                .format(FormatRule::RatingHash)
                .numeric_sort(),
        ],
        derive: None,
    }
}

pub fn materials() -> TableSpec {
    TableSpec {
        name: "materials",
        list_path: "/materials/get",
        upsert_path: "/materials/addorupdate",
        delete_path: None,
        plural_key: "materials",
        key_field: "code",
        required_scope: ScopeRequirement::project(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("c_code", "Client Code").identity().required(),
            ColumnSpec::text("material_description", "Description")
                .identity()
                .required(),
            ColumnSpec::text("base_material", "Base Material"),
        ],
        derive: None,
    }
}

pub fn components() -> TableSpec {
    TableSpec {
        name: "components",
        list_path: "/components/get",
        upsert_path: "/components/addorupdate",
        delete_path: None,
        plural_key: "components",
        key_field: "code",
        required_scope: ScopeRequirement::project(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("componentname", "Component Name")
                .identity()
                .required(),
            ColumnSpec::checkbox("ratingrequired", "Rating Required"),
            ColumnSpec::enum_select("g_type", "Group Type", G_TYPES).required(),
        ],
        derive: None,
    }
}

pub fn construction_descs() -> TableSpec {
    TableSpec {
        name: "construction descriptions",
        list_path: "/constructiondesc/get",
        upsert_path: "/constructiondesc/addorupdate",
        delete_path: None,
        plural_key: "constructionDescs",
        key_field: "code",
        required_scope: ScopeRequirement::project().and_component(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("construction_desc", "Construction Description")
                .identity()
                .required(),
        ],
        derive: None,
    }
}

pub fn valve_subtypes() -> TableSpec {
    TableSpec {
        name: "valve sub-types",
        list_path: "/vstypes/get",
        upsert_path: "/vstypes/addorupdate",
        delete_path: None,
        plural_key: "valveSubTypes",
        key_field: "code",
        required_scope: ScopeRequirement::project().and_component(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("valve_sub_type", "Valve Sub-Type")
                .identity()
                .required(),
        ],
        derive: None,
    }
}

pub fn dimensional_standards() -> TableSpec {
    TableSpec {
        name: "dimensional standards",
        list_path: "/dimensionalstandards/get",
        upsert_path: "/dimensionalstandards/addorupdate",
        delete_path: None,
        plural_key: "dimensionalStandards",
        key_field: "id",
        required_scope: ScopeRequirement::project().and_component(),
        columns: vec![
            ColumnSpec::text("dimensional_standard", "Dimensional Standard")
                .identity()
                .required(),
        ],
        derive: None,
    }
}

/// Catalog references derive their `concatenate` column from the short
/// description and rating, with an absent rating rendered as the literal
/// "null". The derived value is itself an identity field, so editing
/// either source re-checks uniqueness before the commit is allowed.
fn catref_concatenate(row: &Row) -> Vec<(&'static str, FieldValue)> {
    let desc = row.text("item_short_desc");
    let rating = row.text("rating");
    let rating = if rating.is_empty() { "null" } else { rating };
    vec![("concatenate", FieldValue::Text(format!("{desc}-{rating}")))]
}

pub fn catalog_refs() -> TableSpec {
    TableSpec {
        name: "catalog references",
        list_path: "/catrefs/get",
        upsert_path: "/catrefs/addorupdate",
        delete_path: None,
        plural_key: "catRefs",
        key_field: "code",
        required_scope: ScopeRequirement::project().and_component().and_g_type(),
        columns: vec![
            ColumnSpec::text("code", "Code")
                .identity()
                .required()
                .format(FormatRule::Alphanumeric),
            ColumnSpec::text("item_short_desc", "Short Description").required(),
            ColumnSpec::text("rating", "Rating").format(FormatRule::RatingHash),
            ColumnSpec::text("concatenate", "CatRef").identity(),
        ],
        derive: Some(catref_concatenate),
    }
}

pub fn size_ranges() -> TableSpec {
    TableSpec {
        name: "size ranges",
        list_path: "/sizeranges/get",
        upsert_path: "/sizeranges/addorupdate",
        delete_path: Some("/sizeranges/delete"),
        plural_key: "sizeRanges",
        key_field: "id",
        required_scope: ScopeRequirement::project().and_spec(),
        columns: vec![
            ColumnSpec::remote_select("size", "Size", OptionsSource::Sizes)
                .required()
                .numeric_sort(),
            ColumnSpec::remote_select("schedule", "Schedule", OptionsSource::Schedules)
                .required(),
        ],
        derive: None,
    }
}
