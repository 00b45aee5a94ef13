use std::sync::LazyLock;

use regex::Regex;

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("static pattern"));
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("static pattern"));
static RATING_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+#$").expect("static pattern"));
// Whole ("6"), decimal ("0.75"), fractional ("3/4") and mixed ("1.1/2")
// inch notation, optionally followed by a quote mark.
static SIZE_INCHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([0-9]+(\.[0-9]+)?(/[0-9]+)?|[0-9]+\.[0-9]+/[0-9]+)"?$"#)
        .expect("static pattern")
});

/// Per-field format constraint, checked client-side before any persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    /// Letters and digits only (codes).
    Alphanumeric,
    /// Plain number, optionally with a decimal part (size in mm).
    Numeric,
    /// Digits with a trailing `#` (pressure rating values).
    RatingHash,
    /// Inches notation: whole, decimal, fractional or mixed, optional `"`.
    SizeInches,
}

impl FormatRule {
    pub fn check(&self, value: &str) -> Result<(), String> {
        let (pattern, reason) = match self {
            FormatRule::Alphanumeric => (&ALPHANUMERIC, "must contain only letters and digits"),
            FormatRule::Numeric => (&NUMERIC, "must be a number"),
            FormatRule::RatingHash => (&RATING_HASH, "must be digits followed by #"),
            FormatRule::SizeInches => (&SIZE_INCHES, "must be a size in inches, e.g. 1/2\""),
        };
        if pattern.is_match(value) {
            Ok(())
        } else {
            Err(reason.to_string())
        }
    }
}

/// Where a remote-select column fetches its option list from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsSource {
    Sizes,
    Schedules,
}

impl OptionsSource {
    /// (endpoint path, plural response key, field holding the option text)
    pub(crate) fn endpoint(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            OptionsSource::Sizes => ("/sizes/get", "sizes", "size_in_inch"),
            OptionsSource::Schedules => ("/schedules/get", "schedules", "code"),
        }
    }
}

/// What kind of editor a cell uses. The engine is polymorphic over this
/// instead of each screen wiring its own cell widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Text,
    /// Fixed option list declared by the screen.
    EnumSelect(&'static [&'static str]),
    Checkbox,
    /// Option list fetched separately (size-range size/schedule columns).
    RemoteSelect(OptionsSource),
}

/// How a column compares when sorting locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Numeric,
}

/// Declarative description of one table column: which backend field it
/// maps to, whether its value must be unique within the scope, how it is
/// validated, edited and sorted.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub identity: bool,
    pub required: bool,
    pub format: Option<FormatRule>,
    pub editor: EditorKind,
    pub sort: SortKind,
}

impl ColumnSpec {
    pub fn text(field: &'static str, label: &'static str) -> Self {
        ColumnSpec {
            field,
            label,
            identity: false,
            required: false,
            format: None,
            editor: EditorKind::Text,
            sort: SortKind::Text,
        }
    }

    pub fn checkbox(field: &'static str, label: &'static str) -> Self {
        ColumnSpec {
            editor: EditorKind::Checkbox,
            ..ColumnSpec::text(field, label)
        }
    }

    pub fn enum_select(
        field: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        ColumnSpec {
            editor: EditorKind::EnumSelect(options),
            ..ColumnSpec::text(field, label)
        }
    }

    pub fn remote_select(field: &'static str, label: &'static str, source: OptionsSource) -> Self {
        ColumnSpec {
            editor: EditorKind::RemoteSelect(source),
            ..ColumnSpec::text(field, label)
        }
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn format(mut self, rule: FormatRule) -> Self {
        self.format = Some(rule);
        self
    }

    pub fn numeric_sort(mut self) -> Self {
        self.sort = SortKind::Numeric;
        self
    }
}
