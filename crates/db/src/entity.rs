//! Declarative mapping between Rust types and tables.
//!
//! - [`Record`]: a row type bound to one table, with `id` and `created_at`.
//! - [`Fields`]: the column/value pairs a validated input contributes to an insert.
//! - [`Schema`]: a wire-facing type bound to exactly one [`Record`].

use seed_core::types::{DbId, Timestamp};
use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// Column every record uses as its primary key.
pub const PRIMARY_KEY: &str = "id";

/// A persisted entity type.
pub trait Record: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Table the record lives in.
    const TABLE: &'static str;

    /// Every column the row decodes, `id` and `created_at` included.
    const COLUMNS: &'static [&'static str];

    const PRIMARY_KEY: &'static str = PRIMARY_KEY;

    /// Joins applied to every `get_one` select so related data arrives in the
    /// same round trip.
    fn get_options() -> Vec<LoadOption> {
        Vec::new()
    }

    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
    }
}

/// Column/value pairs an input contributes to a new row.
///
/// A `None` value means "absent": the column is left out of the insert so the
/// database default applies, rather than being written as `NULL`.
pub trait Fields {
    fn fields(&self) -> Vec<(&'static str, Option<FieldValue>)>;

    fn present_fields(&self) -> Vec<(&'static str, FieldValue)> {
        self.fields()
            .into_iter()
            .filter_map(|(column, value)| value.map(|v| (column, v)))
            .collect()
    }
}

/// Wire-facing representation bound to one record type.
///
/// The `From<Self::Record>` bound is the record-to-schema conversion, so a
/// schema field the record cannot supply is a compile error.
pub trait Schema: Fields + From<Self::Record> + Send + Sync {
    type Record: Record;
}

/// A value that can be bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Timestamp(Timestamp),
    Json(serde_json::Value),
}

macro_rules! field_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

field_value_from! {
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f64 => Float,
    bool => Bool,
    String => Text,
    Timestamp => Timestamp,
    serde_json::Value => Json,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Comparison operator for an extra filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
        }
    }
}

/// `column <op> value`, ANDed onto a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub op: Op,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(column: &'static str, op: Op, value: impl Into<FieldValue>) -> Self {
        Self {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn equals(column: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::new(column, Op::Eq, value)
    }
}

/// Parameters of a `get_one` query.
///
/// Matches `field = value` (the primary key unless another field is named)
/// plus any extra conditions, all ANDed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub field: Option<&'static str>,
    pub value: FieldValue,
    pub conditions: Vec<Condition>,
}

impl Lookup {
    pub fn by_primary_key(value: impl Into<FieldValue>) -> Self {
        Self {
            field: None,
            value: value.into(),
            conditions: Vec::new(),
        }
    }

    pub fn by(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            field: Some(field),
            value: value.into(),
            conditions: Vec::new(),
        }
    }

    /// Add an extra condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

impl From<DbId> for Lookup {
    fn from(id: DbId) -> Self {
        Lookup::by_primary_key(id)
    }
}

/// Eager-load directive: a join clause and the select expressions it adds.
///
/// Only `get_one` applies these; rows returned by an insert carry just the
/// record's own columns, so extra fields should be `#[sqlx(default)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOption {
    pub join: &'static str,
    pub columns: &'static [&'static str],
}
