//! Generic `count` / `create` / `get_one` for any [`Record`].

use std::marker::PhantomData;

use sqlx::{Postgres, QueryBuilder};

use crate::entity::{FieldValue, Fields, Lookup, Record};
use crate::error::DbError;
use crate::session::Session;

/// Provides the shared persistence operations for record type `R`.
pub struct RecordRepo<R>(PhantomData<fn() -> R>);

impl<R: Record> RecordRepo<R> {
    /// Number of rows in the record's table.
    pub async fn count(session: &mut Session) -> Result<i64, DbError> {
        let query = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let counted = sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(session.connection().await?)
            .await;
        match counted {
            Ok(count) => Ok(count),
            Err(err) => Err(abort::<R>(session, err).await),
        }
    }

    /// Insert a row built from the present fields of `data`.
    ///
    /// With `commit` the transaction is committed immediately; otherwise the
    /// row stays pending until the caller commits the session. On failure the
    /// transaction is rolled back and unique / foreign key violations are
    /// reported as their own [`DbError`] variants.
    pub async fn create<F>(session: &mut Session, data: &F, commit: bool) -> Result<R, DbError>
    where
        F: Fields + Sync,
    {
        let mut builder = insert_statement::<R>(data.present_fields())?;

        let inserted = builder
            .build_query_as::<R>()
            .fetch_one(session.connection().await?)
            .await;
        let record = match inserted {
            Ok(record) => record,
            Err(err) => return Err(abort::<R>(session, err).await),
        };

        if commit {
            session.commit().await.map_err(|err| match err {
                DbError::Storage(err) => DbError::classify(err),
                other => other,
            })?;
        }

        Ok(record)
    }

    /// Fetch the first row matching `lookup`, or `None` when nothing matches.
    ///
    /// A failed query rolls the session back before the error is returned.
    /// The lookup is not required to be unique; the caller picks a selective
    /// filter.
    pub async fn get_one(
        session: &mut Session,
        lookup: impl Into<Lookup>,
    ) -> Result<Option<R>, DbError> {
        let mut builder = select_one_statement::<R>(lookup.into())?;
        let fetched = builder
            .build_query_as::<R>()
            .fetch_optional(session.connection().await?)
            .await;
        match fetched {
            Ok(record) => Ok(record),
            Err(err) => Err(abort::<R>(session, err).await),
        }
    }
}

/// Roll back after a failed statement and classify the error.
async fn abort<R: Record>(session: &mut Session, err: sqlx::Error) -> DbError {
    if let Err(rollback_err) = session.rollback().await {
        tracing::warn!(table = R::TABLE, error = %rollback_err, "Rollback after failed statement failed");
    }
    let err = DbError::classify(err);
    if err.is_constraint_violation() {
        tracing::debug!(table = R::TABLE, error = %err, "Statement rejected by constraint");
    }
    err
}

fn ensure_column<R: Record>(column: &str) -> Result<(), DbError> {
    if R::has_column(column) {
        Ok(())
    } else {
        Err(DbError::UnknownColumn {
            table: R::TABLE,
            column: column.to_string(),
        })
    }
}

/// `INSERT INTO <table> (<cols>) VALUES (...) RETURNING <all cols>`.
fn insert_statement<R: Record>(
    fields: Vec<(&'static str, FieldValue)>,
) -> Result<QueryBuilder<'static, Postgres>, DbError> {
    for (column, _) in &fields {
        ensure_column::<R>(column)?;
    }

    let mut builder = QueryBuilder::new(format!("INSERT INTO {}", R::TABLE));
    if fields.is_empty() {
        builder.push(" DEFAULT VALUES");
    } else {
        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        builder.push(format!(" ({}) VALUES (", columns.join(", ")));
        for (i, (_, value)) in fields.into_iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            bind_value(&mut builder, value);
        }
        builder.push(")");
    }
    builder.push(format!(" RETURNING {}", R::COLUMNS.join(", ")));
    Ok(builder)
}

/// `SELECT ... FROM <table> [joins] WHERE <field> = $1 [AND ...] LIMIT 1`.
fn select_one_statement<R: Record>(
    lookup: Lookup,
) -> Result<QueryBuilder<'static, Postgres>, DbError> {
    let field = lookup.field.unwrap_or(R::PRIMARY_KEY);
    ensure_column::<R>(field)?;
    for condition in &lookup.conditions {
        ensure_column::<R>(condition.column)?;
    }

    let options = R::get_options();
    let mut columns: Vec<String> = R::COLUMNS
        .iter()
        .map(|column| format!("{}.{column}", R::TABLE))
        .collect();
    for option in &options {
        columns.extend(option.columns.iter().map(|c| c.to_string()));
    }

    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        columns.join(", "),
        R::TABLE
    ));
    for option in &options {
        builder.push(" ").push(option.join);
    }

    builder.push(format!(" WHERE {}.{field} = ", R::TABLE));
    bind_value(&mut builder, lookup.value);
    for condition in lookup.conditions {
        builder.push(format!(
            " AND {}.{} {} ",
            R::TABLE,
            condition.column,
            condition.op.as_sql()
        ));
        bind_value(&mut builder, condition.value);
    }
    builder.push(" LIMIT 1");
    Ok(builder)
}

fn bind_value(builder: &mut QueryBuilder<'static, Postgres>, value: FieldValue) {
    match value {
        FieldValue::SmallInt(v) => builder.push_bind(v),
        FieldValue::Int(v) => builder.push_bind(v),
        FieldValue::BigInt(v) => builder.push_bind(v),
        FieldValue::Float(v) => builder.push_bind(v),
        FieldValue::Bool(v) => builder.push_bind(v),
        FieldValue::Text(v) => builder.push_bind(v),
        FieldValue::Timestamp(v) => builder.push_bind(v),
        FieldValue::Json(v) => builder.push_bind(v),
    };
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use seed_core::types::{DbId, Timestamp};
    use sqlx::FromRow;

    use super::*;
    use crate::entity::{Condition, LoadOption, Op};

    #[derive(Debug, FromRow)]
    #[allow(dead_code)]
    struct Note {
        id: DbId,
        created_at: Timestamp,
        body: String,
    }

    impl Record for Note {
        const TABLE: &'static str = "notes";
        const COLUMNS: &'static [&'static str] = &["id", "created_at", "body"];
    }

    #[derive(Debug, FromRow)]
    #[allow(dead_code)]
    struct TaggedNote {
        id: DbId,
        created_at: Timestamp,
        body: String,
        #[sqlx(default)]
        tag_count: i64,
    }

    impl Record for TaggedNote {
        const TABLE: &'static str = "notes";
        const COLUMNS: &'static [&'static str] = &["id", "created_at", "body"];

        fn get_options() -> Vec<LoadOption> {
            vec![LoadOption {
                join: "CROSS JOIN LATERAL (SELECT COUNT(*) AS tag_count FROM tags WHERE tags.note_id = notes.id) t",
                columns: &["t.tag_count"],
            }]
        }
    }

    #[test]
    fn insert_lists_only_present_columns() {
        let builder =
            insert_statement::<Note>(vec![("body", FieldValue::from("hello"))]).unwrap();
        assert_eq!(
            builder.sql(),
            "INSERT INTO notes (body) VALUES ($1) RETURNING id, created_at, body"
        );
    }

    #[test]
    fn insert_without_fields_uses_defaults() {
        let builder = insert_statement::<Note>(Vec::new()).unwrap();
        assert_eq!(
            builder.sql(),
            "INSERT INTO notes DEFAULT VALUES RETURNING id, created_at, body"
        );
    }

    #[test]
    fn insert_rejects_unknown_column() {
        let err = insert_statement::<Note>(vec![("title", FieldValue::from("x"))]).err();
        assert_matches!(
            err,
            Some(DbError::UnknownColumn { table: "notes", column }) if column == "title"
        );
    }

    #[test]
    fn select_defaults_to_primary_key() {
        let builder = select_one_statement::<Note>(Lookup::from(3_i64)).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT notes.id, notes.created_at, notes.body FROM notes WHERE notes.id = $1 LIMIT 1"
        );
    }

    #[test]
    fn select_ands_extra_conditions() {
        let lookup = Lookup::by("body", "hello").and(Condition::new("id", Op::Lt, 10_i64));
        let builder = select_one_statement::<Note>(lookup).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT notes.id, notes.created_at, notes.body FROM notes \
             WHERE notes.body = $1 AND notes.id < $2 LIMIT 1"
        );
    }

    #[test]
    fn select_applies_load_options() {
        let builder = select_one_statement::<TaggedNote>(Lookup::from(1_i64)).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT notes.id, notes.created_at, notes.body, t.tag_count FROM notes \
             CROSS JOIN LATERAL (SELECT COUNT(*) AS tag_count FROM tags WHERE tags.note_id = notes.id) t \
             WHERE notes.id = $1 LIMIT 1"
        );
    }

    #[test]
    fn select_rejects_unknown_condition_column() {
        let lookup = Lookup::from(1_i64).and(Condition::equals("missing", true));
        assert_matches!(
            select_one_statement::<Note>(lookup).err(),
            Some(DbError::UnknownColumn { .. })
        );
    }
}
