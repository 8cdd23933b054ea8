//! Schema-level view over [`RecordRepo`].

use std::marker::PhantomData;

use crate::entity::{Fields, Lookup, Schema};
use crate::error::DbError;
use crate::repositories::RecordRepo;
use crate::session::Session;

/// Same operations as [`RecordRepo`], converting results into schema `S`.
///
/// The `*_record` variants return the bound record instead, for callers
/// composing further storage work around it.
pub struct SchemaRepo<S>(PhantomData<fn() -> S>);

impl<S: Schema> SchemaRepo<S> {
    /// Insert `data` and return it as the schema type.
    pub async fn create<F>(session: &mut Session, data: &F, commit: bool) -> Result<S, DbError>
    where
        F: Fields + Sync,
    {
        let record = Self::create_record(session, data, commit).await?;
        Ok(S::from(record))
    }

    /// Insert `data` and return the stored record.
    pub async fn create_record<F>(
        session: &mut Session,
        data: &F,
        commit: bool,
    ) -> Result<S::Record, DbError>
    where
        F: Fields + Sync,
    {
        RecordRepo::<S::Record>::create(session, data, commit).await
    }

    /// Fetch the first match as the schema type.
    pub async fn get_one(
        session: &mut Session,
        lookup: impl Into<Lookup>,
    ) -> Result<Option<S>, DbError> {
        let record = Self::get_one_record(session, lookup).await?;
        Ok(record.map(S::from))
    }

    /// Fetch the first match as the stored record.
    pub async fn get_one_record(
        session: &mut Session,
        lookup: impl Into<Lookup>,
    ) -> Result<Option<S::Record>, DbError> {
        RecordRepo::<S::Record>::get_one(session, lookup).await
    }

    pub async fn count(session: &mut Session) -> Result<i64, DbError> {
        RecordRepo::<S::Record>::count(session).await
    }
}
