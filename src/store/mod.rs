//! Entity store: the persistence seam handlers talk to.

mod admission;
mod pg;

pub use admission::Admission;
pub use pg::PgStore;

use crate::models::{Entity, NameFilter};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(sqlx::Error),
    /// No connection could be granted: admission gate full or acquire timed out.
    #[error("store busy: no connection available")]
    Busy,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => StoreError::Busy,
            other => StoreError::Db(other),
        }
    }
}

/// One table's worth of single-statement operations. Nothing here spans
/// statements; each call is atomic on its own.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// All rows ordered by id, optionally narrowed by a name filter.
    async fn list(&self, filter: Option<&NameFilter>) -> Result<Vec<E>, StoreError>;

    /// Rows with this id: zero or one.
    async fn find(&self, id: i64) -> Result<Vec<E>, StoreError>;

    /// Insert and return the store-assigned id.
    async fn insert(&self, input: &E::Input) -> Result<i64, StoreError>;

    /// Replace every data column; returns affected rows.
    async fn update(&self, id: i64, input: &E::Input) -> Result<u64, StoreError>;

    /// Returns affected rows.
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
