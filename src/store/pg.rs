//! PostgreSQL entity store over a shared `PgPool`.

use super::{Admission, EntityStore, StoreError, StoreHealth};
use crate::config::DatabaseSettings;
use crate::models::{Entity, NameFilter};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};

/// Created once at startup, shared by every handler, closed after the server stops.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    admission: Admission,
}

impl PgStore {
    /// Open the pool described by `settings`. Connects eagerly so a bad URL fails startup.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.url)
            .await?;
        let admission = Admission::new(settings.max_connections as usize + settings.max_waiting);
        tracing::info!(
            max_connections = settings.max_connections,
            max_waiting = settings.max_waiting,
            "store connected"
        );
        Ok(PgStore::new(pool, admission))
    }

    pub fn new(pool: PgPool, admission: Admission) -> Self {
        PgStore { pool, admission }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for leased connections to return, then close them all.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_rows<E>(&self, q: QueryBuf) -> Result<Vec<E>, StoreError>
    where
        E: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let _slot = self.admission.try_enter()?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, E>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_id(&self, q: QueryBuf) -> Result<i64, StoreError> {
        let _slot = self.admission.try_enter()?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn execute(&self, q: QueryBuf) -> Result<u64, StoreError> {
        let _slot = self.admission.try_enter()?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }
}

#[async_trait]
impl<E> EntityStore<E> for PgStore
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn list(&self, filter: Option<&NameFilter>) -> Result<Vec<E>, StoreError> {
        self.fetch_rows(sql::select_list(&E::TABLE, filter)).await
    }

    async fn find(&self, id: i64) -> Result<Vec<E>, StoreError> {
        self.fetch_rows(sql::select_by_id(&E::TABLE, id)).await
    }

    async fn insert(&self, input: &E::Input) -> Result<i64, StoreError> {
        self.fetch_id(sql::insert(&E::TABLE, E::bind_input(input))).await
    }

    async fn update(&self, id: i64, input: &E::Input) -> Result<u64, StoreError> {
        self.execute(sql::update(&E::TABLE, id, E::bind_input(input))).await
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        self.execute(sql::delete(&E::TABLE, id)).await
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
