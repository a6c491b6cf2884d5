//! In-memory stores and request helpers for router tests.

use crate::models::{Entity, MatchMode, NameFilter, Product, ProductInput, User, UserInput};
use crate::routes::app;
use crate::state::AppState;
use crate::store::{EntityStore, StoreError, StoreHealth};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tower::ServiceExt;

/// Rows the memory store can build from an id and a body.
pub trait FakeRow: Entity + Clone {
    fn materialize(id: i64, input: &Self::Input) -> Self;
    fn name(&self) -> Option<&str>;
}

impl FakeRow for User {
    fn materialize(id: i64, input: &UserInput) -> Self {
        User {
            id,
            nome: input.nome.clone(),
            idade: input.idade,
        }
    }

    fn name(&self) -> Option<&str> {
        self.nome.as_deref()
    }
}

impl FakeRow for Product {
    fn materialize(id: i64, input: &ProductInput) -> Self {
        Product {
            id,
            nome: input.nome.clone(),
            preco: input.preco,
            descricao: input.descricao.clone(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.nome.as_deref()
    }
}

/// Same semantics as `[NOT] ILIKE '%needle%'`: NULL names never match either way.
fn name_matches(filter: &NameFilter, name: Option<&str>) -> bool {
    let Some(name) = name else { return false };
    let hit = name.to_lowercase().contains(&filter.needle.to_lowercase());
    match filter.mode {
        MatchMode::Contains => hit,
        MatchMode::Excludes => !hit,
    }
}

pub struct MemoryTable<E> {
    next_id: i64,
    rows: BTreeMap<i64, E>,
}

impl<E> Default for MemoryTable<E> {
    fn default() -> Self {
        MemoryTable {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<MemoryTable<User>>,
    products: Mutex<MemoryTable<Product>>,
}

pub trait HasTable<E> {
    fn table(&self) -> &Mutex<MemoryTable<E>>;
}

impl HasTable<User> for MemoryStore {
    fn table(&self) -> &Mutex<MemoryTable<User>> {
        &self.users
    }
}

impl HasTable<Product> for MemoryStore {
    fn table(&self) -> &Mutex<MemoryTable<Product>> {
        &self.products
    }
}

#[async_trait]
impl<E> EntityStore<E> for MemoryStore
where
    E: FakeRow,
    MemoryStore: HasTable<E>,
{
    async fn list(&self, filter: Option<&NameFilter>) -> Result<Vec<E>, StoreError> {
        let table = self.table().lock().unwrap();
        Ok(table
            .rows
            .values()
            .filter(|row| filter.map_or(true, |f| name_matches(f, row.name())))
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Vec<E>, StoreError> {
        let table = self.table().lock().unwrap();
        Ok(table.rows.get(&id).cloned().into_iter().collect())
    }

    async fn insert(&self, input: &E::Input) -> Result<i64, StoreError> {
        let mut table = self.table().lock().unwrap();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, E::materialize(id, input));
        Ok(id)
    }

    async fn update(&self, id: i64, input: &E::Input) -> Result<u64, StoreError> {
        let mut table = self.table().lock().unwrap();
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = E::materialize(id, input);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut table = self.table().lock().unwrap();
        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Fails every call, as a lost connection or a saturated pool would.
pub struct BrokenStore {
    pub busy: bool,
}

impl BrokenStore {
    fn error(&self) -> StoreError {
        if self.busy {
            StoreError::Busy
        } else {
            StoreError::Db(sqlx::Error::Protocol("connection reset by peer".into()))
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for BrokenStore {
    async fn list(&self, _filter: Option<&NameFilter>) -> Result<Vec<E>, StoreError> {
        Err(self.error())
    }

    async fn find(&self, _id: i64) -> Result<Vec<E>, StoreError> {
        Err(self.error())
    }

    async fn insert(&self, _input: &E::Input) -> Result<i64, StoreError> {
        Err(self.error())
    }

    async fn update(&self, _id: i64, _input: &E::Input) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn delete(&self, _id: i64) -> Result<u64, StoreError> {
        Err(self.error())
    }
}

#[async_trait]
impl StoreHealth for BrokenStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.error())
    }
}

pub fn memory_app(users_name_filter: MatchMode) -> Router {
    app(AppState::from_store(MemoryStore::default(), users_name_filter), 64 * 1024)
}

pub fn broken_app(busy: bool) -> Router {
    app(AppState::from_store(BrokenStore { busy }, MatchMode::Contains), 64 * 1024)
}

/// Send one request through the router and return status and raw body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

/// Send a raw body with an optional content type, for bodies `send` cannot express.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Like [`send`], decoding the body as JSON.
pub async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("{} {}: body is not JSON ({}): {:?}", status, uri, e, String::from_utf8_lossy(&bytes)));
    (status, value)
}
