//! Entity CRUD handlers: list, read, create, update, delete.
//!
//! Every handler issues exactly one store call. Store failures become
//! [`AppError::Store`], which logs the cause and answers with a generic message.

use crate::error::{Action, AppError};
use crate::models::{Deleted, Entity, NameFilter, Saved};
use crate::state::EntityState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub nome: Option<String>,
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}

pub async fn list<E: Entity>(
    State(state): State<EntityState<E>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<E>>, AppError> {
    let filter = NameFilter::from_query(params.nome, state.name_filter);
    let rows = state
        .store
        .list(filter.as_ref())
        .await
        .map_err(|e| AppError::store::<E>(Action::List, e))?;
    Ok(Json(rows))
}

pub async fn read<E: Entity>(
    State(state): State<EntityState<E>>,
    Path(id_str): Path<String>,
) -> Result<Json<Vec<E>>, AppError> {
    let id = parse_id(&id_str)?;
    let rows = state
        .store
        .find(id)
        .await
        .map_err(|e| AppError::store::<E>(Action::Fetch, e))?;
    Ok(Json(rows))
}

pub async fn create<E: Entity>(
    State(state): State<EntityState<E>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Saved<E::Input>>, AppError> {
    let Json(body) = body?;
    let input: E::Input = parse_body(body)?;
    let id = state
        .store
        .insert(&input)
        .await
        .map_err(|e| AppError::store::<E>(Action::Create, e))?;
    tracing::info!(table = E::TABLE.name, id, "created");
    Ok(Json(Saved { id, fields: input }))
}

/// Full replace. The response echoes the submitted fields; it is not re-read,
/// and an id with no row still answers 200.
pub async fn update<E: Entity>(
    State(state): State<EntityState<E>>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Saved<E::Input>>, AppError> {
    let id = parse_id(&id_str)?;
    let Json(body) = body?;
    let input: E::Input = parse_body(body)?;
    let affected = state
        .store
        .update(id, &input)
        .await
        .map_err(|e| AppError::store::<E>(Action::Update, e))?;
    tracing::info!(table = E::TABLE.name, id, affected, "updated");
    Ok(Json(Saved { id, fields: input }))
}

pub async fn delete<E: Entity>(
    State(state): State<EntityState<E>>,
    Path(id_str): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = parse_id(&id_str)?;
    let affected = state
        .store
        .delete(id)
        .await
        .map_err(|e| AppError::store::<E>(Action::Delete, e))?;
    tracing::info!(table = E::TABLE.name, id, affected, "deleted");
    Ok(Json(Deleted { id }))
}
