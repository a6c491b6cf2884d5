//! Entity CRUD routes. One group per entity, each route registered once.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::models::Entity;
use crate::state::EntityState;
use axum::{routing::get, Router};

/// `GET|POST {base}` and `GET|PUT|DELETE {base}/:id` for entity `E`.
pub fn entity_routes<E: Entity>(base: &str, state: EntityState<E>) -> Router {
    Router::new()
        .route(base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{}/:id", base),
            get(read::<E>).put(update::<E>).delete(delete_handler::<E>),
        )
        .with_state(state)
}
