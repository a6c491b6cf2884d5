//! CRUD REST backend for users and products over PostgreSQL.

pub mod coerce;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{DatabaseSettings, Settings};
pub use error::{AppError, ConfigError};
pub use models::{Entity, MatchMode, NameFilter, Product, ProductInput, User, UserInput};
pub use routes::{app, common_routes, entity_routes};
pub use state::{AppState, EntityState};
pub use store::{Admission, EntityStore, PgStore, StoreError, StoreHealth};
