//! Shared application state: the injected store, seen through one trait object per entity.

use crate::models::{Entity, MatchMode, Product, User};
use crate::store::{EntityStore, StoreHealth};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn EntityStore<User>>,
    pub products: Arc<dyn EntityStore<Product>>,
    pub health: Arc<dyn StoreHealth>,
    pub users_name_filter: MatchMode,
}

impl AppState {
    /// Share one store instance across both entity route groups and the readiness probe.
    pub fn from_store<S>(store: S, users_name_filter: MatchMode) -> Self
    where
        S: EntityStore<User> + EntityStore<Product> + StoreHealth + 'static,
    {
        let store = Arc::new(store);
        AppState {
            users: store.clone(),
            products: store.clone(),
            health: store,
            users_name_filter,
        }
    }

    pub fn users(&self) -> EntityState<User> {
        EntityState {
            store: self.users.clone(),
            name_filter: self.users_name_filter,
        }
    }

    pub fn products(&self) -> EntityState<Product> {
        EntityState {
            store: self.products.clone(),
            name_filter: MatchMode::Contains,
        }
    }
}

/// State for one entity's route group.
pub struct EntityState<E: Entity> {
    pub store: Arc<dyn EntityStore<E>>,
    pub name_filter: MatchMode,
}

impl<E: Entity> Clone for EntityState<E> {
    fn clone(&self) -> Self {
        EntityState {
            store: self.store.clone(),
            name_filter: self.name_filter,
        }
    }
}
