//! Typed errors and HTTP mapping.

use crate::models::Entity;
use crate::store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Route operation, used to word the client-facing failure message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    List,
    Fetch,
    Create,
    Update,
    Delete,
}

impl Action {
    fn failure_message(self, entity: &str) -> String {
        let verb = match self {
            Action::List => "retrieving",
            Action::Fetch => "fetching",
            Action::Create => "creating",
            Action::Update => "updating",
            Action::Delete => "deleting",
        };
        format!("error {} {}", verb, entity)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{action:?} {entity}: {source}")]
    Store {
        action: Action,
        entity: &'static str,
        source: StoreError,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("request body too large")]
    PayloadTooLarge,
}

impl AppError {
    /// Wrap a store failure for entity `E`. Listing is worded with the plural noun.
    pub fn store<E: Entity>(action: Action, source: StoreError) -> Self {
        let entity = match action {
            Action::List => E::PLURAL,
            _ => E::SINGULAR,
        };
        AppError::Store {
            action,
            entity,
            source,
        }
    }
}

/// Every body the handlers cannot read is a client error with a plain-text reason.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest("body must be JSON (Content-Type: application/json)".into())
            }
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
            other => AppError::BadRequest(format!("invalid body: {}", other.body_text())),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Store {
                action,
                entity,
                source: StoreError::Busy,
            } => {
                tracing::warn!(?action, entity, "store busy, request rejected");
                (StatusCode::SERVICE_UNAVAILABLE, "service busy, retry later").into_response()
            }
            AppError::Store {
                action,
                entity,
                source,
            } => {
                let message = action.failure_message(entity);
                tracing::error!(?action, entity, error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response()
            }
        }
    }
}
