use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::{self, JoinError};
use tracing::{error, info};

use super::AppState;
use crate::base32;
use crate::error::Error;
use crate::store::{Entry, EntryStoreOperations};
use crate::totp::{current_code, seconds_remaining};

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    secret: String,
}

#[derive(Debug, Serialize)]
pub struct CodeResponse {
    code: String,
    expires_in: u64,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidInput,
    Core(Error),
    Task(JoinError),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid input"),
            ApiError::Core(Error::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "No entry found with that name.")
            }
            ApiError::Core(Error::DuplicateName(_)) => {
                (StatusCode::CONFLICT, "Entry with this name already exists.")
            }
            ApiError::Core(err) if err.is_derivation_failure() => {
                error!(error.message = %err, "unable to generate TOTP code");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating TOTP code")
            }
            ApiError::Core(err) => {
                error!(error.message = %err, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
            }
            ApiError::Task(err) => {
                error!(error.message = %err, "store task did not complete");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
            }
        };

        (status, format!("{}\n", message)).into_response()
    }
}

/// Runs a store operation on the blocking pool; the store does file I/O and
/// holds its write lock for the whole save.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn EntryStoreOperations) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(ApiError::Task)?;
    Ok(result?)
}

pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = with_store(&state, |store| store.list()).await?;
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let request = match payload {
        Ok(Json(request)) if !request.name.is_empty() && !request.secret.is_empty() => request,
        _ => return Err(ApiError::InvalidInput),
    };

    let CreateRequest { name, secret } = request;
    let created = name.clone();
    with_store(&state, move |store| store.add(&name, &secret)).await?;
    info!(entry = %created, "entry created");

    Ok((
        StatusCode::CREATED,
        format!("TOTP entry '{}' created successfully.\n", created),
    ))
}

pub async fn get_code(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CodeResponse>, ApiError> {
    let entry = with_store(&state, move |store| store.find(&name)).await?;
    let now = state.clock.get_now();

    let key = base32::decode(&entry.secret)?;
    let code = current_code(&key, now)?;

    Ok(Json(CodeResponse {
        code,
        expires_in: seconds_remaining(now),
    }))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<String, ApiError> {
    let removed = with_store(&state, move |store| store.remove(&name)).await?;
    info!(entry = %removed.name, "entry removed");

    Ok(format!("Entry '{}' has been removed.\n", removed.name))
}
