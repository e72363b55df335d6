// crates
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use da_core::{ErrorKind, StoreError};
use hyper::StatusCode;
use tracing::{debug, error, warn};
// internal
use super::AppState;

#[must_use]
pub const fn status_code(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::BlobNotFound => StatusCode::NOT_FOUND,
        ErrorKind::DispersalRejected => StatusCode::BAD_GATEWAY,
        ErrorKind::DispersalTimedOut | ErrorKind::RetrievalTimedOut => {
            StatusCode::GATEWAY_TIMEOUT
        }
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::IntegrityViolation | ErrorKind::SetupUnavailable | ErrorKind::Network => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: &StoreError) -> Response {
    let status = status_code(error.kind());
    if status.is_server_error() {
        error!(kind = ?error.kind(), "{error}");
    } else {
        warn!(kind = ?error.kind(), "{error}");
    }
    (status, error.to_string()).into_response()
}

pub async fn put_blob(State(state): State<AppState>, blob: Bytes) -> Response {
    let cancel = state.shutdown.child_token();
    match state.store.put(&blob, &cancel).await {
        Ok(certificate) => {
            debug!(blob_len = blob.len(), "Blob stored");
            (StatusCode::OK, certificate).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// `certificate` is hex encoded, `0x` prefixed or not.
pub async fn get_blob(
    State(state): State<AppState>,
    Path(certificate): Path<String>,
) -> Response {
    let certificate = match const_hex::decode(&certificate) {
        Ok(certificate) => certificate,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid certificate encoding: {e}"),
            )
                .into_response()
        }
    };
    let cancel = state.shutdown.child_token();
    match state.store.get(&certificate, &cancel).await {
        Ok(blob) => (StatusCode::OK, blob).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
