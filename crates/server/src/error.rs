use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::{MapperError, MapperErrorKind};
use thiserror::Error;

use crate::response::Payload;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request is empty")]
    RequestEmpty,
    #[error("id must be given")]
    MissingId,
    #[error("converting id to integer failed")]
    InvalidId,
    #[error("request body is empty")]
    BodyEmpty,
    #[error("failed to decode request payload: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: &'static str,
        id: i64,
        #[source]
        source: MapperError,
    },
    #[error("failed to load {entity} for id: {id}")]
    Load {
        entity: &'static str,
        id: i64,
        #[source]
        source: MapperError,
    },
    #[error("failed to save {entity}")]
    Save {
        entity: &'static str,
        #[source]
        source: MapperError,
    },
    #[error("failed to delete {entity} for id: {id}")]
    Delete {
        entity: &'static str,
        id: i64,
        #[source]
        source: MapperError,
    },
}

impl ApiError {
    pub fn load(id: i64, source: MapperError) -> Self {
        let entity = source.entity;
        match source.kind {
            MapperErrorKind::NotFound => ApiError::NotFound { entity, id, source },
            _ => ApiError::Load { entity, id, source },
        }
    }

    pub fn save(source: MapperError) -> Self {
        match source.kind {
            MapperErrorKind::NoData => ApiError::RequestEmpty,
            _ => ApiError::Save {
                entity: source.entity,
                source,
            },
        }
    }

    pub fn delete(id: i64, source: MapperError) -> Self {
        ApiError::Delete {
            entity: source.entity,
            id,
            source,
        }
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::RequestEmpty | ApiError::BodyEmpty => {
                (StatusCode::BAD_REQUEST, "RequestError")
            }
            ApiError::MissingId | ApiError::InvalidId => (StatusCode::BAD_REQUEST, "IdError"),
            ApiError::Decode(_) => (StatusCode::BAD_REQUEST, "DecodeError"),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::Load { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "LoadError"),
            ApiError::Save { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "SaveError"),
            ApiError::Delete { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DeleteError"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = self.status_and_type();

        // Only the generic message goes to the client.
        if status_code.is_server_error() {
            let source = match &self {
                ApiError::Load { source, .. }
                | ApiError::Save { source, .. }
                | ApiError::Delete { source, .. } => Some(source),
                _ => None,
            };
            let cause = source
                .map(|source| match &source.source {
                    Some(err) => format!("{source}: {err}"),
                    None => source.to_string(),
                })
                .unwrap_or_default();
            let constraint = source
                .and_then(MapperError::violated_constraint)
                .unwrap_or("none");
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                cause = %cause,
                constraint,
                "API request failed"
            );
        }

        (status_code, Json(Payload::error(self.to_string()))).into_response()
    }
}
