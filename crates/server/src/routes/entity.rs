//! CRUD endpoints shared by every entity:
//! `GET /{entity}/{id}`, `PUT /{entity}` and `DELETE /{entity}/{id}`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, RawPathParams, State},
    http::{StatusCode, request::Parts},
    routing::{get, put},
};
use serde::de::{Error as _, Unexpected};
use serde_json::Value;
use services::{ApiModel, EntityMapper, SaveOutcome};

use crate::{AppState, error::ApiError, response::Payload};

pub fn router<M: EntityMapper>() -> Router<AppState> {
    let name = <M::Model as ApiModel>::NAME;
    Router::new()
        .route(
            &format!("/{name}/{{id}}"),
            get(get_entity::<M>).delete(delete_entity::<M>),
        )
        // Reached when the id segment is left empty.
        .route(
            &format!("/{name}/"),
            get(get_entity::<M>).delete(delete_entity::<M>),
        )
        .route(&format!("/{name}"), put(put_entity::<M>))
}

/// Integer `id` path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingId)?;
        let raw = params
            .iter()
            .find_map(|(key, value)| (key == "id").then_some(value))
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingId)?;
        raw.parse().map(EntityId).map_err(|_| ApiError::InvalidId)
    }
}

async fn get_entity<M: EntityMapper>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Payload<M::Model>>, ApiError> {
    let model = state
        .mapper::<M>()
        .load(id)
        .await
        .map_err(|err| ApiError::load(id, err))?;
    Ok(Json(Payload::model(model)))
}

async fn put_entity<M: EntityMapper>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Payload<M::Model>>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::BodyEmpty);
    }
    let model = match serde_json::from_slice::<Value>(&body).map_err(ApiError::Decode)? {
        // A literal `null` decodes fine but carries no model.
        Value::Null => return Err(ApiError::RequestEmpty),
        value @ Value::Object(_) => {
            serde_json::from_value::<M::Model>(value).map_err(ApiError::Decode)?
        }
        other => return Err(ApiError::Decode(not_an_object(&other))),
    };

    let (saved, outcome) = state
        .mapper::<M>()
        .save(model)
        .await
        .map_err(ApiError::save)?;

    let status = match outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };
    tracing::debug!(id = saved.id(), %status, "Saved {}", <M::Model as ApiModel>::NAME);
    Ok((status, Json(Payload::model(saved))))
}

/// Models only come as JSON objects; serde would otherwise also accept
/// arrays as positional fields.
fn not_an_object(value: &Value) -> serde_json::Error {
    let unexpected = match value {
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Null | Value::Object(_) => Unexpected::Other("value"),
    };
    serde_json::Error::invalid_type(unexpected, &"a JSON object")
}

async fn delete_entity<M: EntityMapper>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Payload<M::Model>>, ApiError> {
    state
        .mapper::<M>()
        .delete(id)
        .await
        .map_err(|err| ApiError::delete(id, err))?;
    Ok(Json(Payload::empty()))
}
