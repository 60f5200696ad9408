// /users CRUD HTTP routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::store::{User, UserStore};

const DEFAULT_LIMIT: usize = 100;

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
}

impl AppState {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}

/// Errors rendered as `{"message": ...}` bodies
#[derive(Debug)]
pub enum ApiError {
    MissingFields,
    UserNotFound,
    RouteNotFound,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingFields => (StatusCode::BAD_REQUEST, "Name and email are required"),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "Route not found"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .fallback(route_not_found)
        .with_state(state)
}

/// Name and email as sent by the client; blank or non-string values count as absent
#[derive(Debug, Default)]
struct UserFields {
    name: Option<String>,
    email: Option<String>,
}

fn parse_fields(body: &Bytes) -> Result<UserFields, ApiError> {
    if body.is_empty() {
        return Ok(UserFields::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Failed to parse request body: {}", e);
        ApiError::Internal
    })?;

    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(UserFields {
        name: field("name"),
        email: field("email"),
    })
}

// Non-numeric ids can never match a stored user
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

/// POST /users - Create a user
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let fields = parse_fields(&body)?;
    let (Some(name), Some(email)) = (fields.name, fields.email) else {
        return Err(ApiError::MissingFields);
    };

    let user = state.store.create(name, email);
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - List users, paginated by `limit` and `offset`
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<User>> {
    let number = |key: &str, default: usize| {
        params
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    Json(state.store.list(number("offset", 0), number("limit", DEFAULT_LIMIT)))
}

/// GET /users/{id} - Get a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    parse_id(&id)
        .and_then(|id| state.store.get(id))
        .map(Json)
        .ok_or(ApiError::UserNotFound)
}

/// PUT /users/{id} - Update name and/or email
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)
        .filter(|id| state.store.contains(*id))
        .ok_or(ApiError::UserNotFound)?;

    let fields = parse_fields(&body)?;
    state
        .store
        .update(id, fields.name, fields.email)
        .map(Json)
        .ok_or(ApiError::UserNotFound)
}

/// DELETE /users/{id} - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = parse_id(&id).is_some_and(|id| state.store.delete(id));

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::UserNotFound)
    }
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
