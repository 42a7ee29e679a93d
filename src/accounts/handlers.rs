use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    accounts::{
        dto::{
            AvailabilityResponse, CheckUsernameQuery, CreateUserRequest, PublicUser,
            UpdateUserRequest,
        },
        repo::UserUpdate,
        services::{self, Registration},
        session::SessionUser,
    },
    error::AppError,
    state::AppState,
    validation::{self, email, phone, ValidationError},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/check-username", get(check_username))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.users.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}

#[instrument(skip(state))]
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<CheckUsernameQuery>,
) -> Response {
    let username = validation::normalize_username(query.u.as_deref().unwrap_or_default());
    if let Err(e) = validation::check_username(&username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(AvailabilityResponse {
                available: false,
                suggestion: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response();
    }

    match services::username_availability(state.users.as_ref(), &username).await {
        Ok(availability) => Json(AvailabilityResponse::from(availability)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = services::register(
        state.users.as_ref(),
        Registration {
            name: payload.name,
            username: payload.username,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.users.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, session, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let mut changes = UserUpdate::default();
    if let Some(name) = payload.name.as_deref() {
        changes.full_name = Some(validation::required(name, "name")?.to_string());
    }
    if let Some(raw) = payload.email.as_deref() {
        let email = validation::normalize_email(raw);
        if !email::is_valid(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        changes.email = Some(email);
    }
    if let Some(raw) = payload.phone.as_deref() {
        changes.phone = Some(phone::normalize(Some(raw))?);
    }

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(user_id = %user.id, by = %session.0, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, session))]
pub async fn delete_user(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(user_id = %id, by = %session.0, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
