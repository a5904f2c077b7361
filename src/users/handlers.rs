use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::state::AppState;

use super::dto::{CreateUserRequest, TokenRequest, TokenResponse, UpdateMeRequest, UserResponse};
use super::email::{is_valid_email, normalize_email};
use super::jwt::{AuthUser, JwtKeys};
use super::repo::User;

const MIN_PASSWORD_LEN: usize = 5;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create", post(create_user))
        .route("/user/token", post(create_token))
        .route("/user/me", get(get_me).patch(update_me).put(update_me))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    let email = normalize_email(payload.email.trim());

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email address".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    // Uniqueness is checked against the normalized address so the same
    // mailbox cannot register twice under different domain casing.
    if let Ok(Some(_)) = User::find_by_email(&state.db, &email).await {
        warn!(email = %email, "email already registered");
        return Err((
            StatusCode::BAD_REQUEST,
            "A user with that email already exists".into(),
        ));
    }

    let user = User::create(&state.db, &email, &payload.name, &payload.password)
        .await
        .map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn create_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, String)> {
    let user = User::authenticate(&state.db, &payload.email, &payload.password)
        .await
        .map_err(internal)?;

    // One generic failure for unknown email, wrong password and blank
    // password alike, so the endpoint cannot be used to enumerate users.
    let Some(user) = user else {
        warn!("token request with invalid credentials");
        return Err((
            StatusCode::BAD_REQUEST,
            "Unable to authenticate with the provided credentials".into(),
        ));
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(internal)?;

    info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            error!(user_id = %user_id, "token subject no longer exists");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;

    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    if let Some(password) = payload.password.as_deref() {
        if password.len() < MIN_PASSWORD_LEN {
            warn!(user_id = %user_id, "password too short");
            return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
        }
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        payload.name.as_deref(),
        payload.password.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or_else(|| {
        error!(user_id = %user_id, "token subject no longer exists");
        (StatusCode::UNAUTHORIZED, "User not found".to_string())
    })?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
