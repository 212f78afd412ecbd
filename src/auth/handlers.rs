use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AccountChanges, CreatedUser, Credentials, NewAccount, PublicUser, TokenResponse},
    middleware::{require_auth, AuthUser},
    validation::Validated,
};
use crate::{
    error::{AppError, Envelope},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Only `GET` is gated; other methods on `/users/me` get a plain 405.
pub fn me_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/users/me",
        get(get_me).route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
    )
}

/// Unknown and malformed ids both mean "no such user".
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("user"))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<PublicUser>>>, AppError> {
    let users = state.accounts.list_accounts().await?;
    Ok(Envelope::success(
        "users retrieved",
        users.into_iter().map(PublicUser::from).collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<PublicUser>>, AppError> {
    let user = state.accounts.get_account(parse_id(&id)?).await?;
    Ok(Envelope::success("user retrieved", user.into()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Validated(payload): Validated<NewAccount>,
) -> Result<(StatusCode, Json<Envelope<CreatedUser>>), AppError> {
    let user_id = state.accounts.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::success("user created", CreatedUser { user_id }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Validated(payload): Validated<Credentials>,
) -> Result<Json<Envelope<TokenResponse>>, AppError> {
    let token = state.accounts.authenticate(payload).await?;
    Ok(Envelope::success("login successful", TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(payload): Validated<AccountChanges>,
) -> Result<Json<Envelope<()>>, AppError> {
    state.accounts.update_account(parse_id(&id)?, payload).await?;
    Ok(Envelope::ok("user updated"))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, AppError> {
    state.accounts.delete_account(parse_id(&id)?).await?;
    Ok(Envelope::ok("user deleted"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(who): AuthUser,
) -> Result<Json<Envelope<PublicUser>>, AppError> {
    let user = state.accounts.get_account(who.user_id).await?;
    Ok(Envelope::success("user retrieved", user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!(parse_id("42"), Err(AppError::NotFound(_))));
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
