/*
 * Responsibility
 * - POST /login, /loginWithTotp (public)
 * - POST /logout, /change-password, /reset-totp, /confirm-totp, GET /info
 */
use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    api::{
        dto::account::{
            ChangePasswordRequest, ConfirmTotpRequest, InfoResponse, LoginRequest,
            LoginWithTotpRequest, TotpSecretResponse,
        },
        envelope::success,
        extractors::AuthCtxExtractor,
        handlers::ApiResult,
    },
    error::{AppError, BAD_REQUEST_CODE},
    repos::user_repo::UserRow,
    services::auth::{password, totp},
    state::AppState,
};

/// Login succeeded on password, the account also needs a TOTP code.
pub const TOTP_REQUIRED_CODE: i32 = 100;
pub const LOGIN_FAILED_CODE: i32 = 101;
pub const INVALID_TOTP_CODE: i32 = 102;

const TOTP_ISSUER: &str = "Terminal Gateway";

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn authenticate(state: &AppState, req: &LoginRequest) -> Result<UserRow, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = state.users.find_by_username(req.username.trim());
    let verified = password::verify_account(
        &req.password,
        row.as_ref().map(|row| row.password_hash.as_str()),
    );

    row.filter(|_| verified).ok_or_else(|| {
        tracing::info!(username = %req.username, "login refused");
        AppError::fail(LOGIN_FAILED_CODE, "incorrect username or password")
    })
}

async fn open_session(state: &AppState, row: UserRow, remember: bool) -> ApiResult {
    let user_id = row.user.id.clone();
    let authorization = state.auth.issue(row.user, remember).await?;
    tracing::info!(%user_id, remember, "login");

    Ok(success(authorization.token))
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult {
    let row = authenticate(&state, &req)?;

    if row.totp_secret.is_some() {
        return Err(AppError::fail(
            TOTP_REQUIRED_CODE,
            "two-factor code required",
        ));
    }

    open_session(&state, row, req.remember).await
}

pub async fn login_with_totp(
    State(state): State<AppState>,
    Json(req): Json<LoginWithTotpRequest>,
) -> ApiResult {
    let row = authenticate(&state, &req.login)?;

    // Accounts without TOTP may use this endpoint too; the code is ignored.
    if let Some(secret) = &row.totp_secret
        && !totp::verify(secret, &req.totp, unix_now())?
    {
        tracing::info!(user_id = %row.user.id, "totp refused");
        return Err(AppError::fail(INVALID_TOTP_CODE, "invalid two-factor code"));
    }

    open_session(&state, row, req.login.remember).await
}

pub async fn logout(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> ApiResult {
    state.auth.revoke(&ctx.token).await?;
    tracing::info!(user_id = %ctx.user_id(), "logout");

    Ok(success(()))
}

pub async fn info(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> ApiResult {
    let row = state
        .users
        .row(ctx.user_id())
        .ok_or(AppError::not_found("user"))?;

    Ok(success(InfoResponse {
        enable_totp: row.totp_secret.is_some(),
        user: row.user,
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult {
    req.validate().map_err(AppError::bad_request)?;

    let row = state
        .users
        .row(ctx.user_id())
        .ok_or(AppError::not_found("user"))?;
    if !password::verify_password(&req.old_password, &row.password_hash) {
        return Err(AppError::fail(LOGIN_FAILED_CODE, "incorrect password"));
    }

    let hash = password::hash_password(&req.new_password)?;
    state.users.set_password_hash(ctx.user_id(), hash)?;

    // The caller signs in again with the new password.
    state.auth.revoke(&ctx.token).await?;

    Ok(success(()))
}

pub async fn reset_totp(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> ApiResult {
    let secret = totp::generate_secret();
    state.users.set_pending_totp(ctx.user_id(), secret.clone())?;

    let uri = totp::provisioning_uri(TOTP_ISSUER, &ctx.user.username, &secret);
    Ok(success(TotpSecretResponse { secret, uri }))
}

pub async fn confirm_totp(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<ConfirmTotpRequest>,
) -> ApiResult {
    let row = state
        .users
        .row(ctx.user_id())
        .ok_or(AppError::not_found("user"))?;
    let Some(pending) = row.pending_totp_secret else {
        return Err(AppError::fail(
            BAD_REQUEST_CODE,
            "no pending two-factor secret, reset it first",
        ));
    };

    if !totp::verify(&pending, &req.totp, unix_now())? {
        return Err(AppError::fail(INVALID_TOTP_CODE, "invalid two-factor code"));
    }
    state.users.activate_pending_totp(ctx.user_id())?;
    tracing::info!(user_id = %ctx.user_id(), "totp enabled");

    Ok(success(()))
}
