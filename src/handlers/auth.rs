use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::{
    auth::{validate_email, JwtService, PasswordService},
    database::queries::UserQueries,
    errors::{AppError, Result},
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, RegisterRequest},
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_email(&request.email)?;
    PasswordService::validate_password_strength(&request.password)?;

    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    if UserQueries::find_account_by_email(state.database.pool(), &request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = PasswordService::hash_password(&request.password)?;

    // Credential and profile rows are created in one transaction; a failed
    // profile insert rolls the identity back instead of orphaning it.
    let profile = UserQueries::create_account_with_profile(
        state.database.pool(),
        &request.email,
        &password_hash,
        request.name.trim(),
        request.gender,
    )
    .await?;

    let jwt_service = JwtService::new(&state.config.jwt_secret);
    let access_token = jwt_service.generate_token(profile.id, &profile.email)?;

    let response = AuthResponse {
        access_token,
        user: profile,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "data": response
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    // Wrong email and wrong password are indistinguishable on purpose.
    let account = UserQueries::find_account_by_email(state.database.pool(), &request.email)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    if !PasswordService::verify_password(&request.password, &account.password_hash)? {
        return Err(AppError::Auth("Invalid email or password".to_string()));
    }

    let profile = UserQueries::find_profile_by_id(state.database.pool(), account.id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile row missing for account")))?;

    let jwt_service = JwtService::new(&state.config.jwt_secret);
    let access_token = jwt_service.generate_token(profile.id, &profile.email)?;

    let response = AuthResponse {
        access_token,
        user: profile,
    };

    Ok(Json(json!({
        "message": "Login successful",
        "data": response
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    // Sessions are stateless tokens; the server only discards the
    // session-scoped settings entry.
    state.settings.clear(user.id);

    Ok(Json(json!({
        "message": "Logged out successfully"
    })))
}
