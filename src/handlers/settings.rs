use axum::{extract::State, response::Json};
use serde_json::json;

use crate::{
    errors::{AppError, Result},
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::UserSettings,
};

pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let settings = state.settings.get(user.id);
    Ok(Json(json!({ "data": settings })))
}

pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(settings): Json<UserSettings>,
) -> Result<Json<serde_json::Value>> {
    if settings.security.session_timeout_minutes == 0 {
        return Err(AppError::Validation(
            "Session timeout must be at least one minute".to_string(),
        ));
    }
    if settings.language.is_empty() {
        return Err(AppError::Validation("Language is required".to_string()));
    }

    state.settings.set(user.id, settings.clone());

    Ok(Json(json!({
        "message": "Settings saved successfully",
        "data": settings
    })))
}
