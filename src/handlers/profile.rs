use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde_json::json;

use crate::{
    database::queries::UserQueries,
    errors::{AppError, Result},
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::UpdateProfileRequest,
};

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let profile = UserQueries::find_profile_by_id(state.database.pool(), user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({ "data": profile })))
}

/// Updates name and gender. Email stays what the identity was created with.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let profile =
        UserQueries::update_profile(state.database.pool(), user.id, request.name.trim(), request.gender)
            .await?
            .ok_or(AppError::NotFound)?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "data": profile
    })))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let mut avatar: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to parse multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "avatar" || name == "file" {
            let filename = field.file_name().unwrap_or("avatar.png").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;
            avatar = Some((filename, mime_type, data.to_vec()));
        }
    }

    let (filename, mime_type, data) =
        avatar.ok_or_else(|| AppError::Validation("No avatar file provided".to_string()))?;

    let avatar_url = state
        .gateway
        .upload_avatar(user.id, &filename, &mime_type, &data)
        .await?;

    UserQueries::update_avatar_url(state.database.pool(), user.id, &avatar_url).await?;

    Ok(Json(json!({
        "message": "Avatar updated successfully",
        "data": { "avatar_url": avatar_url }
    })))
}
