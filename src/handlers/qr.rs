use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    database::queries::QrCodeQueries,
    encoder,
    errors::{AppError, Result},
    expiry,
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::{ContentType, QrCodeRecord, QrCodeResponse, UpdateNotesRequest},
    share,
};

/// Generates a QR code from submitted content and/or uploaded files.
///
/// Files upload sequentially through a batch guard, so a failure anywhere in
/// the flow (a later upload, encoding, the record insert) deletes whatever
/// was already stored instead of leaving orphaned objects.
pub async fn generate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let mut content = String::new();
    let mut content_type: Option<ContentType> = None;
    let mut notes: Option<String> = None;
    let mut file_urls: Vec<String> = Vec::new();
    let mut batch = state.gateway.begin_batch();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to parse multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "content" => {
                content = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read content: {}", e)))?;
            }
            "type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read type: {}", e)))?;
                content_type = Some(
                    value
                        .parse()
                        .map_err(|e| AppError::Validation(format!("{}", e)))?,
                );
            }
            "notes" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read notes: {}", e)))?;
                if !value.is_empty() {
                    notes = Some(value);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;
                let url = batch.add(user.id, &filename, &data).await?;
                file_urls.push(url);
            }
            _ => {} // Ignore unknown fields
        }
    }

    if content.trim().is_empty() && file_urls.is_empty() {
        return Err(AppError::Validation(
            "Please enter some text or select files".to_string(),
        ));
    }

    // Uploaded files replace the typed content with their public URLs.
    let content = if file_urls.is_empty() {
        content
    } else {
        file_urls.join("\n")
    };

    let qr_image = encoder::encode(&content)?;

    let record = QrCodeRecord::new(
        user.id,
        content,
        content_type.unwrap_or(ContentType::Text),
        file_urls,
        qr_image,
        notes,
    );
    QrCodeQueries::insert(state.database.pool(), &record).await?;
    batch.commit();

    tracing::info!(qr_id = %record.id, owner = %user.id, "Generated QR code");

    let response = QrCodeResponse::from_record(record, Utc::now());
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "QR code generated successfully",
            "data": response
        })),
    ))
}

/// The owner's history, newest first. Expired entries stay listed (flagged,
/// zero minutes remaining) until the sweep physically removes them.
pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let records = QrCodeQueries::list_by_owner(state.database.pool(), user.id).await?;

    let now = Utc::now();
    let data: Vec<QrCodeResponse> = records
        .into_iter()
        .map(|record| QrCodeResponse::from_record(record, now))
        .collect();

    Ok(Json(json!({ "data": data })))
}

pub async fn update_notes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<serde_json::Value>> {
    let matched =
        QrCodeQueries::update_notes(state.database.pool(), id, user.id, &request.notes).await?;

    if !matched {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "message": "Notes saved successfully"
    })))
}

/// Owner-scoped delete. Removing a row that is already gone (swept, or
/// deleted from another tab) is still a success.
pub async fn remove(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    QrCodeQueries::delete(state.database.pool(), id, user.id).await?;

    Ok(Json(json!({
        "message": "QR code deleted successfully"
    })))
}

pub async fn share_links(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let record = QrCodeQueries::find_by_id(state.database.pool(), id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    if expiry::is_expired(record.expiry_time, Utc::now()) {
        return Err(AppError::Validation("QR code has expired".to_string()));
    }

    // Share the primary file when one exists, otherwise the QR image itself.
    let url = record.file_url.as_deref().unwrap_or(&record.qr_image);
    let links = share::compose(url, &record.content);

    Ok(Json(json!({ "data": links })))
}
