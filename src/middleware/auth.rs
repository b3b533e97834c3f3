use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::JwtService, database::queries::UserQueries, handlers::AppState,
};

/// The authenticated identity behind a request: a verified session token
/// whose profile row still exists. Every owner-scoped handler takes this.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok());

        let token = auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Authentication required"))?;

        let jwt_service = JwtService::new(&state.config.jwt_secret);
        let claims = jwt_service
            .verify_token(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| unauthorized("Invalid token"))?;

        match UserQueries::find_profile_by_id(state.database.pool(), user_id).await {
            Ok(Some(profile)) => Ok(AuthenticatedUser {
                id: profile.id,
                email: profile.email,
            }),
            Ok(None) => Err(unauthorized("User not found")),
            Err(_) => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Database error"})),
            )
                .into_response()),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": message}))).into_response()
}
