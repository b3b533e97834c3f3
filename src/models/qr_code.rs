use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::expiry;

/// Declared kind of the encoded content. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Url,
    Image,
    Video,
    Audio,
    Document,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Url => "url",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Document => "document",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct ParseContentTypeError(String);

impl std::str::FromStr for ContentType {
    type Err = ParseContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "url" => Ok(ContentType::Url),
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            "audio" => Ok(ContentType::Audio),
            "document" => Ok(ContentType::Document),
            other => Err(ParseContentTypeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ContentType {
    type Error = ParseContentTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QrCodeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub content_type: ContentType,
    pub file_url: Option<String>,
    pub files: Vec<String>,
    pub qr_image: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
}

impl QrCodeRecord {
    /// Builds a record for a freshly generated code. The expiry is fixed at
    /// creation and never recomputed afterwards.
    pub fn new(
        user_id: Uuid,
        content: String,
        content_type: ContentType,
        files: Vec<String>,
        qr_image: String,
        notes: Option<String>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            file_url: files.first().cloned(),
            content,
            content_type,
            files,
            qr_image,
            notes,
            created_at,
            expiry_time: expiry::expiry_for(created_at),
        }
    }
}

/// History entry as served to the client: the stored record plus derived
/// expiry display state.
#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub id: Uuid,
    pub content: String,
    pub content_type: ContentType,
    pub file_url: Option<String>,
    pub files: Vec<String>,
    pub qr_image: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
    pub remaining_minutes: i64,
    pub expired: bool,
}

impl QrCodeResponse {
    pub fn from_record(record: QrCodeRecord, now: DateTime<Utc>) -> Self {
        let expired = expiry::is_expired(record.expiry_time, now);
        let remaining_minutes = expiry::remaining_minutes(record.expiry_time, now);
        Self {
            id: record.id,
            content: record.content,
            content_type: record.content_type,
            file_url: record.file_url,
            files: record.files,
            qr_image: record.qr_image,
            notes: record.notes,
            created_at: record.created_at,
            expiry_time: record.expiry_time,
            remaining_minutes,
            expired,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_fixed_at_creation() {
        let record = QrCodeRecord::new(
            Uuid::new_v4(),
            "hello".to_string(),
            ContentType::Text,
            Vec::new(),
            "data:image/png;base64,AAAA".to_string(),
            None,
        );

        assert_eq!(record.expiry_time, record.created_at + Duration::hours(2));
    }

    #[test]
    fn test_primary_file_url_is_first_upload() {
        let files = vec![
            "http://localhost/files/qr-files/a/1.png".to_string(),
            "http://localhost/files/qr-files/a/2.png".to_string(),
        ];
        let record = QrCodeRecord::new(
            Uuid::new_v4(),
            files.join("\n"),
            ContentType::Image,
            files.clone(),
            "data:image/png;base64,AAAA".to_string(),
            None,
        );

        assert_eq!(record.file_url.as_deref(), Some(files[0].as_str()));
        assert_eq!(record.files, files);
    }

    #[test]
    fn test_no_files_means_no_file_url() {
        let record = QrCodeRecord::new(
            Uuid::new_v4(),
            "https://example.com".to_string(),
            ContentType::Url,
            Vec::new(),
            "data:image/png;base64,AAAA".to_string(),
            None,
        );

        assert!(record.file_url.is_none());
        assert!(record.files.is_empty());
    }

    #[test]
    fn test_content_type_round_trip() {
        for ty in [
            ContentType::Text,
            ContentType::Url,
            ContentType::Image,
            ContentType::Video,
            ContentType::Audio,
            ContentType::Document,
        ] {
            assert_eq!(ty.as_str().parse::<ContentType>().unwrap(), ty);
        }
        assert!("pdf".parse::<ContentType>().is_err());
    }
}
