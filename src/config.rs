use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub storage_dir: String,
    pub public_base_url: String,
    pub max_content_file_bytes: u64,
    pub max_avatar_bytes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/qr_hosting".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key".to_string()),
            storage_dir: env::var("STORAGE_DIR")
                .unwrap_or_else(|_| "./uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            max_content_file_bytes: env::var("MAX_CONTENT_FILE_BYTES")
                .unwrap_or_else(|_| "2147483648".to_string()) // 2GiB
                .parse()?,
            max_avatar_bytes: env::var("MAX_AVATAR_BYTES")
                .unwrap_or_else(|_| "52428800".to_string()) // 50MiB
                .parse()?,
        })
    }
}
