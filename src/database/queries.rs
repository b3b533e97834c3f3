use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{AuthAccount, Gender, QrCodeRecord, UserProfile};

pub struct UserQueries;

impl UserQueries {
    /// Creates the credential row and the profile row together. Both share
    /// the same id; a failure on either side rolls the whole registration
    /// back, so no orphaned identity can remain.
    pub async fn create_account_with_profile(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        gender: Gender,
    ) -> Result<UserProfile> {
        let mut tx = pool.begin().await?;

        let account_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO auth_accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (id, name, email, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, gender, avatar_url, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(name)
        .bind(email)
        .bind(gender.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }

    pub async fn find_account_by_email(pool: &PgPool, email: &str) -> Result<Option<AuthAccount>> {
        let account = sqlx::query_as::<_, AuthAccount>(
            "SELECT id, email, password_hash, created_at FROM auth_accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    pub async fn find_profile_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, gender, avatar_url, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Updates the mutable profile fields. Email is immutable after creation.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        name: &str,
        gender: Gender,
    ) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users SET name = $2, gender = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, gender, avatar_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(gender.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    pub async fn update_avatar_url(pool: &PgPool, id: Uuid, avatar_url: &str) -> Result<()> {
        sqlx::query("UPDATE users SET avatar_url = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(avatar_url)
            .execute(pool)
            .await?;

        Ok(())
    }
}

pub struct QrCodeQueries;

impl QrCodeQueries {
    pub async fn insert(pool: &PgPool, record: &QrCodeRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO qr_codes
                (id, user_id, content, content_type, file_url, files, qr_image, notes, created_at, expiry_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.content)
        .bind(record.content_type.as_str())
        .bind(&record.file_url)
        .bind(&record.files)
        .bind(&record.qr_image)
        .bind(&record.notes)
        .bind(record.created_at)
        .bind(record.expiry_time)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<QrCodeRecord>> {
        let records = sqlx::query_as::<_, QrCodeRecord>(
            r#"
            SELECT id, user_id, content, content_type, file_url, files, qr_image, notes, created_at, expiry_time
            FROM qr_codes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<Option<QrCodeRecord>> {
        let record = sqlx::query_as::<_, QrCodeRecord>(
            r#"
            SELECT id, user_id, content, content_type, file_url, files, qr_image, notes, created_at, expiry_time
            FROM qr_codes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Sets or replaces the free-text note. Keyed by record id, scoped to the
    /// owner; returns whether a row matched.
    pub async fn update_notes(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        notes: &str,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE qr_codes SET notes = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .bind(notes)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Owner-scoped delete. Deleting an already-deleted row is a no-op, which
    /// keeps the sweep and explicit deletes safe to race.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM qr_codes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes every row whose expiry timestamp is strictly before `before`.
    pub async fn delete_expired(pool: &PgPool, before: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE expiry_time < $1")
            .bind(before)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
