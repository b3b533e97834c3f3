use chrono::{DateTime, Duration, Utc};
use tokio::time::interval;

use crate::database::{queries::QrCodeQueries, Database};

/// Validity window applied to every record at creation.
pub const VALIDITY_SECONDS: i64 = 2 * 60 * 60;

/// How often the sweeper deletes expired rows.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

pub fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::seconds(VALIDITY_SECONDS)
}

/// A record is expired once the wall clock reaches its expiry timestamp.
/// The state is derived, never persisted.
pub fn is_expired(expiry_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expiry_time
}

/// Minutes left before expiry, rounded up. Zero once expired.
pub fn remaining_minutes(expiry_time: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining_seconds = (expiry_time - now).num_seconds();
    if remaining_seconds <= 0 {
        return 0;
    }
    (remaining_seconds + 59) / 60
}

/// Periodically deletes rows past their expiry timestamp. Expired rows stay
/// readable (flagged by the listing) until a tick removes them; the sweep may
/// race a user's own delete, which is a row-level no-op.
pub async fn run_sweeper(database: Database) {
    let mut ticker = interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        match QrCodeQueries::delete_expired(database.pool(), Utc::now()).await {
            Ok(0) => {}
            Ok(deleted) => tracing::info!(deleted, "Swept expired QR codes"),
            Err(e) => tracing::error!("Expiry sweep failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_two_hours_after_creation() {
        let created = Utc::now();
        assert_eq!(expiry_for(created) - created, Duration::hours(2));
    }

    #[test]
    fn test_expired_exactly_at_expiry_time() {
        let expiry = Utc::now();
        assert!(is_expired(expiry, expiry));
        assert!(is_expired(expiry, expiry + Duration::seconds(1)));
        assert!(!is_expired(expiry, expiry - Duration::seconds(1)));
    }

    #[test]
    fn test_remaining_minutes_rounds_up() {
        let now = Utc::now();
        assert_eq!(remaining_minutes(now + Duration::seconds(1), now), 1);
        assert_eq!(remaining_minutes(now + Duration::seconds(60), now), 1);
        assert_eq!(remaining_minutes(now + Duration::seconds(61), now), 2);
        assert_eq!(remaining_minutes(now + Duration::hours(2), now), 120);
    }

    #[test]
    fn test_remaining_minutes_zero_once_expired() {
        let now = Utc::now();
        assert_eq!(remaining_minutes(now, now), 0);
        assert_eq!(remaining_minutes(now - Duration::minutes(5), now), 0);
    }
}
