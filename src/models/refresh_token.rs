use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One issued refresh secret. The secret itself is never stored, only its
/// sha256 digest; `replaced_by_token_hash` links a rotated-away record to its
/// successor so that reuse of the old secret can be detected.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub created_by_ip: Option<String>,
    pub revoked: Option<DateTime<Utc>>,
    pub revoked_by_ip: Option<String>,
    pub replaced_by_token_hash: Option<String>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    /// Usable for rotation: neither revoked nor expired. Revoked and expired
    /// are not mutually exclusive in storage; this is the single source of
    /// truth for "usable".
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked.is_none() && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(revoked: Option<DateTime<Utc>>, expires: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            id: 1,
            user_id: 1,
            token_hash: "h".into(),
            created: Utc::now() - Duration::days(1),
            expires,
            created_by_ip: None,
            revoked,
            revoked_by_ip: None,
            replaced_by_token_hash: None,
        }
    }

    #[test]
    fn active_requires_unrevoked_and_unexpired() {
        let now = Utc::now();
        assert!(record(None, now + Duration::days(1)).is_active(now));
        assert!(!record(Some(now), now + Duration::days(1)).is_active(now));
        assert!(!record(None, now - Duration::seconds(1)).is_active(now));
        // boundary: expires exactly now counts as expired
        assert!(!record(None, now).is_active(now));
    }
}
