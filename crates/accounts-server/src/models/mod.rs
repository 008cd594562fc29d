//! Database models and their API projections

use accounts_common::format_display;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A live row of the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never the plain password
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Replacement values for an existing user
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub password_hash: String,
}

/// Listing filter understood by every [`crate::db::UserStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Substring match on username
    pub username: Option<String>,
}

/// A user row enriched for the listing endpoint
///
/// Timestamps are pre-rendered with [`accounts_common::DISPLAY_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub say_hello: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserInfo {
    /// Build the view for `record` around a freshly derived short id
    pub fn from_record(record: UserRecord, short_id: &str) -> Self {
        Self {
            id: record.id,
            say_hello: format!("Hello {}", short_id),
            created_at: format_display(&record.created_at),
            updated_at: format_display(&record.updated_at),
            username: record.username,
            password: record.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_info_from_record() {
        let ts = Utc.with_ymd_and_hms(2018, 5, 28, 0, 25, 33).unwrap();
        let record = UserRecord {
            id: 7,
            username: "admin".to_string(),
            password: "$argon2id$stub".to_string(),
            created_at: ts,
            updated_at: ts,
        };

        let info = UserInfo::from_record(record, "EnqntiSig");
        assert_eq!(info.id, 7);
        assert_eq!(info.say_hello, "Hello EnqntiSig");
        assert_eq!(info.created_at, "2018-05-28 00:25:33");
        assert_eq!(info.updated_at, "2018-05-28 00:25:33");
    }

    #[test]
    fn test_user_info_serializes_camel_case() {
        let info = UserInfo {
            id: 1,
            username: "bob".to_string(),
            say_hello: "Hello X1".to_string(),
            password: "hash".to_string(),
            created_at: "2018-05-28 00:25:33".to_string(),
            updated_at: "2018-05-28 00:25:33".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["sayHello"], "Hello X1");
        assert_eq!(json["createdAt"], "2018-05-28 00:25:33");
        assert!(json.get("say_hello").is_none());
    }
}
