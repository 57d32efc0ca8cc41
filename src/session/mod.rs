//! Authenticated session state.

mod cache;

pub use cache::{AuthState, SessionCache};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The authenticated identity/token pair used for authorized calls.
///
/// Mirrors the `data` payload of `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_uuid: String,
    pub token: String,
    /// Naive timestamps (no offset, as Postgres `timestamp` columns serialize)
    /// are read as UTC.
    #[serde(deserialize_with = "utc_or_naive")]
    pub created_at: DateTime<Utc>,
}

fn utc_or_naive<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn parse(created_at: &str) -> Result<Session, serde_json::Error> {
        serde_json::from_value(json!({
            "user_uuid": "u1",
            "token": "tok1",
            "created_at": created_at,
        }))
    }

    #[test]
    fn offset_timestamp_is_converted_to_utc() {
        let session = parse("2024-03-01T14:00:00+02:00").unwrap();
        assert_eq!(
            session.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn naive_timestamp_is_read_as_utc() {
        let session = parse("2024-03-01T12:00:00.123456").unwrap();
        assert_eq!(session.created_at.timestamp(), 1_709_294_400);
        assert_eq!(session.created_at.timestamp_subsec_micros(), 123_456);

        let spaced = parse("2024-03-01 12:00:00").unwrap();
        assert_eq!(spaced.created_at.timestamp(), 1_709_294_400);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn persisted_form_round_trips() {
        let session = parse("2024-03-01T12:00:00.123456").unwrap();
        let restored: Session =
            serde_json::from_str(&serde_json::to_string(&session).unwrap()).unwrap();
        assert_eq!(restored, session);
    }
}
