use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, Utc};

/// What happens when an approval targets a date that already has a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Last write wins: the new approval replaces the existing prompt.
    Replace,
    /// The existing prompt stays; the new approval is answered with a conflict.
    Reject,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(ConflictPolicy::Replace),
            "reject" => Ok(ConflictPolicy::Reject),
            other => Err(format!(
                "APPROVAL_CONFLICT_POLICY must be 'replace' or 'reject', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub auth_jwt_secret: String,
    pub groq_api_key: String,
    /// Reference zone for every "today" computation (calendar, gate, streaks).
    pub service_utc_offset: FixedOffset,
    pub allow_multiple_per_day: bool,
    pub approval_conflict_policy: ConflictPolicy,
    pub generation_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let auth_jwt_secret =
            env::var("AUTH_JWT_SECRET").map_err(|_| "AUTH_JWT_SECRET must be set".to_string())?;

        let groq_api_key =
            env::var("GROQ_API_KEY").map_err(|_| "GROQ_API_KEY must be set".to_string())?;

        let raw_offset =
            env::var("SERVICE_UTC_OFFSET").unwrap_or_else(|_| "+00:00".to_string());
        let service_utc_offset = raw_offset.parse::<FixedOffset>().map_err(|_| {
            format!(
                "SERVICE_UTC_OFFSET must be a fixed offset like +02:00, got '{}'",
                raw_offset
            )
        })?;

        let raw_multiple =
            env::var("ALLOW_MULTIPLE_PER_DAY").unwrap_or_else(|_| "true".to_string());
        let allow_multiple_per_day = raw_multiple.parse::<bool>().map_err(|_| {
            format!(
                "ALLOW_MULTIPLE_PER_DAY must be 'true' or 'false', got '{}'",
                raw_multiple
            )
        })?;

        let approval_conflict_policy = env::var("APPROVAL_CONFLICT_POLICY")
            .unwrap_or_else(|_| "replace".to_string())
            .parse::<ConflictPolicy>()?;

        let raw_timeout =
            env::var("GENERATION_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let generation_timeout_secs = raw_timeout.parse::<u64>().map_err(|_| {
            format!(
                "GENERATION_TIMEOUT_SECS must be a positive integer, got '{}'",
                raw_timeout
            )
        })?;

        Ok(Self {
            database_url,
            auth_jwt_secret,
            groq_api_key,
            service_utc_offset,
            allow_multiple_per_day,
            approval_conflict_policy,
            generation_timeout_secs,
        })
    }

    /// Current calendar date in the service reference zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.service_utc_offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_policy_parses_both_values() {
        assert_eq!("replace".parse::<ConflictPolicy>(), Ok(ConflictPolicy::Replace));
        assert_eq!("REJECT".parse::<ConflictPolicy>(), Ok(ConflictPolicy::Reject));
    }

    #[test]
    fn test_conflict_policy_rejects_unknown_values() {
        assert!("merge".parse::<ConflictPolicy>().is_err());
    }

    #[test]
    fn test_offset_strings_parse_as_fixed_offsets() {
        assert!("+00:00".parse::<FixedOffset>().is_ok());
        assert!("-03:00".parse::<FixedOffset>().is_ok());
        assert!("utc-ish".parse::<FixedOffset>().is_err());
    }
}
