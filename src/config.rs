use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::data::{Person, PersonId};
use crate::error::{Error, Result};

pub const ADDR_ENV: &str = "LESSON_MATCH_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const MINUTES_PER_DAY: u32 = 24 * 60;

/// How participants are told apart when tracking who is booked when.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityPolicy {
    /// Records with the same trimmed name are the same person.
    #[default]
    MergeByName,
    /// Only records from the same source row are the same person.
    ById,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    Name(String),
    Id(PersonId),
}

impl IdentityPolicy {
    pub fn key(self, person: &Person) -> IdentityKey {
        match self {
            IdentityPolicy::MergeByName => IdentityKey::Name(person.name.trim().to_string()),
            IdentityPolicy::ById => IdentityKey::Id(person.id),
        }
    }
}

/// Settings for one matching run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    /// Number of assignment rounds; round `k` targets `k` lessons per
    /// student and instrument.
    pub max_rounds_per_instrument: u32,
    /// Accepted for compatibility. Drums never share a slot with other
    /// instruments whichever way this is set.
    pub drum_exclusive: bool,
    pub allow_split: bool,
    pub split_interval_minutes: u32,
    pub max_group_size: usize,
    pub max_drum_per_slot: usize,
    pub prefer_continuous_time: bool,
    /// From the second lesson on, try the teacher the student already has
    /// for that instrument before the others.
    pub prefer_same_teacher: bool,
    pub identity_policy: IdentityPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_rounds_per_instrument: 1,
            drum_exclusive: false,
            allow_split: false,
            split_interval_minutes: 30,
            max_group_size: 2,
            max_drum_per_slot: 1,
            prefer_continuous_time: false,
            prefer_same_teacher: false,
            identity_policy: IdentityPolicy::MergeByName,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds_per_instrument == 0 {
            return Err(Error::invalid("maxRoundsPerInstrument must be at least 1"));
        }
        if self.max_group_size == 0 {
            return Err(Error::invalid("maxGroupSize must be at least 1"));
        }
        if self.max_drum_per_slot == 0 {
            return Err(Error::invalid("maxDrumPerSlot must be at least 1"));
        }
        if self.split_interval_minutes == 0 || self.split_interval_minutes > MINUTES_PER_DAY {
            return Err(Error::invalid(format!(
                "splitIntervalMinutes must be between 1 and {MINUTES_PER_DAY}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw
            .parse()
            .map_err(|e| Error::invalid(format!("{ADDR_ENV}='{raw}' is not a socket address: {e}")))?;
        Ok(Self { addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Instrument;

    #[test]
    fn omitted_fields_take_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{"maxGroupSize": 3, "allowSplit": true}"#).unwrap();
        assert_eq!(config.max_group_size, 3);
        assert!(config.allow_split);
        assert_eq!(config.split_interval_minutes, 30);
        assert_eq!(config.max_rounds_per_instrument, 1);
        assert_eq!(config.identity_policy, IdentityPolicy::MergeByName);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(MatchConfig::default().validate().is_ok());
        let config = MatchConfig {
            max_group_size: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
        let config = MatchConfig {
            max_rounds_per_instrument: 0,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn split_interval_is_bounded_by_a_day() {
        let config = MatchConfig {
            allow_split: true,
            split_interval_minutes: u32::MAX,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
        let config = MatchConfig {
            split_interval_minutes: 1440,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn identity_keys_follow_policy() {
        let a = Person::new(0, "Mio ", Instrument::Bass);
        let b = Person::new(1, "Mio", Instrument::Bass);
        let by_name = IdentityPolicy::MergeByName;
        assert_eq!(by_name.key(&a), by_name.key(&b));
        assert_ne!(IdentityPolicy::ById.key(&a), IdentityPolicy::ById.key(&b));
    }
}
