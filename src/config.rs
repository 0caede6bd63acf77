use patro::{Anchor, DEFAULT_ANCHOR};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_LOG_LEVEL: Level = Level::WARN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_before_long_break: u32,
    pub log_level: String,
    /// Overrides the built-in AD/BS anchor pair when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("{0} must be at least one minute")]
    ZeroDuration(&'static str),
    #[error("sessions_before_long_break must be at least 1")]
    ZeroInterval,
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnknownLogLevel(String),
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
            log_level: DEFAULT_LOG_LEVEL.to_string().to_lowercase(),
            anchor: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, minutes) in [
            ("focus_minutes", self.focus_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if minutes == 0 {
                return Err(SettingsError::ZeroDuration(name));
            }
        }
        if self.sessions_before_long_break == 0 {
            return Err(SettingsError::ZeroInterval);
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, SettingsError> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| SettingsError::UnknownLogLevel(self.log_level.clone()))
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor.unwrap_or(DEFAULT_ANCHOR)
    }

    pub fn focus(&self) -> Duration {
        minutes(self.focus_minutes)
    }

    pub fn short_break(&self) -> Duration {
        minutes(self.short_break_minutes)
    }

    pub fn long_break(&self) -> Duration {
        minutes(self.long_break_minutes)
    }
}

fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}
