//! Enabled/disabled flag shared by every managed record.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Record status, encoded on the wire as `1` (enabled) / `0` (disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    Disabled,
    #[default]
    Enabled,
}

impl Status {
    pub fn is_enabled(self) -> bool {
        self == Status::Enabled
    }

    /// The opposite status (what a toggle switch sends).
    pub fn toggled(self) -> Self {
        match self {
            Status::Enabled => Status::Disabled,
            Status::Disabled => Status::Enabled,
        }
    }
}

impl From<bool> for Status {
    fn from(enabled: bool) -> Self {
        if enabled { Status::Enabled } else { Status::Disabled }
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        match value {
            Status::Disabled => 0,
            Status::Enabled => 1,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Disabled),
            1 => Ok(Status::Enabled),
            other => Err(DomainError::validation("status", format!("unknown status {other}"))),
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Status::Enabled => write!(f, "enabled"),
            Status::Disabled => write!(f, "disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_encoding_is_numeric() {
        assert_eq!(serde_json::to_string(&Status::Enabled).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Status>("0").unwrap(), Status::Disabled);
        assert!(serde_json::from_str::<Status>("2").is_err());
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(Status::Enabled.toggled(), Status::Disabled);
        assert_eq!(Status::from(false), Status::Disabled);
    }
}
