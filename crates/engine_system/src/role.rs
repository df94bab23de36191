//! Execution roles.

use serde::{Deserialize, Serialize};

/// Which instance of the simulation a context belongs to.
///
/// Only the authoritative instance may create or destroy entities, play
/// sounds, show popups or forward interactions. Observers mirror the
/// authoritative state and run the same read-only checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionRole {
    #[default]
    Authoritative,
    Observer,
}

impl ExecutionRole {
    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        matches!(self, Self::Authoritative)
    }
}

impl std::fmt::Display for ExecutionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authoritative => f.write_str("authoritative"),
            Self::Observer => f.write_str("observer"),
        }
    }
}

impl std::str::FromStr for ExecutionRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authoritative" | "server" => Ok(Self::Authoritative),
            "observer" | "client" => Ok(Self::Observer),
            other => Err(format!("unknown execution role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!("server".parse::<ExecutionRole>(), Ok(ExecutionRole::Authoritative));
        assert_eq!("observer".parse::<ExecutionRole>(), Ok(ExecutionRole::Observer));
        assert!("spectator".parse::<ExecutionRole>().is_err());
    }

    #[test]
    fn test_role_json() {
        let role: ExecutionRole = serde_json::from_str("\"observer\"").unwrap();
        assert!(!role.is_authoritative());
        assert_eq!(role.to_string(), "observer");
    }
}
