//! Keep-alive policy for errand instances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ErrandError;

/// Whether an errand's instances outlive the errand run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepAlive {
    /// Keep the instances after the run.
    Always,
    /// Delete the instances after the run. Default.
    #[default]
    Never,
    /// Keep the instances unless the run re-provisioned them.
    IfUnchanged,
}

impl KeepAlive {
    /// Whether the instances are kept after the run.
    pub fn keeps(self, changes_exist: bool) -> bool {
        match self {
            KeepAlive::Always => true,
            KeepAlive::Never => false,
            KeepAlive::IfUnchanged => !changes_exist,
        }
    }
}

impl From<bool> for KeepAlive {
    fn from(keep: bool) -> Self {
        if keep {
            KeepAlive::Always
        } else {
            KeepAlive::Never
        }
    }
}

impl FromStr for KeepAlive {
    type Err = ErrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "true" => Ok(KeepAlive::Always),
            "never" | "false" => Ok(KeepAlive::Never),
            "if-unchanged" | "if_unchanged" => Ok(KeepAlive::IfUnchanged),
            other => Err(ErrandError::InvalidKeepAlive(other.to_string())),
        }
    }
}

impl fmt::Display for KeepAlive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeepAlive::Always => "always",
            KeepAlive::Never => "never",
            KeepAlive::IfUnchanged => "if-unchanged",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_decision() {
        assert!(KeepAlive::Always.keeps(true));
        assert!(KeepAlive::Always.keeps(false));
        assert!(!KeepAlive::Never.keeps(false));
        assert!(!KeepAlive::Never.keeps(true));
        assert!(KeepAlive::IfUnchanged.keeps(false));
        assert!(!KeepAlive::IfUnchanged.keeps(true));
    }

    #[test]
    fn boolean_flag_maps_to_always_or_never() {
        assert_eq!(KeepAlive::from(true), KeepAlive::Always);
        assert_eq!(KeepAlive::from(false), KeepAlive::Never);
        assert_eq!(KeepAlive::default(), KeepAlive::Never);
    }

    #[test]
    fn parses_and_displays() {
        for policy in [KeepAlive::Always, KeepAlive::Never, KeepAlive::IfUnchanged] {
            assert_eq!(policy.to_string().parse::<KeepAlive>().unwrap(), policy);
        }
        assert_eq!(" Always ".parse::<KeepAlive>().unwrap(), KeepAlive::Always);
        assert!(matches!(
            "maybe".parse::<KeepAlive>(),
            Err(ErrandError::InvalidKeepAlive(s)) if s == "maybe"
        ));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&KeepAlive::IfUnchanged).unwrap();
        assert_eq!(json, "\"if-unchanged\"");
        let back: KeepAlive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, KeepAlive::IfUnchanged);
    }
}
