//! # Risk Level
//!
//! The fixed risk classification attached to each statutory section. Risk is
//! part of the catalog, never derived from completion status.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DpdpError;

/// Risk classification of a section.
///
/// Ordered `Low < Medium < High` so callers can sort or filter by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Awareness or monitoring obligation only.
    Low,
    /// Procedural obligation with moderate exposure.
    Medium,
    /// Core obligation; failures carry the largest penalties.
    High,
}

impl RiskLevel {
    /// All levels in ascending severity.
    pub fn all() -> &'static [RiskLevel] {
        &[Self::Low, Self::Medium, Self::High]
    }

    /// Lowercase identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Upper-cased identifier used in the exported report.
    pub fn as_upper(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Human-readable badge, e.g. `High Risk`.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Parse the upper-cased report form produced by [`RiskLevel::as_upper()`].
    pub fn from_upper(s: &str) -> Result<Self, DpdpError> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(DpdpError::Parse(format!("unknown risk level: {other:?}"))),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = DpdpError;

    /// Parse the lowercase identifier produced by [`RiskLevel::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DpdpError::Parse(format!("unknown risk level: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for level in RiskLevel::all() {
            let parsed: RiskLevel = level.as_str().parse().unwrap();
            assert_eq!(*level, parsed);
        }
    }

    #[test]
    fn test_upper_roundtrip() {
        for level in RiskLevel::all() {
            assert_eq!(RiskLevel::from_upper(level.as_upper()).unwrap(), *level);
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert!("HIGH".parse::<RiskLevel>().is_err());
        assert!("critical".parse::<RiskLevel>().is_err());
        assert!("".parse::<RiskLevel>().is_err());
        assert!(RiskLevel::from_upper("high").is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for level in RiskLevel::all() {
            let json = serde_json::to_string(level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
        }
    }

    #[test]
    fn test_badges() {
        assert_eq!(RiskLevel::High.badge(), "High Risk");
        assert_eq!(RiskLevel::Medium.badge(), "Medium Risk");
        assert_eq!(RiskLevel::Low.badge(), "Low Risk");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }
}
