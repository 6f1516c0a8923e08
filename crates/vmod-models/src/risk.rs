//! Risk scoring shared by the symbols and summary sections.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse risk level derived from a 0.0-1.0 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a 0.0-1.0 risk score to a level (<0.3 low, <0.7 medium, else high).
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Self::Low
        } else if score < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Human-readable moderation label for the level.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Safe",
            Self::Medium => "Potentially unsafe",
            Self::High => "Unsafe",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Risk summary attached to the symbols section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    /// Aggregate risk score in 0.0-1.0.
    pub overall_risk: f64,
    /// Coarse level derived from the score.
    pub risk_level: RiskLevel,
    /// Moderation label for the level.
    pub risk_label: String,
}

impl RiskAnalysis {
    /// Build a risk analysis from a 0.0-1.0 score.
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 1.0);
        let level = RiskLevel::from_score(score);
        Self {
            overall_risk: score,
            risk_level: level,
            risk_label: level.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_from_score_clamps() {
        let r = RiskAnalysis::from_score(3.5);
        assert_eq!(r.overall_risk, 1.0);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert_eq!(r.risk_label, "Unsafe");
    }
}
