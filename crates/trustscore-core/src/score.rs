//! Score clamping and banding for display.

use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

/// Clamp any score to the displayable `0..=100` range.
pub fn display_score(raw: i128) -> u8 {
    raw.clamp(0, i128::from(MAX_SCORE)) as u8
}

/// Qualitative band shown next to the score ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score.min(MAX_SCORE) {
            80..=100 => ScoreBand::Excellent,
            60..=79 => ScoreBand::Good,
            40..=59 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Poor",
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            ScoreBand::Excellent | ScoreBand::Good => RiskLevel::Low,
            ScoreBand::Fair => RiskLevel::Medium,
            ScoreBand::Poor => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}
