use std::fmt;

use serde::{Deserialize, Serialize};

/// Threshold above which risk is high
pub const HIGH_RISK_THRESHOLD: f32 = 0.5;

/// Threshold above which risk is moderate
pub const MODERATE_RISK_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f32) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if probability > MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    /// Upper-case label shown on the result badge
    pub fn badge(self) -> String {
        self.as_str().to_uppercase()
    }

    /// Only high risk gets the alarming badge style
    pub fn badge_class(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            _ => "negative",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Risk,
    Protective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

impl FactorValue {
    pub fn text(value: &str) -> Self {
        FactorValue::Text(value.to_string())
    }
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorValue::Number(n) => write!(f, "{:.2}", n),
            FactorValue::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub value: FactorValue,
    pub kind: FactorKind,
    pub comment: String,
}

impl RiskFactor {
    pub fn new(name: &str, value: FactorValue, kind: FactorKind, comment: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            kind,
            comment: comment.to_string(),
        }
    }

    pub fn is_risk(&self) -> bool {
        self.kind == FactorKind::Risk
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub risk_level: RiskLevel,
    /// Probability × 100, two decimals
    pub risk_percentage: String,
    pub risk_factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub title: String,
    pub predicted_probability: f32,
    /// (base − scenario) × 100; positive means risk decreased
    pub delta_percentage_points: f32,
}

impl WhatIfScenario {
    pub fn direction(&self) -> &'static str {
        if self.delta_percentage_points >= 0.0 {
            "↓"
        } else {
            "↑"
        }
    }

    /// Arrow plus magnitude, e.g. "↓10.00"
    pub fn display_delta(&self) -> String {
        format!("{}{:.2}", self.direction(), self.delta_percentage_points.abs())
    }

    pub fn summary(&self) -> String {
        format!(
            "Risk ≈ {:.2}%. Change compared to now: {} {:.2} percentage points.",
            self.predicted_probability * 100.0,
            self.direction(),
            self.delta_percentage_points.abs()
        )
    }
}

/// Logistic coefficient for one feature, for the weight chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub name: String,
    pub weight: f32,
    pub direction: WeightDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightDirection {
    IncreasesRisk,
    DecreasesRisk,
}

impl WeightDirection {
    pub fn from_weight(weight: f32) -> Self {
        if weight >= 0.0 {
            WeightDirection::IncreasesRisk
        } else {
            WeightDirection::DecreasesRisk
        }
    }
}
