use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell", alias = "Sell")]
    Sell,
}

impl TradeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            _ => anyhow::bail!("unknown trade action: {s:?} (expected buy or sell)"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(deserialize_with = "crate::domain::string_or_number")]
    pub id: String,
    pub symbol: String,
    pub action: TradeAction,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub quantity: u64,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    #[serde(default)]
    pub priority: i64,
}

impl Recommendation {
    pub fn priority_tier(&self) -> PriorityTier {
        PriorityTier::from_priority(self.priority)
    }

    /// Zero is treated as "not set", the same as absent.
    pub fn stop_loss(&self) -> Option<f64> {
        self.stop_loss.filter(|v| *v != 0.0)
    }

    pub fn target(&self) -> Option<f64> {
        self.target.filter(|v| *v != 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_priority(priority: i64) -> Self {
        if priority >= 4 {
            PriorityTier::High
        } else if priority >= 2 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        }
    }
}
