use crate::domain::MetricList;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/analyze/{symbol}`. Replaced wholesale on every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub name: String,
    pub current_price: f64,
    pub price_history: PriceHistory,
    pub technical: Option<TechnicalAnalysis>,
    pub fundamental: Option<MetricList>,
    pub sentiment: Option<SentimentAnalysis>,
    pub recommendation: Option<Signal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    #[serde(default)]
    pub indicators: MetricList,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub market_sentiment: String,
    pub confidence: f64,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub sentiment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub signal: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self.signal.trim().to_ascii_lowercase().as_str() {
            "buy" => SignalKind::Buy,
            "sell" => SignalKind::Sell,
            _ => SignalKind::Neutral,
        }
    }
}
