use crate::domain::analysis::PriceHistory;
use serde_json::{json, Value};

const PRICE_TITLE: &str = "Price History";
const PRICE_SERIES: &str = "Price";
const PRICE_COLOR: &str = "rgb(75, 192, 192)";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub series_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: String,
}

impl ChartSpec {
    pub fn price_history(history: &PriceHistory) -> Self {
        if history.dates.len() != history.prices.len() {
            tracing::warn!(
                dates = history.dates.len(),
                prices = history.prices.len(),
                "price history length mismatch; chart will be truncated"
            );
        }
        let points = history.dates.len().min(history.prices.len());

        Self {
            title: PRICE_TITLE.to_string(),
            series_label: PRICE_SERIES.to_string(),
            labels: history.dates[..points].to_vec(),
            values: history.prices[..points].to_vec(),
            color: PRICE_COLOR.to_string(),
        }
    }

    pub fn to_config(&self) -> Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "label": self.series_label,
                    "data": self.values,
                    "borderColor": self.color,
                    "tension": 0.1,
                }],
            },
            "options": {
                "responsive": true,
                "plugins": {
                    "title": {"display": true, "text": self.title},
                },
                "scales": {
                    "y": {"beginAtZero": false},
                },
            },
        })
    }
}
