use crate::domain::recommendation::TradeAction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub average_price: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub action: TradeAction,
    #[serde(deserialize_with = "crate::domain::string_or_number")]
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Portfolio {
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trade_timestamp_accepts_epoch_millis() {
        let trade: Trade = serde_json::from_value(json!({
            "symbol": "TCS",
            "action": "BUY",
            "timestamp": 1_704_067_200_000_i64
        }))
        .unwrap();
        assert_eq!(trade.timestamp, "1704067200000");
    }

    #[test]
    fn position_accepts_integer_numbers() {
        let position: Position = serde_json::from_value(json!({
            "symbol": "HDFCBANK",
            "quantity": 5,
            "average_price": 1450,
            "pnl": -12
        }))
        .unwrap();
        assert_eq!(position.quantity, 5.0);
        assert_eq!(position.pnl, -12.0);
    }
}
