use crate::client::TradingApi;
use crate::domain::analysis::AnalysisResult;
use crate::domain::contract::{ExecuteTradeRequest, ExecuteTradeResponse, TradeRequest, TradeResponse};
use crate::domain::portfolio::{Portfolio, Position, Trade};
use crate::domain::recommendation::Recommendation;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub fail: Mutex<Vec<&'static str>>,
    pub recommendations: Mutex<Vec<Recommendation>>,
    pub portfolio_value: Mutex<f64>,
    pub trade_response: Mutex<Option<TradeResponse>>,
    pub execute_response: Mutex<Option<ExecuteTradeResponse>>,
    pub hold_recommendations: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, endpoint: &'static str) {
        self.fail.lock().unwrap().push(endpoint);
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == endpoint)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn enter(&self, endpoint: &'static str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        if self.fail.lock().unwrap().contains(&endpoint) {
            anyhow::bail!("{endpoint}: connection refused");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TradingApi for FakeApi {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<AnalysisResult> {
        self.enter("analyze")?;
        Ok(analysis(symbol))
    }

    async fn place_trade(&self, _req: &TradeRequest) -> anyhow::Result<TradeResponse> {
        self.enter("trade")?;
        self.trade_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("trade: no response scripted"))
    }

    async fn recommendations(&self) -> anyhow::Result<Vec<Recommendation>> {
        self.enter("recommendations")?;
        let hold = self.hold_recommendations.lock().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        Ok(self.recommendations.lock().unwrap().clone())
    }

    async fn positions(&self) -> anyhow::Result<Vec<Position>> {
        self.enter("positions")?;
        Ok(vec![Position {
            symbol: "TCS".to_string(),
            quantity: 2.0,
            average_price: 3400.0,
            pnl: 200.0,
        }])
    }

    async fn recent_trades(&self) -> anyhow::Result<Vec<Trade>> {
        self.enter("recent-trades")?;
        Ok(Vec::new())
    }

    async fn portfolio(&self) -> anyhow::Result<Portfolio> {
        self.enter("portfolio")?;
        Ok(Portfolio {
            value: *self.portfolio_value.lock().unwrap(),
        })
    }

    async fn execute_trade(
        &self,
        _req: &ExecuteTradeRequest,
    ) -> anyhow::Result<ExecuteTradeResponse> {
        self.enter("execute-trade")?;
        self.execute_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("execute-trade: no response scripted"))
    }
}

pub(crate) fn analysis(name: &str) -> AnalysisResult {
    serde_json::from_value(json!({
        "name": name,
        "current_price": 3500,
        "price_history": {"dates": ["2024-01-01"], "prices": [3500]},
        "technical": {"indicators": {"RSI": "55"}, "patterns": []},
        "fundamental": {"P/E": "28"},
        "sentiment": {"market_sentiment": "Neutral", "confidence": 60, "news": []},
        "recommendation": {"signal": "Hold", "confidence": 60, "reason": "Mixed signals"}
    }))
    .unwrap()
}

pub(crate) fn recommendation(id: &str, action: &str, priority: i64) -> Recommendation {
    serde_json::from_value(json!({
        "id": id,
        "symbol": "RELIANCE",
        "action": action,
        "reasons": ["Breakout"],
        "quantity": 5,
        "stop_loss": 2400.0,
        "target": 2650.0,
        "priority": priority,
    }))
    .unwrap()
}
