use crate::domain::analysis::AnalysisResult;
use crate::domain::contract::{ExecuteTradeRequest, ExecuteTradeResponse, TradeRequest, TradeResponse};
use crate::domain::portfolio::{Portfolio, Position, Trade};
use crate::domain::recommendation::Recommendation;
use std::sync::Arc;

pub mod http;

pub use http::HttpTradingApi;

/// The analysis/trading backend behind `/api/*`.
#[async_trait::async_trait]
pub trait TradingApi: Send + Sync {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<AnalysisResult>;

    async fn place_trade(&self, req: &TradeRequest) -> anyhow::Result<TradeResponse>;

    async fn recommendations(&self) -> anyhow::Result<Vec<Recommendation>>;

    async fn positions(&self) -> anyhow::Result<Vec<Position>>;

    async fn recent_trades(&self) -> anyhow::Result<Vec<Trade>>;

    async fn portfolio(&self) -> anyhow::Result<Portfolio>;

    async fn execute_trade(
        &self,
        req: &ExecuteTradeRequest,
    ) -> anyhow::Result<ExecuteTradeResponse>;
}

#[async_trait::async_trait]
impl<T: TradingApi + ?Sized> TradingApi for Arc<T> {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<AnalysisResult> {
        (**self).analyze(symbol).await
    }

    async fn place_trade(&self, req: &TradeRequest) -> anyhow::Result<TradeResponse> {
        (**self).place_trade(req).await
    }

    async fn recommendations(&self) -> anyhow::Result<Vec<Recommendation>> {
        (**self).recommendations().await
    }

    async fn positions(&self) -> anyhow::Result<Vec<Position>> {
        (**self).positions().await
    }

    async fn recent_trades(&self) -> anyhow::Result<Vec<Trade>> {
        (**self).recent_trades().await
    }

    async fn portfolio(&self) -> anyhow::Result<Portfolio> {
        (**self).portfolio().await
    }

    async fn execute_trade(
        &self,
        req: &ExecuteTradeRequest,
    ) -> anyhow::Result<ExecuteTradeResponse> {
        (**self).execute_trade(req).await
    }
}
