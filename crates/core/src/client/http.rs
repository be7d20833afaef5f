use crate::client::TradingApi;
use crate::config::Settings;
use crate::domain::analysis::AnalysisResult;
use crate::domain::contract::{ExecuteTradeRequest, ExecuteTradeResponse, TradeRequest, TradeResponse};
use crate::domain::portfolio::{Portfolio, Position, Trade};
use crate::domain::recommendation::Recommendation;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HttpTradingApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTradingApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_api_base_url()?;

        // No timeout unless configured: a hung backend hangs the caller.
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build trading api http client")?;

        Self::new(http, base_url)
    }

    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid api base url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "api base url must be hierarchical (got {base_url})"
        );
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("api base url cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        let res = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read GET {path} response"))?;

        if !status.is_success() {
            anyhow::bail!("GET {path} returned HTTP {status}: {text}");
        }

        // Decode straight from text so map key order survives.
        serde_json::from_str::<T>(&text)
            .with_context(|| format!("GET {path} returned an unexpected body: {text}"))
    }

    /// Business endpoints report refusals in the body, sometimes with a non-2xx status. Any body
    /// that decodes is returned; only an undecodable one is an error.
    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read POST {path} response"))?;

        match serde_json::from_str::<T>(&text) {
            Ok(parsed) => {
                if !status.is_success() {
                    tracing::warn!(%path, %status, "backend answered with an error status");
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => {
                anyhow::bail!("POST {path} returned HTTP {status}: {text}")
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("POST {path} returned an unexpected body: {text}"))),
        }
    }
}

#[async_trait::async_trait]
impl TradingApi for HttpTradingApi {
    async fn analyze(&self, symbol: &str) -> Result<AnalysisResult> {
        self.get_json(&["analyze", symbol]).await
    }

    async fn place_trade(&self, req: &TradeRequest) -> Result<TradeResponse> {
        self.post_json(&["trade"], req).await
    }

    async fn recommendations(&self) -> Result<Vec<Recommendation>> {
        self.get_json(&["recommendations"]).await
    }

    async fn positions(&self) -> Result<Vec<Position>> {
        self.get_json(&["positions"]).await
    }

    async fn recent_trades(&self) -> Result<Vec<Trade>> {
        self.get_json(&["recent-trades"]).await
    }

    async fn portfolio(&self) -> Result<Portfolio> {
        self.get_json(&["portfolio"]).await
    }

    async fn execute_trade(&self, req: &ExecuteTradeRequest) -> Result<ExecuteTradeResponse> {
        self.post_json(&["execute-trade"], req).await
    }
}
