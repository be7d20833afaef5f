use crate::client::TradingApi;
use crate::domain::analysis::AnalysisResult;
use crate::domain::contract::{parse_quantity, parse_symbol, TradeRequest};
use crate::domain::recommendation::TradeAction;
use crate::error::{BusinessError, UserInputError};
use crate::render::analysis::render_analysis;
use crate::render::chart::ChartSpec;
use crate::view::{AnalyzerView, ChartHandle, ChartSurface};

const ANALYZE_FAILED: &str = "Error analyzing stock. Please try again.";
const TRADE_FAILED: &str = "Error executing trade. Please try again.";

pub struct AnalyzerController<A, V, C> {
    api: A,
    view: V,
    charts: C,
    chart: Option<ChartHandle>,
    symbol: Option<String>,
}

impl<A, V, C> AnalyzerController<A, V, C>
where
    A: TradingApi,
    V: AnalyzerView,
    C: ChartSurface,
{
    pub fn new(api: A, view: V, charts: C) -> Self {
        Self {
            api,
            view,
            charts,
            chart: None,
            symbol: None,
        }
    }

    pub fn analyzed_symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub async fn analyze(&mut self, input: &str) -> anyhow::Result<()> {
        let symbol = match parse_symbol(input) {
            Ok(symbol) => symbol,
            Err(err) => return Err(self.reject(err)),
        };

        let fetched = {
            let _loading = LoadingGuard::show(&self.view);
            self.api.analyze(&symbol).await
        };

        let result = match fetched {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(%symbol, error = %format!("{err:#}"), "analysis request failed");
                self.view.alert(ANALYZE_FAILED);
                return Err(err.context(format!("analyze {symbol} failed")));
            }
        };

        tracing::info!(%symbol, name = %result.name, "analysis loaded");
        self.render_result(&result);
        self.symbol = Some(symbol);
        Ok(())
    }

    pub fn render_result(&mut self, result: &AnalysisResult) {
        let panel = render_analysis(result);
        self.replace_chart(&panel.chart);
        self.view.show_analysis(panel);
    }

    fn replace_chart(&mut self, spec: &ChartSpec) {
        if let Some(previous) = self.chart.take() {
            self.charts.destroy(previous);
        }
        self.chart = Some(self.charts.create(spec));
    }

    pub async fn submit_trade(&self, action: TradeAction, quantity_input: &str) -> anyhow::Result<()> {
        let Some(symbol) = self.symbol.clone() else {
            return Err(self.reject(UserInputError::NoSymbolAnalyzed));
        };
        let quantity = match parse_quantity(quantity_input) {
            Ok(quantity) => quantity,
            Err(err) => return Err(self.reject(err)),
        };

        let req = TradeRequest {
            symbol,
            action,
            quantity,
        };

        match self.api.place_trade(&req).await {
            Ok(res) if res.success => {
                tracing::info!(symbol = %req.symbol, %action, quantity, "order placed");
                self.view
                    .alert(&format!("{action} order placed successfully!"));
                Ok(())
            }
            Ok(res) => {
                let message = res
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "order was not accepted".to_string());
                tracing::warn!(symbol = %req.symbol, %action, %message, "order rejected");
                self.view.alert(&format!("Error: {message}"));
                Err(BusinessError {
                    operation: "trade",
                    message,
                }
                .into())
            }
            Err(err) => {
                tracing::error!(symbol = %req.symbol, %action, error = %format!("{err:#}"), "order request failed");
                self.view.alert(TRADE_FAILED);
                Err(err)
            }
        }
    }

    fn reject(&self, err: UserInputError) -> anyhow::Error {
        self.view.alert(&err.to_string());
        err.into()
    }
}

struct LoadingGuard<'a, V: AnalyzerView> {
    view: &'a V,
}

impl<'a, V: AnalyzerView> LoadingGuard<'a, V> {
    fn show(view: &'a V) -> Self {
        view.set_loading(true);
        Self { view }
    }
}

impl<V: AnalyzerView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_loading(false);
    }
}
