use crate::client::TradingApi;
use crate::domain::contract::ExecuteTradeRequest;
use crate::domain::recommendation::Recommendation;
use crate::error::BusinessError;
use crate::render::dashboard::{render_dashboard, render_trade_summary};
use crate::schedule::PeriodicTask;
use crate::view::{ConfirmationDialog, DashboardView, Notification};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const REFRESH_FAILED: &str = "Failed to refresh data. Please try again.";
const TRADE_EXECUTED: &str = "Trade executed successfully!";
const EXECUTE_FAILED: &str = "Failed to execute trade";
const RECOMMENDATION_GONE: &str = "This recommendation is no longer active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPhase {
    Idle,
    ConfirmPending(String),
    Executing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    Executed,
    UnknownRecommendation,
    NotConfirmed,
}

/// Polling dashboard: recommendations, open positions, recent trades and portfolio value, plus
/// the confirm-then-execute flow for a recommendation.
pub struct DashboardController<A, V> {
    api: A,
    view: V,
    recommendations: Mutex<Vec<Recommendation>>,
    phase: Mutex<DashboardPhase>,
    // Held for the whole fetch-and-render cycle.
    refresh_lock: tokio::sync::Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A, V> DashboardController<A, V>
where
    A: TradingApi,
    V: DashboardView,
{
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            recommendations: Mutex::new(Vec::new()),
            phase: Mutex::new(DashboardPhase::Idle),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn phase(&self) -> DashboardPhase {
        lock(&self.phase).clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_lock.try_lock().is_err()
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        lock(&self.recommendations).clone()
    }

    /// Fetches all four sections concurrently and renders them together. If any request fails,
    /// nothing is rendered and the previous state stays on screen.
    pub async fn refresh(&self) -> anyhow::Result<RefreshOutcome> {
        let Ok(held) = self.refresh_lock.try_lock() else {
            tracing::debug!("refresh already in flight; skipping");
            return Ok(RefreshOutcome::Skipped);
        };
        self.fetch_and_render(held).await?;
        Ok(RefreshOutcome::Updated)
    }

    /// Waits out any refresh in flight, whose data may predate the trade, then runs a fresh one.
    async fn refresh_after_trade(&self) -> anyhow::Result<()> {
        let held = self.refresh_lock.lock().await;
        self.fetch_and_render(held).await
    }

    async fn fetch_and_render(&self, held: tokio::sync::MutexGuard<'_, ()>) -> anyhow::Result<()> {
        let _guard = RefreshGuard::new(held, &self.view);

        let fetched = tokio::try_join!(
            self.api.recommendations(),
            self.api.positions(),
            self.api.recent_trades(),
            self.api.portfolio(),
        );

        let (recommendations, positions, trades, portfolio) = match fetched {
            Ok(sections) => sections,
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "dashboard refresh failed");
                self.view.notify(Notification::error(REFRESH_FAILED));
                return Err(err.context("dashboard refresh failed"));
            }
        };

        let panel = render_dashboard(&recommendations, &positions, &trades, &portfolio);
        tracing::info!(
            recommendations = recommendations.len(),
            positions = positions.len(),
            trades = trades.len(),
            portfolio_value = portfolio.value,
            "dashboard refreshed"
        );

        *lock(&self.recommendations) = recommendations;
        self.view.render_dashboard(panel);
        Ok(())
    }

    pub fn confirm_trade(&self, recommendation_id: &str) -> bool {
        let Some(rec) = self.find(recommendation_id) else {
            tracing::debug!(%recommendation_id, "confirmation requested for unknown recommendation");
            return false;
        };

        {
            let mut phase = lock(&self.phase);
            if let DashboardPhase::Executing(current) = &*phase {
                tracing::debug!(%recommendation_id, executing = %current, "trade in flight; confirmation ignored");
                return false;
            }
            *phase = DashboardPhase::ConfirmPending(rec.id.clone());
        }

        self.view.open_confirmation(ConfirmationDialog {
            recommendation_id: rec.id.clone(),
            html: render_trade_summary(&rec),
        });
        true
    }

    pub fn dismiss_confirmation(&self) {
        let mut phase = lock(&self.phase);
        if let DashboardPhase::Executing(_) = &*phase {
            return;
        }
        *phase = DashboardPhase::Idle;
        drop(phase);
        self.view.close_confirmation();
    }

    /// Executes the recommendation awaiting confirmation. On success the dialog closes and the
    /// dashboard is refreshed once; on failure the dialog stays open.
    pub async fn execute_trade(&self, recommendation_id: &str) -> anyhow::Result<ExecuteOutcome> {
        if self.find(recommendation_id).is_none() {
            tracing::debug!(%recommendation_id, "execute requested for unknown recommendation");
            self.drop_stale_confirmation(recommendation_id);
            return Ok(ExecuteOutcome::UnknownRecommendation);
        }

        let Some(executing) = ExecutingGuard::begin(&self.phase, recommendation_id) else {
            tracing::debug!(%recommendation_id, "execute requested without pending confirmation");
            return Ok(ExecuteOutcome::NotConfirmed);
        };

        let req = ExecuteTradeRequest {
            recommendation_id: recommendation_id.to_string(),
        };

        match self.api.execute_trade(&req).await {
            Ok(res) if res.is_success() => {
                executing.finish();
                tracing::info!(%recommendation_id, "trade executed");
                self.view.notify(Notification::success(TRADE_EXECUTED));
                self.view.close_confirmation();
                if let Err(err) = self.refresh_after_trade().await {
                    tracing::warn!(error = %format!("{err:#}"), "refresh after execution failed");
                }
                Ok(ExecuteOutcome::Executed)
            }
            Ok(res) => {
                let message = res
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| EXECUTE_FAILED.to_string());
                tracing::warn!(%recommendation_id, %message, "trade execution refused");
                self.view.notify(Notification::error(message.clone()));
                Err(BusinessError {
                    operation: "execute-trade",
                    message,
                }
                .into())
            }
            Err(err) => {
                tracing::error!(%recommendation_id, error = %format!("{err:#}"), "trade execution request failed");
                self.view
                    .notify(Notification::error(format!("{EXECUTE_FAILED}: {err}")));
                Err(err)
            }
        }
    }

    // A refresh can drop the recommendation while its dialog is still open.
    fn drop_stale_confirmation(&self, recommendation_id: &str) {
        let mut phase = lock(&self.phase);
        if *phase != DashboardPhase::ConfirmPending(recommendation_id.to_string()) {
            return;
        }
        *phase = DashboardPhase::Idle;
        drop(phase);
        self.view.close_confirmation();
        self.view.notify(Notification::error(RECOMMENDATION_GONE));
    }

    fn find(&self, recommendation_id: &str) -> Option<Recommendation> {
        lock(&self.recommendations)
            .iter()
            .find(|r| r.id == recommendation_id)
            .cloned()
    }
}

impl<A, V> DashboardController<A, V>
where
    A: TradingApi + 'static,
    V: DashboardView + 'static,
{
    pub fn start_auto_refresh(self: &Arc<Self>, period: Duration) -> anyhow::Result<PeriodicTask> {
        let controller = Arc::clone(self);
        PeriodicTask::spawn("dashboard-refresh", period, move || {
            let controller = Arc::clone(&controller);
            async move {
                // Failures are already shown to the user; the next tick tries again.
                if let Err(err) = controller.refresh().await {
                    tracing::warn!(error = %format!("{err:#}"), "scheduled refresh failed");
                }
            }
        })
    }
}

struct RefreshGuard<'a, V: DashboardView> {
    _held: tokio::sync::MutexGuard<'a, ()>,
    view: &'a V,
}

impl<'a, V: DashboardView> RefreshGuard<'a, V> {
    fn new(held: tokio::sync::MutexGuard<'a, ()>, view: &'a V) -> Self {
        view.set_refresh_enabled(false);
        Self { _held: held, view }
    }
}

impl<V: DashboardView> Drop for RefreshGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_refresh_enabled(true);
    }
}

/// `ConfirmPending(id)` -> `Executing(id)`. Unless finished, dropping it (failure, or the caller
/// abandoning the future) puts the phase back to `ConfirmPending(id)`.
struct ExecutingGuard<'a> {
    phase: &'a Mutex<DashboardPhase>,
    recommendation_id: String,
    finished: bool,
}

impl<'a> ExecutingGuard<'a> {
    fn begin(phase: &'a Mutex<DashboardPhase>, recommendation_id: &str) -> Option<Self> {
        let mut current = lock(phase);
        match &*current {
            DashboardPhase::ConfirmPending(id) if id == recommendation_id => {}
            _ => return None,
        }
        *current = DashboardPhase::Executing(recommendation_id.to_string());
        Some(Self {
            phase,
            recommendation_id: recommendation_id.to_string(),
            finished: false,
        })
    }

    fn finish(mut self) {
        self.finished = true;
        *lock(self.phase) = DashboardPhase::Idle;
    }
}

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *lock(self.phase) = DashboardPhase::ConfirmPending(self.recommendation_id.clone());
        }
    }
}
