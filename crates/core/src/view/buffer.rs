use crate::render::analysis::AnalysisPanel;
use crate::render::chart::ChartSpec;
use crate::render::dashboard::DashboardPanel;
use crate::view::{
    AnalyzerView, ChartHandle, ChartSurface, ConfirmationDialog, DashboardView, Notification,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PageState {
    pub loading: bool,
    pub alerts: Vec<String>,
    pub analysis: Option<AnalysisPanel>,
    pub charts: Vec<(Uuid, ChartSpec)>,
    pub refresh_enabled: bool,
    pub dashboard: Option<DashboardPanel>,
    pub dashboard_renders: usize,
    pub notifications: Vec<Notification>,
    pub confirmation: Option<ConfirmationDialog>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            loading: false,
            alerts: Vec::new(),
            analysis: None,
            charts: Vec::new(),
            refresh_enabled: true,
            dashboard: None,
            dashboard_renders: 0,
            notifications: Vec::new(),
            confirmation: None,
        }
    }
}

/// In-memory view: holds the last rendered state of a page so a shell can serialize it (HTML
/// response, terminal output) whenever it likes.
#[derive(Debug, Default)]
pub struct PageBuffer {
    state: Mutex<PageState>,
}

impl PageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        // The state is plain data; a panic mid-update cannot leave it unusable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().alerts)
    }

    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }
}

impl AnalyzerView for PageBuffer {
    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn set_loading(&self, visible: bool) {
        self.lock().loading = visible;
    }

    fn show_analysis(&self, panel: AnalysisPanel) {
        self.lock().analysis = Some(panel);
    }
}

impl ChartSurface for PageBuffer {
    fn create(&self, spec: &ChartSpec) -> ChartHandle {
        let id = Uuid::new_v4();
        self.lock().charts.push((id, spec.clone()));
        ChartHandle::new(id)
    }

    fn destroy(&self, handle: ChartHandle) {
        let mut state = self.lock();
        let before = state.charts.len();
        state.charts.retain(|(id, _)| *id != handle.id());
        if state.charts.len() == before {
            tracing::warn!(chart_id = %handle.id(), "destroy called for unknown chart");
        }
    }
}

impl DashboardView for PageBuffer {
    fn set_refresh_enabled(&self, enabled: bool) {
        self.lock().refresh_enabled = enabled;
    }

    fn render_dashboard(&self, panel: DashboardPanel) {
        let mut state = self.lock();
        state.dashboard = Some(panel);
        state.dashboard_renders += 1;
    }

    fn notify(&self, notification: Notification) {
        self.lock().notifications.push(notification);
    }

    fn open_confirmation(&self, dialog: ConfirmationDialog) {
        self.lock().confirmation = Some(dialog);
    }

    fn close_confirmation(&self) {
        self.lock().confirmation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::PriceHistory;

    #[test]
    fn charts_are_tracked_until_destroyed() {
        let page = PageBuffer::new();
        let spec = ChartSpec::price_history(&PriceHistory::default());

        let first = page.create(&spec);
        let second = page.create(&spec);
        assert_eq!(page.snapshot().charts.len(), 2);

        page.destroy(first);
        let charts = page.snapshot().charts;
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].0, second.id());
    }

    #[test]
    fn take_drains_messages() {
        let page = PageBuffer::new();
        page.alert("one");
        page.notify(Notification::error("two"));

        assert_eq!(page.take_alerts(), ["one"]);
        assert!(page.take_alerts().is_empty());
        assert_eq!(page.take_notifications(), [Notification::error("two")]);
        assert!(page.snapshot().notifications.is_empty());
    }

    #[test]
    fn refresh_control_starts_enabled() {
        assert!(PageBuffer::new().snapshot().refresh_enabled);
    }
}
