//! What the controllers need from whatever displays them.

use crate::render::analysis::AnalysisPanel;
use crate::render::chart::ChartSpec;
use crate::render::dashboard::DashboardPanel;
use std::sync::Arc;
use uuid::Uuid;

mod buffer;

pub use buffer::{PageBuffer, PageState};

pub trait AnalyzerView: Send + Sync {
    fn alert(&self, message: &str);

    fn set_loading(&self, visible: bool);

    fn show_analysis(&self, panel: AnalysisPanel);
}

/// A live chart instance. Deliberately not `Clone`: the only way to get rid of one is
/// [`ChartSurface::destroy`].
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    id: Uuid,
}

impl ChartHandle {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

pub trait ChartSurface: Send + Sync {
    fn create(&self, spec: &ChartSpec) -> ChartHandle;

    fn destroy(&self, handle: ChartHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDialog {
    pub recommendation_id: String,
    pub html: String,
}

pub trait DashboardView: Send + Sync {
    fn set_refresh_enabled(&self, enabled: bool);

    fn render_dashboard(&self, panel: DashboardPanel);

    fn notify(&self, notification: Notification);

    fn open_confirmation(&self, dialog: ConfirmationDialog);

    fn close_confirmation(&self);
}

impl<T: AnalyzerView + ?Sized> AnalyzerView for Arc<T> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn set_loading(&self, visible: bool) {
        (**self).set_loading(visible)
    }

    fn show_analysis(&self, panel: AnalysisPanel) {
        (**self).show_analysis(panel)
    }
}

impl<T: ChartSurface + ?Sized> ChartSurface for Arc<T> {
    fn create(&self, spec: &ChartSpec) -> ChartHandle {
        (**self).create(spec)
    }

    fn destroy(&self, handle: ChartHandle) {
        (**self).destroy(handle)
    }
}

impl<T: DashboardView + ?Sized> DashboardView for Arc<T> {
    fn set_refresh_enabled(&self, enabled: bool) {
        (**self).set_refresh_enabled(enabled)
    }

    fn render_dashboard(&self, panel: DashboardPanel) {
        (**self).render_dashboard(panel)
    }

    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }

    fn open_confirmation(&self, dialog: ConfirmationDialog) {
        (**self).open_confirmation(dialog)
    }

    fn close_confirmation(&self) {
        (**self).close_confirmation()
    }
}
