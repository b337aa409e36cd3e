//! All possible UI actions. Actions are the sole mechanism for state mutation.

use dialdeck_api::{CallStatus, Campaign, CampaignCreate, CampaignId, GlobalMetrics};
use dialdeck_core::{CallPager, SimulationConfig, SimulationProgress};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient status-line notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data snapshots (from the session bridge) ──────────────────
    CampaignsUpdated(Vec<Campaign>),
    MetricsUpdated(GlobalMetrics),
    SelectionUpdated(Option<Campaign>),
    CallsUpdated(CallPager),

    // ── Selection & call-list cursor ──────────────────────────────
    SelectCampaign(Box<Campaign>),
    ClearSelection,
    NextPage,
    PrevPage,
    SetCallFilter(Option<CallStatus>),
    RefreshData,

    // ── Campaign commands ─────────────────────────────────────────
    StartCampaign(CampaignId),
    PauseCampaign(CampaignId),
    CancelCampaign(CampaignId),
    CreateCampaign(Box<CampaignCreate>),
    TriggerCall(String),

    // ── Modals ────────────────────────────────────────────────────
    OpenCreateForm,
    OpenSimulation,
    OpenQuickCall,
    CloseModal,

    // ── Bulk simulation ───────────────────────────────────────────
    RunSimulation(SimulationConfig),
    SimulationProgress(SimulationProgress),
    SimulationFinished(String),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
