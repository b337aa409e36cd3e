// ── Live synchronizer ──
//
// Keeps the console's view of server-owned data (campaigns, global
// metrics, the selected campaign's call page) fresh via fixed-cadence
// reconciliation loops. Every fetch result is a full-replacement
// snapshot: nothing held locally is authoritative between polls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dialdeck_api::{
    Call, CallStatus, Campaign, CampaignCreate, CampaignId, ConsoleClient, GlobalMetrics,
};

use crate::error::CoreError;
use crate::pager::{CallPager, DEFAULT_PAGE_SIZE};

/// Reconciliation cadence for both polling scopes. Matches the backend
/// contract's expected refresh rhythm.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// View state owned exclusively by the session. Mutated only through
/// apply-snapshot operations; consumers read cloned snapshots.
#[derive(Debug, Default)]
struct ViewState {
    campaigns: Vec<Campaign>,
    metrics: Option<GlobalMetrics>,
    selected: Option<Campaign>,
    pager: CallPager,
}

/// The console's single synchronization service.
///
/// Cheaply cloneable via `Arc`. Owns two independent polling scopes:
///
/// - **global** — the full campaign set plus the global metrics snapshot;
/// - **detail** — the selected campaign's current call page, restarted
///   whenever the selection, page, or status filter changes.
///
/// A failed poll iteration logs and leaves prior state untouched; the
/// loop continues on the next tick. Manual refresh shares the same
/// `refresh_*` code path as the timers, so concurrent invocations are
/// safe (last write wins, and the next tick self-corrects).
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ConsoleClient,
    poll_interval: Duration,
    state: Mutex<ViewState>,
    /// Bumped on every applied snapshot; consumers watch this to redraw.
    changed: watch::Sender<u64>,
    /// Whether background polling is active; cursor changes only restart
    /// the detail loop while this is set.
    polling: AtomicBool,
    global_poll: Mutex<Option<CancellationToken>>,
    detail_poll: Mutex<Option<CancellationToken>>,
}

impl Session {
    pub fn new(client: ConsoleClient) -> Self {
        Self::with_settings(client, POLL_INTERVAL, DEFAULT_PAGE_SIZE)
    }

    pub fn with_settings(client: ConsoleClient, poll_interval: Duration, page_size: usize) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            inner: Arc::new(SessionInner {
                client,
                poll_interval,
                state: Mutex::new(ViewState {
                    pager: CallPager::new(page_size),
                    ..ViewState::default()
                }),
                changed,
                polling: AtomicBool::new(false),
                global_poll: Mutex::new(None),
                detail_poll: Mutex::new(None),
            }),
        }
    }

    /// The underlying backend client.
    pub fn client(&self) -> &ConsoleClient {
        &self.inner.client
    }

    /// Subscribe to change notifications (bumped on every applied snapshot).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changed.subscribe()
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn campaigns(&self) -> Vec<Campaign> {
        self.lock_state().campaigns.clone()
    }

    pub fn metrics(&self) -> Option<GlobalMetrics> {
        self.lock_state().metrics.clone()
    }

    pub fn selected(&self) -> Option<Campaign> {
        self.lock_state().selected.clone()
    }

    /// Snapshot of the call-list cursor (page, filter, rows, has-more).
    pub fn pager(&self) -> CallPager {
        self.lock_state().pager.clone()
    }

    // ── Reconciliation (shared by timers and manual refresh) ─────────

    /// Fetch the campaign set and global metrics, replacing both local
    /// snapshots wholesale. The selected campaign is re-derived by id
    /// into the new list; if the id is absent the prior selection is
    /// left unchanged rather than cleared.
    pub async fn refresh_global(&self) -> Result<(), CoreError> {
        let (campaigns, metrics) = tokio::try_join!(
            self.inner.client.list_campaigns(),
            self.inner.client.global_metrics(),
        )?;

        {
            let mut state = self.lock_state();
            state.campaigns = campaigns;
            state.metrics = Some(metrics);

            if let Some(selected_id) = state.selected.as_ref().map(|c| c.id) {
                if let Some(fresh) = state
                    .campaigns
                    .iter()
                    .find(|c| c.id == selected_id)
                    .cloned()
                {
                    state.selected = Some(fresh);
                }
            }
        }
        self.notify();
        Ok(())
    }

    /// Fetch the selected campaign's current call page under the current
    /// cursor. The cursor epoch is captured before the request; if the
    /// cursor or selection moved while the fetch was in flight, the
    /// result is discarded rather than written into a defunct view.
    pub async fn refresh_detail(&self) -> Result<(), CoreError> {
        let (campaign_id, page, size, filter, epoch) = {
            let state = self.lock_state();
            let Some(selected) = state.selected.as_ref() else {
                return Ok(());
            };
            (
                selected.id,
                state.pager.page(),
                state.pager.page_size(),
                state.pager.filter(),
                state.pager.epoch(),
            )
        };

        let rows = self
            .inner
            .client
            .list_calls(campaign_id, page, size, filter)
            .await?;

        let applied = {
            let mut state = self.lock_state();
            let current = state.pager.epoch() == epoch
                && state.selected.as_ref().is_some_and(|c| c.id == campaign_id);
            if current {
                state.pager.apply_page(rows);
            }
            current
        };

        if applied {
            self.notify();
        } else {
            debug!("discarding call page fetched under a stale cursor");
        }
        Ok(())
    }

    // ── Selection & cursor ───────────────────────────────────────────

    /// Select a campaign, resetting the call cursor and restarting the
    /// detail polling scope.
    pub fn select(&self, campaign: Campaign) {
        {
            let mut state = self.lock_state();
            if state.selected.as_ref().is_some_and(|c| c.id == campaign.id) {
                return;
            }
            state.selected = Some(campaign);
            state.pager.reset();
        }
        self.notify();
        self.restart_detail_poll();
    }

    /// Clear the selection and tear down the detail polling scope.
    pub fn clear_selection(&self) {
        self.stop_detail_poll();
        {
            let mut state = self.lock_state();
            state.selected = None;
            state.pager.reset();
        }
        self.notify();
    }

    /// Change the call-status filter (`None` = all). Resets the cursor
    /// to page 0 and triggers a fresh fetch under the new filter.
    pub fn set_filter(&self, filter: Option<CallStatus>) {
        let changed = self.lock_state().pager.set_filter(filter);
        if changed {
            self.notify();
            self.restart_detail_poll();
        }
    }

    pub fn next_page(&self) {
        let moved = self.lock_state().pager.next_page();
        if moved {
            self.notify();
            self.restart_detail_poll();
        }
    }

    pub fn prev_page(&self) {
        let moved = self.lock_state().pager.prev_page();
        if moved {
            self.notify();
            self.restart_detail_poll();
        }
    }

    // ── Polling lifecycle ────────────────────────────────────────────

    /// Start background polling: the global scope immediately, and the
    /// detail scope whenever a campaign is selected.
    pub fn start_polling(&self) {
        if self.inner.polling.swap(true, Ordering::SeqCst) {
            return;
        }

        let cancel = CancellationToken::new();
        *self.lock_slot(&self.inner.global_poll) = Some(cancel.clone());
        let session = self.clone();
        tokio::spawn(global_poll_task(session, cancel));

        self.restart_detail_poll();
    }

    /// Stop all background polling. In-flight fetches are not aborted;
    /// their results are discarded by the epoch/selection checks.
    pub fn stop_polling(&self) {
        self.inner.polling.store(false, Ordering::SeqCst);
        if let Some(token) = self.lock_slot(&self.inner.global_poll).take() {
            token.cancel();
        }
        self.stop_detail_poll();
    }

    /// Cancel any existing detail loop and, while polling is active and a
    /// campaign is selected, start a fresh one under the current cursor.
    /// The new loop fetches immediately, then on every interval tick.
    fn restart_detail_poll(&self) {
        self.stop_detail_poll();

        if !self.inner.polling.load(Ordering::SeqCst) {
            return;
        }
        if self.lock_state().selected.is_none() {
            return;
        }

        let cancel = CancellationToken::new();
        *self.lock_slot(&self.inner.detail_poll) = Some(cancel.clone());
        let session = self.clone();
        tokio::spawn(detail_poll_task(session, cancel));
    }

    fn stop_detail_poll(&self) {
        if let Some(token) = self.lock_slot(&self.inner.detail_poll).take() {
            token.cancel();
        }
    }

    // ── Actions ──────────────────────────────────────────────────────
    //
    // Lifecycle mutations return their result to the caller (action
    // errors surface there) and trigger an immediate global re-fetch —
    // never an optimistic local status change.

    pub async fn start_campaign(&self, id: CampaignId) -> Result<Campaign, CoreError> {
        let updated = self.inner.client.start_campaign(id).await?;
        self.reload_after_action().await;
        Ok(updated)
    }

    pub async fn pause_campaign(&self, id: CampaignId) -> Result<Campaign, CoreError> {
        let updated = self.inner.client.pause_campaign(id).await?;
        self.reload_after_action().await;
        Ok(updated)
    }

    pub async fn cancel_campaign(&self, id: CampaignId) -> Result<Campaign, CoreError> {
        let updated = self.inner.client.cancel_campaign(id).await?;
        self.reload_after_action().await;
        Ok(updated)
    }

    pub async fn create_campaign(&self, req: &CampaignCreate) -> Result<Campaign, CoreError> {
        let created = self.inner.client.create_campaign(req).await?;
        self.reload_after_action().await;
        Ok(created)
    }

    pub async fn trigger_call(&self, phone_number: &str) -> Result<Call, CoreError> {
        Ok(self.inner.client.trigger_call(phone_number).await?)
    }

    /// Manual refresh of both scopes — the same code path as the timers.
    pub async fn refresh_all(&self) {
        if let Err(e) = self.refresh_global().await {
            warn!(error = %e, "manual global refresh failed");
        }
        if let Err(e) = self.refresh_detail().await {
            warn!(error = %e, "manual detail refresh failed");
        }
    }

    async fn reload_after_action(&self) {
        // The action itself succeeded; a failed reload is a fetch error
        // and self-heals on the next tick.
        if let Err(e) = self.refresh_global().await {
            warn!(error = %e, "post-action reload failed");
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn notify(&self) {
        self.inner.changed.send_modify(|v| *v += 1);
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_slot<'a>(
        &self,
        slot: &'a Mutex<Option<CancellationToken>>,
    ) -> MutexGuard<'a, Option<CancellationToken>> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Global scope: campaigns + metrics, immediately and then every tick.
async fn global_poll_task(session: Session, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(session.inner.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = session.refresh_global().await {
                    warn!(error = %e, "global poll failed; keeping prior snapshot");
                }
            }
        }
    }
    debug!("global poll stopped");
}

/// Detail scope: the selected campaign's call page under the cursor this
/// loop was started with (a cursor change cancels and restarts it).
async fn detail_poll_task(session: Session, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(session.inner.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = session.refresh_detail().await {
                    warn!(error = %e, "detail poll failed; keeping prior page");
                }
            }
        }
    }
    debug!("detail poll stopped");
}
