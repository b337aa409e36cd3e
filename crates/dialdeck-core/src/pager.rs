// ── Pagination cursor for a campaign's call list ──
//
// The backend has no total-count endpoint, so "has more pages" is derived
// from the size of the last fetched page: a short page is the last page.
// A page that exactly fills `page_size` with nothing after it will still
// enable "next" — an accepted approximation, not a bug to fix here.

use dialdeck_api::{Call, CallStatus};

/// Default page size, matching the backend's call-list default.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Cursor over one campaign's paginated, filtered call list.
///
/// The pager is the only mutator of its rows: pollers fetch under the
/// current cursor and hand the result to [`apply_page`](Self::apply_page).
/// Every cursor movement bumps an epoch so a fetch issued under an older
/// cursor can be recognized and discarded when it lands.
#[derive(Debug, Clone)]
pub struct CallPager {
    page: u32,
    page_size: usize,
    filter: Option<CallStatus>,
    rows: Vec<Call>,
    has_more: bool,
    epoch: u64,
}

impl CallPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size,
            filter: None,
            rows: Vec::new(),
            has_more: false,
            epoch: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current status filter; `None` is the "all" sentinel.
    pub fn filter(&self) -> Option<CallStatus> {
        self.filter
    }

    pub fn rows(&self) -> &[Call] {
        &self.rows
    }

    /// Whether the "next page" control should be enabled.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Cursor identity; changes whenever page, filter, or scope changes.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Switch the status filter. Resets the cursor to page 0 and clears
    /// the current rows so stale-filter rows are never shown under the
    /// new filter label. Returns `false` if the filter is unchanged.
    pub fn set_filter(&mut self, filter: Option<CallStatus>) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.page = 0;
        self.rows.clear();
        self.has_more = false;
        self.epoch += 1;
        true
    }

    /// Advance to the next page, if the last fetch indicated one exists.
    pub fn next_page(&mut self) -> bool {
        if !self.has_more {
            return false;
        }
        self.page += 1;
        self.epoch += 1;
        true
    }

    /// Step back one page; a no-op at page 0.
    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        self.epoch += 1;
        true
    }

    /// Reset to an empty page-0, filterless cursor (used when the
    /// selected campaign changes).
    pub fn reset(&mut self) {
        self.page = 0;
        self.filter = None;
        self.rows.clear();
        self.has_more = false;
        self.epoch += 1;
    }

    /// Apply a fetched page: rows replaced wholesale, "has more" derived
    /// from whether the page came back full.
    pub fn apply_page(&mut self, rows: Vec<Call>) {
        self.has_more = rows.len() == self.page_size;
        self.rows = rows;
    }
}

impl Default for CallPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn call(status: CallStatus) -> Call {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "phoneNumber": "+15551234567",
            "status": status.to_string(),
            "retryCount": 0
        }))
        .expect("valid call json")
    }

    fn page_of(n: usize) -> Vec<Call> {
        (0..n).map(|_| call(CallStatus::Pending)).collect()
    }

    #[test]
    fn filter_change_resets_cursor_and_clears_rows() {
        let mut pager = CallPager::new(3);
        pager.apply_page(page_of(3));
        pager.next_page();
        pager.next_page();
        assert_eq!(pager.page(), 2);

        let changed = pager.set_filter(Some(CallStatus::Failed));
        assert!(changed);
        assert_eq!(pager.page(), 0);
        assert!(pager.rows().is_empty());
        assert!(!pager.has_more());
    }

    #[test]
    fn unchanged_filter_is_a_noop() {
        let mut pager = CallPager::new(3);
        pager.apply_page(page_of(3));
        pager.next_page();
        let epoch = pager.epoch();

        assert!(!pager.set_filter(None));
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.epoch(), epoch);
    }

    #[test]
    fn prev_page_at_zero_is_a_noop() {
        let mut pager = CallPager::new(3);
        assert!(!pager.prev_page());
        assert_eq!(pager.page(), 0);
    }

    #[test]
    fn has_more_iff_page_is_full() {
        let mut pager = CallPager::new(3);

        pager.apply_page(page_of(3));
        assert!(pager.has_more());

        pager.apply_page(page_of(2));
        assert!(!pager.has_more());

        pager.apply_page(Vec::new());
        assert!(!pager.has_more());
    }

    #[test]
    fn next_page_requires_a_full_last_page() {
        let mut pager = CallPager::new(3);
        pager.apply_page(page_of(2));
        assert!(!pager.next_page());
        assert_eq!(pager.page(), 0);

        pager.apply_page(page_of(3));
        assert!(pager.next_page());
        assert_eq!(pager.page(), 1);
        assert!(pager.prev_page());
        assert_eq!(pager.page(), 0);
    }

    #[test]
    fn cursor_moves_bump_the_epoch() {
        let mut pager = CallPager::new(3);
        let e0 = pager.epoch();
        pager.apply_page(page_of(3));
        assert_eq!(pager.epoch(), e0, "applying rows is not a cursor move");

        pager.next_page();
        let e1 = pager.epoch();
        assert!(e1 > e0);

        pager.set_filter(Some(CallStatus::Completed));
        assert!(pager.epoch() > e1);
    }
}
