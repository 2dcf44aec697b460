use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Filter, pagination and loading state a list-bearing view owns
///
/// The rules every list view follows: changing any filter resets the page to
/// 1, and loading/error flags bracket each fetch so duplicate submissions can
/// be suppressed while a request is in flight.
#[derive(Debug, Clone)]
pub struct ListState<F> {
    pub filters: F,
    pub page: i64,
    pub loading: bool,
    pub error: Option<String>,
}

impl<F> ListState<F> {
    pub fn new(filters: F) -> Self {
        Self {
            filters,
            page: 1,
            loading: false,
            error: None,
        }
    }

    /// Replaces the filters, resetting pagination to the first page
    pub fn set_filters(&mut self, filters: F) {
        self.filters = filters;
        self.page = 1;
    }

    /// Navigates to a page without touching the filters
    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }

    /// Marks a fetch as started; returns false when one is already running
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Marks the in-flight fetch as finished
    pub fn finish_load(&mut self) {
        self.loading = false;
    }

    /// Marks the in-flight fetch as failed
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}

/// Trailing-edge debouncer for the search box
///
/// Each keystroke calls `trigger`; only the call that is still the newest when
/// the delay elapses reports true, and only that one should issue the search
/// request.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl SearchDebouncer {
    /// Delay search boxes wait for after the last keystroke
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Waits out the delay; true when no newer trigger superseded this one
    pub async fn trigger(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Filters {
        genre: Option<String>,
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = ListState::new(Filters::default());
        state.set_page(4);
        assert_eq!(state.page, 4);

        state.set_filters(Filters {
            genre: Some("Драма".to_string()),
        });
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_begin_load_suppresses_duplicates() {
        let mut state = ListState::new(Filters::default());
        assert!(state.begin_load());
        assert!(!state.begin_load());

        state.finish_load();
        assert!(state.begin_load());
    }

    #[test]
    fn test_fail_load_records_error() {
        let mut state = ListState::new(Filters::default());
        state.begin_load();
        state.fail_load("Internal server error");
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Internal server error"));

        // The next fetch clears the stale error
        state.begin_load();
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_newest_trigger_fires() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));

        let first = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.trigger().await }
        });

        // A second keystroke arrives before the first delay elapses
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.trigger().await }
        });

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_fires_after_quiet_period() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));
        assert!(debouncer.trigger().await);
    }
}
