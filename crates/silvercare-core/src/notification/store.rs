//! Notification store: the alert feed with unread accounting and Info auto-dismiss.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::model::{Alert, AlertKind, NewAlert, NotificationFeedState, PersistedNotificationFeed};
use crate::persistence::{SnapshotRepository, load_or_default, save_logged};
use crate::time::{Clock, generate_id};

const STORE: &str = "NotificationStore";

/// Default lifetime of an Info alert.
pub const DEFAULT_INFO_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Owns the alert feed.
///
/// Info alerts schedule their own dismissal. Pending dismissals are keyed by
/// alert id and aborted when the alert goes away first, on `clear_all()` and
/// when the store is dropped.
pub struct NotificationStore {
    inner: Arc<NotificationInner>,
}

struct NotificationInner {
    state: Mutex<NotificationFeedState>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
    repository: Arc<dyn SnapshotRepository<PersistedNotificationFeed>>,
    clock: Arc<dyn Clock>,
    info_auto_dismiss: Duration,
}

impl NotificationStore {
    pub fn new(
        repository: Arc<dyn SnapshotRepository<PersistedNotificationFeed>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_state(NotificationFeedState::default(), repository, clock)
    }

    /// Creates a store rehydrated from the repository (empty on any fault).
    pub fn restore(
        repository: Arc<dyn SnapshotRepository<PersistedNotificationFeed>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = load_or_default(repository.as_ref(), STORE)
            .map(NotificationFeedState::from_persisted)
            .unwrap_or_default();

        tracing::debug!(
            "[{}] Rehydrated {} alerts ({} unread)",
            STORE,
            state.alerts.len(),
            state.unread_count
        );

        Self::with_state(state, repository, clock)
    }

    fn with_state(
        state: NotificationFeedState,
        repository: Arc<dyn SnapshotRepository<PersistedNotificationFeed>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(NotificationInner {
                state: Mutex::new(state),
                timers: Mutex::new(HashMap::new()),
                repository,
                clock,
                info_auto_dismiss: DEFAULT_INFO_AUTO_DISMISS,
            }),
        }
    }

    /// Overrides how long Info alerts stay in the feed.
    pub fn with_info_auto_dismiss(mut self, after: Duration) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.info_auto_dismiss = after,
            None => tracing::warn!("[{}] Auto-dismiss delay not changed: store is shared", STORE),
        }
        self
    }

    pub fn snapshot(&self) -> NotificationFeedState {
        self.inner.lock_state().clone()
    }

    /// Newest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.lock_state().alerts.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.lock_state().unread_count
    }

    /// Number of Info alerts still waiting for auto-dismiss.
    pub fn pending_dismissals(&self) -> usize {
        self.inner.lock_timers().len()
    }

    /// Prepends a new unread alert and returns it.
    pub fn add(&self, new_alert: NewAlert) -> Alert {
        let alert = new_alert.into_alert(generate_id(), self.inner.clock.now());
        {
            let mut state = self.inner.lock_state();
            state.alerts.insert(0, alert.clone());
            state.unread_count += 1;
            self.inner.persist(&state);
        }

        tracing::debug!(
            "[{}] Added {} alert '{}' ({})",
            STORE,
            alert.kind.as_str(),
            alert.title,
            alert.id
        );

        if alert.kind == AlertKind::Info {
            self.schedule_dismiss(&alert.id);
        }
        alert
    }

    fn schedule_dismiss(&self, id: &str) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(
                "[{}] No Tokio runtime; info alert {} will not auto-dismiss",
                STORE,
                id
            );
            return;
        };

        let weak = Arc::downgrade(&self.inner);
        let after = self.inner.info_auto_dismiss;
        let alert_id = id.to_string();

        let mut timers = self.inner.lock_timers();
        let handle = runtime.spawn(dismiss_later(weak, alert_id, after));
        timers.insert(id.to_string(), handle);
    }

    /// Marks an alert read. Returns false when it is unknown or already read.
    pub fn mark_read(&self, id: &str) -> bool {
        let mut state = self.inner.lock_state();
        let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if alert.read {
            return false;
        }

        alert.read = true;
        state.unread_count = state.unread_count.saturating_sub(1);
        self.inner.persist(&state);
        true
    }

    /// Removes an alert. Returns false when it is unknown.
    pub fn dismiss(&self, id: &str) -> bool {
        if let Some(timer) = self.inner.lock_timers().remove(id) {
            timer.abort();
        }
        self.inner.remove(id)
    }

    /// Empties the feed and cancels every pending auto-dismiss.
    pub fn clear_all(&self) {
        self.inner.abort_timers();

        let mut state = self.inner.lock_state();
        state.alerts.clear();
        state.unread_count = 0;
        self.inner.persist(&state);

        tracing::debug!("[{}] Cleared all alerts", STORE);
    }
}

impl Drop for NotificationStore {
    fn drop(&mut self) {
        self.inner.abort_timers();
    }
}

impl NotificationInner {
    fn lock_state(&self) -> MutexGuard<'_, NotificationFeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_timers(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, state: &NotificationFeedState) {
        save_logged(self.repository.as_ref(), &state.to_persisted(), STORE);
    }

    fn abort_timers(&self) {
        for (_, timer) in self.lock_timers().drain() {
            timer.abort();
        }
    }

    fn remove(&self, id: &str) -> bool {
        let mut state = self.lock_state();
        let Some(position) = state.alerts.iter().position(|a| a.id == id) else {
            return false;
        };

        let removed = state.alerts.remove(position);
        if !removed.read {
            state.unread_count = state.unread_count.saturating_sub(1);
        }
        self.persist(&state);
        true
    }
}

async fn dismiss_later(inner: Weak<NotificationInner>, id: String, after: Duration) {
    tokio::time::sleep(after).await;

    let Some(inner) = inner.upgrade() else {
        return;
    };
    inner.lock_timers().remove(&id);
    if inner.remove(&id) {
        tracing::debug!("[{}] Auto-dismissed info alert {}", STORE, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::model::{AlertMetadata, Severity};
    use crate::persistence::InMemoryRepository;
    use crate::time::SystemClock;

    fn store() -> (
        NotificationStore,
        Arc<InMemoryRepository<PersistedNotificationFeed>>,
    ) {
        let repo = Arc::new(InMemoryRepository::new());
        let store = NotificationStore::new(repo.clone(), Arc::new(SystemClock));
        (store, repo)
    }

    fn assert_unread_invariant(store: &NotificationStore) {
        let state = store.snapshot();
        assert_eq!(
            state.unread_count,
            NotificationFeedState::count_unread(&state.alerts)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_prepends_unread() {
        let (store, _repo) = store();

        store.add(NewAlert::warning("혈압 주의", "혈압이 높아요", false));
        let latest = store.add(NewAlert::reminder("약 복용", "저녁 약 드실 시간"));

        let alerts = store.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id, latest.id);
        assert!(!alerts[0].read);
        assert_eq!(store.unread_count(), 2);
        assert_unread_invariant(&store);
    }

    #[tokio::test(start_paused = true)]
    async fn test_info_auto_dismisses_after_five_seconds() {
        let (store, _repo) = store();

        let info = store.add(NewAlert::info("알림", "잠시 후 사라집니다"));
        store.add(NewAlert::warning("주의", "남아 있어야 함", false));

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert!(store.snapshot().find(&info.id).is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(store.snapshot().find(&info.id).is_none());
        assert_eq!(store.alerts().len(), 1);
        assert_eq!(store.unread_count(), 1);
        assert_eq!(store.pending_dismissals(), 0);
        assert_unread_invariant(&store);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_cancels_timer() {
        let (store, _repo) = store();

        let info = store.add(NewAlert::info("알림", "곧 닫힘"));
        assert_eq!(store.pending_dismissals(), 1);

        assert!(store.dismiss(&info.id));
        assert_eq!(store.pending_dismissals(), 0);
        assert!(!store.dismiss(&info.id));
        assert_eq!(store.unread_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_cancels_timers() {
        let (store, repo) = store();

        store.add(NewAlert::info("하나", "첫 번째"));
        store.add(NewAlert::info("둘", "두 번째"));
        store.clear_all();
        assert_eq!(store.pending_dismissals(), 0);

        let kept = store.add(NewAlert::reminder("산책", "오후 산책"));
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(store.alerts().len(), 1);
        assert_eq!(store.alerts()[0].id, kept.id);
        assert_eq!(repo.latest().unwrap().alerts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_read_only_counts_once() {
        let (store, _repo) = store();
        let alert = store.add(NewAlert::warning("주의", "확인 필요", true));

        assert!(store.mark_read(&alert.id));
        assert!(!store.mark_read(&alert.id));
        assert!(!store.mark_read("missing"));

        assert_eq!(store.unread_count(), 0);
        assert!(store.alerts()[0].read);
        assert_unread_invariant(&store);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissing_read_alert_keeps_count() {
        let (store, _repo) = store();
        let read = store.add(NewAlert::reminder("읽음", "이미 읽음"));
        store.add(NewAlert::reminder("안 읽음", "아직"));
        store.mark_read(&read.id);

        assert!(store.dismiss(&read.id));

        assert_eq!(store.unread_count(), 1);
        assert_unread_invariant(&store);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unread_invariant_under_mixed_operations() {
        let (store, _repo) = store();
        let mut ids = Vec::new();

        for n in 0..12 {
            let alert = match n % 4 {
                0 => NewAlert::info("i", "info"),
                1 => NewAlert::warning("w", "warning", n % 3 == 0),
                2 => NewAlert::emergency("e", "emergency", None),
                _ => NewAlert::reminder("r", "reminder"),
            };
            ids.push(store.add(alert).id);
            assert_unread_invariant(&store);

            match n % 5 {
                0 => {
                    store.mark_read(&ids[n / 2]);
                }
                1 => {
                    store.dismiss(&ids[n / 3]);
                }
                2 => {
                    store.mark_read(&ids[n]);
                    store.dismiss(&ids[n]);
                }
                _ => {}
            }
            assert_unread_invariant(&store);
        }

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_unread_invariant(&store);
        assert!(store.alerts().iter().all(|a| a.kind != AlertKind::Info));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_store_cancels_dismissals() {
        let (store, repo) = store();
        store.add(NewAlert::info("알림", "곧 사라짐"));
        let saves = repo.save_count();

        drop(store);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(repo.save_count(), saves);
    }

    #[test]
    fn test_info_without_runtime_stays() {
        let (store, _repo) = store();

        store.add(NewAlert::info("알림", "런타임 없음"));

        assert_eq!(store.alerts().len(), 1);
        assert_eq!(store.pending_dismissals(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persisted_subset_and_restore() {
        let (store, repo) = store();
        store.add(NewAlert::info("정보", "저장 안 됨"));
        let emergency = store.add(NewAlert::emergency(
            "응급 상황 발생",
            "즉시 확인이 필요합니다",
            Some(AlertMetadata {
                elder_name: Some("김영희".to_string()),
                severity: Some(Severity::Critical),
                ..Default::default()
            }),
        ));
        let warning = store.add(NewAlert::warning("주의", "확인", false));
        store.mark_read(&warning.id);

        let persisted = repo.latest().unwrap();
        assert_eq!(persisted.alerts.len(), 2);

        let restored = NotificationStore::restore(repo.clone(), Arc::new(SystemClock));
        let alerts = restored.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].id, emergency.id);
        assert_eq!(alerts[1].timestamp, emergency.timestamp);
        assert_eq!(restored.unread_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_auto_dismiss_delay() {
        let (store, _repo) = store();
        let store = store.with_info_auto_dismiss(Duration::from_secs(1));

        store.add(NewAlert::info("짧게", "1초"));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.alerts().is_empty());
    }
}
