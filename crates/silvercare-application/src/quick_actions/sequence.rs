//! Staggered alert playback.
//!
//! A scenario is a list of alerts with offsets from the moment it starts.
//! Zero-offset alerts are added before [`play`] returns; the rest are added
//! by a background task that holds only a weak reference to the feed, so a
//! dropped feed ends the sequence early. Nothing is cancelled or retried.

use std::sync::{Arc, Weak};
use std::time::Duration;

use silvercare_core::notification::{Alert, NewAlert, NotificationStore};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// One alert in a scenario.
#[derive(Debug, Clone)]
pub struct Step {
    pub after: Duration,
    pub alert: NewAlert,
}

impl Step {
    pub fn now(alert: NewAlert) -> Self {
        Self {
            after: Duration::ZERO,
            alert,
        }
    }

    pub fn after_millis(millis: u64, alert: NewAlert) -> Self {
        Self {
            after: Duration::from_millis(millis),
            alert,
        }
    }
}

/// Alerts of a running scenario, in the order they reach the feed.
#[derive(Debug)]
pub struct AlertSequence {
    rx: mpsc::UnboundedReceiver<Alert>,
}

impl AlertSequence {
    /// An already finished sequence with no alerts.
    pub fn empty() -> Self {
        let (_tx, rx) = mpsc::unbounded_channel();
        Self { rx }
    }

    /// Waits for the next alert. `None` once the scenario is over.
    pub async fn next(&mut self) -> Option<Alert> {
        self.rx.recv().await
    }

    /// Waits for the whole scenario.
    pub async fn collect(mut self) -> Vec<Alert> {
        let mut alerts = Vec::new();
        while let Some(alert) = self.rx.recv().await {
            alerts.push(alert);
        }
        alerts
    }
}

/// Starts a scenario on `store`.
pub fn play(store: &Arc<NotificationStore>, mut steps: Vec<Step>) -> AlertSequence {
    let (tx, rx) = mpsc::unbounded_channel();

    // Stable: steps sharing an offset keep their listed order.
    steps.sort_by_key(|step| step.after);
    let split = steps
        .iter()
        .position(|step| !step.after.is_zero())
        .unwrap_or(steps.len());
    let delayed = steps.split_off(split);

    for step in steps {
        let _ = tx.send(store.add(step.alert));
    }

    if delayed.is_empty() {
        return AlertSequence { rx };
    }

    match Handle::try_current() {
        Ok(runtime) => {
            let started = Instant::now();
            runtime.spawn(run_delayed(Arc::downgrade(store), started, delayed, tx));
        }
        Err(_) => tracing::warn!(
            "No Tokio runtime; {} delayed alerts dropped",
            delayed.len()
        ),
    }

    AlertSequence { rx }
}

async fn run_delayed(
    store: Weak<NotificationStore>,
    started: Instant,
    steps: Vec<Step>,
    tx: mpsc::UnboundedSender<Alert>,
) {
    for step in steps {
        tokio::time::sleep_until(started + step.after).await;

        let Some(store) = store.upgrade() else {
            tracing::debug!("Notification feed dropped; ending alert sequence");
            return;
        };
        let alert = store.add(step.alert);
        // The listener may be gone; the feed still gets the alert.
        let _ = tx.send(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvercare_core::notification::PersistedNotificationFeed;
    use silvercare_core::persistence::InMemoryRepository;
    use silvercare_core::time::SystemClock;

    fn feed() -> Arc<NotificationStore> {
        Arc::new(
            NotificationStore::new(
                Arc::new(InMemoryRepository::<PersistedNotificationFeed>::new()),
                Arc::new(SystemClock),
            )
            .with_info_auto_dismiss(Duration::from_secs(60)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_steps_land_before_return() {
        let store = feed();
        let _sequence = play(
            &store,
            vec![
                Step::now(NewAlert::warning("첫 번째", "m", false)),
                Step::after_millis(2000, NewAlert::reminder("나중", "m")),
            ],
        );

        assert_eq!(store.alerts().len(), 1);
        assert_eq!(store.alerts()[0].title, "첫 번째");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_steps_arrive_in_offset_order() {
        let store = feed();
        let mut sequence = play(
            &store,
            vec![
                Step::after_millis(4000, NewAlert::reminder("셋", "m")),
                Step::now(NewAlert::reminder("하나", "m")),
                Step::after_millis(2000, NewAlert::reminder("둘", "m")),
            ],
        );

        assert_eq!(sequence.next().await.unwrap().title, "하나");

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(store.alerts().len(), 1);

        assert_eq!(sequence.next().await.unwrap().title, "둘");
        assert_eq!(sequence.next().await.unwrap().title, "셋");
        assert!(sequence.next().await.is_none());

        let titles: Vec<String> = store.alerts().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["셋", "둘", "하나"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_feed_ends_sequence() {
        let store = feed();
        let sequence = play(
            &store,
            vec![Step::after_millis(1000, NewAlert::reminder("늦은 알림", "m"))],
        );
        drop(store);

        assert!(sequence.collect().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_sequence_is_finished() {
        assert!(AlertSequence::empty().collect().await.is_empty());
    }
}
