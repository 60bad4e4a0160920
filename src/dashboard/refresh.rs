// src/dashboard/refresh.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::DashboardError;
use crate::generator;
use crate::latency::LIGHT_READ_DELAY_MS;
use crate::store::QueryKey;

use super::Dashboard;

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Dashboard {
    /// Regenerates the activity feed and commits it. Returns `false` when a
    /// previous refresh is still running and this one was skipped.
    pub async fn refresh_activity_log(&self) -> Result<bool, DashboardError> {
        if self.refresh_in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("activity refresh still in flight, skipping");
            return Ok(false);
        }
        let _guard = InFlight(&self.refresh_in_flight);

        let mut rx = self.session.subscribe();
        self.latency
            .settle(LIGHT_READ_DELAY_MS, "activity_log", &mut rx, &QueryKey::Global)
            .await?;
        self.store
            .activity_log
            .commit(QueryKey::Global, generator::generate_activity_log())
            .await;
        Ok(true)
    }
}

pub fn spawn_activity_refresh(dashboard: Arc<Dashboard>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick fires immediately; the feed is loaded on demand anyway
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = dashboard.refresh_activity_log().await {
                tracing::warn!(error = %e, "activity refresh failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::tests::{dashboard, dashboard_with};

    #[tokio::test]
    async fn refresh_replaces_the_feed() {
        let d = dashboard();
        let first = d.get_activity_log().await.unwrap();
        assert!(d.refresh_activity_log().await.unwrap());
        let second = d.store().activity_log.get().await.unwrap();
        assert_eq!(second.len(), first.len());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(first[0].id, second[0].id);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_refresh_is_skipped() {
        let d = Arc::new(dashboard_with(Config { latency_scale: 1.0, ..Config::default() }));
        let slow = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.refresh_activity_log().await })
        };
        tokio::task::yield_now().await;
        assert!(!d.refresh_activity_log().await.unwrap());
        assert!(slow.await.unwrap().unwrap());
        // the guard is released once the first refresh is done
        assert!(d.refresh_activity_log().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn background_task_refreshes_periodically() {
        let d = Arc::new(dashboard());
        let handle = spawn_activity_refresh(Arc::clone(&d), Duration::from_secs(3));
        tokio::task::yield_now().await;
        assert!(d.store().activity_log.get().await.is_none());

        tokio::time::sleep(Duration::from_millis(3100)).await;
        let first = d.store().activity_log.get().await.unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        let second = d.store().activity_log.get().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        handle.abort();
    }
}
