// src/latency.rs
//
// Artificial response delay, cancelled when the session moves to another
// data context while a request is waiting.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::DashboardError;
use crate::session::Session;
use crate::store::QueryKey;

pub const READ_DELAY_MS: u64 = 100;
pub const LIGHT_READ_DELAY_MS: u64 = 50;
pub const ASSIGN_DELAY_MS: u64 = 150;
pub const APPLY_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy)]
pub struct Latency {
    scale: f64,
}

impl Latency {
    pub fn new(scale: f64) -> Self {
        Latency { scale: scale.max(0.0) }
    }

    pub fn scaled(&self, base_ms: u64) -> Duration {
        Duration::from_millis((base_ms as f64 * self.scale).round() as u64)
    }

    pub async fn settle(
        &self,
        base_ms: u64,
        what: &'static str,
        session: &mut watch::Receiver<Session>,
        key: &QueryKey,
    ) -> Result<(), DashboardError> {
        let delay = self.scaled(base_ms);
        let was_current = session.borrow_and_update().covers(key);
        if delay.is_zero() {
            return Ok(());
        }

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = session.changed() => {
                    if changed.is_err() {
                        // session owner is gone; nothing left to cancel on
                        (&mut sleep).await;
                        return Ok(());
                    }
                    let still_current = session.borrow_and_update().covers(key);
                    if was_current && !still_current {
                        tracing::debug!(what, ?key, "in-flight request superseded");
                        return Err(DashboardError::Superseded { kind: what, key: key.clone() });
                    }
                }
            }
        }
    }
}
